//! Purchase-order lifecycle: repository port and service.

pub mod ports;
pub mod service;

pub use service::{OrderReport, OrderService};
