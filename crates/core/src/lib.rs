//! # PO Monitor Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The status derivation rule (OPEN/COMPLETED/OVERDUE)
//! - The reporting filter and aggregation engines
//! - Port/adapter interfaces (traits)
//! - The order lifecycle service
//!
//! ## Architecture Principles
//! - Only depends on `pomonitor-domain`
//! - No database or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod orders;
pub mod reporting;
pub mod status;

// Re-export specific items to avoid ambiguity
pub use orders::ports::OrderRepository;
pub use orders::{OrderReport, OrderService};
pub use reporting::filter::{default_year, filter_orders, OrderFilter};
pub use reporting::summary::{sum_by_sales_engineer, sum_by_status, StatusTotals};
pub use status::derive_status;
