//! # PO Monitor Domain
//!
//! Business domain types and models for the PO monitoring core.
//!
//! This crate contains:
//! - Domain data types (PurchaseOrder, PoStatus, drafts and patches)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other workspace crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::{Config, DatabaseConfig, RosterConfig};
pub use errors::{PoMonitorError, Result};
pub use types::{PoStatus, PurchaseOrder, PurchaseOrderDraft, PurchaseOrderPatch};
