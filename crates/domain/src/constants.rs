//! Application constants
//!
//! Centralized location for domain-level constants. The roster and division
//! lists here are only the defaults baked into [`crate::config`]; deployments
//! override them through configuration.

/// Default connection pool size for the backing SQLite file.
pub const DEFAULT_DB_POOL_SIZE: u32 = 4;

/// Default database file path relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "data/po_monitoring.db";

/// Default sales engineer roster.
pub const DEFAULT_SALES_ENGINEERS: [&str; 5] = ["RSM", "TNU", "MFA", "HSA", "HTA"];

/// Default division list.
pub const DEFAULT_DIVISIONS: [&str; 2] = ["Industrial Cleaning", "Condition Monitoring"];

/// Upper bound for `payment_progress` (inclusive, percent).
pub const MAX_PAYMENT_PROGRESS: i64 = 100;
