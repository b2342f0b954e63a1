//! # PO Monitor Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - The SQLite-backed record store (connection pool, schema, repository)
//! - The configuration loader (environment variables and config files)
//!
//! ## Architecture
//! - Implements traits defined in `pomonitor-core`
//! - Depends on `pomonitor-domain` and `pomonitor-core`
//! - Contains all "impure" code (file I/O, SQL)

pub mod config;
pub mod database;

// Re-export commonly used items
pub use database::manager::DbManager;
pub use database::order_repository::SqliteOrderRepository;
