//! Reporting engines: filtering and aggregation over the record set.

pub mod filter;
pub mod summary;
