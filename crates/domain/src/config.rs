//! Configuration structures
//!
//! The core consumes but does not own its configuration: the database
//! location and the sales-engineer/division enumerations are supplied at
//! initialization (environment variables or a config file, see the infra
//! loader) so the same core serves different deployments.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DB_PATH, DEFAULT_DB_POOL_SIZE, DEFAULT_DIVISIONS, DEFAULT_SALES_ENGINEERS,
};

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub roster: RosterConfig,
}

/// Backing store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: String,
    /// Connection pool size.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

/// External enumerations the record store validates against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Accepted `sales_engineer` values.
    pub sales_engineers: Vec<String>,
    /// Accepted `division` values.
    pub divisions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                path: DEFAULT_DB_PATH.to_string(),
                pool_size: DEFAULT_DB_POOL_SIZE,
            },
            roster: RosterConfig::default(),
        }
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            sales_engineers: DEFAULT_SALES_ENGINEERS.iter().map(ToString::to_string).collect(),
            divisions: DEFAULT_DIVISIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

fn default_pool_size() -> u32 {
    DEFAULT_DB_POOL_SIZE
}
