//! Database connection manager backed by a pooled SQLite file.

use std::fs;
use std::path::{Path, PathBuf};

use pomonitor_domain::{PoMonitorError, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use tracing::info;

const SCHEMA_VERSION: i32 = 2;
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Columns added after the first released schema. Pre-existing databases
/// gain them on startup with safe defaults, so old rows keep loading.
const ADDITIVE_COLUMNS: [(&str, &str); 4] = [
    ("quotation_no", "TEXT"),
    ("top", "TEXT"),
    ("payment_progress", "INTEGER NOT NULL DEFAULT 0"),
    ("remarks", "TEXT"),
];

/// A connection checked out of the pool.
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Database manager that wraps an r2d2 pool over one SQLite file.
pub struct DbManager {
    pool: Pool<SqliteConnectionManager>,
    path: PathBuf,
}

impl DbManager {
    /// Create a new manager with the given pool size.
    ///
    /// Parent directories of the database file are created on demand, and
    /// every pooled connection runs in WAL mode so one logical writer and
    /// concurrent readers coexist on the same file.
    pub fn new<P: AsRef<Path>>(db_path: P, pool_size: u32) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| {
                    PoMonitorError::Database(format!(
                        "failed to create database directory {}: {err}",
                        parent.display()
                    ))
                })?;
            }
        }

        let manager = SqliteConnectionManager::file(&path).with_init(|conn| {
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")
        });

        let pool = Pool::builder()
            .max_size(pool_size.max(1))
            .build(manager)
            .map_err(|err| PoMonitorError::Database(format!("failed to build pool: {err}")))?;

        info!(
            db_path = %path.display(),
            max_connections = pool.max_size(),
            "sqlite pool initialised"
        );

        Ok(Self { pool, path })
    }

    /// Acquire a connection from the pool.
    pub fn get_connection(&self) -> Result<DbConnection> {
        self.pool
            .get()
            .map_err(|err| PoMonitorError::Database(format!("failed to get connection: {err}")))
    }

    /// Ensure the full schema exists on the current database.
    ///
    /// Creates the baseline tables, then backfills any additive columns an
    /// older database is missing.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.execute_batch(SCHEMA_SQL).map_err(map_sql_error)?;

        for (column, definition) in ADDITIVE_COLUMNS {
            ensure_column(&conn, column, definition)?;
        }

        conn.execute(
            "INSERT OR REPLACE INTO schema_version (version, applied_at)
             VALUES (?1, CAST(strftime('%s','now') AS INTEGER))",
            params![SCHEMA_VERSION],
        )
        .map_err(map_sql_error)?;
        Ok(())
    }

    /// Return the configured database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Perform a health check to verify database connectivity.
    pub fn health_check(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", params![], |row| row.get::<_, i32>(0))
            .map_err(map_sql_error)?;
        Ok(())
    }
}

/// Add `column` to `purchase_orders` when an older database lacks it.
fn ensure_column(conn: &DbConnection, column: &str, definition: &str) -> Result<()> {
    let mut stmt =
        conn.prepare("SELECT name FROM pragma_table_info('purchase_orders')").map_err(map_sql_error)?;
    let names = stmt
        .query_map(params![], |row| row.get::<_, String>(0))
        .map_err(map_sql_error)?
        .collect::<rusqlite::Result<Vec<String>>>()
        .map_err(map_sql_error)?;

    if names.iter().any(|name| name == column) {
        return Ok(());
    }

    info!(column, "adding missing purchase_orders column");
    conn.execute_batch(&format!("ALTER TABLE purchase_orders ADD COLUMN {column} {definition}"))
        .map_err(map_sql_error)?;
    Ok(())
}

pub(crate) fn map_sql_error(err: rusqlite::Error) -> PoMonitorError {
    PoMonitorError::Database(err.to_string())
}
