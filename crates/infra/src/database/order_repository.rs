//! SQLite-backed implementation of the `OrderRepository` port.
//!
//! Dates are stored as ISO-8601 TEXT to stay readable in the raw file. An
//! unparsable stored date loads as `None` with a warning instead of failing
//! the whole fetch, so one corrupt row cannot take down a bulk read. Every
//! mutation runs inside a transaction: a failed operation leaves no partial
//! write behind.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use pomonitor_core::OrderRepository as OrderRepositoryPort;
use pomonitor_domain::{
    PoMonitorError, PoStatus, PurchaseOrder, PurchaseOrderDraft, Result,
};
use rusqlite::types::Type;
use rusqlite::{params, Row};
use tracing::warn;

use super::manager::{map_sql_error, DbManager};

/// SQLite-backed repository for purchase orders.
pub struct SqliteOrderRepository {
    db: Arc<DbManager>,
}

impl SqliteOrderRepository {
    /// Create a repository backed by the shared connection pool.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

impl OrderRepositoryPort for SqliteOrderRepository {
    fn insert(
        &self,
        draft: &PurchaseOrderDraft,
        status_cache: PoStatus,
    ) -> Result<PurchaseOrder> {
        let mut conn = self.db.get_connection()?;
        let tx = conn.transaction().map_err(map_sql_error)?;

        let created_at = Utc::now();
        tx.execute(
            ORDER_INSERT_SQL,
            params![
                draft.customer_name,
                draft.sales_engineer,
                draft.division,
                draft.quotation_no,
                draft.po_no,
                date_to_text(Some(draft.po_received_date)),
                date_to_text(Some(draft.expected_eta)),
                date_to_text(draft.actual_eta),
                draft.nominal_po,
                draft.top,
                draft.payment_progress,
                draft.remarks,
                status_cache.as_str(),
                created_at.to_rfc3339(),
            ],
        )
        .map_err(map_sql_error)?;

        let id = tx.last_insert_rowid();
        tx.commit().map_err(map_sql_error)?;

        Ok(PurchaseOrder {
            id,
            customer_name: draft.customer_name.clone(),
            sales_engineer: draft.sales_engineer.clone(),
            division: draft.division.clone(),
            quotation_no: draft.quotation_no.clone(),
            po_no: draft.po_no.clone(),
            po_received_date: Some(draft.po_received_date),
            expected_eta: Some(draft.expected_eta),
            actual_eta: draft.actual_eta,
            nominal_po: draft.nominal_po,
            top: draft.top.clone(),
            payment_progress: draft.payment_progress,
            remarks: draft.remarks.clone(),
            status: status_cache,
            created_at,
        })
    }

    fn fetch_all(&self) -> Result<Vec<PurchaseOrder>> {
        let conn = self.db.get_connection()?;
        let mut stmt = conn.prepare(ORDER_SELECT_ALL_SQL).map_err(map_sql_error)?;
        let orders = stmt
            .query_map([], map_order_row)
            .map_err(map_sql_error)?
            .collect::<rusqlite::Result<Vec<PurchaseOrder>>>()
            .map_err(map_sql_error)?;
        Ok(orders)
    }

    fn fetch_by_id(&self, id: i64) -> Result<Option<PurchaseOrder>> {
        let conn = self.db.get_connection()?;
        match conn.query_row(ORDER_SELECT_BY_ID_SQL, params![id], map_order_row) {
            Ok(order) => Ok(Some(order)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(err) => Err(map_sql_error(err)),
        }
    }

    fn update(&self, order: &PurchaseOrder) -> Result<()> {
        let mut conn = self.db.get_connection()?;
        let tx = conn.transaction().map_err(map_sql_error)?;

        let changed = tx
            .execute(
                ORDER_UPDATE_SQL,
                params![
                    order.customer_name,
                    order.sales_engineer,
                    order.division,
                    order.quotation_no,
                    order.po_no,
                    date_to_text(order.po_received_date),
                    date_to_text(order.expected_eta),
                    date_to_text(order.actual_eta),
                    order.nominal_po,
                    order.top,
                    order.payment_progress,
                    order.remarks,
                    order.status.as_str(),
                    order.id,
                ],
            )
            .map_err(map_sql_error)?;

        if changed == 0 {
            return Err(PoMonitorError::NotFound(format!("purchase order {}", order.id)));
        }
        tx.commit().map_err(map_sql_error)
    }

    fn delete(&self, id: i64) -> Result<()> {
        let conn = self.db.get_connection()?;
        // Deliberately ignores the affected-row count: deleting an absent id
        // is a no-op so a double-submitted delete cannot fail.
        conn.execute("DELETE FROM purchase_orders WHERE id = ?1", params![id])
            .map_err(map_sql_error)?;
        Ok(())
    }

    fn refresh_status_cache(&self, id: i64, status: PoStatus) -> Result<()> {
        let conn = self.db.get_connection()?;
        conn.execute(
            "UPDATE purchase_orders SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )
        .map_err(map_sql_error)?;
        Ok(())
    }
}

const ORDER_COLUMNS: &str = "id, customer_name, sales_engineer, division, quotation_no, po_no,
        po_received_date, expected_eta, actual_eta, nominal_po, top, payment_progress,
        remarks, status, created_at";

const ORDER_INSERT_SQL: &str = "INSERT INTO purchase_orders (
        customer_name, sales_engineer, division, quotation_no, po_no,
        po_received_date, expected_eta, actual_eta, nominal_po, top,
        payment_progress, remarks, status, created_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)";

const ORDER_SELECT_ALL_SQL: &str = "SELECT id, customer_name, sales_engineer, division,
        quotation_no, po_no, po_received_date, expected_eta, actual_eta, nominal_po, top,
        payment_progress, remarks, status, created_at
    FROM purchase_orders
    ORDER BY created_at DESC, id DESC";

const ORDER_SELECT_BY_ID_SQL: &str = "SELECT id, customer_name, sales_engineer, division,
        quotation_no, po_no, po_received_date, expected_eta, actual_eta, nominal_po, top,
        payment_progress, remarks, status, created_at
    FROM purchase_orders
    WHERE id = ?1";

const ORDER_UPDATE_SQL: &str = "UPDATE purchase_orders SET
        customer_name = ?1, sales_engineer = ?2, division = ?3, quotation_no = ?4,
        po_no = ?5, po_received_date = ?6, expected_eta = ?7, actual_eta = ?8,
        nominal_po = ?9, top = ?10, payment_progress = ?11, remarks = ?12, status = ?13
    WHERE id = ?14";

fn map_order_row(row: &Row<'_>) -> rusqlite::Result<PurchaseOrder> {
    let id: i64 = row.get(0)?;

    let status_raw: String = row.get(13)?;
    let status = PoStatus::from_str(&status_raw).unwrap_or_else(|_| {
        // The cache is advisory; a corrupted label is re-derived by the
        // caller anyway.
        warn!(id, status = %status_raw, "unknown stored status label, defaulting to OPEN");
        PoStatus::Open
    });

    let created_raw: String = row.get(14)?;
    let created_at = DateTime::parse_from_rfc3339(&created_raw)
        .map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(14, Type::Text, Box::new(err))
        })?
        .with_timezone(&Utc);

    Ok(PurchaseOrder {
        id,
        customer_name: row.get(1)?,
        sales_engineer: row.get(2)?,
        division: row.get(3)?,
        quotation_no: row.get(4)?,
        po_no: row.get(5)?,
        po_received_date: parse_date(id, "po_received_date", row.get(6)?),
        expected_eta: parse_date(id, "expected_eta", row.get(7)?),
        actual_eta: parse_date(id, "actual_eta", row.get(8)?),
        nominal_po: row.get(9)?,
        top: row.get(10)?,
        payment_progress: row.get(11)?,
        remarks: row.get(12)?,
        status,
        created_at,
    })
}

fn date_to_text(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

/// Parse a stored date, falling back to `None` on malformed input.
///
/// The fallback is deliberate: one bad row must not fail a bulk read, and a
/// missing expected ETA downstream means "cannot be overdue", never a crash.
fn parse_date(id: i64, field: &str, raw: Option<String>) -> Option<NaiveDate> {
    let raw = raw?;
    match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            warn!(id, field, value = %raw, error = %err, "unparsable stored date, treating as unknown");
            None
        }
    }
}
