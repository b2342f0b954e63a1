//! Port interfaces for purchase-order persistence.
//!
//! These traits define the boundary between core business logic and the
//! infrastructure implementation. The store is synchronous by design: every
//! operation either commits as one atomic unit and returns, or fails without
//! leaving a partial write behind.

use pomonitor_domain::{PoStatus, PurchaseOrder, PurchaseOrderDraft, Result};

/// Trait for persisting and querying purchase orders.
pub trait OrderRepository: Send + Sync {
    /// Insert a new record, assigning its `id` and `created_at`.
    ///
    /// `status_cache` is the status derived at write time. It is stored for
    /// convenience only and is never treated as ground truth on read.
    fn insert(&self, draft: &PurchaseOrderDraft, status_cache: PoStatus)
        -> Result<PurchaseOrder>;

    /// Fetch every record, most recently created first.
    ///
    /// The returned `status` fields are whatever the cache holds; callers
    /// re-derive them against the current date.
    fn fetch_all(&self) -> Result<Vec<PurchaseOrder>>;

    /// Fetch a single record by id, `None` when absent.
    fn fetch_by_id(&self, id: i64) -> Result<Option<PurchaseOrder>>;

    /// Overwrite all mutable fields of an existing record.
    ///
    /// Fails with `NotFound` when `order.id` is unknown. `id` and
    /// `created_at` are never changed by this call.
    fn update(&self, order: &PurchaseOrder) -> Result<()>;

    /// Remove a record permanently.
    ///
    /// Idempotent: deleting an absent id is a no-op, so a double-submitted
    /// delete from the UI cannot surface an error.
    fn delete(&self, id: i64) -> Result<()>;

    /// Write a freshly derived status back into the cache column.
    ///
    /// A no-op for unknown ids; the cache is advisory and this call must
    /// never invent a row.
    fn refresh_status_cache(&self, id: i64, status: PoStatus) -> Result<()>;
}
