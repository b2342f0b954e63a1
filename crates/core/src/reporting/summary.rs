//! Aggregation engine for the reporting dashboard.
//!
//! Pure functions over an already-filtered record set. Records entering this
//! stage are expected to carry a freshly derived status (the service
//! guarantees that on its read path); no re-derivation happens here.

use std::collections::BTreeMap;

use pomonitor_domain::{PoStatus, PurchaseOrder};
use serde::{Deserialize, Serialize};

/// PO value totals per lifecycle status.
///
/// All three buckets are always present; a bucket with no records reports
/// zero, not absence. This is deliberately different from
/// [`sum_by_sales_engineer`], which only lists engineers seen in the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusTotals {
    pub open: f64,
    pub completed: f64,
    pub overdue: f64,
}

impl StatusTotals {
    /// Sum across all three buckets.
    pub fn total(&self) -> f64 {
        self.open + self.completed + self.overdue
    }
}

/// Sum `nominal_po` per status bucket.
pub fn sum_by_status(orders: &[PurchaseOrder]) -> StatusTotals {
    let mut totals = StatusTotals::default();
    for po in orders {
        match po.status {
            PoStatus::Open => totals.open += po.nominal_po,
            PoStatus::Completed => totals.completed += po.nominal_po,
            PoStatus::Overdue => totals.overdue += po.nominal_po,
        }
    }
    totals
}

/// Sum `nominal_po` grouped by sales engineer.
///
/// Only engineers present in the input appear; the BTreeMap keeps the
/// iteration order deterministic for rendering.
pub fn sum_by_sales_engineer(orders: &[PurchaseOrder]) -> BTreeMap<String, f64> {
    let mut revenue = BTreeMap::new();
    for po in orders {
        *revenue.entry(po.sales_engineer.clone()).or_insert(0.0) += po.nominal_po;
    }
    revenue
}
