//! Core domain types for purchase-order tracking.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::PoMonitorError;

/// Lifecycle status of a purchase order.
///
/// Derived from `(expected_eta, actual_eta, today)` and never authoritative
/// on its own: callers must treat any persisted value as a cache and
/// re-derive on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PoStatus {
    Open,
    Completed,
    Overdue,
}

impl PoStatus {
    /// Canonical uppercase label used in storage and reporting.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Completed => "COMPLETED",
            Self::Overdue => "OVERDUE",
        }
    }
}

impl fmt::Display for PoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PoStatus {
    type Err = PoMonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::Open),
            "COMPLETED" => Ok(Self::Completed),
            "OVERDUE" => Ok(Self::Overdue),
            other => Err(PoMonitorError::Internal(format!("unknown status: {other}"))),
        }
    }
}

/// A stored purchase order.
///
/// Date fields are optional on the read side: an unparsable stored date
/// loads as `None` instead of failing the whole fetch. A `None`
/// `expected_eta` can never make a record overdue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Store-assigned identifier, immutable after creation.
    pub id: i64,
    pub customer_name: String,
    pub sales_engineer: String,
    pub division: String,
    pub quotation_no: Option<String>,
    pub po_no: String,
    pub po_received_date: Option<NaiveDate>,
    pub expected_eta: Option<NaiveDate>,
    pub actual_eta: Option<NaiveDate>,
    /// PO value in the deployment currency (Rp in the reference roster).
    pub nominal_po: f64,
    /// Terms of payment, free text.
    pub top: Option<String>,
    /// Payment progress percentage in `[0, 100]`.
    pub payment_progress: i64,
    pub remarks: Option<String>,
    /// Derived lifecycle status; refreshed on every read.
    pub status: PoStatus,
    /// Set once at creation, immutable.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new purchase order.
///
/// Unlike [`PurchaseOrder`], the received date and expected ETA are
/// mandatory here: no record may be created without them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderDraft {
    pub customer_name: String,
    pub sales_engineer: String,
    pub division: String,
    #[serde(default)]
    pub quotation_no: Option<String>,
    pub po_no: String,
    pub po_received_date: NaiveDate,
    pub expected_eta: NaiveDate,
    #[serde(default)]
    pub actual_eta: Option<NaiveDate>,
    #[serde(default)]
    pub nominal_po: f64,
    #[serde(default)]
    pub top: Option<String>,
    #[serde(default)]
    pub payment_progress: i64,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Partial update applied to an existing purchase order.
///
/// Every field is optional; `None` leaves the stored value untouched.
/// `actual_eta` is doubly optional so a patch can distinguish "leave as is"
/// (`None`) from "clear the completion date" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderPatch {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub sales_engineer: Option<String>,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub quotation_no: Option<Option<String>>,
    #[serde(default)]
    pub po_no: Option<String>,
    #[serde(default)]
    pub po_received_date: Option<NaiveDate>,
    #[serde(default)]
    pub expected_eta: Option<NaiveDate>,
    #[serde(default)]
    pub actual_eta: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub nominal_po: Option<f64>,
    #[serde(default)]
    pub top: Option<Option<String>>,
    #[serde(default)]
    pub payment_progress: Option<i64>,
    #[serde(default)]
    pub remarks: Option<Option<String>>,
}

impl PurchaseOrderPatch {
    /// True when the patch carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge the patch into an existing record.
    ///
    /// `id`, `created_at` and `status` are deliberately untouched: the first
    /// two are immutable, the status is re-derived by the caller after the
    /// merge.
    pub fn apply_to(&self, po: &mut PurchaseOrder) {
        if let Some(v) = &self.customer_name {
            po.customer_name = v.clone();
        }
        if let Some(v) = &self.sales_engineer {
            po.sales_engineer = v.clone();
        }
        if let Some(v) = &self.division {
            po.division = v.clone();
        }
        if let Some(v) = &self.quotation_no {
            po.quotation_no = v.clone();
        }
        if let Some(v) = &self.po_no {
            po.po_no = v.clone();
        }
        if let Some(v) = self.po_received_date {
            po.po_received_date = Some(v);
        }
        if let Some(v) = self.expected_eta {
            po.expected_eta = Some(v);
        }
        if let Some(v) = self.actual_eta {
            po.actual_eta = v;
        }
        if let Some(v) = self.nominal_po {
            po.nominal_po = v;
        }
        if let Some(v) = &self.top {
            po.top = v.clone();
        }
        if let Some(v) = self.payment_progress {
            po.payment_progress = v;
        }
        if let Some(v) = &self.remarks {
            po.remarks = v.clone();
        }
    }
}
