//! Reporting filter engine.
//!
//! Narrows a full record set by zero or more independent criteria. Every
//! criterion is optional ("All" in the UI maps to `None` here) and the
//! criteria compose with logical AND, so the order in which they are applied
//! is irrelevant. Filtering never touches the store and preserves the input
//! ordering.

use chrono::{Datelike, NaiveDate};
use pomonitor_domain::{PoStatus, PurchaseOrder};
use serde::{Deserialize, Serialize};

/// Filter criteria for the reporting views.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderFilter {
    /// Exact match on the roster value.
    #[serde(default)]
    pub sales_engineer: Option<String>,
    /// Exact match on the freshly derived status.
    #[serde(default)]
    pub status: Option<PoStatus>,
    /// Month (1-12) of `po_received_date`.
    #[serde(default)]
    pub month: Option<u32>,
    /// Calendar year of `po_received_date`.
    #[serde(default)]
    pub year: Option<i32>,
    /// Case-insensitive substring over `customer_name` OR `po_no`.
    #[serde(default)]
    pub search: Option<String>,
}

impl OrderFilter {
    /// True when no criterion is set, i.e. the filter passes everything.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Whether a single record satisfies every set criterion.
    ///
    /// Records without a `po_received_date` cannot match a month or year
    /// criterion: an unknown date is excluded rather than guessed at.
    pub fn matches(&self, po: &PurchaseOrder) -> bool {
        if let Some(engineer) = &self.sales_engineer {
            if &po.sales_engineer != engineer {
                return false;
            }
        }
        if let Some(status) = self.status {
            if po.status != status {
                return false;
            }
        }
        if let Some(month) = self.month {
            if po.po_received_date.map(|date| date.month()) != Some(month) {
                return false;
            }
        }
        if let Some(year) = self.year {
            if po.po_received_date.map(|date| date.year()) != Some(year) {
                return false;
            }
        }
        if let Some(needle) = &self.search {
            let needle = needle.to_lowercase();
            let in_customer = po.customer_name.to_lowercase().contains(&needle);
            let in_po_no = po.po_no.to_lowercase().contains(&needle);
            if !in_customer && !in_po_no {
                return false;
            }
        }
        true
    }
}

/// Return the subset of `orders` matching `filter`, preserving order.
pub fn filter_orders(orders: &[PurchaseOrder], filter: &OrderFilter) -> Vec<PurchaseOrder> {
    orders.iter().filter(|po| filter.matches(po)).cloned().collect()
}

/// Default year for the reporting filter when the caller leaves it unset.
///
/// The current calendar year wins when any record carries it; otherwise the
/// earliest year present in the data. `None` only when no record has a
/// parsable received date. The order service applies this whenever a report
/// filter carries no year, so reporting views are always scoped to one year.
pub fn default_year(orders: &[PurchaseOrder], today: NaiveDate) -> Option<i32> {
    let mut years: Vec<i32> =
        orders.iter().filter_map(|po| po.po_received_date.map(|date| date.year())).collect();
    years.sort_unstable();
    years.dedup();

    if years.contains(&today.year()) {
        return Some(today.year());
    }
    years.first().copied()
}
