//! Status derivation rule.
//!
//! The single source of truth for a purchase order's lifecycle status. The
//! stored `status` column is only a cache of this function; every read path
//! re-derives against the current date, so a record that crossed its
//! expected ETA overnight reports OVERDUE without any write having happened.

use chrono::NaiveDate;
use pomonitor_domain::PoStatus;

/// Derive the lifecycle status of a purchase order.
///
/// Rules, in order:
/// 1. An actual ETA means the work is done: `Completed`, regardless of how
///    it compares to the expected ETA.
/// 2. Strictly past the expected ETA: `Overdue`. The day of the deadline
///    itself is still on time.
/// 3. Everything else, including a missing expected ETA, is `Open`. A record
///    without a deadline can never become overdue.
///
/// `today` is injected rather than read from the system clock so the rule is
/// deterministic under test.
pub fn derive_status(
    expected_eta: Option<NaiveDate>,
    actual_eta: Option<NaiveDate>,
    today: NaiveDate,
) -> PoStatus {
    if actual_eta.is_some() {
        return PoStatus::Completed;
    }
    match expected_eta {
        Some(deadline) if today > deadline => PoStatus::Overdue,
        _ => PoStatus::Open,
    }
}
