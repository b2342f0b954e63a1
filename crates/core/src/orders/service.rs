//! Purchase-order service - core business logic.
//!
//! Sits between the presentation layer and the repository port: validates
//! input against the configured roster, derives status on every read, and
//! assembles the reporting views.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use pomonitor_domain::config::RosterConfig;
use pomonitor_domain::constants::MAX_PAYMENT_PROGRESS;
use pomonitor_domain::{
    PoMonitorError, PurchaseOrder, PurchaseOrderDraft, PurchaseOrderPatch, Result,
};
use serde::Serialize;
use tracing::warn;

use super::ports::OrderRepository;
use crate::reporting::filter::{default_year, filter_orders, OrderFilter};
use crate::reporting::summary::{sum_by_sales_engineer, sum_by_status, StatusTotals};
use crate::status::derive_status;

/// Everything the reporting dashboard needs from one consistent snapshot:
/// the filtered records, their value totals per status, and revenue per
/// sales engineer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderReport {
    pub orders: Vec<PurchaseOrder>,
    pub totals: StatusTotals,
    pub revenue_by_engineer: BTreeMap<String, f64>,
}

/// Purchase-order lifecycle service.
pub struct OrderService {
    repository: Arc<dyn OrderRepository>,
    roster: RosterConfig,
}

impl OrderService {
    /// Create a new service over the given repository and roster.
    pub fn new(repository: Arc<dyn OrderRepository>, roster: RosterConfig) -> Self {
        Self { repository, roster }
    }

    /// Validate and persist a new purchase order.
    ///
    /// The stored status is derived at write time as a cache; reads always
    /// re-derive it, so a stale value here can never leak out.
    pub fn create(&self, draft: &PurchaseOrderDraft) -> Result<PurchaseOrder> {
        self.validate_draft(draft)?;
        let status = derive_status(Some(draft.expected_eta), draft.actual_eta, today());
        self.repository.insert(draft, status)
    }

    /// Fetch all records with status derived against the current date.
    pub fn list(&self) -> Result<Vec<PurchaseOrder>> {
        self.list_as_of(today())
    }

    /// Fetch all records with status derived against an explicit date.
    ///
    /// Whenever the derived status disagrees with the stored cache the cache
    /// is refreshed so the persisted value tracks the latest read. A cache
    /// write failure is logged and swallowed: the returned statuses are
    /// already correct and the cache is advisory.
    pub fn list_as_of(&self, today: NaiveDate) -> Result<Vec<PurchaseOrder>> {
        let mut orders = self.repository.fetch_all()?;
        for po in &mut orders {
            let derived = derive_status(po.expected_eta, po.actual_eta, today);
            if derived != po.status {
                po.status = derived;
                if let Err(err) = self.repository.refresh_status_cache(po.id, derived) {
                    warn!(id = po.id, error = %err, "failed to refresh status cache");
                }
            }
        }
        Ok(orders)
    }

    /// Apply a partial update to an existing record.
    ///
    /// Fails with `NotFound` for an unknown id and with `Validation` when a
    /// patched field violates a constraint; the store is untouched in both
    /// cases. Status is re-derived from the merged dates.
    pub fn update(&self, id: i64, patch: &PurchaseOrderPatch) -> Result<PurchaseOrder> {
        self.validate_patch(patch)?;

        let mut order = self
            .repository
            .fetch_by_id(id)?
            .ok_or_else(|| PoMonitorError::NotFound(format!("purchase order {id}")))?;

        patch.apply_to(&mut order);
        order.status = derive_status(order.expected_eta, order.actual_eta, today());

        self.repository.update(&order)?;
        Ok(order)
    }

    /// Permanently delete a record. Deleting an absent id is a no-op.
    pub fn delete(&self, id: i64) -> Result<()> {
        self.repository.delete(id)
    }

    /// Build the reporting view for the current date.
    pub fn report(&self, filter: &OrderFilter) -> Result<OrderReport> {
        self.report_as_of(filter, today())
    }

    /// Build the reporting view against an explicit date.
    ///
    /// A filter that leaves `year` unset gets the default year applied:
    /// the current calendar year when data exists for it, else the earliest
    /// year present. An explicitly set year always wins. The reporting view
    /// is therefore always scoped to one year, like the dashboard it feeds.
    pub fn report_as_of(&self, filter: &OrderFilter, today: NaiveDate) -> Result<OrderReport> {
        let orders = self.list_as_of(today)?;

        let mut filter = filter.clone();
        if filter.year.is_none() {
            filter.year = default_year(&orders, today);
        }

        let orders = filter_orders(&orders, &filter);
        let totals = sum_by_status(&orders);
        let revenue_by_engineer = sum_by_sales_engineer(&orders);
        Ok(OrderReport { orders, totals, revenue_by_engineer })
    }

    fn validate_draft(&self, draft: &PurchaseOrderDraft) -> Result<()> {
        require_text("customer_name", &draft.customer_name)?;
        require_text("po_no", &draft.po_no)?;
        self.require_roster_member("sales_engineer", &draft.sales_engineer)?;
        self.require_division("division", &draft.division)?;
        require_nominal(draft.nominal_po)?;
        require_progress(draft.payment_progress)
    }

    fn validate_patch(&self, patch: &PurchaseOrderPatch) -> Result<()> {
        if let Some(name) = &patch.customer_name {
            require_text("customer_name", name)?;
        }
        if let Some(po_no) = &patch.po_no {
            require_text("po_no", po_no)?;
        }
        if let Some(engineer) = &patch.sales_engineer {
            self.require_roster_member("sales_engineer", engineer)?;
        }
        if let Some(division) = &patch.division {
            self.require_division("division", division)?;
        }
        if let Some(nominal) = patch.nominal_po {
            require_nominal(nominal)?;
        }
        if let Some(progress) = patch.payment_progress {
            require_progress(progress)?;
        }
        Ok(())
    }

    fn require_roster_member(&self, field: &str, value: &str) -> Result<()> {
        if self.roster.sales_engineers.iter().any(|e| e == value) {
            Ok(())
        } else {
            Err(PoMonitorError::Validation(format!("{field}: '{value}' is not in the roster")))
        }
    }

    fn require_division(&self, field: &str, value: &str) -> Result<()> {
        if self.roster.divisions.iter().any(|d| d == value) {
            Ok(())
        } else {
            Err(PoMonitorError::Validation(format!(
                "{field}: '{value}' is not a configured division"
            )))
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(PoMonitorError::Validation(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

fn require_nominal(value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PoMonitorError::Validation(format!("nominal_po must be >= 0, got {value}")))
    }
}

fn require_progress(value: i64) -> Result<()> {
    if (0..=MAX_PAYMENT_PROGRESS).contains(&value) {
        Ok(())
    } else {
        Err(PoMonitorError::Validation(format!(
            "payment_progress must be within [0, {MAX_PAYMENT_PROGRESS}], got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Mutex;

    use pomonitor_domain::PoStatus;

    use super::*;

    /// In-memory repository fake preserving the store's ordering contract
    /// (most recently created first).
    #[derive(Default)]
    struct InMemoryOrders {
        rows: Mutex<Vec<PurchaseOrder>>,
        next_id: AtomicI64,
    }

    impl InMemoryOrders {
        fn stored_status(&self, id: i64) -> Option<PoStatus> {
            self.rows
                .lock()
                .expect("rows lock")
                .iter()
                .find(|po| po.id == id)
                .map(|po| po.status)
        }
    }

    impl OrderRepository for InMemoryOrders {
        fn insert(
            &self,
            draft: &PurchaseOrderDraft,
            status_cache: PoStatus,
        ) -> Result<PurchaseOrder> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let order = PurchaseOrder {
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
                created_at: Utc::now(),
            };
            self.rows.lock().expect("rows lock").insert(0, order.clone());
            Ok(order)
        }

        fn fetch_all(&self) -> Result<Vec<PurchaseOrder>> {
            Ok(self.rows.lock().expect("rows lock").clone())
        }

        fn fetch_by_id(&self, id: i64) -> Result<Option<PurchaseOrder>> {
            Ok(self.rows.lock().expect("rows lock").iter().find(|po| po.id == id).cloned())
        }

        fn update(&self, order: &PurchaseOrder) -> Result<()> {
            let mut rows = self.rows.lock().expect("rows lock");
            match rows.iter_mut().find(|po| po.id == order.id) {
                Some(row) => {
                    *row = order.clone();
                    Ok(())
                }
                None => Err(PoMonitorError::NotFound(format!("purchase order {}", order.id))),
            }
        }

        fn delete(&self, id: i64) -> Result<()> {
            self.rows.lock().expect("rows lock").retain(|po| po.id != id);
            Ok(())
        }

        fn refresh_status_cache(&self, id: i64, status: PoStatus) -> Result<()> {
            if let Some(row) =
                self.rows.lock().expect("rows lock").iter_mut().find(|po| po.id == id)
            {
                row.status = status;
            }
            Ok(())
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).expect("valid test date")
    }

    fn draft(customer: &str, po_no: &str) -> PurchaseOrderDraft {
        PurchaseOrderDraft {
            customer_name: customer.into(),
            sales_engineer: "RSM".into(),
            division: "Industrial Cleaning".into(),
            quotation_no: None,
            po_no: po_no.into(),
            po_received_date: d(2024, 1, 2),
            expected_eta: d(2024, 1, 10),
            actual_eta: None,
            nominal_po: 1_000_000.0,
            top: Some("NET 30".into()),
            payment_progress: 0,
            remarks: None,
        }
    }

    fn setup() -> (OrderService, Arc<InMemoryOrders>) {
        let repo = Arc::new(InMemoryOrders::default());
        let service = OrderService::new(repo.clone(), RosterConfig::default());
        (service, repo)
    }

    #[test]
    fn create_round_trips_every_draft_field() {
        let (service, _repo) = setup();

        let input = draft("PT Alpha", "PO-001");
        let created = service.create(&input).expect("create succeeds");
        assert!(created.id > 0);

        let listed = service.list_as_of(d(2024, 1, 5)).expect("list succeeds");
        let found = listed.iter().find(|po| po.id == created.id).expect("record present");

        assert_eq!(found.customer_name, input.customer_name);
        assert_eq!(found.sales_engineer, input.sales_engineer);
        assert_eq!(found.division, input.division);
        assert_eq!(found.po_no, input.po_no);
        assert_eq!(found.po_received_date, Some(input.po_received_date));
        assert_eq!(found.expected_eta, Some(input.expected_eta));
        assert_eq!(found.actual_eta, input.actual_eta);
        assert_eq!(found.nominal_po, input.nominal_po);
        assert_eq!(found.top, input.top);
        assert_eq!(found.payment_progress, input.payment_progress);
        assert_eq!(found.created_at, created.created_at);
    }

    #[test]
    fn create_rejects_blank_required_fields() {
        let (service, repo) = setup();

        let blank_customer = draft("   ", "PO-001");
        let err = service.create(&blank_customer).expect_err("blank customer rejected");
        assert!(matches!(err, PoMonitorError::Validation(_)));

        let blank_po_no = draft("PT Alpha", "");
        let err = service.create(&blank_po_no).expect_err("blank po_no rejected");
        assert!(matches!(err, PoMonitorError::Validation(_)));

        assert!(repo.fetch_all().expect("fetch").is_empty(), "store unchanged on rejection");
    }

    #[test]
    fn create_rejects_values_outside_roster_and_ranges() {
        let (service, _repo) = setup();

        let mut unknown_engineer = draft("PT Alpha", "PO-001");
        unknown_engineer.sales_engineer = "XYZ".into();
        assert!(matches!(
            service.create(&unknown_engineer),
            Err(PoMonitorError::Validation(_))
        ));

        let mut unknown_division = draft("PT Alpha", "PO-001");
        unknown_division.division = "Space Mining".into();
        assert!(matches!(
            service.create(&unknown_division),
            Err(PoMonitorError::Validation(_))
        ));

        let mut negative_nominal = draft("PT Alpha", "PO-001");
        negative_nominal.nominal_po = -1.0;
        assert!(matches!(
            service.create(&negative_nominal),
            Err(PoMonitorError::Validation(_))
        ));

        let mut bad_progress = draft("PT Alpha", "PO-001");
        bad_progress.payment_progress = 101;
        assert!(matches!(service.create(&bad_progress), Err(PoMonitorError::Validation(_))));
    }

    #[test]
    fn list_orders_most_recent_first_and_is_idempotent() {
        let (service, _repo) = setup();

        service.create(&draft("PT Alpha", "PO-001")).expect("create");
        service.create(&draft("PT Beta", "PO-002")).expect("create");
        service.create(&draft("PT Gamma", "PO-003")).expect("create");

        let first = service.list_as_of(d(2024, 1, 5)).expect("list");
        let po_nos: Vec<&str> = first.iter().map(|po| po.po_no.as_str()).collect();
        assert_eq!(po_nos, ["PO-003", "PO-002", "PO-001"]);

        let second = service.list_as_of(d(2024, 1, 5)).expect("list again");
        assert_eq!(first, second, "read without mutation is idempotent");
    }

    #[test]
    fn status_follows_the_deadline_scenario() {
        let (service, _repo) = setup();
        let created = service.create(&draft("PT Alpha", "PO-001")).expect("create");

        // expected_eta = 2024-01-10, actual_eta = None
        let on_deadline = service.list_as_of(d(2024, 1, 10)).expect("list");
        assert_eq!(on_deadline[0].status, PoStatus::Open, "deadline day is not overdue");

        let past_deadline = service.list_as_of(d(2024, 1, 11)).expect("list");
        assert_eq!(past_deadline[0].status, PoStatus::Overdue);

        // Completing the order wins at any date.
        let patch = PurchaseOrderPatch {
            actual_eta: Some(NaiveDate::from_ymd_opt(2024, 1, 12)),
            ..Default::default()
        };
        service.update(created.id, &patch).expect("update");

        let completed = service.list_as_of(d(2024, 1, 1)).expect("list");
        assert_eq!(completed[0].status, PoStatus::Completed);
        let much_later = service.list_as_of(d(2030, 1, 1)).expect("list");
        assert_eq!(much_later[0].status, PoStatus::Completed);
    }

    #[test]
    fn read_refreshes_a_stale_status_cache() {
        let (service, repo) = setup();
        let created = service.create(&draft("PT Alpha", "PO-001")).expect("create");
        assert_eq!(repo.stored_status(created.id), Some(created.status));

        // Crossing the deadline flips the derived status; the read path
        // writes the new value back into the cache.
        let listed = service.list_as_of(d(2024, 2, 1)).expect("list");
        assert_eq!(listed[0].status, PoStatus::Overdue);
        assert_eq!(repo.stored_status(created.id), Some(PoStatus::Overdue));
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let (service, _repo) = setup();
        let patch = PurchaseOrderPatch { nominal_po: Some(5.0), ..Default::default() };
        let err = service.update(42, &patch).expect_err("unknown id");
        assert!(matches!(err, PoMonitorError::NotFound(_)));
    }

    #[test]
    fn update_rejects_invalid_patch_without_touching_the_store() {
        let (service, repo) = setup();
        let created = service.create(&draft("PT Alpha", "PO-001")).expect("create");

        let patch = PurchaseOrderPatch { payment_progress: Some(-5), ..Default::default() };
        let err = service.update(created.id, &patch).expect_err("invalid progress");
        assert!(matches!(err, PoMonitorError::Validation(_)));

        let stored = repo.fetch_by_id(created.id).expect("fetch").expect("present");
        assert_eq!(stored.payment_progress, 0);
    }

    #[test]
    fn delete_is_idempotent() {
        let (service, repo) = setup();
        let created = service.create(&draft("PT Alpha", "PO-001")).expect("create");

        service.delete(created.id).expect("first delete");
        assert!(repo.fetch_all().expect("fetch").is_empty());

        // Double submission from the UI must not surface an error.
        service.delete(created.id).expect("second delete is a no-op");
    }

    #[test]
    fn report_combines_filter_and_both_aggregations() {
        let (service, _repo) = setup();

        let mut a = draft("PT Alpha", "PO-001");
        a.nominal_po = 1_000_000.0;
        service.create(&a).expect("create");

        let mut b = draft("PT Beta", "PO-002");
        b.nominal_po = 2_500_000.0;
        b.actual_eta = Some(d(2024, 1, 8));
        service.create(&b).expect("create");

        let mut c = draft("PT Gamma", "PO-003");
        c.sales_engineer = "TNU".into();
        c.nominal_po = 500_000.0;
        service.create(&c).expect("create");

        // Unfiltered report past the deadline: open orders have gone overdue.
        let report = service
            .report_as_of(&OrderFilter::default(), d(2024, 2, 1))
            .expect("report");
        assert_eq!(report.orders.len(), 3);
        assert_eq!(report.totals.open, 0.0);
        assert_eq!(report.totals.completed, 2_500_000.0);
        assert_eq!(report.totals.overdue, 1_500_000.0);
        assert_eq!(report.revenue_by_engineer["RSM"], 3_500_000.0);
        assert_eq!(report.revenue_by_engineer["TNU"], 500_000.0);

        // Engineer filter narrows both the records and the aggregates.
        let filter = OrderFilter { sales_engineer: Some("RSM".into()), ..Default::default() };
        let report = service.report_as_of(&filter, d(2024, 2, 1)).expect("report");
        assert_eq!(report.orders.len(), 2);
        assert_eq!(report.totals.total(), 3_500_000.0);
        assert!(!report.revenue_by_engineer.contains_key("TNU"));
    }

    #[test]
    fn report_defaults_to_the_current_or_earliest_year() {
        let (service, _repo) = setup();

        let mut old = draft("PT Lama", "PO-OLD");
        old.po_received_date = d(2019, 5, 10);
        old.expected_eta = d(2019, 6, 1);
        service.create(&old).expect("create");

        let recent = draft("PT Baru", "PO-NEW"); // received 2024-01-02
        service.create(&recent).expect("create");

        // Year left unset while current-year data exists: only that year
        // shows, exactly as if the filter had asked for it.
        let unset = OrderFilter::default();
        let report = service.report_as_of(&unset, d(2024, 6, 1)).expect("report");
        let po_nos: Vec<&str> = report.orders.iter().map(|po| po.po_no.as_str()).collect();
        assert_eq!(po_nos, ["PO-NEW"]);

        let explicit = OrderFilter { year: Some(2024), ..Default::default() };
        let pinned = service.report_as_of(&explicit, d(2024, 6, 1)).expect("report");
        assert_eq!(report.orders, pinned.orders);

        // No data for the current year: fall back to the earliest present.
        let report = service.report_as_of(&unset, d(2030, 6, 1)).expect("report");
        let po_nos: Vec<&str> = report.orders.iter().map(|po| po.po_no.as_str()).collect();
        assert_eq!(po_nos, ["PO-OLD"]);

        // An explicitly set year always beats the default.
        let report = service.report_as_of(&explicit, d(2030, 6, 1)).expect("report");
        let po_nos: Vec<&str> = report.orders.iter().map(|po| po.po_no.as_str()).collect();
        assert_eq!(po_nos, ["PO-NEW"]);
    }
}
