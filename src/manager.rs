// src/manager.rs
//
// Customer lifecycle operations over the store. Each mutation loads the
// document, applies a domain transition and stores it back in one
// transaction.

use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, Transaction};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::db::customers::{
    count_customers, delete_customer, get_customer, insert_customer, list_customers,
    new_customer_id, save_customer,
};
use crate::db::Database;
use crate::domain::confirm::GuardedAction;
use crate::domain::display::{is_due, plan_info};
use crate::domain::follow_up::{resolve_follow_up, FollowUpResolution};
use crate::domain::lifecycle::{self, ClickResult, Transition};
use crate::domain::validation::{
    AccessPlanForm, FollowUpForm, NewCustomerForm, OneAppCustomerForm, ReasonForm,
};
use crate::domain::view::{CustomerQuery, ViewCounts, ViewFilter};
use crate::domain::{Customer, CustomerStatus, PlanDuration};
use crate::errors::ServerError;
use crate::spreadsheets::export_customers_xlsx;

/// Toast shown after a mutation: a short title and one line of detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub detail: String,
}

impl Notice {
    fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRow {
    #[serde(flatten)]
    pub customer: Customer,
    pub plan_info: String,
    pub is_due: bool,
}

#[derive(Debug, Clone)]
pub struct ManagerView {
    pub counts: ViewCounts,
    pub rows: Vec<CustomerRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickOutcome {
    pub action: GuardedAction,
    pub result: ClickResult,
    pub email: String,
}

impl ClickOutcome {
    pub fn notice(&self) -> Notice {
        match self.result {
            ClickResult::Pending { remaining, .. } => {
                let title = format!("{} {}...", self.action.verb(), self.email);
                match self.action {
                    GuardedAction::Delete(_) => Notice::new(
                        title,
                        format!("Click {remaining} more times to permanently delete."),
                    ),
                    _ => Notice::new(title, format!("Click {remaining} more times to confirm.")),
                }
            }
            ClickResult::Committed(Transition::Switched { from, to }) => Notice::new(
                "Status Switched!",
                format!("{} moved from {} to {}.", self.email, from.as_str(), to.as_str()),
            ),
            ClickResult::Committed(Transition::Restored) => Notice::new(
                "Customer Restored",
                format!("{} has been restored.", self.email),
            ),
            ClickResult::Committed(Transition::Deleted) => Notice::new(
                "Customer Deleted",
                format!("{} has been permanently deleted.", self.email),
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CustomerManager {
    db: Database,
}

fn begin(conn: &mut Connection) -> Result<Transaction<'_>, ServerError> {
    conn.transaction()
        .map_err(|e| ServerError::DbError(format!("begin transaction failed: {e}")))
}

fn commit(tx: Transaction<'_>) -> Result<(), ServerError> {
    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit failed: {e}")))
}

fn load(conn: &Connection, id: &str) -> Result<Customer, ServerError> {
    get_customer(conn, id)?.ok_or(ServerError::NotFound)
}

fn report(op: &str, id: &str, err: &ServerError) {
    match err {
        ServerError::DbError(_) | ServerError::XlsxError(_) | ServerError::InternalError => {
            error!(op, customer_id = id, error = %err, "store failure");
        }
        _ => warn!(op, customer_id = id, error = %err, "rejected"),
    }
}

impl CustomerManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn all(&self) -> Result<Vec<Customer>, ServerError> {
        self.db.with_conn(|conn| list_customers(conn))
    }

    /// Counts for every view plus the filtered, sorted rows of `query`.
    pub fn snapshot(
        &self,
        query: &CustomerQuery,
        now: DateTime<Utc>,
    ) -> Result<ManagerView, ServerError> {
        let customers = self.all()?;
        let rows = query
            .apply(&customers)
            .into_iter()
            .map(|c| CustomerRow {
                customer: c.clone(),
                plan_info: plan_info(c, now),
                is_due: is_due(c, now),
            })
            .collect();
        Ok(ManagerView {
            counts: ViewCounts::tally(&customers),
            rows,
        })
    }

    pub fn find(&self, id: &str) -> Result<Option<Customer>, ServerError> {
        self.db.with_conn(|conn| get_customer(conn, id))
    }

    /// Loads `id`, applies `f` and stores the result, all in one transaction.
    fn modify<T>(
        &self,
        op: &str,
        id: &str,
        now: DateTime<Utc>,
        f: impl FnOnce(&mut Customer) -> Result<T, ServerError>,
    ) -> Result<(Customer, T), ServerError> {
        self.db
            .with_conn(|conn| {
                let tx = begin(conn)?;
                let mut customer = load(&tx, id)?;
                let out = f(&mut customer)?;
                save_customer(&tx, &customer, now)?;
                commit(tx)?;
                Ok((customer, out))
            })
            .inspect_err(|e| report(op, id, e))
    }

    fn insert(&self, op: &str, customer: &Customer, now: DateTime<Utc>) -> Result<(), ServerError> {
        self.db
            .with_conn(|conn| insert_customer(conn, customer, now))
            .inspect_err(|e| report(op, &customer.id, e))
    }

    pub fn add_customer(
        &self,
        form: &NewCustomerForm,
        now: DateTime<Utc>,
    ) -> Result<Notice, ServerError> {
        let mut customer = Customer::new(new_customer_id(), &form.email, &form.phone, form.status);
        customer.start_plan(form.plan_duration, now);
        customer.one_app_access = form.one_app_access;
        customer.has_access_plan = form.status == CustomerStatus::Active;

        self.insert("add_customer", &customer, now)?;
        info!(customer_id = %customer.id, status = form.status.as_str(), "customer added");

        Ok(Notice::new(
            "Customer Added",
            format!(
                "{} has been added as a {} customer.",
                customer.email,
                customer.status.as_str()
            ),
        ))
    }

    /// Single-app customers get a 3-year plan; the pending view adds them
    /// as pending, every other view as active.
    pub fn add_one_app_customer(
        &self,
        form: &OneAppCustomerForm,
        view: ViewFilter,
        now: DateTime<Utc>,
    ) -> Result<Notice, ServerError> {
        let status = match view {
            ViewFilter::Pending => CustomerStatus::Pending,
            _ => CustomerStatus::Active,
        };
        let mut customer = Customer::new(new_customer_id(), &form.email, &form.phone, status);
        customer.start_plan(PlanDuration::ThreeYears, now);
        customer.one_app_access = true;
        customer.autodesk_app = Some(form.app.clone());
        customer.has_access_plan = view == ViewFilter::Active;

        self.insert("add_one_app_customer", &customer, now)?;
        info!(customer_id = %customer.id, app = %form.app, "one-app customer added");

        Ok(Notice::new(
            "Customer Added",
            format!("{} has been added to '1 App Access Only'.", customer.email),
        ))
    }

    pub fn add_follow_up(
        &self,
        form: &FollowUpForm,
        now: DateTime<Utc>,
    ) -> Result<Notice, ServerError> {
        self.db
            .with_conn(|conn| {
                let tx = begin(conn)?;
                let customers = list_customers(&tx)?;
                let notice = match resolve_follow_up(&customers, form, new_customer_id, now) {
                    FollowUpResolution::Updated(customer) => {
                        save_customer(&tx, &customer, now)?;
                        info!(customer_id = %customer.id, days = form.days, "follow-up scheduled");
                        Notice::new(
                            "Follow-up Scheduled",
                            format!(
                                "Follow-up for customer with phone {} scheduled in {} days.",
                                form.phone, form.days
                            ),
                        )
                    }
                    FollowUpResolution::Created(customer) => {
                        insert_customer(&tx, &customer, now)?;
                        info!(customer_id = %customer.id, days = form.days, "follow-up customer created");
                        Notice::new(
                            "New Follow-up Customer Added",
                            format!(
                                "A new customer with phone {} has been created with a follow-up.",
                                form.phone
                            ),
                        )
                    }
                };
                commit(tx)?;
                Ok(notice)
            })
            .inspect_err(|e| report("add_follow_up", &form.phone, e))
    }

    /// One confirmation click. The counter is persisted on every click; a
    /// committed delete removes the record.
    pub fn click(
        &self,
        id: &str,
        action: GuardedAction,
        now: DateTime<Utc>,
    ) -> Result<ClickOutcome, ServerError> {
        self.db
            .with_conn(|conn| {
                let tx = begin(conn)?;
                let mut customer = load(&tx, id)?;
                let result = lifecycle::record_click(&mut customer, action, now)?;

                match result {
                    ClickResult::Committed(Transition::Deleted) => {
                        delete_customer(&tx, id)?;
                    }
                    _ => save_customer(&tx, &customer, now)?,
                }
                commit(tx)?;

                match result {
                    ClickResult::Pending { clicks, remaining } => {
                        debug!(customer_id = id, ?action, clicks, remaining, "click registered");
                    }
                    ClickResult::Committed(transition) => {
                        info!(customer_id = id, ?transition, "transition committed");
                    }
                }

                Ok(ClickOutcome {
                    action,
                    result,
                    email: customer.email,
                })
            })
            .inspect_err(|e| report("click", id, e))
    }

    pub fn archive(
        &self,
        id: &str,
        form: &ReasonForm,
        now: DateTime<Utc>,
    ) -> Result<Notice, ServerError> {
        let (customer, ()) = self.modify("archive", id, now, |c| {
            lifecycle::archive(c, &form.reason).map_err(ServerError::from)
        })?;
        info!(customer_id = id, "customer archived");
        Ok(Notice::new(
            "Customer Archived",
            format!("{} has been archived.", customer.email),
        ))
    }

    pub fn edit_reason(
        &self,
        id: &str,
        form: &ReasonForm,
        now: DateTime<Utc>,
    ) -> Result<Notice, ServerError> {
        let (customer, ()) = self.modify("edit_reason", id, now, |c| {
            lifecycle::edit_reason(c, &form.reason).map_err(ServerError::from)
        })?;
        info!(customer_id = id, "archival reason updated");
        Ok(Notice::new(
            "Reason Updated",
            format!("The reason for archiving {} has been updated.", customer.email),
        ))
    }

    pub fn edit_notes(
        &self,
        id: &str,
        notes: &str,
        now: DateTime<Utc>,
    ) -> Result<Notice, ServerError> {
        let (customer, ()) = self.modify("edit_notes", id, now, |c| {
            lifecycle::edit_notes(c, notes);
            Ok(())
        })?;
        info!(customer_id = id, "notes updated");
        Ok(Notice::new(
            "Notes Updated",
            format!("Notes for {} have been updated.", customer.email),
        ))
    }

    pub fn add_access_plan(
        &self,
        id: &str,
        form: &AccessPlanForm,
        now: DateTime<Utc>,
    ) -> Result<Notice, ServerError> {
        let (customer, ()) = self.modify("add_access_plan", id, now, |c| {
            lifecycle::add_access_plan(c, &form.app).map_err(ServerError::from)
        })?;
        info!(customer_id = id, app = %form.app, "access plan added");
        Ok(Notice::new(
            "Access Plan Added",
            format!("An access plan has been added for {}.", customer.email),
        ))
    }

    /// XLSX bytes of the rows `query` selects, in display order.
    pub fn export(&self, query: &CustomerQuery, now: DateTime<Utc>) -> Result<Vec<u8>, ServerError> {
        let customers = self.all()?;
        let rows = query.apply(&customers);
        info!(view = query.view.as_str(), rows = rows.len(), "exporting customers");
        export_customers_xlsx(&rows, now)
    }

    /// Inserts the demo customers into an empty collection. Returns how
    /// many were added.
    pub fn seed_demo(&self, now: DateTime<Utc>) -> Result<usize, ServerError> {
        self.db.with_conn(|conn| {
            let tx = begin(conn)?;
            if count_customers(&tx)? > 0 {
                debug!("customer collection not empty; skipping demo seed");
                return Ok(0);
            }

            let demo = demo_customers(now);
            for customer in &demo {
                insert_customer(&tx, customer, now)?;
            }
            commit(tx)?;
            info!(count = demo.len(), "seeded demo customers");
            Ok(demo.len())
        })
    }
}

fn demo_customers(now: DateTime<Utc>) -> Vec<Customer> {
    let active = [
        ("chloe.miller@example.com", "555-0101", 700, PlanDuration::ThreeYears),
        ("liam.jones@example.com", "555-0102", 300, PlanDuration::OneYear),
        ("sophia.davis@example.com", "555-0103", 335, PlanDuration::OneYear),
    ];
    let pending = [
        ("noah.williams@example.com", "555-0104", 14),
        ("ava.brown@example.com", "555-0105", 30),
    ];

    let mut out = Vec::new();
    for (email, phone, days_ago, duration) in active {
        let mut c = Customer::new(new_customer_id(), email, phone, CustomerStatus::Active);
        c.start_plan(duration, now - Duration::days(days_ago));
        c.has_access_plan = true;
        out.push(c);
    }
    // Pending demo records only carry a purchase date.
    for (email, phone, days_ago) in pending {
        let mut c = Customer::new(new_customer_id(), email, phone, CustomerStatus::Pending);
        c.purchase_date = Some(now - Duration::days(days_ago));
        out.push(c);
    }
    out
}
