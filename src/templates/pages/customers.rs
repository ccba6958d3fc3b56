use maud::{html, Markup};

use crate::domain::apps::APP_CATALOG;
use crate::domain::confirm::{DeleteView, GuardedAction};
use crate::domain::validation::{FieldErrors, FormFields};
use crate::domain::view::{AccessTab, CustomerQuery, ViewFilter};
use crate::domain::view_state::DialogState;
use crate::domain::{Customer, CustomerStatus, PlanDuration};
use crate::manager::{CustomerRow, ManagerView, Notice};
use crate::templates::components::{button, click_badge, field_error, notice_toast};
use crate::templates::{desktop_layout, href};

pub struct CustomersPageVm {
    pub query: CustomerQuery,
    pub view: ManagerView,
    pub dialog: DialogState,
    /// The record an id-bearing dialog is about.
    pub dialog_customer: Option<Customer>,
    pub notice: Option<Notice>,
    /// Values of a rejected submission, echoed back into the dialog.
    pub form: FormFields,
    pub errors: FieldErrors,
}

impl CustomersPageVm {
    fn value<'a>(&'a self, name: &str, fallback: &'a str) -> &'a str {
        self.form.get(name).map(String::as_str).unwrap_or(fallback)
    }
}

pub fn page_href(query: &CustomerQuery, extra: &[(&str, &str)]) -> String {
    let pairs: Vec<(&str, &str)> = query
        .query_pairs()
        .into_iter()
        .chain(extra.iter().copied())
        .collect();
    href("/", &pairs)
}

fn dialog_href(query: &CustomerQuery, dialog: &DialogState) -> String {
    match dialog.query_pair() {
        Some((name, Some(id))) => page_href(query, &[("dialog", name), ("id", id)]),
        Some((name, None)) => page_href(query, &[("dialog", name)]),
        None => page_href(query, &[]),
    }
}

/// Carries the current view, tab and search through a POST.
fn hidden_query(query: &CustomerQuery) -> Markup {
    html! {
        @for (name, value) in query.query_pairs() {
            input type="hidden" name=(name) value=(value);
        }
    }
}

pub fn customers_page(vm: &CustomersPageVm) -> Markup {
    desktop_layout(
        "Customers",
        true,
        html! {
            main class="container" {
                h1 { "Customers" }

                @if let Some(notice) = &vm.notice {
                    (notice_toast(&notice.title, &notice.detail))
                }

                (view_selector(vm))
                (toolbar(vm))
                (customer_table(vm))
                (dialog(vm))
            }
        },
    )
}

fn view_selector(vm: &CustomersPageVm) -> Markup {
    let current = vm.query.view;
    html! {
        nav class="views" {
            @for view in ViewFilter::ALL {
                @let target = CustomerQuery { view, ..vm.query.clone() };
                a href=(page_href(&target, &[])) class=[(view == current).then_some("current")] {
                    (view.label()) " "
                    span class="badge" { (vm.view.counts.get(view)) }
                }
            }
        }

        @if current.status().is_some() {
            nav class="tabs" {
                @for tab in [AccessTab::FullAccess, AccessTab::OneAppOnly] {
                    @let target = CustomerQuery { tab, ..vm.query.clone() };
                    a href=(page_href(&target, &[])) class=[(tab == vm.query.tab).then_some("current")] {
                        (tab.label())
                    }
                }
            }
        }
    }
}

fn toolbar(vm: &CustomersPageVm) -> Markup {
    let q = &vm.query;
    let add = DialogState::for_add(q.view, q.tab);
    let add_label = match add {
        DialogState::AddFollowUp => "Add Follow-up",
        _ => "Add Customer",
    };
    html! {
        div class="card" {
            form method="get" action="/" class="inline" {
                input type="hidden" name="view" value=(q.view.as_str());
                input type="hidden" name="tab" value=(q.tab.as_str());
                input
                    type="search"
                    name="q"
                    value=(q.search)
                    placeholder="Search by email or phone"
                    style="width: 260px";
                " "
                (button("Search", ""))
            }
            " "
            a class="btn primary" href=(dialog_href(q, &add)) { (add_label) }
            " "
            a class="btn" href=(href("/customers/export", &q.query_pairs())) { "Download" }
        }
    }
}

fn customer_table(vm: &CustomersPageVm) -> Markup {
    html! {
        div class="card" {
            @if vm.view.rows.is_empty() {
                p { "No customers found." }
            } @else {
                table {
                    thead {
                        tr {
                            th { "Customer" }
                            th { "Phone" }
                            th { "Plan" }
                            th { "Details" }
                            th { "Actions" }
                        }
                    }
                    tbody {
                        @for row in &vm.view.rows {
                            (customer_row(vm, row))
                        }
                    }
                }
            }
        }
    }
}

fn customer_row(vm: &CustomersPageVm, row: &CustomerRow) -> Markup {
    let c = &row.customer;
    html! {
        tr id=(format!("customer-{}", c.id)) {
            td {
                img class="avatar" src=(c.avatar_url) alt="";
                " " (c.email)
            }
            td { (c.phone) }
            td { (row.plan_info) }
            td { (details(vm.query.view, row)) }
            td { (row_actions(&vm.query, c)) }
        }
    }
}

fn details(view: ViewFilter, row: &CustomerRow) -> Markup {
    let c = &row.customer;
    html! {
        @match view {
            ViewFilter::Archived => {
                @if let Some(reason) = &c.reason_for_archival {
                    "Reason: " (reason)
                }
            }
            ViewFilter::FollowUp => {
                @if let Some(date) = c.follow_up_date {
                    "Follow up " (date.format("%b %-d, %Y").to_string())
                }
                @if row.is_due {
                    " " span class="badge due" { "Due" }
                }
                @if let Some(notes) = &c.notes {
                    br; small { (notes) }
                }
            }
            ViewFilter::Active | ViewFilter::Pending => {
                @if let Some(app) = &c.autodesk_app {
                    span class="badge" { (app) } " "
                }
                @if c.has_access_plan {
                    span class="badge" { "Access plan" }
                }
                @if let Some(notes) = &c.notes {
                    br; small { (notes) }
                }
            }
        }
    }
}

fn click_form(query: &CustomerQuery, c: &Customer, action: GuardedAction) -> Markup {
    let (path, label, class) = match action {
        GuardedAction::Switch => (
            "switch",
            format!("Switch to {}", c.status.flipped().label()),
            "",
        ),
        GuardedAction::Restore => ("restore", "Restore".to_string(), ""),
        GuardedAction::Delete(_) => ("delete", "Delete".to_string(), "danger"),
    };
    html! {
        form method="post" action=(format!("/customers/{}/{path}", c.id)) class="inline" {
            (hidden_query(query))
            button type="submit" class=(format!("btn {class}")) {
                (label)
                (click_badge(action.counter(c), action.gate().threshold))
            }
        }
    }
}

fn dialog_link(query: &CustomerQuery, dialog: DialogState, label: &str) -> Markup {
    html! {
        a class="btn" href=(dialog_href(query, &dialog)) { (label) }
    }
}

fn row_actions(query: &CustomerQuery, c: &Customer) -> Markup {
    let id = c.id.clone();
    html! {
        @match query.view {
            ViewFilter::Active | ViewFilter::Pending => {
                (click_form(query, c, GuardedAction::Switch)) " "
                (dialog_link(query, DialogState::Archiving(id.clone()), "Archive")) " "
                (dialog_link(query, DialogState::EditingNotes(id.clone()), "Notes"))
                @if !c.has_access_plan {
                    " " (dialog_link(query, DialogState::AddingAccessPlan(id), "Add Access Plan"))
                }
            }
            ViewFilter::Archived => {
                (dialog_link(query, DialogState::EditingReason(id), "Edit Reason")) " "
                (click_form(query, c, GuardedAction::Restore)) " "
                (click_form(query, c, GuardedAction::Delete(DeleteView::Archived)))
            }
            ViewFilter::FollowUp => {
                (dialog_link(query, DialogState::EditingNotes(id), "Notes")) " "
                (click_form(query, c, GuardedAction::Delete(DeleteView::FollowUp)))
            }
        }
    }
}

fn dialog_shell(vm: &CustomersPageVm, title: &str, action: &str, fields: Markup) -> Markup {
    html! {
        dialog open {
            h3 { (title) }
            form method="post" action=(action) {
                (hidden_query(&vm.query))
                (fields)
                p {
                    a class="btn" href=(page_href(&vm.query, &[])) { "Cancel" }
                    " "
                    (button("Save", "primary"))
                }
            }
        }
    }
}

fn text_field(vm: &CustomersPageVm, name: &'static str, label: &str, kind: &str, fallback: &str) -> Markup {
    html! {
        label {
            (label)
            input type=(kind) name=(name) value=(vm.value(name, fallback));
        }
        (field_error(vm.errors.get(name)))
    }
}

fn app_select(vm: &CustomersPageVm) -> Markup {
    let selected = vm.value("app", "");
    html! {
        label {
            "App"
            select name="app" {
                option value="" { "Select an app" }
                @for app in APP_CATALOG {
                    option value=(app.id) selected[selected == app.id || selected == app.name] { (app.name) }
                }
            }
        }
        (field_error(vm.errors.get("app")))
    }
}

fn dialog(vm: &CustomersPageVm) -> Markup {
    let customer = vm.dialog_customer.as_ref();
    match (&vm.dialog, customer) {
        (DialogState::None, _) => html! {},

        (DialogState::AddCustomer(status), _) => {
            let status_value = vm.value("status", status.as_str());
            let duration_value = vm.value("plan_duration", PlanDuration::OneYear.as_str());
            dialog_shell(vm, "Add Customer", "/customers", html! {
                (text_field(vm, "email", "Email", "email", ""))
                (text_field(vm, "phone", "Phone", "tel", ""))
                label {
                    "Plan duration"
                    select name="plan_duration" {
                        @for d in [PlanDuration::OneYear, PlanDuration::ThreeYears] {
                            option value=(d.as_str()) selected[duration_value == d.as_str()] { (d.as_str()) }
                        }
                    }
                }
                (field_error(vm.errors.get("plan_duration")))
                label {
                    "Status"
                    select name="status" {
                        @for s in [CustomerStatus::Active, CustomerStatus::Pending] {
                            option value=(s.as_str()) selected[status_value == s.as_str()] { (s.label()) }
                        }
                    }
                }
                (field_error(vm.errors.get("status")))
                label {
                    input type="checkbox" name="one_app_access" checked[vm.value("one_app_access", "") == "on"];
                    " 1 App Access Only"
                }
            })
        }

        (DialogState::AddOneAppCustomer, _) => dialog_shell(
            vm,
            "Add 1 App Access Customer",
            "/customers/one-app",
            html! {
                (text_field(vm, "email", "Email", "email", ""))
                (text_field(vm, "phone", "Phone", "tel", ""))
                (app_select(vm))
            },
        ),

        (DialogState::AddFollowUp, _) => dialog_shell(vm, "Add Follow-up", "/follow-ups", html! {
            (text_field(vm, "phone", "Phone", "tel", ""))
            label {
                "Note"
                textarea name="note" rows="3" { (vm.value("note", "")) }
            }
            (field_error(vm.errors.get("note")))
            (text_field(vm, "days", "Follow up in (days)", "number", "7"))
        }),

        (DialogState::Archiving(id), Some(c)) => dialog_shell(
            vm,
            &format!("Archive {}", c.email),
            &format!("/customers/{id}/archive"),
            html! {
                label {
                    "Reason for archiving"
                    textarea name="reason" rows="3" { (vm.value("reason", "")) }
                }
                (field_error(vm.errors.get("reason")))
            },
        ),

        (DialogState::EditingReason(id), Some(c)) => dialog_shell(
            vm,
            &format!("Edit reason for {}", c.email),
            &format!("/customers/{id}/reason"),
            html! {
                label {
                    "Reason for archiving"
                    textarea name="reason" rows="3" {
                        (vm.value("reason", c.reason_for_archival.as_deref().unwrap_or("")))
                    }
                }
                (field_error(vm.errors.get("reason")))
            },
        ),

        (DialogState::EditingNotes(id), Some(c)) => dialog_shell(
            vm,
            &format!("Notes for {}", c.email),
            &format!("/customers/{id}/notes"),
            html! {
                label {
                    "Notes"
                    textarea name="notes" rows="5" {
                        (vm.value("notes", c.notes.as_deref().unwrap_or("")))
                    }
                }
            },
        ),

        (DialogState::AddingAccessPlan(id), Some(c)) => dialog_shell(
            vm,
            &format!("Add access plan for {}", c.email),
            &format!("/customers/{id}/access-plan"),
            app_select(vm),
        ),

        // Id dialogs for a record that no longer exists.
        (_, None) => html! {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::view::ViewCounts;

    fn vm(dialog: DialogState) -> CustomersPageVm {
        CustomersPageVm {
            query: CustomerQuery::default(),
            view: ManagerView {
                counts: ViewCounts::default(),
                rows: Vec::new(),
            },
            dialog,
            dialog_customer: None,
            notice: None,
            form: FormFields::new(),
            errors: FieldErrors::default(),
        }
    }

    #[test]
    fn only_requested_dialog_renders() {
        let html = customers_page(&vm(DialogState::AddFollowUp)).into_string();
        assert!(html.contains("action=\"/follow-ups\""));
        assert!(!html.contains("action=\"/customers\""));
        assert_eq!(html.matches("<dialog").count(), 1);

        let html = customers_page(&vm(DialogState::None)).into_string();
        assert!(!html.contains("<dialog"));
    }

    #[test]
    fn id_dialog_without_record_is_skipped() {
        let html = customers_page(&vm(DialogState::Archiving("gone".into()))).into_string();
        assert!(!html.contains("<dialog"));
    }

    #[test]
    fn add_button_follows_tab() {
        let mut page = vm(DialogState::None);
        page.query.tab = AccessTab::OneAppOnly;
        let html = customers_page(&page).into_string();
        assert!(html.contains("dialog=add-one-app"));
    }
}
