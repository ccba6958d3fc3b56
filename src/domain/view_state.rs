// src/domain/view_state.rs

use crate::domain::customer::CustomerStatus;
use crate::domain::view::{AccessTab, ViewFilter};

/// The one dialog (if any) open over the customer list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    None,
    AddCustomer(CustomerStatus),
    AddOneAppCustomer,
    AddFollowUp,
    Archiving(String),
    EditingReason(String),
    EditingNotes(String),
    AddingAccessPlan(String),
}

impl DialogState {
    /// The "Add" button's dialog for the current view and tab.
    pub fn for_add(view: ViewFilter, tab: AccessTab) -> Self {
        match view {
            ViewFilter::FollowUp => DialogState::AddFollowUp,
            ViewFilter::Archived => DialogState::AddCustomer(CustomerStatus::Pending),
            ViewFilter::Active | ViewFilter::Pending if tab == AccessTab::OneAppOnly => {
                DialogState::AddOneAppCustomer
            }
            ViewFilter::Active => DialogState::AddCustomer(CustomerStatus::Active),
            ViewFilter::Pending => DialogState::AddCustomer(CustomerStatus::Pending),
        }
    }

    /// Read from the `dialog` and `id` query parameters. Unknown or
    /// incomplete combinations mean no dialog.
    pub fn parse(dialog: Option<&str>, id: Option<&str>) -> Self {
        let id = id.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        match (dialog.unwrap_or(""), id) {
            ("add-active", _) => DialogState::AddCustomer(CustomerStatus::Active),
            ("add-pending", _) => DialogState::AddCustomer(CustomerStatus::Pending),
            ("add-one-app", _) => DialogState::AddOneAppCustomer,
            ("add-follow-up", _) => DialogState::AddFollowUp,
            ("archive", Some(id)) => DialogState::Archiving(id),
            ("reason", Some(id)) => DialogState::EditingReason(id),
            ("notes", Some(id)) => DialogState::EditingNotes(id),
            ("access-plan", Some(id)) => DialogState::AddingAccessPlan(id),
            _ => DialogState::None,
        }
    }

    /// `(dialog, id)` query values; inverse of [`DialogState::parse`].
    pub fn query_pair(&self) -> Option<(&'static str, Option<&str>)> {
        match self {
            DialogState::None => None,
            DialogState::AddCustomer(CustomerStatus::Active) => Some(("add-active", None)),
            DialogState::AddCustomer(CustomerStatus::Pending) => Some(("add-pending", None)),
            DialogState::AddOneAppCustomer => Some(("add-one-app", None)),
            DialogState::AddFollowUp => Some(("add-follow-up", None)),
            DialogState::Archiving(id) => Some(("archive", Some(id))),
            DialogState::EditingReason(id) => Some(("reason", Some(id))),
            DialogState::EditingNotes(id) => Some(("notes", Some(id))),
            DialogState::AddingAccessPlan(id) => Some(("access-plan", Some(id))),
        }
    }

    pub fn customer_id(&self) -> Option<&str> {
        match self {
            DialogState::Archiving(id)
            | DialogState::EditingReason(id)
            | DialogState::EditingNotes(id)
            | DialogState::AddingAccessPlan(id) => Some(id),
            _ => None,
        }
    }
}
