// src/domain/view.rs

use std::cmp::Ordering;

use crate::domain::customer::{Customer, CustomerStatus};
use crate::domain::validation::FormFields;

/// The list the operator is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewFilter {
    #[default]
    Active,
    Pending,
    Archived,
    FollowUp,
}

impl ViewFilter {
    pub const ALL: [ViewFilter; 4] = [
        ViewFilter::Active,
        ViewFilter::Pending,
        ViewFilter::FollowUp,
        ViewFilter::Archived,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ViewFilter::Active),
            "pending" => Some(ViewFilter::Pending),
            "archived" => Some(ViewFilter::Archived),
            "follow-up" => Some(ViewFilter::FollowUp),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewFilter::Active => "active",
            ViewFilter::Pending => "pending",
            ViewFilter::Archived => "archived",
            ViewFilter::FollowUp => "follow-up",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewFilter::Active => "Active Customer",
            ViewFilter::Pending => "Pending Customer",
            ViewFilter::Archived => "Archive Customer",
            ViewFilter::FollowUp => "Follow Up",
        }
    }

    /// The status a status-based view selects, if any.
    pub fn status(self) -> Option<CustomerStatus> {
        match self {
            ViewFilter::Active => Some(CustomerStatus::Active),
            ViewFilter::Pending => Some(CustomerStatus::Pending),
            ViewFilter::Archived | ViewFilter::FollowUp => None,
        }
    }
}

/// Access tier tab, shown on the active and pending views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessTab {
    #[default]
    FullAccess,
    OneAppOnly,
}

impl AccessTab {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "40-plus-access" => Some(AccessTab::FullAccess),
            "1-app-access-only" => Some(AccessTab::OneAppOnly),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccessTab::FullAccess => "40-plus-access",
            AccessTab::OneAppOnly => "1-app-access-only",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AccessTab::FullAccess => "40+ Access",
            AccessTab::OneAppOnly => "1 App Access Only",
        }
    }

    fn matches(self, customer: &Customer) -> bool {
        customer.one_app_access == (self == AccessTab::OneAppOnly)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerQuery {
    pub view: ViewFilter,
    pub tab: AccessTab,
    pub search: String,
}

impl CustomerQuery {
    fn base_matches(&self, c: &Customer) -> bool {
        match self.view {
            ViewFilter::Archived => c.is_archived,
            ViewFilter::FollowUp => !c.is_archived && c.has_follow_up(),
            ViewFilter::Active | ViewFilter::Pending => {
                Some(c.status) == self.view.status()
                    && !c.is_archived
                    && !c.has_follow_up()
                    && self.tab.matches(c)
            }
        }
    }

    fn search_matches(&self, c: &Customer) -> bool {
        let q = self.search.trim();
        if q.is_empty() {
            return true;
        }
        c.email.to_lowercase().contains(&q.to_lowercase()) || c.phone.contains(q)
    }

    /// Reads `view`, `tab` and `q`; unknown values fall back to defaults.
    pub fn from_fields(fields: &FormFields) -> Self {
        let get = |k: &str| fields.get(k).map(String::as_str).unwrap_or("");
        CustomerQuery {
            view: ViewFilter::parse(get("view")).unwrap_or_default(),
            tab: AccessTab::parse(get("tab")).unwrap_or_default(),
            search: get("q").trim().to_string(),
        }
    }

    /// Pairs for rebuilding the page URL; an empty search is left out.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![("view", self.view.as_str()), ("tab", self.tab.as_str())];
        if !self.search.is_empty() {
            pairs.push(("q", self.search.as_str()));
        }
        pairs
    }

    pub fn matches(&self, c: &Customer) -> bool {
        self.base_matches(c) && self.search_matches(c)
    }

    /// Filter and sort `customers` for this view.
    pub fn apply<'a>(&self, customers: &'a [Customer]) -> Vec<&'a Customer> {
        let mut out: Vec<&Customer> = customers.iter().filter(|c| self.matches(c)).collect();
        out.sort_by(|a, b| compare_for_view(self.view, a, b));
        out
    }
}

/// Archived last; follow-ups by date (undated last); otherwise by expiration,
/// then active before pending.
pub fn compare_for_view(view: ViewFilter, a: &Customer, b: &Customer) -> Ordering {
    a.is_archived.cmp(&b.is_archived).then_with(|| {
        if view == ViewFilter::FollowUp {
            return none_last(a.follow_up_date, b.follow_up_date);
        }
        none_last(a.expiration_date, b.expiration_date)
            .then_with(|| status_rank(a.status).cmp(&status_rank(b.status)))
    })
}

fn none_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn status_rank(status: CustomerStatus) -> u8 {
    match status {
        CustomerStatus::Active => 0,
        CustomerStatus::Pending => 1,
    }
}

/// Badge counts for the view selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewCounts {
    pub active: usize,
    pub pending: usize,
    pub archived: usize,
    pub follow_up: usize,
}

impl ViewCounts {
    pub fn tally(customers: &[Customer]) -> Self {
        let mut counts = ViewCounts::default();
        for c in customers {
            if c.is_archived {
                counts.archived += 1;
            } else if c.has_follow_up() {
                counts.follow_up += 1;
            } else {
                match c.status {
                    CustomerStatus::Active => counts.active += 1,
                    CustomerStatus::Pending => counts.pending += 1,
                }
            }
        }
        counts
    }

    pub fn get(&self, view: ViewFilter) -> usize {
        match view {
            ViewFilter::Active => self.active,
            ViewFilter::Pending => self.pending,
            ViewFilter::Archived => self.archived,
            ViewFilter::FollowUp => self.follow_up,
        }
    }
}
