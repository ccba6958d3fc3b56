// src/domain/customer.rs

use chrono::{DateTime, Months, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Subscription lifecycle state. Archival is tracked separately on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Pending,
}

impl CustomerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Pending => "pending",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(CustomerStatus::Active),
            "pending" => Some(CustomerStatus::Pending),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            CustomerStatus::Active => CustomerStatus::Pending,
            CustomerStatus::Pending => CustomerStatus::Active,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CustomerStatus::Active => "Active",
            CustomerStatus::Pending => "Pending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanDuration {
    #[serde(rename = "1 year")]
    OneYear,
    #[serde(rename = "3 years")]
    ThreeYears,
}

impl PlanDuration {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanDuration::OneYear => "1 year",
            PlanDuration::ThreeYears => "3 years",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "1 year" => Some(PlanDuration::OneYear),
            "3 years" => Some(PlanDuration::ThreeYears),
            _ => None,
        }
    }

    pub fn years(self) -> u32 {
        match self {
            PlanDuration::OneYear => 1,
            PlanDuration::ThreeYears => 3,
        }
    }

    /// Expiration for a plan bought at `purchased`. Feb 29 clamps to Feb 28.
    pub fn expiration_from(self, purchased: DateTime<Utc>) -> DateTime<Utc> {
        purchased
            .checked_add_months(Months::new(12 * self.years()))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// One customer document. Absent optional fields are omitted from the stored JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub status: CustomerStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_duration: Option<PlanDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub is_archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_for_archival: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub one_app_access: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autodesk_app: Option<String>,
    #[serde(default)]
    pub has_access_plan: bool,

    #[serde(default)]
    pub avatar_url: String,

    #[serde(default)]
    pub switch_clicks: u32,
    #[serde(default)]
    pub restore_clicks: u32,
    #[serde(default)]
    pub delete_clicks: u32,
}

impl Customer {
    /// A fresh record with no plan, counters at zero and not archived.
    pub fn new(id: String, email: &str, phone: &str, status: CustomerStatus) -> Self {
        Self {
            id,
            email: email.to_string(),
            phone: phone.to_string(),
            status,
            plan_duration: None,
            purchase_date: None,
            expiration_date: None,
            is_archived: false,
            reason_for_archival: None,
            notes: None,
            follow_up_date: None,
            one_app_access: false,
            autodesk_app: None,
            has_access_plan: false,
            avatar_url: random_avatar_url(),
            switch_clicks: 0,
            restore_clicks: 0,
            delete_clicks: 0,
        }
    }

    /// Starts the plan now: purchase = `now`, expiration = `now` + duration.
    pub fn start_plan(&mut self, duration: PlanDuration, now: DateTime<Utc>) {
        self.plan_duration = Some(duration);
        self.purchase_date = Some(now);
        self.expiration_date = Some(duration.expiration_from(now));
    }

    pub fn clear_plan_dates(&mut self) {
        self.purchase_date = None;
        self.expiration_date = None;
    }

    pub fn has_follow_up(&self) -> bool {
        self.follow_up_date.is_some()
    }
}

// Placeholder portraits; a new record picks one at random.
pub const AVATAR_URLS: &[&str] = &[
    "https://images.unsplash.com/photo-1544005313-94ddf0286df2?w=96&h=96&fit=crop",
    "https://images.unsplash.com/photo-1506794778202-cad84cf45f1d?w=96&h=96&fit=crop",
    "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=96&h=96&fit=crop",
    "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?w=96&h=96&fit=crop",
    "https://images.unsplash.com/photo-1494790108377-be9c29b29330?w=96&h=96&fit=crop",
    "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=96&h=96&fit=crop",
];

pub fn random_avatar_url() -> String {
    let idx = rand::thread_rng().gen_range(0..AVATAR_URLS.len());
    AVATAR_URLS[idx].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn expiration_is_purchase_plus_years() {
        let p = at(2024, 3, 15);
        assert_eq!(PlanDuration::OneYear.expiration_from(p), at(2025, 3, 15));
        assert_eq!(PlanDuration::ThreeYears.expiration_from(p), at(2027, 3, 15));
    }

    #[test]
    fn leap_day_purchase_clamps() {
        let p = at(2024, 2, 29);
        assert_eq!(PlanDuration::OneYear.expiration_from(p), at(2025, 2, 28));
    }

    #[test]
    fn repeated_recomputation_does_not_drift() {
        let p = at(2023, 1, 31);
        let mut c = Customer::new("x".into(), "a@b.com", "5550101", CustomerStatus::Active);
        for _ in 0..5 {
            c.start_plan(PlanDuration::ThreeYears, p);
        }
        assert_eq!(c.expiration_date, Some(at(2026, 1, 31)));
        assert_eq!(c.purchase_date, Some(p));
    }

    #[test]
    fn absent_fields_are_omitted_from_document() {
        let c = Customer::new("id1".into(), "a@b.com", "5550101", CustomerStatus::Pending);
        let doc = serde_json::to_value(&c).unwrap();
        let obj = doc.as_object().unwrap();
        assert_eq!(obj["status"], "pending");
        assert!(!obj.contains_key("expirationDate"));
        assert!(!obj.contains_key("purchaseDate"));
        assert!(!obj.contains_key("reasonForArchival"));
        assert_eq!(obj["switchClicks"], 0);
    }

    #[test]
    fn loose_document_fills_defaults() {
        let c: Customer = serde_json::from_str(
            r#"{"id":"9","email":"z@y.com","status":"active","planDuration":"1 year"}"#,
        )
        .unwrap();
        assert_eq!(c.plan_duration, Some(PlanDuration::OneYear));
        assert!(!c.is_archived);
        assert_eq!(c.delete_clicks, 0);
        assert!(c.purchase_date.is_none());
    }
}
