// src/domain/validation.rs
//
// Form parsing for every dialog. Errors are keyed by field name so the page
// can render them next to the input that caused them.

use std::collections::{BTreeMap, HashMap};

use crate::domain::apps::find_app;
use crate::domain::customer::{CustomerStatus, PlanDuration};

pub type FormFields = HashMap<String, String>;

pub const MIN_PHONE_LEN: usize = 7;
pub const MAX_FOLLOW_UP_DAYS: i64 = 3650;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }

    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

fn field<'a>(fields: &'a FormFields, name: &str) -> &'a str {
    fields.get(name).map(|s| s.trim()).unwrap_or("")
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn check_email(fields: &FormFields, errors: &mut FieldErrors) -> String {
    let email = field(fields, "email");
    if !is_valid_email(email) {
        errors.add("email", "Invalid email address.");
    }
    email.to_string()
}

fn check_phone(fields: &FormFields, errors: &mut FieldErrors) -> String {
    let phone = field(fields, "phone");
    if phone.chars().count() < MIN_PHONE_LEN {
        errors.add("phone", "Phone number is too short.");
    }
    phone.to_string()
}

fn check_app(fields: &FormFields, errors: &mut FieldErrors) -> String {
    match find_app(field(fields, "app")) {
        Some(app) => app.name.to_string(),
        None => {
            errors.add("app", "Please select an app.");
            String::new()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomerForm {
    pub email: String,
    pub phone: String,
    pub plan_duration: PlanDuration,
    pub status: CustomerStatus,
    pub one_app_access: bool,
}

impl NewCustomerForm {
    pub fn parse(fields: &FormFields) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = check_email(fields, &mut errors);
        let phone = check_phone(fields, &mut errors);
        let plan_duration = PlanDuration::parse(field(fields, "plan_duration"));
        if plan_duration.is_none() {
            errors.add("plan_duration", "Please select a plan duration.");
        }
        let status = CustomerStatus::parse(field(fields, "status"));
        if status.is_none() {
            errors.add("status", "Please select a status.");
        }
        let one_app_access = matches!(field(fields, "one_app_access"), "on" | "true" | "1");

        errors.into_result(|| NewCustomerForm {
            email,
            phone,
            plan_duration: plan_duration.unwrap_or(PlanDuration::OneYear),
            status: status.unwrap_or(CustomerStatus::Pending),
            one_app_access,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneAppCustomerForm {
    pub email: String,
    pub phone: String,
    pub app: String,
}

impl OneAppCustomerForm {
    pub fn parse(fields: &FormFields) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = check_email(fields, &mut errors);
        let phone = check_phone(fields, &mut errors);
        let app = check_app(fields, &mut errors);
        errors.into_result(|| OneAppCustomerForm { email, phone, app })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUpForm {
    pub phone: String,
    pub note: String,
    pub days: i64,
}

impl FollowUpForm {
    pub fn parse(fields: &FormFields) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let phone = check_phone(fields, &mut errors);
        let note = field(fields, "note").to_string();
        if note.is_empty() {
            errors.add("note", "Note cannot be empty.");
        }
        let days = field(fields, "days").parse::<i64>()
            .ok()
            .filter(|d| (1..=MAX_FOLLOW_UP_DAYS).contains(d));
        if days.is_none() {
            errors.add("days", "Days must be a positive number.");
        }
        errors.into_result(|| FollowUpForm {
            phone,
            note,
            days: days.unwrap_or(1),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPlanForm {
    pub app: String,
}

impl AccessPlanForm {
    pub fn parse(fields: &FormFields) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let app = check_app(fields, &mut errors);
        errors.into_result(|| AccessPlanForm { app })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonForm {
    pub reason: String,
}

impl ReasonForm {
    pub fn parse(fields: &FormFields) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let reason = field(fields, "reason").to_string();
        if reason.is_empty() {
            errors.add("reason", "Please provide a reason for archiving.");
        }
        errors.into_result(|| ReasonForm { reason })
    }
}
