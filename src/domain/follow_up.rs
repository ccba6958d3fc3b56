// src/domain/follow_up.rs

use chrono::{DateTime, Duration, Utc};

use crate::domain::customer::{Customer, CustomerStatus, PlanDuration};
use crate::domain::validation::FollowUpForm;

#[derive(Debug, Clone, PartialEq)]
pub enum FollowUpResolution {
    /// An existing record got the note and date; persist it.
    Updated(Customer),
    /// No match; insert this new pending record.
    Created(Customer),
}

/// Attach a follow-up to the first non-archived record with the same phone,
/// or build a new pending record for it.
pub fn resolve_follow_up(
    customers: &[Customer],
    form: &FollowUpForm,
    new_id: impl FnOnce() -> String,
    now: DateTime<Utc>,
) -> FollowUpResolution {
    let follow_up_at = now + Duration::days(form.days);

    if let Some(existing) = customers
        .iter()
        .find(|c| !c.is_archived && c.phone == form.phone)
    {
        let mut updated = existing.clone();
        updated.notes = Some(form.note.clone());
        updated.follow_up_date = Some(follow_up_at);
        return FollowUpResolution::Updated(updated);
    }

    let email = format!("{}@example.com", form.phone);
    let mut created = Customer::new(new_id(), &email, &form.phone, CustomerStatus::Pending);
    created.start_plan(PlanDuration::OneYear, now);
    created.notes = Some(form.note.clone());
    created.follow_up_date = Some(follow_up_at);
    FollowUpResolution::Created(created)
}
