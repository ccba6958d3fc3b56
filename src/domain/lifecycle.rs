// src/domain/lifecycle.rs
//
// State transitions on a single customer record. Callers load the record,
// apply one of these, then persist (or delete) it.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::confirm::{DeleteView, GateOutcome, GuardedAction};
use crate::domain::customer::{Customer, CustomerStatus, PlanDuration};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Please provide a reason for archiving.")]
    ReasonRequired,
    #[error("customer is archived")]
    Archived,
    #[error("customer is not archived")]
    NotArchived,
    #[error("customer has no follow-up scheduled")]
    NoFollowUp,
    #[error("Please select an app.")]
    AppRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Switched {
        from: CustomerStatus,
        to: CustomerStatus,
    },
    Restored,
    /// The record must now be removed from the store.
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickResult {
    Committed(Transition),
    Pending { clicks: u32, remaining: u32 },
}

fn check_applies(customer: &Customer, action: GuardedAction) -> Result<(), TransitionError> {
    match action {
        GuardedAction::Switch if customer.is_archived => Err(TransitionError::Archived),
        GuardedAction::Restore | GuardedAction::Delete(DeleteView::Archived)
            if !customer.is_archived =>
        {
            Err(TransitionError::NotArchived)
        }
        GuardedAction::Delete(DeleteView::FollowUp) if customer.is_archived => {
            Err(TransitionError::Archived)
        }
        GuardedAction::Delete(DeleteView::FollowUp) if !customer.has_follow_up() => {
            Err(TransitionError::NoFollowUp)
        }
        _ => Ok(()),
    }
}

/// Count one confirmation click for `action`, committing the transition on the
/// gate's threshold.
pub fn record_click(
    customer: &mut Customer,
    action: GuardedAction,
    now: DateTime<Utc>,
) -> Result<ClickResult, TransitionError> {
    check_applies(customer, action)?;

    let gate = action.gate();
    match gate.register(action.counter_mut(customer)) {
        GateOutcome::Pending { clicks, remaining } => {
            Ok(ClickResult::Pending { clicks, remaining })
        }
        GateOutcome::Committed => {
            let transition = match action {
                GuardedAction::Switch => switch_status(customer, now),
                GuardedAction::Restore => {
                    restore(customer);
                    Transition::Restored
                }
                GuardedAction::Delete(_) => Transition::Deleted,
            };
            Ok(ClickResult::Committed(transition))
        }
    }
}

fn switch_status(customer: &mut Customer, now: DateTime<Utc>) -> Transition {
    let from = customer.status;
    let to = from.flipped();
    customer.status = to;

    match to {
        CustomerStatus::Active => {
            let duration = customer.plan_duration.unwrap_or(PlanDuration::ThreeYears);
            customer.start_plan(duration, now);
            customer.has_access_plan = true;
        }
        CustomerStatus::Pending => {
            customer.clear_plan_dates();
            customer.has_access_plan = false;
        }
    }

    Transition::Switched { from, to }
}

fn restore(customer: &mut Customer) {
    customer.is_archived = false;
    customer.reason_for_archival = None;
    customer.restore_clicks = 0;
    customer.delete_clicks = 0;
}

/// Single-shot archive. A blank reason leaves the record untouched.
pub fn archive(customer: &mut Customer, reason: &str) -> Result<(), TransitionError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(TransitionError::ReasonRequired);
    }
    if customer.is_archived {
        return Err(TransitionError::Archived);
    }

    customer.is_archived = true;
    customer.reason_for_archival = Some(reason.to_string());
    customer.switch_clicks = 0;
    customer.restore_clicks = 0;
    customer.delete_clicks = 0;
    Ok(())
}

pub fn edit_reason(customer: &mut Customer, reason: &str) -> Result<(), TransitionError> {
    if !customer.is_archived {
        return Err(TransitionError::NotArchived);
    }
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(TransitionError::ReasonRequired);
    }
    customer.reason_for_archival = Some(reason.to_string());
    Ok(())
}

pub fn edit_notes(customer: &mut Customer, notes: &str) {
    let notes = notes.trim();
    customer.notes = if notes.is_empty() {
        None
    } else {
        Some(notes.to_string())
    };
}

pub fn add_access_plan(customer: &mut Customer, app_name: &str) -> Result<(), TransitionError> {
    let app_name = app_name.trim();
    if app_name.is_empty() {
        return Err(TransitionError::AppRequired);
    }
    customer.has_access_plan = true;
    customer.autodesk_app = Some(app_name.to_string());
    Ok(())
}
