// src/domain/confirm.rs

use crate::domain::customer::Customer;

/// Repeated-click confirmation: an action commits on the `threshold`-th click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmGate {
    pub threshold: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Threshold reached; the counter is back at zero.
    Committed,
    /// Counter persisted; this many more clicks are needed.
    Pending { clicks: u32, remaining: u32 },
}

impl ConfirmGate {
    pub const fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    pub fn register(&self, counter: &mut u32) -> GateOutcome {
        let clicks = counter.saturating_add(1);
        if clicks >= self.threshold {
            *counter = 0;
            GateOutcome::Committed
        } else {
            *counter = clicks;
            GateOutcome::Pending {
                clicks,
                remaining: self.threshold - clicks,
            }
        }
    }
}

/// Which list a delete click came from. The two lists use different thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteView {
    Archived,
    FollowUp,
}

impl DeleteView {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "archived" => Some(DeleteView::Archived),
            "follow-up" => Some(DeleteView::FollowUp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedAction {
    Switch,
    Restore,
    Delete(DeleteView),
}

pub const SWITCH_GATE: ConfirmGate = ConfirmGate::new(4);
pub const RESTORE_GATE: ConfirmGate = ConfirmGate::new(3);
pub const ARCHIVED_DELETE_GATE: ConfirmGate = ConfirmGate::new(5);
pub const FOLLOW_UP_DELETE_GATE: ConfirmGate = ConfirmGate::new(4);

impl GuardedAction {
    pub fn gate(self) -> ConfirmGate {
        match self {
            GuardedAction::Switch => SWITCH_GATE,
            GuardedAction::Restore => RESTORE_GATE,
            GuardedAction::Delete(DeleteView::Archived) => ARCHIVED_DELETE_GATE,
            GuardedAction::Delete(DeleteView::FollowUp) => FOLLOW_UP_DELETE_GATE,
        }
    }

    pub fn counter(self, customer: &Customer) -> u32 {
        match self {
            GuardedAction::Switch => customer.switch_clicks,
            GuardedAction::Restore => customer.restore_clicks,
            GuardedAction::Delete(_) => customer.delete_clicks,
        }
    }

    pub fn counter_mut(self, customer: &mut Customer) -> &mut u32 {
        match self {
            GuardedAction::Switch => &mut customer.switch_clicks,
            GuardedAction::Restore => &mut customer.restore_clicks,
            GuardedAction::Delete(_) => &mut customer.delete_clicks,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            GuardedAction::Switch => "Switching status for",
            GuardedAction::Restore => "Restoring",
            GuardedAction::Delete(_) => "Deleting",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commits_on_threshold_and_resets() {
        let gate = ConfirmGate::new(3);
        let mut counter = 0;
        assert_eq!(
            gate.register(&mut counter),
            GateOutcome::Pending { clicks: 1, remaining: 2 }
        );
        assert_eq!(
            gate.register(&mut counter),
            GateOutcome::Pending { clicks: 2, remaining: 1 }
        );
        assert_eq!(gate.register(&mut counter), GateOutcome::Committed);
        assert_eq!(counter, 0);
    }

    #[test]
    fn stale_counter_above_threshold_commits() {
        let gate = ConfirmGate::new(4);
        let mut counter = 9;
        assert_eq!(gate.register(&mut counter), GateOutcome::Committed);
        assert_eq!(counter, 0);
    }

    #[test]
    fn thresholds_per_action() {
        assert_eq!(GuardedAction::Switch.gate().threshold, 4);
        assert_eq!(GuardedAction::Restore.gate().threshold, 3);
        assert_eq!(GuardedAction::Delete(DeleteView::Archived).gate().threshold, 5);
        assert_eq!(GuardedAction::Delete(DeleteView::FollowUp).gate().threshold, 4);
    }
}
