// src/domain/display.rs
//
// Display strings derived from stored timestamps and the current time.
// Nothing here is ever written back to the store.

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::domain::customer::{Customer, CustomerStatus};

const MINUTES_IN_DAY: i64 = 1440;
const MINUTES_IN_MONTH: i64 = 43_200;
const MINUTES_IN_TWO_MONTHS: i64 = 86_400;

/// Whole days from `now` until `until`, truncated toward zero.
pub fn whole_days_between(now: DateTime<Utc>, until: DateTime<Utc>) -> i64 {
    (until - now).num_days()
}

/// The status line shown under each customer.
pub fn plan_info(customer: &Customer, now: DateTime<Utc>) -> String {
    match (customer.status, customer.expiration_date, customer.purchase_date) {
        (CustomerStatus::Active, Some(expires), _) if expires > now => {
            format!("{} days remaining", whole_days_between(now, expires))
        }
        (CustomerStatus::Active, Some(expires), _) => {
            format!("Expired {} ago", format_distance(expires, now))
        }
        (CustomerStatus::Pending, Some(expires), _) => {
            format!("Expires in {} days", whole_days_between(now, expires))
        }
        (CustomerStatus::Pending, None, Some(purchased)) => {
            format!("Purchased {} ago", format_distance(purchased, now))
        }
        _ => "No active plan".to_string(),
    }
}

/// The "Days Remaining" export column.
pub fn export_days_remaining(customer: &Customer, now: DateTime<Utc>) -> String {
    match customer.expiration_date {
        None => "N/A".to_string(),
        Some(expires) => {
            let days = whole_days_between(now, expires);
            if days > 0 {
                days.to_string()
            } else {
                "Expired".to_string()
            }
        }
    }
}

/// A follow-up whose date has passed is due.
pub fn is_due(customer: &Customer, now: DateTime<Utc>) -> bool {
    customer.follow_up_date.is_some_and(|at| at < now)
}

/// Human distance between two instants ("3 days", "about 2 hours", "over 1 year").
/// Order of the arguments does not matter.
pub fn format_distance(a: DateTime<Utc>, b: DateTime<Utc>) -> String {
    let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
    let seconds = (later - earlier).num_seconds();
    let minutes = (seconds + 30) / 60;

    if minutes < 2 {
        return if minutes == 0 {
            "less than a minute".to_string()
        } else {
            "1 minute".to_string()
        };
    }
    if minutes < 45 {
        return format!("{minutes} minutes");
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if minutes < MINUTES_IN_DAY {
        let hours = (minutes + 30) / 60;
        return format!("about {hours} hours");
    }
    if minutes < 2520 {
        return "1 day".to_string();
    }
    if minutes < MINUTES_IN_MONTH {
        let days = (minutes + MINUTES_IN_DAY / 2) / MINUTES_IN_DAY;
        return format!("{days} days");
    }
    if minutes < MINUTES_IN_TWO_MONTHS {
        let months = (minutes + MINUTES_IN_MONTH / 2) / MINUTES_IN_MONTH;
        return plural("about ", months, "month");
    }

    let months = whole_months_between(earlier, later);
    if months < 12 {
        let nearest = (minutes + MINUTES_IN_MONTH / 2) / MINUTES_IN_MONTH;
        return plural("", nearest, "month");
    }

    let years = months / 12;
    match months % 12 {
        0..=2 => plural("about ", years, "year"),
        3..=8 => plural("over ", years, "year"),
        _ => plural("almost ", years + 1, "year"),
    }
}

fn plural(prefix: &str, n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{prefix}1 {unit}")
    } else {
        format!("{prefix}{n} {unit}s")
    }
}

/// Full calendar months between two instants (`earlier <= later`).
fn whole_months_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    let mut months = i64::from(later.year() - earlier.year()) * 12
        + i64::from(later.month()) - i64::from(earlier.month());

    let later_key = (later.day(), later.num_seconds_from_midnight());
    let earlier_key = (earlier.day(), earlier.num_seconds_from_midnight());
    if months > 0 && later_key < earlier_key {
        months -= 1;
    }
    months
}
