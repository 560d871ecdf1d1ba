//! Reminder scheduling math.
//!
//! Computes when a task's reminder should fire; actually delivering the
//! notification is the caller's concern. All functions take explicit
//! wall-clock time.

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Weekday};

use crate::task::Frequency;

/// First fire time for a reminder: today at `reminder_time`, or the same
/// time tomorrow when that moment has already passed.
pub fn first_reminder(reminder_time: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let today_at = now.date().and_time(reminder_time);
    if today_at > now {
        today_at
    } else {
        today_at + Duration::days(1)
    }
}

/// Next fire time after a reminder went off at `fired_at`.
pub fn next_after(frequency: Frequency, fired_at: NaiveDateTime) -> NaiveDateTime {
    match frequency {
        Frequency::Daily => fired_at + Duration::days(1),
        Frequency::Weekly => fired_at + Duration::days(7),
        Frequency::EveryThreeHours => fired_at + Duration::hours(3),
        Frequency::MonWedFri => next_mon_wed_fri(fired_at),
    }
}

fn next_mon_wed_fri(fired_at: NaiveDateTime) -> NaiveDateTime {
    let mut next = fired_at + Duration::days(1);
    while !matches!(next.weekday(), Weekday::Mon | Weekday::Wed | Weekday::Fri) {
        next += Duration::days(1);
    }
    next
}
