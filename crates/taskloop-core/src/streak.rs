//! Day-granularity streak tracking.
//!
//! A streak advances when a qualifying completion lands on the day
//! immediately after the previous one, restarts at 1 after a gap, and
//! drops to 0 only when a check-in finds the chain already broken.
//! Both operations are pure functions over explicit dates; callers
//! normalize timestamps to days before calling in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-user streak state.
///
/// Invariant: `longest_streak >= current_streak`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StreakRecord {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_completed_date: Option<NaiveDate>,
}

/// Apply a qualifying completion on `completion_date`.
///
/// Same-day repeats leave the record untouched. A completion dated before
/// the last recorded one is ignored rather than rewriting history.
pub fn update_streak(record: &StreakRecord, completion_date: NaiveDate) -> StreakRecord {
    let current = match record.last_completed_date {
        None => 1,
        Some(last) => {
            let days = (completion_date - last).num_days();
            match days {
                0 => return *record,
                1 => record.current_streak + 1,
                d if d > 1 => 1,
                _ => {
                    tracing::debug!(%completion_date, %last, "ignoring backdated completion");
                    return *record;
                }
            }
        }
    };

    StreakRecord {
        current_streak: current,
        longest_streak: record.longest_streak.max(current),
        last_completed_date: Some(completion_date),
    }
}

/// Decay check, run when the streak is read rather than advanced.
///
/// If `today` is neither the last completion day nor the day after it,
/// the chain is broken: `current_streak` drops to 0 while
/// `longest_streak` and `last_completed_date` stay as they were.
pub fn check_and_reset(record: &StreakRecord, today: NaiveDate) -> StreakRecord {
    let Some(last) = record.last_completed_date else {
        return *record;
    };
    let days = (today - last).num_days();
    if days == 0 || days == 1 {
        *record
    } else {
        StreakRecord {
            current_streak: 0,
            ..*record
        }
    }
}
