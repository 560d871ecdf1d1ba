use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change in the system produces an Event.
/// The CLI renders them; structured logs mirror them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskCreated {
        task_id: String,
        name: String,
        at: DateTime<Utc>,
    },
    TaskCompleted {
        task_id: String,
        name: String,
        at: DateTime<Utc>,
    },
    PointsAwarded {
        amount: u64,
        total: u64,
        at: DateTime<Utc>,
    },
    StreakAdvanced {
        current_streak: u32,
        longest_streak: u32,
        at: DateTime<Utc>,
    },
    /// A check-in found the chain already broken.
    StreakReset {
        previous: u32,
        at: DateTime<Utc>,
    },
    BadgeEarned {
        badge_id: String,
        name: String,
        icon: String,
        at: DateTime<Utc>,
    },
}
