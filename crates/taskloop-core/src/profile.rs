//! User profile: points, lifetime completions, visibility.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::badge::UserStats;
use crate::error::ValidationError;
use crate::streak::StreakRecord;

/// Per-user progress record, created zeroed on first use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub points: u64,
    /// Lifetime completions; never decremented, backs count badges.
    pub completed_count: u64,
    /// Opt-in: listed on the public leaderboard when set.
    pub public_profile: bool,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            points: 0,
            completed_count: 0,
            public_profile: false,
            created_at: Utc::now(),
        }
    }

    /// Snapshot fed to badge evaluation and the classifier.
    pub fn stats(&self, streak: &StreakRecord) -> UserStats {
        UserStats {
            current_streak: streak.current_streak,
            completed_task_count: self.completed_count,
            points: self.points,
        }
    }
}

/// Usernames key every stored record, so keep them filesystem- and
/// URL-safe: letters, digits, '-' and '_'.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let valid = !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidUsername(username.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_profile_starts_zeroed_and_private() {
        let profile = Profile::new("ada");
        assert_eq!(profile.points, 0);
        assert_eq!(profile.completed_count, 0);
        assert!(!profile.public_profile);
    }

    #[test]
    fn stats_combine_profile_and_streak() {
        let mut profile = Profile::new("ada");
        profile.points = 120;
        profile.completed_count = 12;
        let streak = StreakRecord {
            current_streak: 4,
            longest_streak: 9,
            last_completed_date: None,
        };
        let stats = profile.stats(&streak);
        assert_eq!(stats.current_streak, 4);
        assert_eq!(stats.completed_task_count, 12);
        assert_eq!(stats.points, 120);
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("ada_lovelace-1815").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("ada lovelace").is_err());
        assert!(validate_username("ada@home").is_err());
    }
}
