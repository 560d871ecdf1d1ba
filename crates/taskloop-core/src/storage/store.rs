//! Storage interface for tasks, streaks, badges, and profiles.

use chrono::NaiveDate;

use crate::badge::Badge;
use crate::error::DatabaseError;
use crate::profile::Profile;
use crate::streak::StreakRecord;
use crate::task::Task;

/// Persistence boundary for the tracker.
///
/// Every method is keyed by username. Implementations initialize state
/// for unknown users on first read: `get_profile` returns a zeroed
/// profile and `get_badges` returns the seeded default catalog. Errors
/// are retryable; callers never retry internally and never treat an
/// error as partial success.
pub trait TaskStore {
    fn get_tasks(&self, username: &str) -> Result<Vec<Task>, DatabaseError>;
    fn get_task(&self, username: &str, task_id: &str) -> Result<Option<Task>, DatabaseError>;
    fn add_task(&self, username: &str, task: &Task) -> Result<(), DatabaseError>;
    /// Returns whether a task was actually removed.
    fn delete_task(&self, username: &str, task_id: &str) -> Result<bool, DatabaseError>;
    fn set_task_completed(
        &self,
        username: &str,
        task_id: &str,
        completed: bool,
    ) -> Result<(), DatabaseError>;

    fn get_streak(&self, username: &str) -> Result<StreakRecord, DatabaseError>;
    fn set_streak(&self, username: &str, record: &StreakRecord) -> Result<(), DatabaseError>;

    fn get_badges(&self, username: &str) -> Result<Vec<Badge>, DatabaseError>;
    /// Flip a badge to earned. Must be monotonic: never clears the flag,
    /// never overwrites an existing earned date.
    fn mark_badge_earned(
        &self,
        username: &str,
        badge_id: &str,
        on: NaiveDate,
    ) -> Result<(), DatabaseError>;
    /// Add a badge that is not part of the default catalog (specials).
    fn insert_badge(&self, username: &str, badge: &Badge) -> Result<(), DatabaseError>;

    fn get_profile(&self, username: &str) -> Result<Profile, DatabaseError>;
    fn save_profile(&self, profile: &Profile) -> Result<(), DatabaseError>;
    /// Opted-in profiles, highest points first.
    fn list_public_profiles(&self) -> Result<Vec<Profile>, DatabaseError>;
}
