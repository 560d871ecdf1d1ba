//! Completion pipeline tying the store, streak, badge, and classifier
//! layers together.
//!
//! [`Tracker`] owns a [`TaskStore`] and runs the full bookkeeping for
//! each completion: persist the flag, award points, advance the streak,
//! and evaluate badge thresholds. The special-badge classifier is
//! optional and strictly best-effort; its failures never surface as
//! completion errors.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::badge::{self, Badge};
use crate::classifier::{BadgeClassifier, ClassifyRequest};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::profile::Profile;
use crate::storage::TaskStore;
use crate::streak::{self, StreakRecord};
use crate::task::{self, NewTask, Task};

/// Which completions count toward the daily streak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualifyPolicy {
    /// Any single completion advances the streak.
    #[default]
    AnyCompletion,
    /// The streak advances only once every task is completed.
    AllTasks,
}

/// Tunables for the completion pipeline.
#[derive(Debug, Clone, Copy)]
pub struct TrackerConfig {
    pub points_per_completion: u64,
    pub qualify: QualifyPolicy,
    pub classifier_timeout_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            points_per_completion: 10,
            qualify: QualifyPolicy::AnyCompletion,
            classifier_timeout_secs: 5,
        }
    }
}

/// Everything a single completion changed.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionOutcome {
    pub task: Task,
    /// True when the task was already completed and nothing changed.
    pub already_completed: bool,
    pub points_awarded: u64,
    pub total_points: u64,
    pub streak: StreakRecord,
    pub streak_updated: bool,
    pub newly_earned: Vec<Badge>,
    pub events: Vec<Event>,
}

/// Result of a streak check-in.
#[derive(Debug, Clone, Serialize)]
pub struct CheckIn {
    pub streak: StreakRecord,
    pub was_reset: bool,
    /// Streak length before the check-in ran.
    pub previous: u32,
    pub events: Vec<Event>,
}

/// Aggregate progress snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct TrackerStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub completion_percentage: u32,
    pub points: u64,
    pub completed_count: u64,
    pub streak: StreakRecord,
}

/// Orchestrates task completion against a [`TaskStore`].
pub struct Tracker<S: TaskStore> {
    store: S,
    config: TrackerConfig,
    classifier: Option<Arc<dyn BadgeClassifier>>,
}

impl<S: TaskStore> Tracker<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, TrackerConfig::default())
    }

    pub fn with_config(store: S, config: TrackerConfig) -> Self {
        Self {
            store,
            config,
            classifier: None,
        }
    }

    /// Attach a special-badge classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn BadgeClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate and persist a new task.
    pub fn add_task(&self, username: &str, new: NewTask) -> Result<Task> {
        new.validate()?;
        let task = Task::create(new);
        self.store.add_task(username, &task)?;
        let event = Event::TaskCreated {
            task_id: task.id.clone(),
            name: task.name.clone(),
            at: task.created_at,
        };
        tracing::info!(username, event = ?event, "task added");
        Ok(task)
    }

    pub fn list_tasks(&self, username: &str) -> Result<Vec<Task>> {
        Ok(self.store.get_tasks(username)?)
    }

    pub fn delete_task(&self, username: &str, task_id: &str) -> Result<bool> {
        Ok(self.store.delete_task(username, task_id)?)
    }

    /// Clear a task's completed flag.
    ///
    /// Points and streak state already granted for the completion are
    /// kept; only the flag is cleared.
    pub fn uncomplete_task(&self, username: &str, task_id: &str) -> Result<Task> {
        let mut task = self.require_task(username, task_id)?;
        if task.completed {
            self.store.set_task_completed(username, task_id, false)?;
            task.completed = false;
        }
        Ok(task)
    }

    /// Complete a task and run the full bookkeeping pipeline.
    ///
    /// Completing an already-completed task is a no-op that reports the
    /// current totals. Otherwise the completion is persisted, points are
    /// added to the profile, the streak advances according to the
    /// qualify policy, and any badge thresholds crossed by the new
    /// totals are marked earned.
    pub fn complete_task(
        &self,
        username: &str,
        task_id: &str,
        completed_on: NaiveDate,
    ) -> Result<CompletionOutcome> {
        let mut task = self.require_task(username, task_id)?;
        if task.completed {
            let profile = self.store.get_profile(username)?;
            let streak = self.store.get_streak(username)?;
            return Ok(CompletionOutcome {
                task,
                already_completed: true,
                points_awarded: 0,
                total_points: profile.points,
                streak,
                streak_updated: false,
                newly_earned: Vec::new(),
                events: Vec::new(),
            });
        }

        let at = Utc::now();
        let mut events = Vec::new();

        self.store.set_task_completed(username, task_id, true)?;
        task.completed = true;
        events.push(Event::TaskCompleted {
            task_id: task.id.clone(),
            name: task.name.clone(),
            at,
        });

        let mut profile = self.store.get_profile(username)?;
        profile.points += self.config.points_per_completion;
        profile.completed_count += 1;
        self.store.save_profile(&profile)?;
        events.push(Event::PointsAwarded {
            amount: self.config.points_per_completion,
            total: profile.points,
            at,
        });

        let mut streak = self.store.get_streak(username)?;
        let before = streak;
        if self.streak_qualifies(username)? {
            streak = streak::update_streak(&streak, completed_on);
        }
        let streak_updated = streak != before;
        if streak_updated {
            self.store.set_streak(username, &streak)?;
            events.push(Event::StreakAdvanced {
                current_streak: streak.current_streak,
                longest_streak: streak.longest_streak,
                at,
            });
            tracing::info!(username, streak = streak.current_streak, "streak advanced");
        }

        let stats = profile.stats(&streak);
        let mut badges = self.store.get_badges(username)?;
        let newly_earned = badge::evaluate(&mut badges, &stats, completed_on);
        for earned in &newly_earned {
            self.store.mark_badge_earned(username, &earned.id, completed_on)?;
            events.push(Event::BadgeEarned {
                badge_id: earned.id.clone(),
                name: earned.name.clone(),
                icon: earned.icon.clone(),
                at,
            });
            tracing::info!(username, badge = %earned.name, "badge earned");
        }

        Ok(CompletionOutcome {
            task,
            already_completed: false,
            points_awarded: self.config.points_per_completion,
            total_points: profile.points,
            streak,
            streak_updated,
            newly_earned,
            events,
        })
    }

    /// Check whether the streak chain survived to `today`, resetting the
    /// current run if a day was missed. Longest streak is untouched.
    pub fn check_in(&self, username: &str, today: NaiveDate) -> Result<CheckIn> {
        let before = self.store.get_streak(username)?;
        let previous = before.current_streak;
        let streak = streak::check_and_reset(&before, today);
        let was_reset = streak != before;
        let mut events = Vec::new();
        if was_reset {
            self.store.set_streak(username, &streak)?;
            events.push(Event::StreakReset {
                previous,
                at: Utc::now(),
            });
            tracing::info!(username, previous, "streak chain broken at check-in");
        }
        Ok(CheckIn {
            streak,
            was_reset,
            previous,
            events,
        })
    }

    pub fn stats(&self, username: &str) -> Result<TrackerStats> {
        let tasks = self.store.get_tasks(username)?;
        let completed_tasks = tasks.iter().filter(|t| t.completed).count();
        let profile = self.store.get_profile(username)?;
        let streak = self.store.get_streak(username)?;
        Ok(TrackerStats {
            total_tasks: tasks.len(),
            completed_tasks,
            completion_percentage: task::completion_percentage(&tasks),
            points: profile.points,
            completed_count: profile.completed_count,
            streak,
        })
    }

    pub fn badges(&self, username: &str) -> Result<Vec<Badge>> {
        Ok(self.store.get_badges(username)?)
    }

    pub fn set_profile_visibility(&self, username: &str, public: bool) -> Result<Profile> {
        let mut profile = self.store.get_profile(username)?;
        profile.public_profile = public;
        self.store.save_profile(&profile)?;
        Ok(profile)
    }

    pub fn profile(&self, username: &str) -> Result<Profile> {
        Ok(self.store.get_profile(username)?)
    }

    pub fn public_profiles(&self) -> Result<Vec<Profile>> {
        Ok(self.store.list_public_profiles()?)
    }

    /// Ask the classifier whether `task_name` deserves a special badge.
    ///
    /// Returns the newly stored badge, or `None` when no classifier is
    /// attached, the classifier declines, or the call fails or times
    /// out. Only store failures propagate as errors.
    pub async fn evaluate_special_badge(
        &self,
        username: &str,
        task_name: &str,
        on: NaiveDate,
    ) -> Result<Option<Badge>> {
        let Some(classifier) = &self.classifier else {
            return Ok(None);
        };
        let profile = self.store.get_profile(username)?;
        let streak = self.store.get_streak(username)?;
        let request = ClassifyRequest {
            task_name: task_name.to_string(),
            stats: profile.stats(&streak),
        };
        let timeout = Duration::from_secs(self.config.classifier_timeout_secs);
        let verdict = match tokio::time::timeout(timeout, classifier.classify(&request)).await {
            Ok(Ok(verdict)) => verdict,
            Ok(Err(e)) => {
                tracing::warn!(username, task = task_name, "badge classification failed: {e}");
                return Ok(None);
            }
            Err(_) => {
                tracing::warn!(
                    username,
                    timeout_secs = self.config.classifier_timeout_secs,
                    "badge classification timed out"
                );
                return Ok(None);
            }
        };
        if !verdict.should_award_badge {
            return Ok(None);
        }
        let Some(data) = verdict.badge_data else {
            tracing::warn!(username, "classifier awarded a badge without badge data");
            return Ok(None);
        };
        let mut badges = self.store.get_badges(username)?;
        let Some(earned) = badge::merge_special(&mut badges, &data, on) else {
            tracing::debug!(name = %data.name, "special badge dropped as blank or duplicate");
            return Ok(None);
        };
        self.store.insert_badge(username, &earned)?;
        tracing::info!(username, badge = %earned.name, "special badge earned");
        Ok(Some(earned))
    }

    fn require_task(&self, username: &str, task_id: &str) -> Result<Task> {
        self.store
            .get_task(username, task_id)?
            .ok_or_else(|| ValidationError::UnknownTask(task_id.to_string()).into())
    }

    fn streak_qualifies(&self, username: &str) -> Result<bool> {
        match self.config.qualify {
            QualifyPolicy::AnyCompletion => Ok(true),
            QualifyPolicy::AllTasks => {
                let tasks = self.store.get_tasks(username)?;
                Ok(tasks.iter().all(|t| t.completed))
            }
        }
    }
}
