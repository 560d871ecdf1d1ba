//! Task model: recurring micro-tasks with a per-day completion flag.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;

/// How often a task recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    Daily,
    Weekly,
    MonWedFri,
    #[serde(rename = "every-3-hours")]
    EveryThreeHours,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::MonWedFri => "mon-wed-fri",
            Frequency::EveryThreeHours => "every-3-hours",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "mon-wed-fri" => Ok(Frequency::MonWedFri),
            "every-3-hours" => Ok(Frequency::EveryThreeHours),
            other => Err(ValidationError::InvalidFrequency(other.to_string())),
        }
    }
}

/// A recurring micro-task.
///
/// `completed` is the current-cycle flag; lifetime completion counts live
/// on the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub frequency: Frequency,
    #[serde(default)]
    pub reminder_time: Option<NaiveTime>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a task; validated at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub frequency: Frequency,
    #[serde(default)]
    pub reminder_time: Option<NaiveTime>,
}

impl NewTask {
    /// Reject empty names before anything touches the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyTaskName);
        }
        Ok(())
    }
}

impl Task {
    /// Materialize a validated [`NewTask`] with a fresh id.
    pub fn create(new_task: NewTask) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: new_task.name,
            description: new_task.description,
            frequency: new_task.frequency,
            reminder_time: new_task.reminder_time,
            completed: false,
            created_at: Utc::now(),
        }
    }
}

/// Parse a `HH:MM` reminder time.
pub fn parse_reminder(s: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| ValidationError::InvalidReminderTime(s.to_string()))
}

/// Share of the task list currently completed, rounded to whole percent.
pub fn completion_percentage(tasks: &[Task]) -> u32 {
    if tasks.is_empty() {
        return 0;
    }
    let completed = tasks.iter().filter(|t| t.completed).count();
    ((completed as f64 / tasks.len() as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(name: &str, completed: bool) -> Task {
        Task {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: None,
            frequency: Frequency::Daily,
            reminder_time: None,
            completed,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn frequency_string_roundtrip() {
        for freq in [
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::MonWedFri,
            Frequency::EveryThreeHours,
        ] {
            assert_eq!(freq.as_str().parse::<Frequency>().unwrap(), freq);
        }
    }

    #[test]
    fn frequency_rejects_free_form_strings() {
        assert!("whenever".parse::<Frequency>().is_err());
        assert!("".parse::<Frequency>().is_err());
    }

    #[test]
    fn frequency_serde_uses_original_tokens() {
        let json = serde_json::to_string(&Frequency::EveryThreeHours).unwrap();
        assert_eq!(json, "\"every-3-hours\"");
        let json = serde_json::to_string(&Frequency::MonWedFri).unwrap();
        assert_eq!(json, "\"mon-wed-fri\"");
    }

    #[test]
    fn new_task_rejects_blank_name() {
        let new_task = NewTask {
            name: "   ".to_string(),
            description: None,
            frequency: Frequency::Daily,
            reminder_time: None,
        };
        assert!(new_task.validate().is_err());
    }

    #[test]
    fn parse_reminder_accepts_hh_mm() {
        let time = parse_reminder("09:30").unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert!(parse_reminder("9:30pm").is_err());
        assert!(parse_reminder("25:00").is_err());
    }

    #[test]
    fn completion_percentage_rounds() {
        let tasks = vec![
            make_task("a", true),
            make_task("b", false),
            make_task("c", false),
        ];
        assert_eq!(completion_percentage(&tasks), 33);

        let tasks = vec![make_task("a", true), make_task("b", true)];
        assert_eq!(completion_percentage(&tasks), 100);

        assert_eq!(completion_percentage(&[]), 0);
    }
}
