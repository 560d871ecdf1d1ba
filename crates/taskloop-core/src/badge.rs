//! Badge catalog and rule evaluation.
//!
//! The catalog is fixed data: each badge carries a threshold measured
//! against either the current streak or the lifetime completion count.
//! Earning is monotonic. Special badges come from the external
//! classifier and carry no automatic rule.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// What a badge's threshold is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdKind {
    /// Consecutive-day streak length
    Streak,
    /// Lifetime completed-task count
    CompletionCount,
    /// Awarded by the classifier; never earned by rule evaluation
    Special,
}

/// An achievement badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub kind: ThresholdKind,
    pub threshold: u32,
    pub earned: bool,
    #[serde(default)]
    pub earned_at: Option<NaiveDate>,
}

/// A classifier-proposed badge, before it joins the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialBadge {
    pub name: String,
    pub icon: String,
    pub description: String,
}

/// Stats snapshot fed to badge evaluation and the classifier.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UserStats {
    pub current_streak: u32,
    pub completed_task_count: u64,
    pub points: u64,
}

fn rule_badge(
    id: &str,
    name: &str,
    icon: &str,
    description: &str,
    kind: ThresholdKind,
    threshold: u32,
) -> Badge {
    Badge {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        description: description.to_string(),
        kind,
        threshold,
        earned: false,
        earned_at: None,
    }
}

/// The built-in ten-badge catalog.
pub fn default_catalog() -> Vec<Badge> {
    use ThresholdKind::{CompletionCount, Streak};
    vec![
        rule_badge("first-steps", "First Steps", "👟", "Complete your first task", CompletionCount, 1),
        rule_badge("getting-started", "Getting Started", "🌱", "Complete 5 tasks", CompletionCount, 5),
        rule_badge("task-master", "Task Master", "🎯", "Complete 10 tasks", CompletionCount, 10),
        rule_badge("streak-starter", "Streak Starter", "🔥", "Maintain a 3-day streak", Streak, 3),
        rule_badge("week-warrior", "Week Warrior", "💪", "Maintain a 7-day streak", Streak, 7),
        rule_badge("consistency-king", "Consistency King", "👑", "Maintain a 14-day streak", Streak, 14),
        rule_badge("habit-hero", "Habit Hero", "🦸", "Complete 25 tasks", CompletionCount, 25),
        rule_badge("task-champion", "Task Champion", "🏆", "Complete 50 tasks", CompletionCount, 50),
        rule_badge("dedication-master", "Dedication Master", "🌟", "Maintain a 30-day streak", Streak, 30),
        rule_badge("century-club", "Century Club", "💯", "Complete 100 tasks", CompletionCount, 100),
    ]
}

/// Mark every rule badge whose threshold the stats now meet.
///
/// Already-earned badges never revert. Returns the badges that flipped in
/// this call, in catalog order, for notification.
pub fn evaluate(catalog: &mut [Badge], stats: &UserStats, on: NaiveDate) -> Vec<Badge> {
    let mut newly_earned = Vec::new();
    for badge in catalog.iter_mut().filter(|b| !b.earned) {
        let met = match badge.kind {
            ThresholdKind::Streak => stats.current_streak >= badge.threshold,
            ThresholdKind::CompletionCount => stats.completed_task_count >= u64::from(badge.threshold),
            ThresholdKind::Special => false,
        };
        if met {
            badge.earned = true;
            badge.earned_at = Some(on);
            newly_earned.push(badge.clone());
        }
    }
    newly_earned
}

/// Fold a classifier suggestion into the catalog.
///
/// Rejects blank names and names already present (case-insensitive).
/// On success the new badge is appended, already earned, and returned.
pub fn merge_special(catalog: &mut Vec<Badge>, suggestion: &SpecialBadge, on: NaiveDate) -> Option<Badge> {
    let name = suggestion.name.trim();
    if name.is_empty() {
        return None;
    }
    if catalog
        .iter()
        .any(|b| b.name.trim().eq_ignore_ascii_case(name))
    {
        return None;
    }

    let badge = Badge {
        id: slugify(name),
        name: name.to_string(),
        icon: suggestion.icon.clone(),
        description: suggestion.description.clone(),
        kind: ThresholdKind::Special,
        threshold: 0,
        earned: true,
        earned_at: Some(on),
    };
    catalog.push(badge.clone());
    Some(badge)
}

/// Boundary check for catalogs coming out of storage.
///
/// Rule badges with a zero threshold would be earned immediately, and
/// duplicate ids would make earn-marking ambiguous; both are rejected.
pub fn validate_catalog(catalog: &[Badge]) -> Result<(), ValidationError> {
    for (i, badge) in catalog.iter().enumerate() {
        if badge.threshold == 0 && badge.kind != ThresholdKind::Special {
            return Err(ValidationError::ZeroThreshold {
                badge: badge.id.clone(),
            });
        }
        if catalog[..i].iter().any(|b| b.id == badge.id) {
            return Err(ValidationError::DuplicateBadge(badge.id.clone()));
        }
    }
    Ok(())
}

fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stats(streak: u32, completed: u64) -> UserStats {
        UserStats {
            current_streak: streak,
            completed_task_count: completed,
            points: completed * 10,
        }
    }

    #[test]
    fn default_catalog_is_valid_and_unearned() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 10);
        assert!(validate_catalog(&catalog).is_ok());
        assert!(catalog.iter().all(|b| !b.earned));
    }

    #[test]
    fn evaluate_earns_only_met_thresholds() {
        let mut catalog = vec![
            rule_badge("week-warrior", "Week Warrior", "💪", "Maintain a 7-day streak", ThresholdKind::Streak, 7),
            rule_badge("task-master", "Task Master", "🎯", "Complete 10 tasks", ThresholdKind::CompletionCount, 10),
        ];
        let newly = evaluate(&mut catalog, &stats(7, 5), date(2025, 2, 1));
        let ids: Vec<_> = newly.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["week-warrior"]);
        assert!(catalog[0].earned);
        assert_eq!(catalog[0].earned_at, Some(date(2025, 2, 1)));
        assert!(!catalog[1].earned);
    }

    #[test]
    fn evaluate_is_monotonic() {
        let mut catalog = default_catalog();
        evaluate(&mut catalog, &stats(3, 1), date(2025, 2, 1));
        assert!(catalog.iter().any(|b| b.id == "streak-starter" && b.earned));

        // stats dropped back below every threshold
        let newly = evaluate(&mut catalog, &stats(0, 0), date(2025, 2, 5));
        assert!(newly.is_empty());
        assert!(catalog.iter().any(|b| b.id == "streak-starter" && b.earned));
        assert!(catalog.iter().any(|b| b.id == "first-steps" && b.earned));
    }

    #[test]
    fn evaluate_returns_only_new_transitions() {
        let mut catalog = default_catalog();
        let first = evaluate(&mut catalog, &stats(3, 1), date(2025, 2, 1));
        assert_eq!(first.len(), 2); // first-steps + streak-starter

        let second = evaluate(&mut catalog, &stats(3, 1), date(2025, 2, 2));
        assert!(second.is_empty());
    }

    #[test]
    fn evaluate_skips_special_badges() {
        let mut catalog = vec![Badge {
            id: "moon-shot".to_string(),
            name: "Moon Shot".to_string(),
            icon: "🌙".to_string(),
            description: "Awarded by review".to_string(),
            kind: ThresholdKind::Special,
            threshold: 0,
            earned: false,
            earned_at: None,
        }];
        let newly = evaluate(&mut catalog, &stats(1000, 1000), date(2025, 2, 1));
        assert!(newly.is_empty());
        assert!(!catalog[0].earned);
    }

    #[test]
    fn merge_special_appends_earned_badge() {
        let mut catalog = default_catalog();
        let suggestion = SpecialBadge {
            name: "Marathon Finisher".to_string(),
            icon: "🏅".to_string(),
            description: "Ran a full marathon".to_string(),
        };
        let badge = merge_special(&mut catalog, &suggestion, date(2025, 2, 1)).unwrap();
        assert_eq!(badge.id, "marathon-finisher");
        assert!(badge.earned);
        assert_eq!(badge.kind, ThresholdKind::Special);
        assert_eq!(catalog.len(), 11);
    }

    #[test]
    fn merge_special_rejects_duplicate_names_case_insensitively() {
        let mut catalog = default_catalog();
        let suggestion = SpecialBadge {
            name: "week WARRIOR".to_string(),
            icon: "🏅".to_string(),
            description: "dup".to_string(),
        };
        assert!(merge_special(&mut catalog, &suggestion, date(2025, 2, 1)).is_none());
        assert_eq!(catalog.len(), 10);
    }

    #[test]
    fn merge_special_rejects_blank_names() {
        let mut catalog = default_catalog();
        let suggestion = SpecialBadge {
            name: "   ".to_string(),
            icon: "🏅".to_string(),
            description: "blank".to_string(),
        };
        assert!(merge_special(&mut catalog, &suggestion, date(2025, 2, 1)).is_none());
    }

    #[test]
    fn validate_rejects_zero_threshold_rule_badges() {
        let catalog = vec![rule_badge("free", "Free", "🎁", "Zero effort", ThresholdKind::Streak, 0)];
        assert!(matches!(
            validate_catalog(&catalog),
            Err(ValidationError::ZeroThreshold { .. })
        ));
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let mut catalog = default_catalog();
        catalog.push(rule_badge("first-steps", "First Steps Again", "👟", "dup", ThresholdKind::CompletionCount, 2));
        assert!(matches!(
            validate_catalog(&catalog),
            Err(ValidationError::DuplicateBadge(_))
        ));
    }

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("Marathon Finisher"), "marathon-finisher");
        assert_eq!(slugify("10,000 Steps!!"), "10-000-steps");
        assert_eq!(slugify("  Deep   Work  "), "deep-work");
    }
}
