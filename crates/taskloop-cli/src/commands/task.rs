//! Task management commands for CLI.

use std::sync::Arc;

use chrono::Local;
use clap::Subcommand;
use taskloop_core::{reminder, task};
use taskloop_core::{Config, Database, NewTask, OpenRouterClassifier, Tracker};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task name
        name: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Repeat frequency: daily, weekly, mon-wed-fri, every-3-hours
        #[arg(long, default_value = "daily")]
        frequency: String,
        /// Reminder time (HH:MM)
        #[arg(long)]
        reminder: Option<String>,
    },
    /// List tasks
    List {
        /// Only tasks not yet completed
        #[arg(long)]
        pending: bool,
    },
    /// Complete a task
    Complete {
        /// Task ID
        id: String,
        /// Skip special-badge classification
        #[arg(long)]
        no_classifier: bool,
    },
    /// Clear a task's completed flag
    Uncomplete {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Show upcoming reminder times for tasks that have one
    Reminders {
        /// How many upcoming fires to show per task
        #[arg(long, default_value = "1")]
        count: usize,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let username = config.profile.username.clone();
    let tracker = Tracker::with_config(Database::open()?, config.tracker());

    match action {
        TaskAction::Add {
            name,
            description,
            frequency,
            reminder,
        } => {
            let new = NewTask {
                name,
                description,
                frequency: frequency.parse()?,
                reminder_time: reminder.as_deref().map(task::parse_reminder).transpose()?,
            };
            let task = tracker.add_task(&username, new)?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { pending } => {
            let tasks: Vec<_> = tracker
                .list_tasks(&username)?
                .into_iter()
                .filter(|t| !pending || !t.completed)
                .collect();
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Complete { id, no_classifier } => {
            let tracker = if !no_classifier && config.classifier.enabled {
                match OpenRouterClassifier::from_keyring() {
                    Ok(classifier) => tracker.with_classifier(Arc::new(
                        classifier
                            .with_model(&config.classifier.model)
                            .with_base_url(&config.classifier.base_url),
                    )),
                    Err(e) => {
                        eprintln!("classifier disabled: {e}");
                        tracker
                    }
                }
            } else {
                tracker
            };

            let today = Local::now().date_naive();
            let outcome = tracker.complete_task(&username, &id, today)?;
            if outcome.already_completed {
                println!("Already completed: {}", outcome.task.name);
                return Ok(());
            }
            println!(
                "Completed: {} (+{} points)",
                outcome.task.name, outcome.points_awarded
            );
            println!(
                "Streak: {} day(s), longest {}",
                outcome.streak.current_streak, outcome.streak.longest_streak
            );
            for badge in &outcome.newly_earned {
                println!("New badge earned: {} {}", badge.icon, badge.name);
            }

            if tracker.has_classifier() {
                let runtime = tokio::runtime::Runtime::new()?;
                let special = runtime.block_on(tracker.evaluate_special_badge(
                    &username,
                    &outcome.task.name,
                    today,
                ))?;
                if let Some(badge) = special {
                    println!("New badge earned: {} {}", badge.icon, badge.name);
                }
            }
        }
        TaskAction::Uncomplete { id } => {
            let task = tracker.uncomplete_task(&username, &id)?;
            println!("Marked incomplete: {}", task.name);
        }
        TaskAction::Delete { id } => {
            if tracker.delete_task(&username, &id)? {
                println!("Task deleted: {id}");
            } else {
                println!("Task not found: {id}");
            }
        }
        TaskAction::Reminders { count } => {
            let now = Local::now().naive_local();
            for task in tracker.list_tasks(&username)? {
                let Some(reminder_time) = task.reminder_time else {
                    continue;
                };
                let mut fire = reminder::first_reminder(reminder_time, now);
                let mut fires = Vec::with_capacity(count);
                for _ in 0..count {
                    fires.push(fire.format("%Y-%m-%d %H:%M").to_string());
                    fire = reminder::next_after(task.frequency, fire);
                }
                println!("{}: {}", task.name, fires.join(", "));
            }
        }
    }
    Ok(())
}
