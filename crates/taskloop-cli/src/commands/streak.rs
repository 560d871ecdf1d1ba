//! Streak commands for CLI.

use chrono::Local;
use clap::Subcommand;
use taskloop_core::{Config, Database, Tracker};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Show the streak record after a check-in
    Show,
    /// Run the day-boundary check against today
    Checkin,
}

pub fn run(action: StreakAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let username = config.profile.username.clone();
    let tracker = Tracker::with_config(Database::open()?, config.tracker());
    let today = Local::now().date_naive();

    // Both paths check in first so a stale chain never gets displayed
    let check = tracker.check_in(&username, today)?;
    match action {
        StreakAction::Show => {
            println!("{}", serde_json::to_string_pretty(&check.streak)?);
        }
        StreakAction::Checkin => {
            if check.was_reset {
                println!("Streak reset: chain broken after {} day(s)", check.previous);
            } else {
                println!("Streak intact: {} day(s)", check.streak.current_streak);
            }
        }
    }
    Ok(())
}
