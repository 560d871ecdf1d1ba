//! Statistics commands for CLI.

use chrono::Local;
use clap::Subcommand;
use taskloop_core::{Config, Database, Tracker};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Progress snapshot for the active profile
    Show,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let username = config.profile.username.clone();
    let tracker = Tracker::with_config(Database::open()?, config.tracker());

    match action {
        StatsAction::Show => {
            // The snapshot embeds the streak, so check in first; a chain
            // broken days ago must read as zero, not its last value
            tracker.check_in(&username, Local::now().date_naive())?;
            let stats = tracker.stats(&username)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
