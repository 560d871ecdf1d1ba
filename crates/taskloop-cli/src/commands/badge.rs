//! Badge commands for CLI.

use clap::Subcommand;
use taskloop_core::{Config, Database, Tracker};

#[derive(Subcommand)]
pub enum BadgeAction {
    /// List badges
    List {
        /// Only earned badges
        #[arg(long)]
        earned: bool,
    },
}

pub fn run(action: BadgeAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let username = config.profile.username.clone();
    let tracker = Tracker::with_config(Database::open()?, config.tracker());

    match action {
        BadgeAction::List { earned } => {
            let badges: Vec<_> = tracker
                .badges(&username)?
                .into_iter()
                .filter(|b| !earned || b.earned)
                .collect();
            println!("{}", serde_json::to_string_pretty(&badges)?);
        }
    }
    Ok(())
}
