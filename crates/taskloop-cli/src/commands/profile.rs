//! Profile commands for CLI.

use clap::Subcommand;
use taskloop_core::{Config, Database, Tracker};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the active profile
    Show,
    /// Set profile visibility: public or private
    SetVisibility {
        /// "public" or "private"
        visibility: String,
    },
    /// List public profiles, highest points first
    Leaderboard,
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let username = config.profile.username.clone();
    let tracker = Tracker::with_config(Database::open()?, config.tracker());

    match action {
        ProfileAction::Show => {
            let profile = tracker.profile(&username)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileAction::SetVisibility { visibility } => {
            let public = match visibility.as_str() {
                "public" => true,
                "private" => false,
                other => {
                    return Err(format!("expected 'public' or 'private', got '{other}'").into())
                }
            };
            let profile = tracker.set_profile_visibility(&username, public)?;
            println!(
                "Profile {} is now {}",
                profile.username,
                if profile.public_profile { "public" } else { "private" }
            );
        }
        ProfileAction::Leaderboard => {
            let profiles = tracker.public_profiles()?;
            println!("{}", serde_json::to_string_pretty(&profiles)?);
        }
    }
    Ok(())
}
