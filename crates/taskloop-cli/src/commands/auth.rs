//! Classifier credential commands for CLI.
//!
//! The OpenRouter API key lives in the OS keyring, never in the config
//! file or the database.

use clap::Subcommand;
use taskloop_core::classifier::{keyring_store, API_KEY_ENTRY};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store the OpenRouter API key
    SetKey {
        /// API key value
        key: String,
    },
    /// Check whether an API key is stored
    Status,
    /// Remove the stored API key
    Clear,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::SetKey { key } => {
            keyring_store::set(API_KEY_ENTRY, &key)?;
            println!("API key stored");
        }
        AuthAction::Status => match keyring_store::get(API_KEY_ENTRY)? {
            Some(_) => println!("API key: configured"),
            None => println!("API key: not configured"),
        },
        AuthAction::Clear => {
            keyring_store::delete(API_KEY_ENTRY)?;
            println!("API key removed");
        }
    }
    Ok(())
}
