pub mod auth;
pub mod badge;
pub mod config;
pub mod profile;
pub mod stats;
pub mod streak;
pub mod suggest;
pub mod task;
