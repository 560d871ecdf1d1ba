//! # Taskloop Core Library
//!
//! This library provides the core business logic for the Taskloop daily task
//! tracker. It implements a CLI-first philosophy where all operations are
//! available via a standalone CLI binary, with any GUI being a thin layer over
//! the same core library.
//!
//! ## Architecture
//!
//! - **Streak Engine**: Day-granularity consecutive-completion tracking with
//!   separate update and check-in paths
//! - **Badge Engine**: A fixed threshold catalog plus classifier-awarded
//!   special badges, earned monotonically
//! - **Tracker**: The completion pipeline wiring points, streaks, and badges
//!   over a pluggable task store
//! - **Classifier**: OpenRouter-backed special-badge evaluation, strictly
//!   best-effort
//! - **Storage**: SQLite-based task storage and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Tracker`]: Completion pipeline orchestrator
//! - [`Database`]: Task, streak, badge, and profile persistence
//! - [`Config`]: Application configuration management
//! - [`BadgeClassifier`]: Trait for special-badge backends

pub mod badge;
pub mod classifier;
pub mod error;
pub mod events;
pub mod profile;
pub mod reminder;
pub mod storage;
pub mod streak;
pub mod suggest;
pub mod task;
pub mod tracker;

pub use badge::{default_catalog, Badge, SpecialBadge, ThresholdKind, UserStats};
pub use classifier::{
    BadgeClassifier, ClassifierVerdict, ClassifyFuture, ClassifyRequest, OpenRouterClassifier,
};
pub use error::{ClassifierError, ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use events::Event;
pub use profile::Profile;
pub use storage::{Config, Database, TaskStore};
pub use streak::{check_and_reset, update_streak, StreakRecord};
pub use suggest::Suggester;
pub use task::{Frequency, NewTask, Task};
pub use tracker::{
    CheckIn, CompletionOutcome, QualifyPolicy, Tracker, TrackerConfig, TrackerStats,
};
