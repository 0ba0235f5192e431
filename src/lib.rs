// Profile Assistant - automatic profile and mod selection for Mod Organizer 2
//
// This is the library crate containing the matching engine and file handling.
// The binary crate (main.rs) provides the command line entry point.

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod plugin;
pub mod services;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use error::AssistantError;
pub use models::{AspectRatio, AssistantSettings, Configuration, EnvironmentFacts};
pub use services::{ProfileAssistant, ProfileManager, RuleSet};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
