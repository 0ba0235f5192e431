//! Services module - loading rules, probing the machine and applying configurations.
//!
//! # Components
//!
//! - [`loader`]: parses the rule file into a [`RuleSet`] (configurations + mod lists)
//! - [`environment`]: [`EnvironmentProbe`] implementations producing [`EnvironmentFacts`](crate::models::EnvironmentFacts)
//! - [`profile`]: [`ProfileManager`] for listing profiles and switching the selected one
//! - [`modlist`]: rewriting a profile's `modlist.txt`
//! - [`assistant`]: [`ProfileAssistant`], the pass that matches and applies configurations
//!
//! # Usage Example
//!
//! ```ignore
//! use profile_assistant::services::{load_configurations, ProfileAssistant, ProfileManager};
//! use profile_assistant::models::EnvironmentFacts;
//!
//! let rules = load_configurations("plugins/ProfileAssistant/config.ini".into())?;
//! let manager = ProfileManager::new("C:/Modding/MO2".into());
//! let facts = EnvironmentFacts::new(8, "16:9", "en");
//!
//! let report = ProfileAssistant::new(facts, rules).set_configuration(&manager);
//! ```
//!
//! Everything here is synchronous and runs once per invocation.

pub mod assistant;
pub mod environment;
pub mod loader;
pub mod modlist;
pub mod profile;

pub use assistant::{ApplyReport, ProfileAssistant, RunReport, apply_configuration};
pub use environment::{EnvironmentProbe, Overrides, SystemProbe, collect_facts};
pub use loader::{RuleSet, load_configurations, read_debug_mode};
pub use modlist::{modify_modlist_file, rewrite_modlist};
pub use profile::ProfileManager;
