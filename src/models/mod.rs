//! Data models for the Profile Assistant.
//!
//! - [`AspectRatio`]: a width:height ratio reduced to lowest terms
//! - [`Configuration`]: one named rule from the rule file (predicates + action)
//! - [`EnvironmentFacts`]: VRAM, aspect ratio and language of the current machine
//! - [`AssistantSettings`]: the assistant's own settings from `ProfileAssistant.yaml`
//!
//! Models are plain values. Loading and applying them lives in [`crate::services`].

pub mod aspect_ratio;
pub mod configuration;
pub mod environment;
pub mod settings;

pub use aspect_ratio::{AspectRatio, screen_ratio};
pub use configuration::{Configuration, ResolvedMods};
pub use environment::EnvironmentFacts;
pub use settings::AssistantSettings;
