//! Loading configurations and mod lists from the rule file (`config.ini`).
//!
//! ```ini
//! [General]
//! Settings = Low,High
//! DebugMode = false
//!
//! [Low]
//! MaxVram = 6
//! EnableMods = LowGroup
//! DisableMods = HighGroup
//!
//! [LowGroup]
//! Mod = Low Res Textures
//!     Performance Tweaks
//! ```

use crate::config::IniDocument;
use crate::error::{AssistantError, Result};
use crate::models::{AspectRatio, Configuration};
use camino::Utf8Path;
use indexmap::IndexMap;

const GENERAL: &str = "General";

/// Everything read from the rule file.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    /// Configurations in the order they are listed in `General/Settings`.
    pub configurations: Vec<Configuration>,

    /// Mod list name to mod names. Every list referenced by a configuration
    /// has an entry, empty when no section of that name exists.
    pub mod_lists: IndexMap<String, Vec<String>>,
}

/// Load the rule file at `path`.
///
/// A missing file is not an error: a warning is logged and an empty
/// [`RuleSet`] is returned.
///
/// # Errors
/// Returns [`AssistantError::Io`] if the file exists but cannot be read.
pub fn load_configurations(path: &Utf8Path) -> Result<RuleSet> {
    let doc = match IniDocument::load(path) {
        Ok(doc) => doc,
        Err(AssistantError::MissingFile(_)) => {
            tracing::warn!("Config file not found: {}.", path);
            return Ok(RuleSet::default());
        }
        Err(e) => return Err(e),
    };

    tracing::debug!("Config file found: {}.", path);
    Ok(parse_rules(&doc))
}

/// Read the `General/DebugMode` flag; `false` if the file is unreadable.
///
/// Called before logging is set up, so it is kept apart from
/// [`load_configurations`].
pub fn read_debug_mode(path: &Utf8Path) -> bool {
    IniDocument::load(path)
        .map(|doc| debug_mode(&doc))
        .unwrap_or(false)
}

fn debug_mode(doc: &IniDocument) -> bool {
    doc.get_bool(GENERAL, "DebugMode", false)
}

/// Build the rule set from an already parsed document.
pub fn parse_rules(doc: &IniDocument) -> RuleSet {
    let mut configurations = Vec::new();
    let mut mod_lists: IndexMap<String, Vec<String>> = IndexMap::new();

    for section in split_list(&doc.get_or(GENERAL, "Settings", "")) {
        if !doc.has_section(&section) {
            tracing::debug!("Skipping configuration {}: no such section.", section);
            continue;
        }

        let config = parse_configuration(doc, &section);
        for group in config.enable_mods.iter().chain(&config.disable_mods) {
            mod_lists.entry(group.clone()).or_default();
        }
        configurations.push(config);
    }

    for (group, mods) in mod_lists.iter_mut() {
        if doc.has_section(group) {
            *mods = doc.get_all(group, "Mod");
        }
        tracing::debug!("Mod list for {}: {:?}", group, mods);
    }

    RuleSet {
        configurations,
        mod_lists,
    }
}

fn parse_configuration(doc: &IniDocument, section: &str) -> Configuration {
    let text = |key: &str| {
        doc.get(section, key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    Configuration {
        name: section.to_string(),
        profile: text("Profile"),
        enable_mods: split_list(&doc.get_or(section, "EnableMods", "")),
        disable_mods: split_list(&doc.get_or(section, "DisableMods", "")),
        min_vram: int_or_none(section, "MinVram", text("MinVram")),
        max_vram: int_or_none(section, "MaxVram", text("MaxVram")),
        aspect_ratio: AspectRatio::from_string(text("AspectRatio").as_deref()),
        system_language: text("SystemLanguage"),
    }
}

/// Split a comma-separated list, dropping blank entries.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn int_or_none(section: &str, field: &'static str, value: Option<String>) -> Option<i64> {
    let value = value?;
    match value.parse() {
        Ok(number) => Some(number),
        Err(_) => {
            let err = AssistantError::Parse { field, value };
            tracing::warn!("Configuration {}: {}. Ignoring it.", section, err);
            None
        }
    }
}
