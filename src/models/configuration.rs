use crate::error::AssistantError;
use crate::models::{AspectRatio, EnvironmentFacts};
use indexmap::{IndexMap, IndexSet};
use std::fmt;

/// A named rule from the rule file.
///
/// The predicates (`min_vram`, `max_vram`, `aspect_ratio`, `system_language`)
/// decide whether the rule applies; `None` always matches. The action is an
/// optional profile switch plus the names of mod lists to enable and disable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    pub name: String,
    pub profile: Option<String>,
    pub enable_mods: Vec<String>,
    pub disable_mods: Vec<String>,
    pub min_vram: Option<i64>,
    pub max_vram: Option<i64>,
    pub aspect_ratio: Option<AspectRatio>,
    pub system_language: Option<String>,
}

/// Mods selected by a configuration after resolving its mod lists.
#[derive(Debug, Default)]
pub struct ResolvedMods {
    pub enabled: IndexSet<String>,
    pub disabled: IndexSet<String>,
    /// Mod list references that could not be resolved.
    pub errors: Vec<AssistantError>,
}

impl ResolvedMods {
    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty() && self.disabled.is_empty()
    }
}

impl Configuration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn check_aspect_ratio(&self, ratio_str: &str) -> bool {
        match &self.aspect_ratio {
            None => true,
            Some(ratio) => ratio.is_equal(ratio_str),
        }
    }

    /// VRAM range check; the upper bound is exclusive: `[min_vram; max_vram)`.
    pub fn check_vram(&self, vram: u32) -> bool {
        let vram = i64::from(vram);
        match (self.min_vram, self.max_vram) {
            (None, None) => {
                tracing::debug!("Checking Vram: {} GB.", vram);
                true
            }
            (Some(min), None) => {
                tracing::debug!("Checking Vram: {} GB. Min vram: {} GB.", vram, min);
                min <= vram
            }
            (None, Some(max)) => {
                tracing::debug!("Checking Vram: {} GB. Max vram: {} GB.", vram, max);
                max > vram
            }
            (Some(min), Some(max)) => {
                tracing::debug!("Checking Vram: {} GB. Vram: [{};{}) GB.", vram, min, max);
                max > vram && vram >= min
            }
        }
    }

    /// Exact, case-sensitive language comparison.
    pub fn check_system_language(&self, language: &str) -> bool {
        match &self.system_language {
            None => true,
            Some(expected) => expected == language,
        }
    }

    /// True if every predicate of this configuration holds for `facts`.
    pub fn check(&self, facts: &EnvironmentFacts) -> bool {
        self.check_aspect_ratio(&facts.aspect_ratio)
            && self.check_vram(facts.vram_gb)
            && self.check_system_language(&facts.system_language)
    }

    /// Resolve the enable/disable mod list names against `mod_lists`.
    ///
    /// Both sides are deduplicated and anything enabled is removed from the
    /// disabled side. Unknown list names are collected in
    /// [`ResolvedMods::errors`] and otherwise ignored.
    pub fn resolve_mods(&self, mod_lists: &IndexMap<String, Vec<String>>) -> ResolvedMods {
        let mut resolved = ResolvedMods::default();

        for group in &self.enable_mods {
            match mod_lists.get(group) {
                Some(mods) => resolved.enabled.extend(mods.iter().cloned()),
                None => resolved.errors.push(AssistantError::MissingModList {
                    configuration: self.name.clone(),
                    group: group.clone(),
                }),
            }
        }

        for group in &self.disable_mods {
            match mod_lists.get(group) {
                Some(mods) => resolved.disabled.extend(mods.iter().cloned()),
                None => resolved.errors.push(AssistantError::MissingModList {
                    configuration: self.name.clone(),
                    group: group.clone(),
                }),
            }
        }

        let enabled = &resolved.enabled;
        resolved.disabled.retain(|name| !enabled.contains(name));
        resolved
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show<T: fmt::Display>(value: &Option<T>) -> String {
            value
                .as_ref()
                .map_or_else(|| "None".to_string(), ToString::to_string)
        }

        write!(
            f,
            "[{}] [{};{}) {} {} {}/{:?}/{:?}",
            self.name,
            show(&self.min_vram),
            show(&self.max_vram),
            show(&self.aspect_ratio),
            show(&self.system_language),
            show(&self.profile),
            self.enable_mods,
            self.disable_mods
        )
    }
}
