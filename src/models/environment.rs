use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of the machine facts configurations are matched against.
///
/// Collected once at startup (see [`crate::services::environment`]) and
/// passed explicitly to the matching pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentFacts {
    /// Total VRAM in whole gigabytes, `0` when it could not be detected.
    pub vram_gb: u32,

    /// Current screen aspect ratio as `"<x>:<y>"`.
    pub aspect_ratio: String,

    /// Two-letter system language code, e.g. `"en"`.
    pub system_language: String,
}

impl EnvironmentFacts {
    pub fn new(vram_gb: u32, aspect_ratio: impl Into<String>, system_language: impl Into<String>) -> Self {
        Self {
            vram_gb,
            aspect_ratio: aspect_ratio.into(),
            system_language: system_language.into(),
        }
    }
}

impl fmt::Display for EnvironmentFacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vram: {} GB. Aspect ratio: {}. System language: {}.",
            self.vram_gb, self.aspect_ratio, self.system_language
        )
    }
}
