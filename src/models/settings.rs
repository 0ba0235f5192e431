use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Settings of the assistant itself, stored in `ProfileAssistant.yaml`.
///
/// Every field is optional on disk. Values can also be supplied through
/// `PROFILE_ASSISTANT_<FIELD>` environment variables and command line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    /// Mod Organizer 2 installation directory (holds `ModOrganizer.ini`).
    pub mo2_dir: Option<Utf8PathBuf>,

    /// Rule file; defaults to `<mo2_dir>/plugins/ProfileAssistant/config.ini`.
    pub rule_file: Option<Utf8PathBuf>,

    /// Log directory; defaults to `<mo2_dir>/logs`.
    pub log_dir: Option<Utf8PathBuf>,

    /// Use this VRAM size (GB) instead of querying the GPU.
    pub vram_override: Option<u32>,

    /// Use this aspect ratio (`"<x>:<y>"`) instead of querying the screen.
    pub aspect_ratio_override: Option<String>,

    /// Use this language code instead of the system locale.
    pub language_override: Option<String>,

    pub debug_mode: bool,

    /// Pick the dark variant of the plugin icon.
    pub dark_theme: bool,
}

impl AssistantSettings {
    /// Directory holding `ModOrganizer.ini`, falling back to the working directory.
    pub fn mo2_dir(&self) -> Utf8PathBuf {
        self.mo2_dir.clone().unwrap_or_else(|| Utf8PathBuf::from("."))
    }

    pub fn rule_file(&self) -> Utf8PathBuf {
        self.rule_file.clone().unwrap_or_else(|| {
            self.mo2_dir()
                .join("plugins")
                .join(crate::plugin::PLUGIN_NAME)
                .join("config.ini")
        })
    }

    pub fn log_dir(&self) -> Utf8PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.mo2_dir().join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_follow_mo2_dir() {
        let settings = AssistantSettings {
            mo2_dir: Some(Utf8PathBuf::from("/games/MO2")),
            ..AssistantSettings::default()
        };

        assert_eq!(
            settings.rule_file(),
            Utf8PathBuf::from("/games/MO2/plugins/ProfileAssistant/config.ini")
        );
        assert_eq!(settings.log_dir(), Utf8PathBuf::from("/games/MO2/logs"));
    }

    #[test]
    fn test_explicit_paths_win() {
        let settings = AssistantSettings {
            mo2_dir: Some(Utf8PathBuf::from("/games/MO2")),
            rule_file: Some(Utf8PathBuf::from("/rules/config.ini")),
            log_dir: Some(Utf8PathBuf::from("/tmp/logs")),
            ..AssistantSettings::default()
        };

        assert_eq!(settings.rule_file(), Utf8PathBuf::from("/rules/config.ini"));
        assert_eq!(settings.log_dir(), Utf8PathBuf::from("/tmp/logs"));
    }

    #[test]
    fn test_defaults() {
        let settings = AssistantSettings::default();
        assert!(!settings.debug_mode);
        assert!(!settings.dark_theme);
        assert_eq!(settings.vram_override, None);
        assert_eq!(settings.mo2_dir(), Utf8PathBuf::from("."));
    }
}
