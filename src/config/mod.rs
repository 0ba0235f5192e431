pub mod ini;

pub use ini::IniDocument;

use crate::models::AssistantSettings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// File name of the assistant's settings inside the configuration directory.
pub const SETTINGS_FILE: &str = "ProfileAssistant.yaml";

/// Prefix of environment variables overriding settings, e.g. `PROFILE_ASSISTANT_VRAM_OVERRIDE`.
pub const ENV_PREFIX: &str = "PROFILE_ASSISTANT";

/// Configuration manager for the assistant's own YAML settings.
///
/// The rule file (`config.ini`) is not handled here; see
/// [`crate::services::loader`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager for the given configuration directory.
    ///
    /// # Arguments
    /// * `config_dir` - Directory containing `ProfileAssistant.yaml`
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            settings_path: config_dir.join(SETTINGS_FILE),
            config_dir,
        })
    }

    /// Load settings from the YAML file merged with environment overrides.
    ///
    /// # Returns
    /// The loaded settings, or defaults if neither the file nor any
    /// `PROFILE_ASSISTANT_*` variable is present
    pub fn load_settings(&self) -> Result<AssistantSettings> {
        self.load_settings_with_env(true)
    }

    /// Load settings from the YAML file only, ignoring the environment.
    pub fn load_settings_file(&self) -> Result<AssistantSettings> {
        self.load_settings_with_env(false)
    }

    fn load_settings_with_env(&self, use_env: bool) -> Result<AssistantSettings> {
        if self.settings_path.exists() {
            tracing::info!("Loading settings from {}", self.settings_path);
        } else {
            tracing::debug!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
        }

        let mut builder = config::Config::builder().add_source(
            config::File::from(self.settings_path.as_std_path())
                .format(config::FileFormat::Yaml)
                .required(false),
        );
        if use_env {
            builder = builder.add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .try_parsing(true),
            );
        }

        let settings: AssistantSettings = builder
            .build()
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?
            .try_deserialize()
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        Ok(settings)
    }

    /// Save settings to the YAML file.
    pub fn save_settings(&self, settings: &AssistantSettings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let manager = ConfigManager::new(&config_path).unwrap();
        (manager, temp_dir)
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let (manager, _temp_dir) = create_test_config_manager();
        let settings = manager.load_settings_file().unwrap();
        assert_eq!(settings, AssistantSettings::default());
    }

    #[test]
    fn test_save_and_load_settings() {
        let (manager, _temp_dir) = create_test_config_manager();

        let settings = AssistantSettings {
            mo2_dir: Some(Utf8PathBuf::from("C:/Modding/MO2")),
            vram_override: Some(8),
            language_override: Some("pl".to_string()),
            debug_mode: true,
            ..AssistantSettings::default()
        };
        manager.save_settings(&settings).unwrap();

        let loaded = manager.load_settings_file().unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::write(manager.settings_path(), "aspect_ratio_override: \"21:9\"\n").unwrap();

        let loaded = manager.load_settings_file().unwrap();
        assert_eq!(loaded.aspect_ratio_override.as_deref(), Some("21:9"));
        assert_eq!(loaded.mo2_dir, None);
        assert!(!loaded.dark_theme);
    }
}
