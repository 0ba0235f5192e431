//! Integration tests for ConfigManager and the settings file
//!
//! These tests verify:
//! - Default settings when no file exists
//! - Saving and loading settings
//! - Derived paths (rule file, log directory)
//! - PROFILE_ASSISTANT_* environment overrides

use camino::Utf8PathBuf;
use profile_assistant::{AssistantSettings, ConfigManager};
use std::fs;
use tempfile::TempDir;

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

#[test]
fn test_create_config_manager() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    assert_eq!(manager.config_dir(), &config_path);
    assert_eq!(manager.settings_path(), &config_path.join("ProfileAssistant.yaml"));
}

#[test]
fn test_config_manager_creates_directory() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let nested = config_path.join("nested").join("config");

    ConfigManager::new(&nested).unwrap();

    assert!(nested.is_dir());
}

#[test]
fn test_load_default_settings() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let settings = manager.load_settings_file().unwrap();

    assert_eq!(settings, AssistantSettings::default());
    assert_eq!(settings.mo2_dir(), Utf8PathBuf::from("."));
}

#[test]
fn test_save_and_load_settings() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let settings = AssistantSettings {
        mo2_dir: Some(Utf8PathBuf::from("C:/Modding/MO2")),
        rule_file: Some(Utf8PathBuf::from("C:/Modding/rules.ini")),
        aspect_ratio_override: Some("16:10".to_string()),
        dark_theme: true,
        ..AssistantSettings::default()
    };
    manager.save_settings(&settings).unwrap();

    let loaded = manager.load_settings_file().unwrap();

    assert_eq!(loaded, settings);
    assert_eq!(loaded.rule_file(), Utf8PathBuf::from("C:/Modding/rules.ini"));
    assert_eq!(loaded.log_dir(), Utf8PathBuf::from("C:/Modding/MO2/logs"));
}

#[test]
fn test_hand_written_settings() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let content = r#"
mo2_dir: "/games/MO2"
vram_override: 6
language_override: "de"
debug_mode: true
"#;
    fs::write(manager.settings_path(), content).unwrap();

    let loaded = manager.load_settings_file().unwrap();

    assert_eq!(loaded.mo2_dir, Some(Utf8PathBuf::from("/games/MO2")));
    assert_eq!(loaded.vram_override, Some(6));
    assert_eq!(loaded.language_override.as_deref(), Some("de"));
    assert!(loaded.debug_mode);
    assert_eq!(
        loaded.rule_file(),
        Utf8PathBuf::from("/games/MO2/plugins/ProfileAssistant/config.ini")
    );
}

#[test]
fn test_invalid_settings_file_is_an_error() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    fs::write(manager.settings_path(), "vram_override: [not, a, number]\n").unwrap();

    assert!(manager.load_settings_file().is_err());
}

#[test]
fn test_environment_overrides_settings_file() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();
    fs::write(
        manager.settings_path(),
        "vram_override: 12\nlanguage_override: \"en\"\ndark_theme: true\n",
    )
    .unwrap();

    // No other test in this binary reads the environment.
    unsafe {
        std::env::set_var("PROFILE_ASSISTANT_VRAM_OVERRIDE", "4");
        std::env::set_var("PROFILE_ASSISTANT_LANGUAGE_OVERRIDE", "pl");
        std::env::set_var("PROFILE_ASSISTANT_DEBUG_MODE", "true");
    }
    let loaded = manager.load_settings();
    let file_only = manager.load_settings_file();
    unsafe {
        std::env::remove_var("PROFILE_ASSISTANT_VRAM_OVERRIDE");
        std::env::remove_var("PROFILE_ASSISTANT_LANGUAGE_OVERRIDE");
        std::env::remove_var("PROFILE_ASSISTANT_DEBUG_MODE");
    }

    let loaded = loaded.unwrap();
    assert_eq!(loaded.vram_override, Some(4));
    assert_eq!(loaded.language_override.as_deref(), Some("pl"));
    assert!(loaded.debug_mode);
    assert!(loaded.dark_theme);

    let file_only = file_only.unwrap();
    assert_eq!(file_only.vram_override, Some(12));
    assert_eq!(file_only.language_override.as_deref(), Some("en"));
    assert!(!file_only.debug_mode);
}
