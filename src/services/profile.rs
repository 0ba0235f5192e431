//! Mod Organizer profiles: discovery and switching the selected profile.
//!
//! The selected profile lives in `ModOrganizer.ini` as
//! `[General] selected_profile=@ByteArray(<name>)`. Switching rewrites that
//! single line. Nothing guards against Mod Organizer editing the file at the
//! same time, and a profile deleted between [`ProfileManager::get_profiles`]
//! and [`ProfileManager::change_profile`] is not detected.

use crate::config::ini::{self, IniDocument};
use crate::error::{AssistantError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Name of Mod Organizer's main configuration file.
pub const MO2_INI_FILE: &str = "ModOrganizer.ini";

/// A directory is a profile if it contains this file.
pub const PROFILE_MARKER: &str = "archives.txt";

pub const MODLIST_FILE: &str = "modlist.txt";

const BYTE_ARRAY_PREFIX: &str = "@ByteArray(";

/// Access to the profiles of one Mod Organizer instance.
#[derive(Debug, Clone)]
pub struct ProfileManager {
    mo2_ini_path: Utf8PathBuf,
    directory: Utf8PathBuf,
}

impl ProfileManager {
    /// Create a manager for the Mod Organizer instance in `mo2_dir`.
    ///
    /// The profiles directory is read from `Settings/profiles_directory`,
    /// defaulting to `<mo2_dir>/profiles`.
    pub fn new(mo2_dir: &Utf8Path) -> Self {
        let mo2_ini_path = mo2_dir.join(MO2_INI_FILE);
        let directory = match IniDocument::load(&mo2_ini_path) {
            Ok(doc) => profiles_directory(&doc, mo2_dir),
            Err(e) => {
                tracing::warn!("Cannot read {}: {}", mo2_ini_path, e);
                mo2_dir.join("profiles")
            }
        };

        tracing::debug!("Profiles directory: {}", directory);
        Self {
            mo2_ini_path,
            directory,
        }
    }

    /// Create a manager with an explicit profiles directory.
    pub fn with_directory(mo2_ini_path: impl Into<Utf8PathBuf>, directory: impl Into<Utf8PathBuf>) -> Self {
        Self {
            mo2_ini_path: mo2_ini_path.into(),
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Utf8Path {
        &self.directory
    }

    pub fn mo2_ini_path(&self) -> &Utf8Path {
        &self.mo2_ini_path
    }

    /// Names of all profiles, in directory enumeration order.
    ///
    /// Empty when `ModOrganizer.ini` has no `Settings` section.
    pub fn get_profiles(&self) -> Vec<String> {
        match IniDocument::load(&self.mo2_ini_path) {
            Ok(doc) if doc.has_section("Settings") => {}
            Ok(_) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Cannot read {}: {}", self.mo2_ini_path, e);
                return Vec::new();
            }
        }

        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Cannot list profiles in {}: {}", self.directory, e);
                return Vec::new();
            }
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().join(PROFILE_MARKER).is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect()
    }

    /// Make `name` the selected profile in `ModOrganizer.ini`.
    ///
    /// # Errors
    /// [`AssistantError::Io`] if the file cannot be written. A missing file
    /// is created.
    pub fn change_profile(&self, name: &str) -> Result<()> {
        let content = match fs::read_to_string(&self.mo2_ini_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(AssistantError::io(&self.mo2_ini_path, e)),
        };

        let value = format!("{}{})", BYTE_ARRAY_PREFIX, name);
        let updated = ini::set_value(&content, "General", "selected_profile", &value);
        fs::write(&self.mo2_ini_path, updated).map_err(|e| AssistantError::io(&self.mo2_ini_path, e))?;

        tracing::debug!("Selected profile set to {}", name);
        Ok(())
    }

    /// Name of the selected profile, if any.
    pub fn selected_profile(&self) -> Option<String> {
        let doc = IniDocument::load(&self.mo2_ini_path).ok()?;
        let raw = doc.get("General", "selected_profile")?;
        let name = decode_byte_array(raw.trim());
        if name.is_empty() { None } else { Some(name.to_string()) }
    }

    /// Directory of the selected profile; the profiles directory itself when
    /// no profile is selected.
    pub fn current_profile(&self) -> Utf8PathBuf {
        match self.selected_profile() {
            Some(name) => self.directory.join(name),
            None => self.directory.clone(),
        }
    }

    /// `modlist.txt` of the selected profile.
    pub fn modlist_file(&self) -> Utf8PathBuf {
        self.current_profile().join(MODLIST_FILE)
    }
}

/// Resolve the profiles directory from a parsed `ModOrganizer.ini`.
///
/// `%BASE_DIR%` expands to `Settings/base_directory`, or `mo2_dir` when unset.
pub fn profiles_directory(doc: &IniDocument, mo2_dir: &Utf8Path) -> Utf8PathBuf {
    let Some(configured) = doc
        .get("Settings", "profiles_directory")
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    else {
        return mo2_dir.join("profiles");
    };

    let base_dir = doc
        .get("Settings", "base_directory")
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| mo2_dir.to_string());

    let path = Utf8PathBuf::from(configured.replace("%BASE_DIR%", &base_dir));
    if path.is_absolute() { path } else { mo2_dir.join(path) }
}

/// Strip Qt's `@ByteArray(...)` wrapper, if present.
fn decode_byte_array(value: &str) -> &str {
    value
        .strip_prefix(BYTE_ARRAY_PREFIX)
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_byte_array() {
        assert_eq!(decode_byte_array("@ByteArray(Default)"), "Default");
        assert_eq!(decode_byte_array("@ByteArray(Low (4GB))"), "Low (4GB)");
        assert_eq!(decode_byte_array("Plain"), "Plain");
    }

    #[test]
    fn test_profiles_directory_default() {
        let doc = IniDocument::parse("[General]\nselected_profile=@ByteArray(Default)\n");
        assert_eq!(
            profiles_directory(&doc, Utf8Path::new("/mo2")),
            Utf8PathBuf::from("/mo2/profiles")
        );
    }

    #[test]
    fn test_profiles_directory_expands_base_dir() {
        let doc = IniDocument::parse("[Settings]\nprofiles_directory=%BASE_DIR%/profiles\nbase_directory=/data/mo2\n");
        assert_eq!(
            profiles_directory(&doc, Utf8Path::new("/mo2")),
            Utf8PathBuf::from("/data/mo2/profiles")
        );

        let doc = IniDocument::parse("[Settings]\nprofiles_directory=%BASE_DIR%/profiles\n");
        assert_eq!(
            profiles_directory(&doc, Utf8Path::new("/mo2")),
            Utf8PathBuf::from("/mo2/profiles")
        );
    }

    #[test]
    fn test_profiles_directory_relative() {
        let doc = IniDocument::parse("[Settings]\nprofiles_directory=my_profiles\n");
        assert_eq!(
            profiles_directory(&doc, Utf8Path::new("/mo2")),
            Utf8PathBuf::from("/mo2/my_profiles")
        );
    }
}
