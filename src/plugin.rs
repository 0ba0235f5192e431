//! Plugin descriptor shown to the host application.
//!
//! The assistant only needs one capability from its host: reading a plugin
//! setting. [`PluginHost`] is that seam; the command line binary backs it
//! with [`AssistantSettings`](crate::models::AssistantSettings).

use crate::models::AssistantSettings;

pub const PLUGIN_NAME: &str = "ProfileAssistant";

/// Settings the plugin declares to the host, with their defaults.
pub const PLUGIN_SETTINGS: &[(&str, &str, bool)] = &[("dark-theme", "Enable dark theme icon.", false)];

/// Read access to plugin settings stored by the host.
pub trait PluginHost {
    fn plugin_setting(&self, plugin: &str, key: &str) -> Option<bool>;
}

impl PluginHost for AssistantSettings {
    fn plugin_setting(&self, plugin: &str, key: &str) -> Option<bool> {
        match (plugin, key) {
            (PLUGIN_NAME, "dark-theme") => Some(self.dark_theme),
            _ => None,
        }
    }
}

/// Static description of the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginInfo {
    pub name: &'static str,
    pub localized_name: &'static str,
    pub author: &'static str,
    pub description: &'static str,
    pub version: &'static str,
}

impl PluginInfo {
    pub const fn new() -> Self {
        Self {
            name: PLUGIN_NAME,
            localized_name: "Profile Assistant",
            author: "MaskedRPGFan",
            description: "Automatically select profile and enable/disable mods based on user VRAM, system language and screen aspect ratio.",
            version: crate::VERSION,
        }
    }

    /// Icon file name, honouring the `dark-theme` setting.
    pub fn icon(&self, host: &dyn PluginHost) -> &'static str {
        if host.plugin_setting(self.name, "dark-theme").unwrap_or(false) {
            "Logo-Dark.svg"
        } else {
            "Logo.svg"
        }
    }

    pub fn tooltip(&self) -> &'static str {
        self.description
    }
}

impl Default for PluginInfo {
    fn default() -> Self {
        Self::new()
    }
}
