//! Profile Assistant - automatic profile and mod selection for Mod Organizer 2
//!
//! Main entry point for the command line tool.
//!
//! # Execution Flow
//!
//! 1. Parse command line flags
//! 2. Load `ProfileAssistant.yaml` (+ `PROFILE_ASSISTANT_*` environment overrides)
//! 3. Initialize logging → `<MO2>/logs/ProfileAssistant.log`
//! 4. Collect VRAM, screen aspect ratio and system language
//! 5. Load the rule file (`config.ini`)
//! 6. Apply every matching configuration in order
//!
//! The tool is meant to run once before Mod Organizer starts, so that the
//! profile and mod list changes are picked up on launch.

use anyhow::{Result, bail};
use camino::Utf8PathBuf;
use clap::Parser;
use profile_assistant::plugin::PluginInfo;
use profile_assistant::services::{
    self, EnvironmentProbe, Overrides, ProfileAssistant, ProfileManager, SystemProbe,
};
use profile_assistant::{APP_NAME, AssistantSettings, ConfigManager, VERSION, models};

const LOG_FILE: &str = "ProfileAssistant.log";

/// Select a Mod Organizer profile and toggle mods based on VRAM, screen
/// aspect ratio and system language.
#[derive(Debug, Parser)]
#[command(name = "profile-assistant", author, version, about)]
struct Cli {
    /// Mod Organizer 2 directory (holds ModOrganizer.ini)
    #[arg(long, value_name = "DIR")]
    mo2_dir: Option<Utf8PathBuf>,

    /// Rule file [default: <MO2>/plugins/ProfileAssistant/config.ini]
    #[arg(long, value_name = "FILE")]
    rule_file: Option<Utf8PathBuf>,

    /// Directory containing ProfileAssistant.yaml
    #[arg(long, value_name = "DIR", default_value = ".")]
    config_dir: Utf8PathBuf,

    /// Log directory [default: <MO2>/logs]
    #[arg(long, value_name = "DIR")]
    log_dir: Option<Utf8PathBuf>,

    /// VRAM in GB instead of querying the GPU
    #[arg(long, value_name = "GB")]
    vram: Option<u32>,

    /// Aspect ratio (e.g. 16:9) instead of querying the screen
    #[arg(long, value_name = "X:Y", conflicts_with = "resolution")]
    aspect_ratio: Option<String>,

    /// Screen resolution (e.g. 2560x1440) to derive the aspect ratio from
    #[arg(long, value_name = "WxH")]
    resolution: Option<String>,

    /// Language code (e.g. en) instead of the system locale
    #[arg(long, value_name = "CODE")]
    language: Option<String>,

    /// Report matching configurations without changing any file
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Also log to the console
    #[arg(long)]
    console: bool,
}

impl Cli {
    /// Fold command line flags into the loaded settings; flags win.
    fn merge_into(&self, settings: &mut AssistantSettings) {
        if self.mo2_dir.is_some() {
            settings.mo2_dir = self.mo2_dir.clone();
        }
        if self.rule_file.is_some() {
            settings.rule_file = self.rule_file.clone();
        }
        if self.log_dir.is_some() {
            settings.log_dir = self.log_dir.clone();
        }
        if self.vram.is_some() {
            settings.vram_override = self.vram;
        }
        if self.aspect_ratio.is_some() {
            settings.aspect_ratio_override = self.aspect_ratio.clone();
        }
        if self.language.is_some() {
            settings.language_override = self.language.clone();
        }
        settings.debug_mode |= self.debug;
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = ConfigManager::new(&cli.config_dir)?;
    let mut settings = config_manager.load_settings()?;
    cli.merge_into(&mut settings);

    let rule_file = settings.rule_file();
    let debug_mode = settings.debug_mode || services::read_debug_mode(&rule_file);
    let _guard =
        profile_assistant::logging::setup_logging(&settings.log_dir(), LOG_FILE, debug_mode, cli.console)?;

    let info = PluginInfo::new();
    tracing::info!("Starting {} v{} ({})", APP_NAME, VERSION, info.localized_name);
    tracing::debug!("Icon: {}", info.icon(&settings));

    let probe = SystemProbe::new();
    let mut overrides = Overrides {
        vram_gb: settings.vram_override,
        aspect_ratio: settings.aspect_ratio_override.clone(),
        system_language: settings.language_override.clone(),
    };
    if let Some(resolution) = &cli.resolution {
        let Some((width, height)) = probe.parse_resolution(resolution) else {
            bail!("Invalid resolution {:?}, expected <width>x<height>", resolution);
        };
        overrides.aspect_ratio = Some(models::screen_ratio(width, height));
    }

    let facts = services::collect_facts(&probe as &dyn EnvironmentProbe, &overrides);
    tracing::info!("Initialized. {}", facts);

    let rules = services::load_configurations(&rule_file)?;
    let manager = ProfileManager::new(&settings.mo2_dir());

    let assistant = ProfileAssistant::new(facts, rules).dry_run(cli.dry_run);
    let report = assistant.set_configuration(&manager);

    if cli.dry_run {
        for applied in &report.applied {
            tracing::info!(
                "[dry run] {}: profile {:?}, {} to enable, {} to disable",
                applied.configuration,
                applied.profile,
                applied.enabled,
                applied.disabled
            );
        }
    }

    if !report.failed.is_empty() {
        tracing::warn!(
            "{} configuration(s) could not be applied: {:?}",
            report.failed.len(),
            report.failed.iter().map(|(name, _)| name).collect::<Vec<_>>()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_override_settings() {
        let cli = Cli::parse_from([
            "profile-assistant",
            "--mo2-dir",
            "/mo2",
            "--vram",
            "6",
            "--language",
            "pl",
            "--debug",
        ]);

        let mut settings = AssistantSettings {
            vram_override: Some(12),
            aspect_ratio_override: Some("21:9".to_string()),
            ..AssistantSettings::default()
        };
        cli.merge_into(&mut settings);

        assert_eq!(settings.mo2_dir, Some(Utf8PathBuf::from("/mo2")));
        assert_eq!(settings.vram_override, Some(6));
        assert_eq!(settings.aspect_ratio_override.as_deref(), Some("21:9"));
        assert_eq!(settings.language_override.as_deref(), Some("pl"));
        assert!(settings.debug_mode);
    }

    #[test]
    fn test_aspect_ratio_conflicts_with_resolution() {
        let result = Cli::try_parse_from([
            "profile-assistant",
            "--aspect-ratio",
            "16:9",
            "--resolution",
            "1920x1080",
        ]);
        assert!(result.is_err());
    }
}
