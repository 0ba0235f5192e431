//! The matching pass: evaluate every configuration and apply the matches.
//!
//! Configurations are applied in rule-file order, each on top of the
//! previous one, with no rollback. A later configuration that selects a
//! profile therefore wins, and its mod changes go to that profile's
//! `modlist.txt`.

use crate::error::{AssistantError, Result};
use crate::metrics::RunMetrics;
use crate::models::{Configuration, EnvironmentFacts};
use crate::services::loader::RuleSet;
use crate::services::modlist;
use crate::services::profile::ProfileManager;
use indexmap::IndexMap;

/// What applying one configuration did.
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub configuration: String,
    /// Profile that was selected, if the configuration switched profiles.
    pub profile: Option<String>,
    pub enabled: usize,
    pub disabled: usize,
    /// True if `modlist.txt` was rewritten.
    pub modlist_written: bool,
    /// Non-fatal problems: missing profiles and mod lists.
    pub errors: Vec<AssistantError>,
}

/// Outcome of a full pass.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Names of the configurations whose predicates matched, in order.
    pub matched: Vec<String>,
    pub applied: Vec<ApplyReport>,
    /// Configurations whose apply step failed, with the error.
    pub failed: Vec<(String, AssistantError)>,
}

/// Apply `config`: switch profile, then enable/disable its mods.
///
/// Missing profiles and mod lists are recorded in the report and skipped.
/// With `dry_run` nothing is written.
///
/// # Errors
/// Fails if `ModOrganizer.ini` or the selected profile's `modlist.txt`
/// cannot be read or written.
pub fn apply_configuration(
    config: &Configuration,
    profiles: &[String],
    mod_lists: &IndexMap<String, Vec<String>>,
    manager: &ProfileManager,
    dry_run: bool,
) -> Result<ApplyReport> {
    let mut report = ApplyReport {
        configuration: config.name.clone(),
        ..ApplyReport::default()
    };
    let mut info = format!("Settings {} activated.", config.name);

    if let Some(profile) = &config.profile {
        if profiles.contains(profile) {
            info.push_str(&format!(" Profile {}.", profile));
            if !dry_run {
                manager.change_profile(profile)?;
            }
            report.profile = Some(profile.clone());
        } else {
            let err = AssistantError::MissingProfile {
                configuration: config.name.clone(),
                profile: profile.clone(),
            };
            tracing::error!("{}", err);
            report.errors.push(err);
        }
    }

    let mut resolved = config.resolve_mods(mod_lists);
    for err in resolved.errors.drain(..) {
        tracing::error!("{}", err);
        report.errors.push(err);
    }

    if resolved.is_empty() {
        tracing::debug!("Settings {} has no mods to enable or disable.", config.name);
        tracing::info!("{}", info);
        return Ok(report);
    }

    tracing::debug!(
        "Enabled mods: {:?}. Disabled mods: {:?}.",
        resolved.enabled,
        resolved.disabled
    );
    tracing::info!(
        "{} Enabled mods: {}, Disabled mods: {}.",
        info,
        resolved.enabled.len(),
        resolved.disabled.len()
    );

    report.enabled = resolved.enabled.len();
    report.disabled = resolved.disabled.len();

    if !dry_run {
        modlist::modify_modlist_file(&manager.modlist_file(), &resolved.enabled, &resolved.disabled)?;
        report.modlist_written = true;
    }

    Ok(report)
}

/// Runs the matching pass for one environment snapshot.
pub struct ProfileAssistant {
    facts: EnvironmentFacts,
    rules: RuleSet,
    dry_run: bool,
    metrics: RunMetrics,
}

impl ProfileAssistant {
    pub fn new(facts: EnvironmentFacts, rules: RuleSet) -> Self {
        for config in &rules.configurations {
            tracing::debug!("Found configuration: {}.", config);
        }

        Self {
            facts,
            rules,
            dry_run: false,
            metrics: RunMetrics::new(),
        }
    }

    /// Only report what would change; leave every file untouched.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn facts(&self) -> &EnvironmentFacts {
        &self.facts
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Configurations matching the environment, in rule-file order.
    pub fn matching_configurations(&self) -> impl Iterator<Item = &Configuration> {
        self.rules
            .configurations
            .iter()
            .filter(|config| config.check(&self.facts))
    }

    /// Evaluate every configuration and apply each match in order.
    ///
    /// A failing configuration is logged and skipped; the pass continues.
    pub fn set_configuration(&self, manager: &ProfileManager) -> RunReport {
        tracing::info!("Environment: {}", self.facts);

        let profiles = manager.get_profiles();
        tracing::debug!("Available profiles: {:?}", profiles);

        let mut report = RunReport::default();
        for config in &self.rules.configurations {
            let matched = config.check(&self.facts);
            self.metrics.record_evaluated(matched);
            if !matched {
                continue;
            }

            tracing::debug!("Configuration {} passed tests.", config.name);
            report.matched.push(config.name.clone());

            match apply_configuration(config, &profiles, &self.rules.mod_lists, manager, self.dry_run) {
                Ok(applied) => {
                    self.metrics.record_applied(
                        applied.profile.is_some(),
                        applied.enabled,
                        applied.disabled,
                        applied.errors.len(),
                    );
                    report.applied.push(applied);
                }
                Err(e) => {
                    tracing::error!("Failed to apply configuration {}: {}", config.name, e);
                    self.metrics.record_failed();
                    report.failed.push((config.name.clone(), e));
                }
            }
        }

        self.metrics.log_summary();
        report
    }
}
