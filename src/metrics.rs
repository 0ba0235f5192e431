// Run metrics module
//
// Counts what a single assistant run evaluated and changed, for the log summary.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Counters for one pass over the configurations.
///
/// Recording takes `&self` so the orchestrator can hand out shared
/// references while it applies configurations.
#[derive(Debug)]
pub struct RunMetrics {
    /// Configurations checked against the environment
    pub configurations_evaluated: AtomicUsize,

    /// Configurations whose predicates all matched
    pub configurations_matched: AtomicUsize,

    /// Matched configurations applied without a fatal error
    pub configurations_applied: AtomicUsize,

    /// Matched configurations whose apply step failed
    pub configurations_failed: AtomicUsize,

    /// Profile switches performed
    pub profile_switches: AtomicUsize,

    /// Mods written as enabled, summed over all configurations
    pub mods_enabled: AtomicUsize,

    /// Mods written as disabled, summed over all configurations
    pub mods_disabled: AtomicUsize,

    /// Non-fatal problems (missing profiles or mod lists)
    pub warnings: AtomicUsize,

    start_time: Instant,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self {
            configurations_evaluated: AtomicUsize::new(0),
            configurations_matched: AtomicUsize::new(0),
            configurations_applied: AtomicUsize::new(0),
            configurations_failed: AtomicUsize::new(0),
            profile_switches: AtomicUsize::new(0),
            mods_enabled: AtomicUsize::new(0),
            mods_disabled: AtomicUsize::new(0),
            warnings: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_evaluated(&self, matched: bool) {
        self.configurations_evaluated.fetch_add(1, Ordering::Relaxed);
        if matched {
            self.configurations_matched.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_applied(&self, profile_switched: bool, enabled: usize, disabled: usize, warnings: usize) {
        self.configurations_applied.fetch_add(1, Ordering::Relaxed);
        if profile_switched {
            self.profile_switches.fetch_add(1, Ordering::Relaxed);
        }
        self.mods_enabled.fetch_add(enabled, Ordering::Relaxed);
        self.mods_disabled.fetch_add(disabled, Ordering::Relaxed);
        self.warnings.fetch_add(warnings, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.configurations_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Time since the run started
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn log_summary(&self) {
        tracing::info!(
            "Configurations: {} evaluated, {} matched, {} applied, {} failed",
            self.configurations_evaluated.load(Ordering::Relaxed),
            self.configurations_matched.load(Ordering::Relaxed),
            self.configurations_applied.load(Ordering::Relaxed),
            self.configurations_failed.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Profile switches: {}, mods enabled: {}, mods disabled: {}, warnings: {}",
            self.profile_switches.load(Ordering::Relaxed),
            self.mods_enabled.load(Ordering::Relaxed),
            self.mods_disabled.load(Ordering::Relaxed),
            self.warnings.load(Ordering::Relaxed)
        );
        tracing::debug!("Applying configuration. Time: {:.3}s.", self.elapsed().as_secs_f64());
    }
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_metrics_creation() {
        let metrics = RunMetrics::new();
        assert_eq!(metrics.configurations_evaluated.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.configurations_applied.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_record_evaluated() {
        let metrics = RunMetrics::new();

        metrics.record_evaluated(true);
        metrics.record_evaluated(false);
        metrics.record_evaluated(true);

        assert_eq!(metrics.configurations_evaluated.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.configurations_matched.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_record_applied_and_failed() {
        let metrics = RunMetrics::new();

        metrics.record_applied(true, 3, 1, 0);
        metrics.record_applied(false, 2, 0, 1);
        metrics.record_failed();

        assert_eq!(metrics.configurations_applied.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.configurations_failed.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.profile_switches.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.mods_enabled.load(Ordering::Relaxed), 5);
        assert_eq!(metrics.mods_disabled.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.warnings.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_elapsed() {
        let metrics = RunMetrics::new();
        thread::sleep(Duration::from_millis(10));
        assert!(metrics.elapsed().as_millis() >= 10);
    }
}
