use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup logging to `<log_dir>/<file_name>`, with optional console output.
///
/// The log file is truncated on every start so it only holds the last run.
///
/// # Arguments
/// * `log_dir` - Directory for the log file (e.g., `<MO2>/logs`)
/// * `file_name` - Log file name (e.g., "ProfileAssistant.log")
/// * `debug_mode` - If true, use debug level; otherwise use info level
/// * `console_output` - If true, also log to the console
///
/// # Returns
/// A guard that must be held for the duration of the program to keep logging active
pub fn setup_logging(
    log_dir: &Utf8Path,
    file_name: &str,
    debug_mode: bool,
    console_output: bool,
) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    prepare_log_file(log_dir, file_name)?;

    let file_appender = rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = if debug_mode {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // No ANSI codes in log files
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    if console_output {
        let console_layer = tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(console_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;
    }

    if debug_mode {
        tracing::info!("Debug mode enabled.");
    }
    tracing::debug!(
        "Logging initialized: dir={}, file={}, console={}",
        log_dir,
        file_name,
        console_output
    );

    Ok(guard)
}

/// Create `log_dir` if needed and empty the log file.
fn prepare_log_file(log_dir: &Utf8Path, file_name: &str) -> Result<()> {
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }

    let log_path = log_dir.join(file_name);
    fs::File::create(&log_path)
        .with_context(|| format!("Failed to create log file: {}", log_path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_log_file_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = Utf8PathBuf::try_from(temp_dir.path().join("logs")).unwrap();

        prepare_log_file(&log_dir, "ProfileAssistant.log").unwrap();

        assert!(log_dir.join("ProfileAssistant.log").is_file());
    }

    #[test]
    fn test_prepare_log_file_truncates() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let log_path = log_dir.join("ProfileAssistant.log");
        fs::write(&log_path, "previous run\n").unwrap();

        prepare_log_file(&log_dir, "ProfileAssistant.log").unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }
}
