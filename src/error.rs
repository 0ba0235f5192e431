use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while loading, matching and applying configurations.
///
/// Only [`AssistantError::Io`] and [`AssistantError::MissingFile`] abort the
/// apply step of a configuration. Everything else is recorded, logged and
/// skipped so that the rest of the run can continue.
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Aspect ratio dimensions must be non-zero (got {x}:{y})")]
    InvalidAspectRatio { x: i64, y: i64 },

    #[error("Invalid value {value:?} for {field}")]
    Parse { field: &'static str, value: String },

    #[error("Configuration {configuration} references missing profile {profile}")]
    MissingProfile {
        configuration: String,
        profile: String,
    },

    #[error("Configuration {configuration} references missing mod list {group}")]
    MissingModList {
        configuration: String,
        group: String,
    },

    #[error("File not found: {0}")]
    MissingFile(Utf8PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AssistantError {
    /// Wrap an I/O error, turning `NotFound` into [`AssistantError::MissingFile`].
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::MissingFile(path)
        } else {
            Self::Io { path, source }
        }
    }
}

pub type Result<T, E = AssistantError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_becomes_missing_file() {
        let err = AssistantError::io(
            "profiles/Default/modlist.txt",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, AssistantError::MissingFile(_)));
    }

    #[test]
    fn test_other_io_errors_keep_source() {
        let err = AssistantError::io(
            "ModOrganizer.ini",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, AssistantError::Io { .. }));
        assert!(err.to_string().contains("ModOrganizer.ini"));
    }
}
