use thiserror::Error;
use tracing::{error, warn};

/// Domain-specific errors for theme synchronization.
///
/// Everything here is caught at the integration boundary by the
/// orchestrator and reported as a per-target outcome; nothing is
/// allowed to propagate past it as a panic.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The wallpaper-extraction cache is missing or corrupt. Callers
    /// skip dynamic-palette work instead of crashing the run.
    #[error("palette cache unavailable: {0}")]
    PaletteUnavailable(String),

    /// I/O or subprocess failure while applying a target.
    #[error("write to {target} failed: {source}")]
    TargetWriteFailed {
        target: String,
        #[source]
        source: anyhow::Error,
    },

    /// A scoped text patch found no region to replace. The document is
    /// left byte-identical.
    #[error("patch region not found in {path}: {pattern}")]
    PatchRegionNotFound { path: String, pattern: String },

    /// An external command exited nonzero or could not be spawned.
    #[error("command `{command}` failed: {message}")]
    CommandFailed { command: String, message: String },
}

impl SyncError {
    /// Wrap an arbitrary error as a write failure against `target`.
    pub fn write_failed(target: &str, source: impl Into<anyhow::Error>) -> Self {
        SyncError::TargetWriteFailed {
            target: target.to_string(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

/// Extension trait for log-and-continue call sites with caller
/// location tracking.
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for
    /// recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for
    /// expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?err,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?err,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_target() {
        let err = SyncError::write_failed("zed", std::io::Error::other("disk full"));
        assert!(err.to_string().contains("zed"));

        let err = SyncError::PatchRegionNotFound {
            path: "settings.json".into(),
            pattern: "\"theme\"".into(),
        };
        assert!(err.to_string().contains("settings.json"));
    }

    #[test]
    fn test_log_err_maps_to_option() {
        let ok: std::result::Result<i32, String> = Ok(7);
        assert_eq!(ok.log_err(), Some(7));

        let err: std::result::Result<i32, String> = Err("boom".into());
        assert_eq!(err.log_err(), None);
        let err: std::result::Result<i32, String> = Err("boom".into());
        assert_eq!(err.warn_on_err(), None);
    }
}
