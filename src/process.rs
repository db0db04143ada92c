//! Process-existence checks and checked subprocess invocation.
//!
//! Integrations only depend on the boolean `is_running` capability and
//! on `run_checked`'s success/failure outcome, never on how either is
//! obtained.

use std::process::Command;

use sysinfo::System;
use tracing::debug;

use crate::error::SyncError;

/// Check whether a process with exactly `name` is in the process
/// table (the equivalent of `pgrep -x`).
pub fn is_running(name: &str) -> bool {
    let mut system = System::new();
    system.refresh_processes(sysinfo::ProcessesToUpdate::All, true);
    let found = system
        .processes()
        .values()
        .any(|p| p.name().to_string_lossy() == name);
    debug!(process = name, found, "Process check");
    found
}

/// Run an external command and treat a nonzero exit as an error,
/// carrying the command line and captured stderr in the message.
///
/// All collaborators here are local commands; each run is bounded by
/// the command's own completion, and output is captured rather than
/// inherited so sync status lines stay readable.
pub fn run_checked(program: &str, args: &[&str]) -> Result<(), SyncError> {
    let rendered = if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    };

    let output = Command::new(program).args(args).output().map_err(|e| {
        SyncError::CommandFailed {
            command: rendered.clone(),
            message: e.to_string(),
        }
    })?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(SyncError::CommandFailed {
            command: rendered,
            message: format!(
                "exit status {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_checked_success() {
        assert!(run_checked("true", &[]).is_ok());
    }

    #[test]
    fn test_run_checked_nonzero_exit() {
        let err = run_checked("false", &[]).unwrap_err();
        assert!(matches!(err, SyncError::CommandFailed { .. }));
    }

    #[test]
    fn test_run_checked_missing_binary() {
        let err = run_checked("definitely-not-a-real-binary-xyz", &[]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("definitely-not-a-real-binary-xyz"));
    }

    #[test]
    fn test_is_running_absent_process() {
        assert!(!is_running("definitely-not-a-real-process-xyz"));
    }

    // Checking for our own process requires a live process table; the
    // name reported for test binaries varies per platform, so only the
    // negative case runs unconditionally.
    #[cfg(feature = "system-tests")]
    #[test]
    fn test_is_running_finds_init() {
        assert!(is_running("launchd") || is_running("systemd") || is_running("init"));
    }
}
