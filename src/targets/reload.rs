//! Process-reload integrations: targets with no document to write.
//!
//! Both repaint themselves from the palette cache on reload, so they
//! run after the file and patch targets. Precondition is a live
//! process; apply is a fire-and-forget command judged by exit status.

use tracing::info;

use crate::error::Result;
use crate::process::{is_running, run_checked};
use crate::targets::TargetIntegration;
use crate::tokens::SemanticTokens;

/// Window-border drawing service, restarted through its service
/// manager because it has no reload signal.
pub struct BordersRestart;

impl TargetIntegration for BordersRestart {
    fn name(&self) -> &str {
        "borders"
    }

    fn precondition(&self) -> bool {
        is_running("borders")
    }

    fn apply(&self, _tokens: &SemanticTokens) -> Result<()> {
        info!("Restarting borders");
        run_checked("brew", &["services", "restart", "borders"])
    }
}

/// Status bar with a first-class reload command.
pub struct SketchybarReload;

impl TargetIntegration for SketchybarReload {
    fn name(&self) -> &str {
        "sketchybar"
    }

    fn precondition(&self) -> bool {
        is_running("sketchybar")
    }

    fn apply(&self, _tokens: &SemanticTokens) -> Result<()> {
        info!("Reloading sketchybar");
        run_checked("sketchybar", &["--reload"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_stable() {
        assert_eq!(BordersRestart.name(), "borders");
        assert_eq!(SketchybarReload.name(), "sketchybar");
    }

    // Preconditions depend on the live process table; on a machine
    // without these services they must report "absent" rather than
    // error.
    #[test]
    fn test_precondition_without_service_is_false() {
        if !is_running("borders") {
            assert!(!BordersRestart.precondition());
        }
        if !is_running("sketchybar") {
            assert!(!SketchybarReload.precondition());
        }
    }

    #[cfg(feature = "system-tests")]
    #[test]
    fn test_sketchybar_reload_roundtrip() {
        if SketchybarReload.precondition() {
            let tokens = SemanticTokens::derive(&crate::palette::Palette::nothing());
            SketchybarReload.apply(&tokens).unwrap();
        }
    }
}
