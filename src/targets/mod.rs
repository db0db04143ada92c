//! Target integrations: one unit per external consumer of the derived
//! tokens.
//!
//! Each integration is independent — it owns its own file path or
//! process handle and never touches shared mutable state. The
//! orchestrator checks `precondition` first (false means the target is
//! not installed here: skipped, not failed) and catches every `apply`
//! error at this boundary.

pub mod gemini;
pub mod reload;
pub mod vscode;
pub mod wal_cache;
pub mod zed;

use crate::error::Result;
use crate::tokens::SemanticTokens;

/// One external consumer of semantic tokens.
///
/// Write strategies vary per implementor: full-document rewrite for
/// files this system exclusively owns, scoped patches for documents
/// shared with the user, and plain signals for process-reload targets.
pub trait TargetIntegration {
    /// Short name used in status lines.
    fn name(&self) -> &str;

    /// Whether the target is present on this machine (its config
    /// location exists, or its process is running).
    fn precondition(&self) -> bool;

    /// Perform the write/patch/signal for this target.
    fn apply(&self, tokens: &SemanticTokens) -> Result<()>;
}
