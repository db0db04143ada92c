//! Sequential runner over the registered target integrations.
//!
//! Integrations are mutually independent; they run one after another in
//! registration order (theme-file targets, then patch targets, then
//! process reloads) purely so status lines read predictably. Every
//! error is caught at the integration boundary and recorded, never
//! propagated.

use tracing::{error, info, warn};

use crate::targets::TargetIntegration;
use crate::tokens::SemanticTokens;

/// What happened to one integration during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetStatus {
    /// `apply` completed.
    Applied,
    /// Precondition false: the target is not installed here.
    Skipped,
    /// `apply` reported an error, carried as a human-readable reason.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct TargetOutcome {
    pub name: String,
    pub status: TargetStatus,
}

/// Aggregate result of one sync run.
///
/// The installed target set varies per machine, so absent targets never
/// fail a run: success means at least one integration actually applied.
#[derive(Debug, Clone)]
pub struct SyncResult {
    pub outcomes: Vec<TargetOutcome>,
}

impl SyncResult {
    pub fn success(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| o.status == TargetStatus::Applied)
    }

    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }

    fn count(&self, want: fn(&TargetStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| want(&o.status)).count()
    }
}

/// Run every integration in order against one token set.
pub fn run(
    integrations: &[Box<dyn TargetIntegration>],
    tokens: &SemanticTokens,
) -> SyncResult {
    let mut outcomes = Vec::with_capacity(integrations.len());

    for integration in integrations {
        let name = integration.name().to_string();

        if !integration.precondition() {
            info!(target_name = %name, "Target not present, skipping");
            outcomes.push(TargetOutcome {
                name,
                status: TargetStatus::Skipped,
            });
            continue;
        }

        match integration.apply(tokens) {
            Ok(()) => {
                info!(target_name = %name, "Applied");
                outcomes.push(TargetOutcome {
                    name,
                    status: TargetStatus::Applied,
                });
            }
            Err(e) => {
                warn!(target_name = %name, error = %e, "Apply failed");
                outcomes.push(TargetOutcome {
                    name,
                    status: TargetStatus::Failed(e.to_string()),
                });
            }
        }
    }

    let result = SyncResult { outcomes };
    let applied = result.count(|s| matches!(s, TargetStatus::Applied));
    let skipped = result.count(|s| matches!(s, TargetStatus::Skipped));
    let failed = result.count(|s| matches!(s, TargetStatus::Failed(_)));

    if result.success() {
        info!(applied, skipped, failed, "Theme applied");
    } else {
        error!(applied, skipped, failed, "Theme apply failed on every target");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::palette::Palette;

    struct FakeTarget {
        name: &'static str,
        present: bool,
        succeed: bool,
    }

    impl TargetIntegration for FakeTarget {
        fn name(&self) -> &str {
            self.name
        }

        fn precondition(&self) -> bool {
            self.present
        }

        fn apply(&self, _tokens: &SemanticTokens) -> crate::error::Result<()> {
            if self.succeed {
                Ok(())
            } else {
                Err(SyncError::write_failed(
                    self.name,
                    std::io::Error::other("simulated"),
                ))
            }
        }
    }

    fn fake(name: &'static str, present: bool, succeed: bool) -> Box<dyn TargetIntegration> {
        Box::new(FakeTarget {
            name,
            present,
            succeed,
        })
    }

    fn tokens() -> SemanticTokens {
        SemanticTokens::derive(&Palette::nothing())
    }

    #[test]
    fn test_skips_do_not_fail_the_run() {
        let integrations = vec![
            fake("a", false, true),
            fake("b", false, true),
            fake("c", false, true),
            fake("d", true, true),
            fake("e", true, true),
        ];
        let result = run(&integrations, &tokens());

        assert!(result.success());
        assert_eq!(result.exit_code(), 0);
        assert_eq!(result.outcomes[0].status, TargetStatus::Skipped);
        assert_eq!(result.outcomes[3].status, TargetStatus::Applied);
    }

    #[test]
    fn test_all_failed_or_absent_is_a_failed_run() {
        let integrations = vec![
            fake("a", false, true),
            fake("b", true, false),
            fake("c", true, false),
        ];
        let result = run(&integrations, &tokens());

        assert!(!result.success());
        assert_eq!(result.exit_code(), 1);
        assert!(matches!(
            result.outcomes[1].status,
            TargetStatus::Failed(_)
        ));
    }

    #[test]
    fn test_all_skipped_is_a_failed_run() {
        let integrations = vec![fake("a", false, true), fake("b", false, true)];
        let result = run(&integrations, &tokens());
        assert!(!result.success());
        assert_eq!(result.exit_code(), 1);
    }

    #[test]
    fn test_one_success_among_failures_is_enough() {
        let integrations = vec![
            fake("a", true, false),
            fake("b", true, true),
            fake("c", true, false),
        ];
        let result = run(&integrations, &tokens());
        assert!(result.success());
    }

    #[test]
    fn test_failure_reason_is_recorded() {
        let integrations = vec![fake("a", true, false)];
        let result = run(&integrations, &tokens());
        match &result.outcomes[0].status {
            TargetStatus::Failed(reason) => assert!(reason.contains("a")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_outcomes_preserve_registration_order() {
        let integrations = vec![
            fake("first", true, true),
            fake("second", false, true),
            fake("third", true, false),
        ];
        let result = run(&integrations, &tokens());
        let names: Vec<&str> = result.outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }
}
