use std::fmt;

use serde::Serialize;

use crate::errors::{GraphError, Result};

/// Lifecycle of a graph build
///
/// `Succeeded` and `Failed` are terminal; a failed build is never retried
/// in place, callers start again from a fresh graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildPhase {
    Idle,
    Pass1Running,
    Pass1Complete,
    Pass2Running,
    Succeeded,
    Failed,
}

impl BuildPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, BuildPhase::Succeeded | BuildPhase::Failed)
    }

    fn can_transition_to(self, next: BuildPhase) -> bool {
        use BuildPhase::*;
        matches!(
            (self, next),
            (Idle, Pass1Running)
                | (Pass1Running, Pass1Complete)
                | (Pass1Running, Failed)
                | (Pass1Complete, Pass2Running)
                | (Pass2Running, Succeeded)
                | (Pass2Running, Failed)
        )
    }
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BuildPhase::Idle => "idle",
            BuildPhase::Pass1Running => "pass1_running",
            BuildPhase::Pass1Complete => "pass1_complete",
            BuildPhase::Pass2Running => "pass2_running",
            BuildPhase::Succeeded => "succeeded",
            BuildPhase::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Build state snapshot: the current phase plus every error recorded so far
#[derive(Debug, Clone, PartialEq)]
pub struct BuildState {
    phase: BuildPhase,
    errors: Vec<GraphError>,
}

impl Default for BuildState {
    fn default() -> Self {
        Self {
            phase: BuildPhase::Idle,
            errors: Vec::new(),
        }
    }
}

impl BuildState {
    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    /// Errors in the order they were recorded
    pub fn errors(&self) -> &[GraphError] {
        &self.errors
    }

    pub fn has_succeeded(&self) -> bool {
        self.phase == BuildPhase::Succeeded
    }

    pub fn has_failed(&self) -> bool {
        self.phase == BuildPhase::Failed
    }

    /// Move to `next`
    ///
    /// # Errors
    ///
    /// Returns `Internal` for a transition the lifecycle does not allow.
    pub(crate) fn transition(&mut self, next: BuildPhase) -> Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(GraphError::Internal {
                message: format!("illegal build transition {} -> {}", self.phase, next),
            });
        }
        self.phase = next;
        Ok(())
    }

    pub(crate) fn record(&mut self, error: GraphError) {
        self.errors.push(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut state = BuildState::default();
        for next in [
            BuildPhase::Pass1Running,
            BuildPhase::Pass1Complete,
            BuildPhase::Pass2Running,
            BuildPhase::Succeeded,
        ] {
            state.transition(next).unwrap();
        }
        assert!(state.has_succeeded());
        assert!(state.phase().is_terminal());
    }

    #[test]
    fn test_no_retry_from_failed() {
        let mut state = BuildState::default();
        state.transition(BuildPhase::Pass1Running).unwrap();
        state.transition(BuildPhase::Failed).unwrap();
        assert!(state.transition(BuildPhase::Pass1Running).is_err());
        assert!(state.transition(BuildPhase::Pass2Running).is_err());
        assert!(state.has_failed());
    }

    #[test]
    fn test_cannot_skip_pass1() {
        let mut state = BuildState::default();
        assert!(matches!(
            state.transition(BuildPhase::Pass2Running),
            Err(GraphError::Internal { .. })
        ));
        assert_eq!(state.phase(), BuildPhase::Idle);
    }
}
