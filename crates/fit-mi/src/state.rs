//! Inferior execution state machine (spec.md §3 "Inferior state", §4.3
//! "State machine").

use crate::error::AdapterError;

/// The debugger adapter's view of the inferior's execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferiorState {
    /// Before the first `reset`.
    Starting,
    /// Executing; memory/register access and `set_event`/`run`/`close` are
    /// all invalid.
    Running,
    /// Stopped (breakpoint, signal, or interrupt); the only state in which
    /// memory/register access, `set_event`, `run`, and `close` are valid.
    Interrupted,
    /// The inferior ran to completion (`exited-normally`).
    Exited,
}

impl InferiorState {
    /// Fail with [`AdapterError::InvalidState`] unless `self` is one of
    /// `allowed`.
    pub fn require_one_of(self, allowed: &[InferiorState], op: &'static str) -> Result<(), AdapterError> {
        if allowed.contains(&self) {
            Ok(())
        } else {
            Err(AdapterError::InvalidState { op, state: self })
        }
    }

    /// Fail with [`AdapterError::InvalidState`] if `self` is [`InferiorState::Running`].
    pub fn require_not_running(self, op: &'static str) -> Result<(), AdapterError> {
        self.require_one_of(
            &[InferiorState::Starting, InferiorState::Interrupted, InferiorState::Exited],
            op,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_access_valid_only_when_not_running() {
        assert!(InferiorState::Interrupted.require_not_running("read_memory").is_ok());
        assert!(InferiorState::Running.require_not_running("read_memory").is_err());
    }

    #[test]
    fn interrupt_valid_only_when_running() {
        assert!(InferiorState::Running.require_one_of(&[InferiorState::Running], "interrupt").is_ok());
        assert!(
            InferiorState::Interrupted
                .require_one_of(&[InferiorState::Running], "interrupt")
                .is_err()
        );
    }

    #[test]
    fn every_invalid_pair_fails_every_valid_pair_succeeds() {
        let states = [
            InferiorState::Starting,
            InferiorState::Running,
            InferiorState::Interrupted,
            InferiorState::Exited,
        ];
        for &s in &states {
            let not_running = s.require_not_running("op");
            if s == InferiorState::Running {
                assert!(not_running.is_err());
            } else {
                assert!(not_running.is_ok());
            }
        }
    }
}
