//! [`RunRecord`] — spec.md §3: `{ result, observed }`, plus the reserved
//! result labels (`exit`, `unknown`, `Timeout`) that are never resolvable to
//! a user breakpoint (spec.md §4.7).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::FitError;
use crate::target::TargetLabel;

/// Reserved result label: the inferior exited normally.
pub const RESULT_EXIT: &str = "exit";
/// Reserved result label: no condition fired before a non-blocking poll
/// returned.
pub const RESULT_UNKNOWN: &str = "unknown";
/// Reserved result label: the per-iteration blocking run was cancelled by
/// the timeout.
pub const RESULT_TIMEOUT: &str = "Timeout";

/// A single observed value for a tracked target: either a scalar (a
/// register or single-word read) or a list (a multi-word range read).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunResult {
    Scalar(i64),
    List(Vec<i64>),
}

/// One run's outcome: which named event (or reserved label) the run
/// resolved to, and the snapshot of every tracked target (spec.md §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub result: String,
    pub observed: BTreeMap<TargetLabel, RunResult>,
}

impl RunRecord {
    #[must_use]
    pub fn new(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            observed: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, label: impl Into<TargetLabel>, value: RunResult) {
        self.observed.insert(label.into(), value);
    }

    /// The set of observed-target labels, in sorted order (stable because
    /// `observed` is a `BTreeMap`).
    #[must_use]
    pub fn key_set(&self) -> Vec<TargetLabel> {
        self.observed.keys().cloned().collect()
    }

    /// Verify this record's key set matches `golden`'s exactly (spec.md §3:
    /// "first-write-wins, later mismatch is fatal"; spec.md §4.6 "Key-set
    /// invariant").
    pub fn check_key_set_matches(&self, golden: &RunRecord) -> Result<(), FitError> {
        let expected = golden.key_set();
        let actual = self.key_set();
        if expected != actual {
            return Err(FitError::KeySetDrift { expected, actual });
        }
        Ok(())
    }
}
