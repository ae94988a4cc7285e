//! Shared error type for the data-model layer.

use thiserror::Error;

/// Errors raised while constructing or validating core data-model values.
#[derive(Debug, Error)]
pub enum FitError {
    /// A textual target (see [`crate::target::parse_target`]) did not match any
    /// of the grammar's shapes.
    #[error("could not classify target text {0:?}")]
    UnclassifiedTarget(String),

    /// A range target had its high bound at or below its low bound.
    #[error("range target {0:#x}:{1:#x} is empty or inverted")]
    EmptyRange(u64, u64),

    /// `Fixed` distribution weights, or value-probability weights within a
    /// campaign-row bucket, did not sum to 1.0 within tolerance.
    #[error("probabilities must sum to 1.0 within 1e-6, got {0}")]
    ProbabilitiesNotNormalized(f64),

    /// A campaign row declared `(Target, Operation)` with a different
    /// `op_prob` than a previous row sharing the same key.
    #[error("operation bucket for ({target}, {operation:?}) already has op_prob {first}, row gives {second}")]
    OpProbMismatch {
        target: String,
        operation: Operation,
        first: f64,
        second: f64,
    },

    /// Two `RunRecord`s (or a `RunRecord` and the golden run) disagree on their
    /// observed-target key set.
    #[error("run record key set drift: expected {expected:?}, got {actual:?}")]
    KeySetDrift {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// A pairwise `WordList` operator was given two operands of different
    /// length (spec.md §4.4: "length mismatch is fatal").
    #[error("word list length mismatch: {0} vs {1}")]
    WordListLengthMismatch(usize, usize),
}
