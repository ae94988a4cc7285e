//! Errors raised constructing a [`crate::Distribution`] or [`crate::Stencil`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SamplingError {
    /// A `Fixed` distribution's weights did not sum to 1.0 within 1e-6
    /// (spec.md §4.1).
    #[error("Fixed distribution weights must sum to 1.0 within 1e-6, got {0}")]
    WeightsNotNormalized(f64),

    /// A `Fixed` distribution was constructed with zero cases.
    #[error("Fixed distribution needs at least one case")]
    EmptyCases,

    /// A stencil was constructed with an empty pattern list (spec.md §4.2
    /// precondition: `len(patterns) >= 1`).
    #[error("Stencil needs at least one pattern")]
    EmptyPatterns,

    /// A stencil's pattern list length didn't match its pattern
    /// distribution's length (spec.md §4.2 precondition:
    /// `len(patterns) - 1 == pattern_distribution.length()`).
    #[error(
        "Stencil pattern count {patterns} doesn't match pattern_distribution.length() {distribution_length} (expected patterns - 1)"
    )]
    PatternCountMismatch {
        patterns: usize,
        distribution_length: i64,
    },

    /// `word_bytes` was zero.
    #[error("word_bytes must be nonzero")]
    ZeroWordBytes,
}
