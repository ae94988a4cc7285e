//! Error type for the Run Controller.

use fit_campaign::CampaignError;
use fit_mi::AdapterError;
use fit_target::TargetError;
use fit_types::FitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    /// A campaign configuration or sampling failure (spec.md §7
    /// "Configuration errors").
    #[error(transparent)]
    Campaign(#[from] CampaignError),

    /// A direct Debugger Adapter transaction failed (reset, set_event, run,
    /// interrupt) — spec.md §7 "Debugger protocol errors" / "I/O errors".
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// A target classification, resolution, or Target Surface transaction
    /// failed (spec.md §7 "Debugger protocol errors" / "I/O errors").
    #[error(transparent)]
    Target(#[from] TargetError),

    /// The run log and golden record disagreed on their observed-target key
    /// set (spec.md §7 "Key-set drift between golden and run").
    #[error(transparent)]
    KeySet(#[from] FitError),

    /// A blocking run was cancelled by the timeout, but the forced
    /// `interrupt` that must follow it also failed — spec.md §5: "failure to
    /// do so is fatal for the campaign".
    #[error("timeout recovery failed: could not interrupt the inferior after cancelling a blocking run ({0})")]
    InterruptAfterTimeoutFailed(String),

    /// The adapter returned an outcome the calling protocol step never
    /// expects (e.g. a blocking `run` resolving to `StillRunning`) — a
    /// contract violation in the layer below, not a recoverable condition.
    #[error("adapter violated its contract: {0}")]
    ProtocolInvariantViolated(&'static str),
}
