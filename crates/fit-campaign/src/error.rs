//! Error type for the Campaign Engine.

use fit_sampling::SamplingError;
use fit_types::FitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CampaignError {
    /// A campaign row failed target classification or bucket grouping
    /// (spec.md §7 "Configuration errors").
    #[error(transparent)]
    DataModel(#[from] FitError),

    /// A bucket's sampling distributions were malformed (spec.md §7
    /// "Configuration errors").
    #[error(transparent)]
    Sampling(#[from] SamplingError),

    /// `injector` was empty; there is nothing to sample.
    #[error("campaign has no injector rows")]
    EmptyCampaign,
}
