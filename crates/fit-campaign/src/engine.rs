//! [`CampaignEngine`] (spec.md §4.5, component C5): ties row grouping, target
//! classification, and the weighted [`Sampler`] together from a
//! [`fit_types::CampaignConfig`], and owns the single shared PRNG spec.md §5
//! requires ("all sampling goes through it").

use rand::SeedableRng;
use rand::rngs::StdRng;

use fit_types::{CampaignConfig, TargetLabel};

use crate::bucket::{self, OperationBucket};
use crate::error::CampaignError;
use crate::inventory::{self, TargetInventory};
use crate::logging::Emitter;
use crate::sampler::{SampledInjection, Sampler};

/// The campaign-wide sampling state: a frozen [`Sampler`], the classified
/// target inventory, and the campaign's single shared PRNG.
pub struct CampaignEngine {
    sampler: Sampler,
    inventory: TargetInventory,
    declared_targets: Vec<TargetLabel>,
    rng: StdRng,
}

impl CampaignEngine {
    /// Build the engine from a typed config: group injector rows into
    /// buckets, classify every distinct target, and seed the PRNG from
    /// `config.seed` or the OS (spec.md §6, §9 Open Questions).
    pub fn new(
        config: &CampaignConfig,
        known_registers: &[String],
        emitter: &mut dyn Emitter,
    ) -> Result<Self, CampaignError> {
        let buckets: Vec<OperationBucket> = bucket::group_rows(&config.injector)?;
        let declared_targets = declared_target_order(config);

        let bucket_targets: Vec<TargetLabel> = buckets.iter().map(|b| b.target_text.clone()).collect();
        let inventory = inventory::classify_targets(&bucket_targets, known_registers, emitter)?;

        let sampler = Sampler::new(buckets, known_registers)?;
        let rng = config.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        Ok(Self { sampler, inventory, declared_targets, rng })
    }

    #[must_use]
    pub fn inventory(&self) -> &TargetInventory {
        &self.inventory
    }

    /// Declared target labels in first-appearance order across the injector
    /// table (spec.md §6: "stable column order ... declared targets in the
    /// order they appeared in the campaign CSV").
    #[must_use]
    pub fn declared_targets(&self) -> &[TargetLabel] {
        &self.declared_targets
    }

    /// `sample_injection()` (spec.md §4.5), drawing from the engine's own
    /// shared PRNG.
    pub fn sample_injection(
        &mut self,
        target_word_bytes: u32,
        target_bit_width: u32,
    ) -> Result<SampledInjection, CampaignError> {
        self.sampler.sample_injection(&mut self.rng, target_word_bytes, target_bit_width)
    }

    /// Sample an injection delay in milliseconds, uniform over
    /// `[min_ms, max_ms]` inclusive (spec.md §6 `injection_delay`).
    pub fn sample_injection_delay_ms(&mut self, min_ms: u64, max_ms: u64) -> u64 {
        use rand::Rng;
        if min_ms >= max_ms {
            return min_ms;
        }
        self.rng.gen_range(min_ms..=max_ms)
    }
}

fn declared_target_order(config: &CampaignConfig) -> Vec<TargetLabel> {
    let mut seen = std::collections::HashSet::new();
    let mut order = Vec::new();
    for row in &config.injector {
        if seen.insert(row.target_text.clone()) {
            order.push(row.target_text.clone());
        }
    }
    order
}
