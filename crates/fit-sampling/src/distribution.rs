//! [`Distribution`] (spec.md §4.1): `Uniform`, `Normal`, `Fixed`, each
//! exposing `random()`, `length()`, and `adjust()`.
//!
//! Ported from the original `fit/distribution.py`: `Normal`'s second
//! parameter is named `variance` there but passed directly as `sigma` to
//! `random.gauss(mu, sigma)` — this crate keeps that exact behavior rather
//! than "fixing" it into a true variance, since spec.md §3 defines
//! `start_bit`/`end_bit` in terms of the same parameter.

use rand::Rng;
use rand_distr::{Distribution as RandDistribution, Normal as RandNormal};

use crate::error::SamplingError;

/// A discrete or continuous integer sampler, tagged by variant (spec.md §3,
/// §9: "Dynamic dispatch over distributions maps to a tagged-variant enum").
#[derive(Debug, Clone)]
pub enum Distribution {
    /// Inclusive `[lo, hi]`, snapped down to a multiple of `granularity`.
    Uniform {
        lo: i64,
        hi: i64,
        granularity: i64,
    },
    /// Gaussian with mean `mean` and "variance" `variance` (actually used as
    /// the Gaussian's sigma, see module docs), truncated by `adjust`.
    Normal {
        mean: f64,
        variance: f64,
        granularity: i64,
        start_bit: i64,
        end_bit: i64,
    },
    /// Returns an index in `0..n`, weighted by `cases[i]`.
    Fixed { cases: Vec<f64> },
}

impl Distribution {
    /// `Uniform(lo, hi, granularity)`.
    #[must_use]
    pub fn uniform(lo: i64, hi: i64, granularity: i64) -> Self {
        Distribution::Uniform { lo, hi, granularity }
    }

    /// `Normal(mean, variance, granularity)`. `start_bit`/`end_bit` are
    /// derived per spec.md §3: `start_bit = mean - variance/2`, `end_bit =
    /// mean + variance/2`.
    #[must_use]
    pub fn normal(mean: f64, variance: f64, granularity: i64) -> Self {
        let start_bit = (mean - variance / 2.0) as i64;
        let end_bit = (mean + variance / 2.0) as i64;
        Distribution::Normal {
            mean,
            variance,
            granularity,
            start_bit,
            end_bit,
        }
    }

    /// `Fixed([p0..pn])`. Fails construction if the weights don't sum to 1.0
    /// within `1e-6` (spec.md §4.1) or if `cases` is empty.
    pub fn fixed(cases: Vec<f64>) -> Result<Self, SamplingError> {
        if cases.is_empty() {
            return Err(SamplingError::EmptyCases);
        }
        let sum: f64 = cases.iter().sum();
        if (1.0 - sum).abs() > 1e-6 {
            return Err(SamplingError::WeightsNotNormalized(sum));
        }
        Ok(Distribution::Fixed { cases })
    }

    /// `end_bit - start_bit` (spec.md §3).
    #[must_use]
    pub fn length(&self) -> i64 {
        match self {
            Distribution::Uniform { lo, hi, .. } => hi - lo,
            Distribution::Normal { start_bit, end_bit, .. } => end_bit - start_bit,
            Distribution::Fixed { cases } => cases.len() as i64 - 1,
        }
    }

    /// `(value / granularity) * granularity`, floor division (spec.md §4.1).
    /// `Fixed` has no granularity and returns `value` unchanged.
    #[must_use]
    pub fn adjust(&self, value: i64) -> i64 {
        match self {
            Distribution::Uniform { granularity, .. } | Distribution::Normal { granularity, .. } => {
                if *granularity == 0 {
                    value
                } else {
                    value.div_euclid(*granularity) * granularity
                }
            }
            Distribution::Fixed { .. } => value,
        }
    }

    /// Draw a sample using `rng`.
    pub fn random(&self, rng: &mut impl Rng) -> i64 {
        match self {
            Distribution::Uniform { lo, hi, .. } => {
                let draw = rng.gen_range(*lo..=*hi);
                self.adjust(draw)
            }
            Distribution::Normal { mean, variance, .. } => {
                // A zero-width Gaussian always returns its mean.
                let normal = RandNormal::new(*mean, variance.max(f64::EPSILON))
                    .expect("variance.max(EPSILON) is always > 0");
                let draw = normal.sample(rng) as i64;
                self.adjust(draw)
            }
            Distribution::Fixed { cases } => {
                let draw: f64 = rng.gen_range(0.0..1.0);
                let mut cumulative = 0.0;
                for (i, weight) in cases.iter().enumerate() {
                    cumulative += weight;
                    if draw < cumulative {
                        return i as i64;
                    }
                }
                (cases.len() - 1) as i64
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn uniform_samples_respect_granularity() {
        let d = Distribution::uniform(0, 1000, 4);
        let mut r = rng();
        for _ in 0..200 {
            let v = d.random(&mut r);
            assert_eq!(v % 4, 0);
            assert!((0..=1000).contains(&v));
        }
    }

    #[test]
    fn normal_samples_respect_granularity() {
        let d = Distribution::normal(100.0, 20.0, 5);
        let mut r = rng();
        for _ in 0..200 {
            let v = d.random(&mut r);
            assert_eq!(v.rem_euclid(5), 0);
        }
    }

    #[test]
    fn fixed_rejects_unnormalized_weights() {
        assert!(matches!(
            Distribution::fixed(vec![0.5, 0.3]),
            Err(SamplingError::WeightsNotNormalized(_))
        ));
    }

    #[test]
    fn fixed_rejects_empty_cases() {
        assert!(matches!(Distribution::fixed(vec![]), Err(SamplingError::EmptyCases)));
    }

    #[test]
    fn fixed_empirical_frequencies_approach_weights() {
        let d = Distribution::fixed(vec![0.1, 0.9]).unwrap();
        let mut r = rng();
        let mut hits = [0u32; 2];
        const N: u32 = 20_000;
        for _ in 0..N {
            hits[d.random(&mut r) as usize] += 1;
        }
        let freq1 = f64::from(hits[1]) / f64::from(N);
        assert!((freq1 - 0.9).abs() < 0.02, "freq1={freq1}");
    }

    #[test]
    fn length_matches_spec_formula() {
        assert_eq!(Distribution::uniform(10, 50, 1).length(), 40);
        assert_eq!(Distribution::normal(100.0, 20.0, 1).length(), 20);
        assert_eq!(Distribution::fixed(vec![1.0]).unwrap().length(), 0);
        assert_eq!(Distribution::fixed(vec![0.5, 0.5]).unwrap().length(), 1);
    }

    #[test]
    fn adjust_is_floor_division_times_granularity() {
        let d = Distribution::uniform(-100, 100, 10);
        assert_eq!(d.adjust(17), 10);
        assert_eq!(d.adjust(-17), -20);
    }
}
