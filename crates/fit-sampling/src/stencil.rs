//! [`Stencil`] (spec.md §4.2): places a bit-pattern at a sampled offset and
//! chunks the result into `word_bytes`-sized little-endian words.

use rand::Rng;

use crate::distribution::Distribution;
use crate::error::SamplingError;

/// A placed bit-pattern generator: picks a pattern, shifts it by a sampled
/// offset, and splits the result into a sequence of `word_bytes`-sized
/// words (spec.md §3, §4.2).
#[derive(Debug, Clone)]
pub struct Stencil {
    patterns: Vec<i64>,
    pattern_distribution: Distribution,
    offset_distribution: Distribution,
    word_bytes: u32,
    max_pattern_bits: u32,
}

impl Stencil {
    /// Construct a stencil. Fails if `patterns` is empty, if `word_bytes` is
    /// zero, or if the precondition `len(patterns) - 1 ==
    /// pattern_distribution.length()` (spec.md §4.2) doesn't hold.
    pub fn new(
        patterns: Vec<i64>,
        pattern_distribution: Distribution,
        offset_distribution: Distribution,
        word_bytes: u32,
    ) -> Result<Self, SamplingError> {
        if patterns.is_empty() {
            return Err(SamplingError::EmptyPatterns);
        }
        if word_bytes == 0 {
            return Err(SamplingError::ZeroWordBytes);
        }
        let expected_length = patterns.len() as i64 - 1;
        let actual_length = pattern_distribution.length();
        if expected_length != actual_length {
            return Err(SamplingError::PatternCountMismatch {
                patterns: patterns.len(),
                distribution_length: actual_length,
            });
        }

        let max_pattern_bits = patterns.iter().map(|p| pattern_bit_length(*p)).max().unwrap_or(1);

        Ok(Self {
            patterns,
            pattern_distribution,
            offset_distribution,
            word_bytes,
            max_pattern_bits,
        })
    }

    /// `word_bits = 8 * word_bytes`.
    #[must_use]
    pub fn word_bits(&self) -> u32 {
        8 * self.word_bytes
    }

    /// `max_chunks = ceil(offset_distribution.length() / word_bits) +
    /// ceil(max_pattern_bits / word_bits)` (spec.md §4.2).
    #[must_use]
    pub fn max_chunks(&self) -> usize {
        let word_bits = self.word_bits() as i64;
        let offset_chunks = ceil_div(self.offset_distribution.length().max(0), word_bits);
        let pattern_chunks = ceil_div(i64::from(self.max_pattern_bits), word_bits);
        (offset_chunks + pattern_chunks) as usize
    }

    /// Pick a pattern, shift it left by a sampled offset, and split the
    /// result into `max_chunks` little-endian `word_bytes`-sized words
    /// (spec.md §4.2).
    pub fn random(&self, rng: &mut impl Rng) -> Vec<u64> {
        let pattern_idx = self.pattern_distribution.random(rng) as usize;
        let pattern = self.patterns[pattern_idx.min(self.patterns.len() - 1)];
        let offset = self.offset_distribution.random(rng);
        self.place(pattern, offset)
    }

    /// XOR together `n` independent `random()` draws, with `n` chosen
    /// uniformly from `[min, max]` (spec.md §4.2 `layer`).
    pub fn layer(&self, rng: &mut impl Rng, min: u32, max: u32) -> Vec<u64> {
        let n = if min == max { min } else { rng.gen_range(min..=max) };
        let word_bits = self.word_bits();
        let word_mask = word_mask(word_bits);
        let mut acc = vec![0u64; self.max_chunks()];
        for _ in 0..n {
            let words = self.random(rng);
            for (a, w) in acc.iter_mut().zip(words.iter()) {
                *a = (*a ^ *w) & word_mask;
            }
        }
        acc
    }

    /// Deterministic placement used by `random()` and directly by tests:
    /// `v = pattern << offset`, then split into `max_chunks` words.
    fn place(&self, pattern: i64, offset: i64) -> Vec<u64> {
        let word_bits = self.word_bits();
        let word_mask = word_mask(word_bits);
        let pattern_bits = pattern as u64;

        (0..self.max_chunks())
            .map(|i| {
                let window_start = i as i64 * i64::from(word_bits);
                extract_window(pattern_bits, offset, window_start, word_bits) & word_mask
            })
            .collect()
    }
}

fn ceil_div(a: i64, b: i64) -> i64 {
    if b == 0 {
        return 0;
    }
    (a + b - 1).div_euclid(b).max(0)
}

fn word_mask(word_bits: u32) -> u64 {
    if word_bits >= 64 {
        u64::MAX
    } else {
        (1u64 << word_bits) - 1
    }
}

/// Number of bits needed to represent `p`'s 64-bit two's-complement pattern,
/// treating it as an unsigned bit mask (at least 1, so a zero pattern still
/// contributes one chunk rather than collapsing `max_chunks` to zero).
fn pattern_bit_length(p: i64) -> u32 {
    let bits = p as u64;
    if bits == 0 { 1 } else { 64 - bits.leading_zeros() }
}

/// Extract the bits of a 64-bit `value` that fall in the half-open absolute
/// bit window `[window_start, window_start + window_len)`, after `value` has
/// conceptually been shifted left by `shift` bits (so `value`'s own bits
/// occupy absolute positions `[shift, shift + 64)`). Returned right-aligned
/// within the returned word (i.e. already positioned as that word's
/// contents, not the full shifted value).
fn extract_window(value: u64, shift: i64, window_start: i64, window_len: u32) -> u64 {
    let value_end = shift + 64;
    let window_end = window_start + i64::from(window_len);

    let lo = shift.max(window_start);
    let hi = value_end.min(window_end);
    if hi <= lo {
        return 0;
    }

    let value_bit_start = (lo - shift) as u32;
    let len = (hi - lo) as u32;
    let mask = if len >= 64 { u64::MAX } else { (1u64 << len) - 1 };
    let bits = (value >> value_bit_start) & mask;

    let window_bit_start = (lo - window_start) as u32;
    bits << window_bit_start
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    fn single_pattern_stencil(pattern: i64, word_bytes: u32) -> Stencil {
        Stencil::new(
            vec![pattern],
            Distribution::fixed(vec![1.0]).unwrap(),
            Distribution::uniform(0, 0, 1),
            word_bytes,
        )
        .unwrap()
    }

    #[test]
    fn reversibility_single_pattern_offset_zero() {
        let word_bytes = 4;
        let pattern: i64 = 0xDEAD_BEEF;
        let stencil = single_pattern_stencil(pattern, word_bytes);

        let words = stencil.place(pattern, 0);
        let mut concatenated: Vec<u8> = Vec::new();
        for w in &words {
            concatenated.extend_from_slice(&(*w as u32).to_le_bytes());
        }

        let mut expected = (pattern as u32).to_le_bytes().to_vec();
        expected.resize(concatenated.len(), 0);
        assert_eq!(concatenated, expected);
    }

    #[test]
    fn offset_shifts_pattern_into_higher_words() {
        // offset_distribution spans [0, 8] (length 8) so max_chunks covers
        // both the low word and the word an offset of 8 would shift into.
        let stencil = Stencil::new(
            vec![0xFF],
            Distribution::fixed(vec![1.0]).unwrap(),
            Distribution::uniform(0, 8, 1),
            1,
        )
        .unwrap();

        let words = stencil.place(0xFF, 8);
        assert_eq!(words[0], 0x00);
        assert_eq!(words[1], 0xFF);
    }

    #[test]
    fn layer_of_one_equals_single_random_draw() {
        let stencil = single_pattern_stencil(0x1234, 2);
        let mut r1 = StdRng::seed_from_u64(99);
        let mut r2 = StdRng::seed_from_u64(99);
        assert_eq!(stencil.layer(&mut r1, 1, 1), stencil.random(&mut r2));
    }

    #[test]
    fn layer_matches_manual_xor_of_n_draws() {
        let stencil = Stencil::new(
            vec![0x1, 0x2, 0x4],
            Distribution::fixed(vec![0.2, 0.3, 0.5]).unwrap(),
            Distribution::uniform(0, 16, 4),
            2,
        )
        .unwrap();

        let mut r1 = StdRng::seed_from_u64(42);
        let layered = stencil.layer(&mut r1, 3, 3);

        let mut r2 = StdRng::seed_from_u64(42);
        // layer() consumes one rng draw to pick n even when min==max? No —
        // when min == max it skips the gen_range call, so the two streams
        // stay aligned from the first random() draw.
        let a = stencil.random(&mut r2);
        let b = stencil.random(&mut r2);
        let c = stencil.random(&mut r2);
        let manual: Vec<u64> = a
            .iter()
            .zip(b.iter())
            .zip(c.iter())
            .map(|((x, y), z)| x ^ y ^ z)
            .collect();

        assert_eq!(layered, manual);
    }

    #[test]
    fn rejects_mismatched_pattern_distribution_length() {
        let result = Stencil::new(
            vec![1, 2, 3],
            Distribution::fixed(vec![0.5, 0.5]).unwrap(),
            Distribution::uniform(0, 0, 1),
            4,
        );
        assert!(matches!(
            result,
            Err(SamplingError::PatternCountMismatch { .. })
        ));
    }

    #[test]
    fn rejects_empty_patterns() {
        let result = Stencil::new(
            vec![],
            Distribution::fixed(vec![1.0]).unwrap(),
            Distribution::uniform(0, 0, 1),
            4,
        );
        assert!(matches!(result, Err(SamplingError::EmptyPatterns)));
    }

    #[test]
    fn max_chunks_covers_offset_range_and_pattern_width() {
        let stencil = Stencil::new(
            vec![0xFF],
            Distribution::fixed(vec![1.0]).unwrap(),
            Distribution::uniform(0, 31, 1),
            1,
        )
        .unwrap();
        // offset length=31, word_bits=8: ceil(31/8)=4, pattern_bits=8: ceil(8/8)=1 -> 5
        assert_eq!(stencil.max_chunks(), 5);
    }

    #[test]
    fn random_never_panics_across_many_seeds() {
        let stencil = Stencil::new(
            vec![0x7, 0x1F, -1],
            Distribution::fixed(vec![0.2, 0.3, 0.5]).unwrap(),
            Distribution::uniform(0, 40, 8),
            4,
        )
        .unwrap();
        for seed in 0..50u64 {
            let mut r = StdRng::seed_from_u64(seed);
            let words = stencil.random(&mut r);
            assert_eq!(words.len(), stencil.max_chunks());
        }
    }
}
