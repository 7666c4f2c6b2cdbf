use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::sync::{Mutex, PoisonError};

use crate::carrier::prefix_table;
use crate::identifier::SUFFIX_LENGTHS;

pub trait CandidateGenerator {
    fn generate(&self) -> String;
}

impl<G: CandidateGenerator + ?Sized> CandidateGenerator for Box<G> {
    fn generate(&self) -> String {
        (**self).generate()
    }
}

/// Picks a prefix, then a suffix length, then each suffix digit, all
/// uniformly and independently.
pub struct RandomCandidateGenerator {
    prefixes: Vec<String>,
    suffix_lengths: RangeInclusive<usize>,
    rng: Mutex<StdRng>,
}

impl RandomCandidateGenerator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        RandomCandidateGenerator {
            prefixes: prefix_table().into_iter().map(String::from).collect(),
            suffix_lengths: SUFFIX_LENGTHS,
            rng: Mutex::new(rng),
        }
    }

    /// Narrows the candidate space, e.g. to a single prefix and a one digit
    /// suffix so a store can be filled completely.
    pub fn with_space(mut self, prefixes: Vec<String>, suffix_lengths: RangeInclusive<usize>) -> Self {
        assert!(!prefixes.is_empty(), "candidate space needs at least one prefix");
        assert!(!suffix_lengths.is_empty(), "candidate space needs a suffix length");
        self.prefixes = prefixes;
        self.suffix_lengths = suffix_lengths;
        self
    }
}

impl Default for RandomCandidateGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateGenerator for RandomCandidateGenerator {
    fn generate(&self) -> String {
        // The rng holds no invariant a panicking holder could break.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        let prefix = self
            .prefixes
            .choose(&mut *rng)
            .map(String::as_str)
            .unwrap_or_default();
        let suffix_len = rng.gen_range(self.suffix_lengths.clone());

        let mut candidate = String::with_capacity(prefix.len() + suffix_len);
        candidate.push_str(prefix);
        for _ in 0..suffix_len {
            candidate.push(char::from(b'0' + rng.gen_range(0..10u8)));
        }
        candidate
    }
}
