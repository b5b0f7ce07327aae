// tonal-gen -- music theory engine and chord progression generator
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Sources of randomness for the generator.

use rand::distributions::Alphanumeric;
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

use super::GeneratorError;

/// The random capability the generator draws from.
pub trait RandomSource {
    /// A random integer in `min..=max`.
    fn random_integer_in_range(&mut self, min: usize, max: usize) -> usize;

    /// A random string of the given length.
    fn random_string(&mut self, length: usize) -> String;

    /// A random integer in `min..=max` that is none of the `excluded` ones.
    fn random_integer_in_range_excluding(
        &mut self,
        min: usize,
        max: usize,
        excluded: &[usize],
    ) -> Result<usize, GeneratorError> {
        let candidates: Vec<usize> = (min..=max).filter(|value| !excluded.contains(value)).collect();
        if candidates.is_empty() {
            return Err(GeneratorError::EmptyRandomRange { min, max });
        }
        let index = self.random_integer_in_range(0, candidates.len() - 1);
        Ok(candidates[index])
    }

    /// Whether an event of the given percentage happens.
    fn probability(&mut self, percent: u32) -> bool {
        self.random_integer_in_range(1, 100) <= percent as usize
    }
}

/// A [`RandomSource`] backed by a `rand` generator.
#[derive(Clone, Debug)]
pub struct RngRandom<R>(R);

/// Reproducible randomness for a given seed.
pub type SeededRandom = RngRandom<StdRng>;

/// Randomness from the thread local generator.
pub type ThreadRandom = RngRandom<ThreadRng>;

impl RngRandom<StdRng> {
    pub fn from_seed(seed: u64) -> Self {
        RngRandom(StdRng::seed_from_u64(seed))
    }
}

impl RngRandom<ThreadRng> {
    pub fn new() -> Self {
        RngRandom(rand::thread_rng())
    }
}

impl Default for RngRandom<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomSource for RngRandom<R> {
    fn random_integer_in_range(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        self.0.gen_range(min..=max)
    }

    fn random_string(&mut self, length: usize) -> String {
        (&mut self.0)
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect()
    }
}

/// Pick one of the weighted items, each with a probability proportional to its weight.
///
/// This is the same draw as an index into a pool holding every item as many
/// times as its weight, without building the pool.
pub fn weighted_choice<T: Copy>(
    candidates: &[(T, u32)],
    random: &mut impl RandomSource,
) -> Result<T, GeneratorError> {
    let total: u64 = candidates.iter().map(|&(_, weight)| u64::from(weight)).sum();
    if total == 0 {
        return Err(GeneratorError::EmptyWeightedPool);
    }
    let drawn = random.random_integer_in_range(0, (total - 1) as usize) as u64;
    let mut cumulative = 0u64;
    for &(item, weight) in candidates {
        cumulative += u64::from(weight);
        if drawn < cumulative {
            return Ok(item);
        }
    }
    Err(GeneratorError::EmptyWeightedPool)
}


#[cfg(test)]
mod test {
    use super::scripted::ScriptedRandom;
    use super::*;

    #[test]
    fn weighted_choice_walks_cumulative_weights() {
        let candidates = [('a', 30), ('b', 0), ('c', 15)];
        let mut random = ScriptedRandom::new(&[0, 29, 30, 44]);
        assert_eq!(weighted_choice(&candidates, &mut random), Ok('a'));
        assert_eq!(weighted_choice(&candidates, &mut random), Ok('a'));
        assert_eq!(weighted_choice(&candidates, &mut random), Ok('c'));
        assert_eq!(weighted_choice(&candidates, &mut random), Ok('c'));
        assert!(random.is_exhausted());
    }

    #[test]
    fn weighted_choice_needs_some_weight() {
        let mut random = ScriptedRandom::new(&[]);
        assert_eq!(
            weighted_choice(&[(1, 0), (2, 0)], &mut random),
            Err(GeneratorError::EmptyWeightedPool)
        );
        assert_eq!(
            weighted_choice::<u8>(&[], &mut random),
            Err(GeneratorError::EmptyWeightedPool)
        );
    }

    #[test]
    fn weighted_choice_frequencies() {
        let mut random = SeededRandom::from_seed(7);
        let mut counts = [0u32; 2];
        for _ in 0..4000 {
            let item = weighted_choice(&[(0usize, 3), (1, 1)], &mut random).unwrap();
            counts[item] += 1;
        }
        // three to one, within a generous margin
        assert!(counts[0] > 2 * counts[1], "{:?}", counts);
    }

    #[test]
    fn weighted_choice_with_huge_weights() {
        let candidates = [('a', u32::MAX), ('b', u32::MAX), ('c', 1)];
        let last = 2 * u32::MAX as usize;
        let mut random = ScriptedRandom::new(&[u32::MAX as usize - 1, u32::MAX as usize, last]);
        assert_eq!(weighted_choice(&candidates, &mut random), Ok('a'));
        assert_eq!(weighted_choice(&candidates, &mut random), Ok('b'));
        assert_eq!(weighted_choice(&candidates, &mut random), Ok('c'));
    }

    #[test]
    fn excluding_skips_values() {
        let mut random = ScriptedRandom::new(&[0, 1]);
        assert_eq!(random.random_integer_in_range_excluding(0, 3, &[0]), Ok(1));
        assert_eq!(random.random_integer_in_range_excluding(0, 3, &[1, 2]), Ok(3));
        assert_eq!(
            random.random_integer_in_range_excluding(0, 0, &[0]),
            Err(GeneratorError::EmptyRandomRange { min: 0, max: 0 })
        );
    }

    #[test]
    fn seeded_randomness_repeats() {
        let mut first = SeededRandom::from_seed(42);
        let mut second = SeededRandom::from_seed(42);
        for _ in 0..16 {
            let value = first.random_integer_in_range(3, 9);
            assert!((3..=9).contains(&value));
            assert_eq!(value, second.random_integer_in_range(3, 9));
        }
        let name = first.random_string(4);
        assert_eq!(name.len(), 4);
        assert!(name.chars().all(|ch| ch.is_ascii_alphanumeric()));
        assert!(first.probability(100));
        assert!(!first.probability(0));
    }
}
