use rand::prelude::*;

/// Seedable randomness shared by every engine.
#[derive(Clone, Debug)]
pub struct GameRng(SmallRng);

impl GameRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    /// Uniform index in `0..=max`.
    pub fn index_through(&mut self, max: usize) -> usize {
        self.0.random_range(0..=max)
    }

    /// Uniform value in `[0, upper)`, or 0 when `upper` is not positive.
    pub fn offset_below(&mut self, upper: f32) -> f32 {
        if upper > 0.0 {
            self.0.random_range(0.0..upper)
        } else {
            0.0
        }
    }

    pub fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            None
        } else {
            Some(items[self.index_through(items.len() - 1)])
        }
    }
}

/// In-place Fisher–Yates shuffle, uniform over all permutations.
pub fn fisher_yates<T>(items: &mut [T], rng: &mut GameRng) {
    if items.len() <= 1 {
        return;
    }
    for i in (1..items.len()).rev() {
        let j = rng.index_through(i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn short_inputs_are_untouched() {
        let mut rng = GameRng::from_seed(7);

        let mut empty: [u8; 0] = [];
        fisher_yates(&mut empty, &mut rng);

        let mut single = [42];
        fisher_yates(&mut single, &mut rng);
        assert_eq!(single, [42]);
    }

    #[test]
    fn shuffle_keeps_every_element() {
        let mut rng = GameRng::from_seed(11);
        let mut items: Vec<u32> = (0..32).collect();
        fisher_yates(&mut items, &mut rng);

        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..32).collect::<Vec<_>>());
    }

    #[test]
    fn every_permutation_is_roughly_equally_likely() {
        const TRIALS: u32 = 60_000;
        let mut rng = GameRng::from_seed(0xC0FFEE);
        let mut seen: BTreeMap<Vec<u8>, u32> = BTreeMap::new();

        for _ in 0..TRIALS {
            let mut items = vec![0u8, 1, 2, 3];
            fisher_yates(&mut items, &mut rng);
            *seen.entry(items).or_default() += 1;
        }

        // 4! permutations, expected 2500 each
        assert_eq!(seen.len(), 24);
        let expected = TRIALS / 24;
        for (permutation, count) in seen {
            assert!(
                count.abs_diff(expected) < expected / 10,
                "{:?} seen {} times, expected about {}",
                permutation,
                count,
                expected
            );
        }
    }

    #[test]
    fn offset_below_stays_in_range() {
        let mut rng = GameRng::from_seed(3);
        for _ in 0..1000 {
            let value = rng.offset_below(300.0);
            assert!((0.0..300.0).contains(&value));
        }
        assert_eq!(rng.offset_below(0.0), 0.0);
    }
}
