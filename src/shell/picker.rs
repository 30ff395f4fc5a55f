//! Identifier selection for the next fetch.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Chooses which creature id to fetch next, from `1..=max_id`.
pub trait IdPicker {
    fn pick(&mut self, max_id: u32) -> u32;
}

/// Uniform draw over the id range.
pub struct RandomIdPicker<R: Rng> {
    rng: R,
}

impl RandomIdPicker<ThreadRng> {
    pub fn thread() -> Self {
        Self { rng: rand::thread_rng() }
    }
}

impl RandomIdPicker<StdRng> {
    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl<R: Rng> IdPicker for RandomIdPicker<R> {
    fn pick(&mut self, max_id: u32) -> u32 {
        self.rng.gen_range(1..=max_id.max(1))
    }
}

/// Cycles through a fixed list of ids.
pub struct FixedIdPicker {
    ids: Vec<u32>,
    next: usize,
}

impl FixedIdPicker {
    pub fn new(ids: Vec<u32>) -> Self {
        Self { ids, next: 0 }
    }
}

impl IdPicker for FixedIdPicker {
    fn pick(&mut self, max_id: u32) -> u32 {
        if self.ids.is_empty() {
            return 1;
        }
        let id = self.ids[self.next % self.ids.len()];
        self.next += 1;
        id.clamp(1, max_id.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_stay_in_range() {
        let mut picker = RandomIdPicker::seeded(7);
        for _ in 0..1000 {
            let id = picker.pick(898);
            assert!((1..=898).contains(&id));
        }
    }

    #[test]
    fn seeded_pickers_repeat() {
        let mut a = RandomIdPicker::seeded(42);
        let mut b = RandomIdPicker::seeded(42);
        let xs: Vec<u32> = (0..10).map(|_| a.pick(898)).collect();
        let ys: Vec<u32> = (0..10).map(|_| b.pick(898)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn fixed_picker_cycles() {
        let mut picker = FixedIdPicker::new(vec![25, 150]);
        assert_eq!(picker.pick(898), 25);
        assert_eq!(picker.pick(898), 150);
        assert_eq!(picker.pick(898), 25);
    }
}
