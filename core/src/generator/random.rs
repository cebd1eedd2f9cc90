use rand::prelude::*;

use super::*;

/// Generation strategy backed by a small seeded PRNG, reproducible for a given seed.
#[derive(Clone, Debug)]
pub struct SeededColorSource {
    seed: u64,
    rng: SmallRng,
}

impl SeededColorSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl ColorSource for SeededColorSource {
    fn pick_index(&mut self, upper: usize) -> usize {
        if upper == 0 {
            log::warn!("Asked to pick from an empty range, returning 0");
            return 0;
        }
        self.rng.random_range(0..upper)
    }

    fn pick_rgb(&mut self) -> Rgb {
        Rgb::new(self.rng.random(), self.rng.random(), self.rng.random())
    }
}
