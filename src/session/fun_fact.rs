//! Fun fact selection over the fixed list

use crate::core::constants::FUN_FACTS;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::Mutex;

/// Pick one fact using the caller's RNG
pub fn choose_fun_fact<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    // FUN_FACTS is a non-empty constant.
    FUN_FACTS.choose(rng).copied().unwrap_or(FUN_FACTS[0])
}

/// Shared, optionally seeded source of fun facts
pub struct FunFacts {
    rng: Mutex<StdRng>,
}

impl FunFacts {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    #[cfg(test)]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn next(&self) -> &'static str {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        choose_fun_fact(&mut *rng)
    }
}
