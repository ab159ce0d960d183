//! Level selection for both construction paths.
//!
//! Incremental insertion draws levels from a geometric distribution with
//! p = 1/2. The bulk maker assigns levels deterministically from a slot's
//! position, so that level `l` holds every `2^(l-1)`-th slot.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of node levels for the incremental path
#[derive(Debug, Clone)]
pub(crate) struct LevelGenerator {
    rng: StdRng,
    max_level: usize,
}

impl LevelGenerator {
    pub(crate) fn new(max_level: usize, seed: Option<u64>) -> Self {
        debug_assert!(max_level >= 1);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        LevelGenerator { rng, max_level }
    }

    /// Start at 1, add a level for every heads, stop on the first tails
    pub(crate) fn next_level(&mut self) -> usize {
        let mut level = 1;

        // Cap at max_level
        while level < self.max_level && self.rng.random::<bool>() {
            level += 1;
        }

        level
    }
}

/// Number of layers in a maker-built set of `n` keys: `floor(log2(n))`, at least 1
pub(crate) fn maker_layers(n: usize) -> usize {
    debug_assert!(n > 0);
    (n.ilog2() as usize).max(1)
}

/// Level of slot `index` in a maker-built set with `layers` layers
///
/// One more than the exponent of the largest power of two dividing `index`,
/// capped at `layers`. Slot 0 is divisible by every stride and gets the top.
#[inline]
pub(crate) fn maker_level(index: usize, layers: usize) -> usize {
    if index == 0 {
        return layers;
    }
    (index.trailing_zeros() as usize + 1).min(layers)
}
