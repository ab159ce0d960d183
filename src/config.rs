//! Configuration for sorted sets

/// Default cap on the number of levels a node may be assigned.
///
/// With fair coin flips a level above 32 has probability 2^-32, so the cap
/// only bounds pathological draws.
pub const DEFAULT_MAX_LEVEL: usize = 32;

/// Tuning knobs for a [`SortedSet`](crate::SortedSet)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetConfig {
    /// Highest level the incremental path may assign to a node (>= 1)
    pub max_level: usize,

    /// Seed for level selection. `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for SetConfig {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            seed: None,
        }
    }
}

impl SetConfig {
    /// Create a new config builder
    pub fn builder() -> SetConfigBuilder {
        SetConfigBuilder::default()
    }
}

/// Builder for [`SetConfig`]
#[derive(Debug, Default)]
pub struct SetConfigBuilder {
    config: SetConfig,
}

impl SetConfigBuilder {
    /// Set the level cap for incrementally inserted nodes
    pub fn max_level(mut self, max_level: usize) -> Self {
        self.config.max_level = max_level;
        self
    }

    /// Use a fixed seed so that node levels are reproducible
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Build the config
    ///
    /// # Panics
    ///
    /// Panics if `max_level` is zero.
    pub fn build(self) -> SetConfig {
        assert!(self.config.max_level >= 1, "max_level must be at least 1");
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SetConfig::default();
        assert_eq!(config.max_level, DEFAULT_MAX_LEVEL);
        assert_eq!(config.seed, None);
        assert_eq!(SetConfig::builder().build(), config);
    }

    #[test]
    fn builder_sets_fields() {
        let config = SetConfig::builder().max_level(4).seed(7).build();
        assert_eq!(config.max_level, 4);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    #[should_panic(expected = "max_level must be at least 1")]
    fn zero_max_level_rejected() {
        let _ = SetConfig::builder().max_level(0).build();
    }
}
