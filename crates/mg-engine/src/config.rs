/// Configuration for a session controller.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// RNG seed for reproducible sequences, distractors and target positions.
    pub seed: u64,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
    /// Session length in seconds used instead of each game's own duration.
    pub duration_override: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_events: 1_000,
            duration_override: None,
        }
    }
}

impl EngineConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Force every session to last `secs` seconds (at least 1).
    pub fn with_duration(mut self, secs: u32) -> Self {
        self.duration_override = Some(secs.max(1));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = EngineConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.max_events, 1_000);
        assert_eq!(config.duration_override, None);
    }

    #[test]
    fn config_builder_chain() {
        let config = EngineConfig::default()
            .with_seed(7)
            .with_max_events(0)
            .with_duration(30);
        assert_eq!(config.seed, 7);
        assert_eq!(config.max_events, 0);
        assert_eq!(config.duration_override, Some(30));
    }

    #[test]
    fn zero_duration_clamped() {
        let config = EngineConfig::default().with_duration(0);
        assert_eq!(config.duration_override, Some(1));
    }
}
