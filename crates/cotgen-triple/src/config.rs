use derive_builder::Builder;

/// Default maximum number of triples per round.
pub const DEFAULT_MAX_ROUND: usize = 1 << 20;

/// Triple generator configuration.
#[derive(Debug, Clone, Builder)]
pub struct GeneratorConfig {
    /// Maximum number of triples generated per round.
    ///
    /// Must not exceed the maximum count of the underlying COT engines.
    #[builder(default = "DEFAULT_MAX_ROUND")]
    max_round: usize,
    /// Whether triples generated in excess of a request are kept for later
    /// requests.
    #[builder(default = "true")]
    carry_over: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_round: DEFAULT_MAX_ROUND,
            carry_over: true,
        }
    }
}

impl GeneratorConfig {
    /// Creates a new builder for GeneratorConfig.
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::default()
    }

    /// Returns the maximum number of triples generated per round.
    pub fn max_round(&self) -> usize {
        self.max_round
    }

    /// Returns whether excess triples are kept for later requests.
    pub fn carry_over(&self) -> bool {
        self.carry_over
    }
}
