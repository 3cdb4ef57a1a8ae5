use derive_builder::Builder;

/// Default maximum number of COTs per extension.
pub const DEFAULT_MAX_COUNT: usize = 1 << 24;

/// ALSZ sender configuration.
#[derive(Debug, Clone, Builder)]
pub struct SenderConfig {
    /// Maximum number of COTs per extension.
    #[builder(default = "DEFAULT_MAX_COUNT")]
    max_count: usize,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            max_count: DEFAULT_MAX_COUNT,
        }
    }
}

impl SenderConfig {
    /// Creates a new builder for SenderConfig.
    pub fn builder() -> SenderConfigBuilder {
        SenderConfigBuilder::default()
    }

    /// Returns the maximum number of COTs per extension.
    pub fn max_count(&self) -> usize {
        self.max_count
    }
}

/// ALSZ receiver configuration.
#[derive(Debug, Clone, Builder)]
pub struct ReceiverConfig {
    /// Maximum number of COTs per extension.
    #[builder(default = "DEFAULT_MAX_COUNT")]
    max_count: usize,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            max_count: DEFAULT_MAX_COUNT,
        }
    }
}

impl ReceiverConfig {
    /// Creates a new builder for ReceiverConfig.
    pub fn builder() -> ReceiverConfigBuilder {
        ReceiverConfigBuilder::default()
    }

    /// Returns the maximum number of COTs per extension.
    pub fn max_count(&self) -> usize {
        self.max_count
    }
}
