//! Pipeline configuration
//!
//! Settings shared by every handoff queue of a pipeline.

/// Default capacity for the handoff queues between stages.
///
/// Zero makes every link a rendezvous: a send completes only once the
/// receiving side has taken the item.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 0;

const DEFAULT_PIPELINE_NAME: &str = "pipeline";

/// Configuration options for a [`Pipeline`](crate::Pipeline)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Capacity of each queue linking two stages (0 for rendezvous handoff)
    pub channel_capacity: usize,

    /// Label attached to log records emitted by the pipeline's workers
    pub name: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            name: DEFAULT_PIPELINE_NAME.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Create a new builder for PipelineConfig
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }
}

pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    pub fn channel_capacity(mut self, channel_capacity: usize) -> Self {
        self.config.channel_capacity = channel_capacity;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

impl Default for PipelineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
