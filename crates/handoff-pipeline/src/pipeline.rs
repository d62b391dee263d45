//! # Handoff Pipeline
//!
//! This module wires a list of [`Stage`]s into a chain. Each stage runs in its
//! own Tokio task and is connected to its neighbours by zero-capacity flume
//! channels. A send only completes once the next stage has taken the item, so
//! a slow stage stalls everything upstream of it without any explicit flow
//! control.
//!
//! ## Lifecycle
//!
//! Input → Stage 1 → Stage 2 → … → Stage N → Output
//!
//! - Construction spawns every stage worker immediately.
//! - [`PipelineInput::close`] drops the entry sender. Each stage sees its input
//!   end, returns, and drops its own sender, so the closure travels down the
//!   chain until the output queue reports end-of-stream.
//! - With no stages the entry and the exit are the same channel.
//!
//! The entry half and the exit half are usually driven from different tasks:
//! a producer that submits items while nobody drains stalls as soon as every
//! stage is holding an item.

use std::sync::Arc;

use tracing::debug;

use crate::config::PipelineConfig;
use crate::run_completion::{StageWorker, settle_workers};
use crate::stage::{ItemReceiver, ItemSender, Stage};
use crate::{Item, PipelineError};

/// How often (in drained items) the exit half logs progress
const PROGRESS_LOG_INTERVAL: usize = 10_000;

/// An ordered chain of running stages with one entry and one exit.
pub struct Pipeline<T> {
    stage_names: Vec<&'static str>,
    input: PipelineInput<T>,
    output: PipelineOutput<T>,
}

/// Entry half of a pipeline
pub struct PipelineInput<T> {
    tx: ItemSender<T>,
}

/// Exit half of a pipeline
pub struct PipelineOutput<T> {
    name: String,
    rx: ItemReceiver<T>,
    workers: Vec<StageWorker>,
    drained_items: usize,
    next_progress_log_at: usize,
}

/// Outcome of draining a pipeline to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainSummary {
    /// Number of items handed to the handler
    pub items: usize,
    /// Stages whose worker panicked instead of returning
    pub failed_stages: Vec<&'static str>,
}

impl<T> Pipeline<T>
where
    T: Send + 'static,
{
    /// Build and start a pipeline with the default configuration.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a Tokio runtime.
    pub fn new(stages: Vec<Arc<dyn Stage<T>>>) -> Self {
        Self::with_config(PipelineConfig::default(), stages)
    }

    /// Create a new builder for Pipeline
    pub fn builder() -> PipelineBuilder<T> {
        PipelineBuilder::new()
    }

    /// Build and start a pipeline.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a Tokio runtime.
    pub fn with_config(config: PipelineConfig, stages: Vec<Arc<dyn Stage<T>>>) -> Self {
        let capacity = config.channel_capacity;
        let mut workers = Vec::with_capacity(stages.len());
        let mut stage_names = Vec::with_capacity(stages.len());

        // Channel for the initial input to the first stage
        let (entry_tx, mut current_rx) = flume::bounded::<Item<T>>(capacity);

        for (index, stage) in stages.into_iter().enumerate() {
            let (next_tx, next_rx) = flume::bounded::<Item<T>>(capacity);
            let stage_name = stage.name();
            let pipeline = config.name.clone();
            let input_rx = current_rx;

            let handle = tokio::spawn(async move {
                debug!(pipeline = %pipeline, stage = stage_name, index, "Stage started");
                // `next_tx` is dropped when `run` returns, closing this stage's output.
                stage.run(input_rx, next_tx).await;
                debug!(pipeline = %pipeline, stage = stage_name, index, "Stage finished");
            });

            workers.push(StageWorker {
                stage: stage_name,
                handle,
            });
            stage_names.push(stage_name);
            current_rx = next_rx;
        }

        Self {
            stage_names,
            input: PipelineInput { tx: entry_tx },
            output: PipelineOutput {
                name: config.name,
                rx: current_rx,
                workers,
                drained_items: 0,
                next_progress_log_at: PROGRESS_LOG_INTERVAL,
            },
        }
    }

    /// Names of the stages in wiring order.
    pub fn stage_names(&self) -> &[&'static str] {
        &self.stage_names
    }

    pub fn len(&self) -> usize {
        self.stage_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stage_names.is_empty()
    }

    /// Separate the entry and exit halves so they can be driven concurrently.
    pub fn split(self) -> (PipelineInput<T>, PipelineOutput<T>) {
        (self.input, self.output)
    }

    /// Submit an item through the entry half.
    pub async fn submit(&self, item: Item<T>) -> Result<(), PipelineError> {
        self.input.submit(item).await
    }

    /// Close the entry half, keeping only the exit half.
    pub fn close_input(self) -> PipelineOutput<T> {
        self.input.close();
        self.output
    }

    /// Feed `items` from a spawned task, close the input and drain everything.
    pub async fn run<I, F>(self, items: I, handler: F) -> DrainSummary
    where
        I: IntoIterator<Item = Item<T>>,
        I::IntoIter: Send + 'static,
        F: FnMut(Item<T>),
    {
        let (input, output) = self.split();
        let items = items.into_iter();

        let feeder = tokio::spawn(async move {
            for item in items {
                if input.submit(item).await.is_err() {
                    break;
                }
            }
            input.close();
        });

        let summary = output.drain(handler).await;
        if let Err(e) = feeder.await {
            debug!(error = %e, "Input feeder did not complete");
        }
        summary
    }
}

impl<T> PipelineInput<T>
where
    T: Send + 'static,
{
    /// Hand an item to the first stage.
    ///
    /// With the default configuration this waits until the first stage (or,
    /// without stages, the consumer) has taken the item. Fails only if the
    /// consuming end of the chain has been dropped.
    pub async fn submit(&self, item: Item<T>) -> Result<(), PipelineError> {
        self.tx
            .send_async(item)
            .await
            .map_err(|_| PipelineError::ChannelClosed("pipeline entry"))
    }

    /// Signal that no more items will be submitted.
    pub fn close(self) {
        drop(self.tx);
    }
}

impl<T> PipelineOutput<T>
where
    T: Send + 'static,
{
    /// Take the next processed item, or `None` once the chain has shut down.
    pub async fn recv(&mut self) -> Option<Item<T>> {
        let item = self.rx.recv_async().await.ok()?;

        self.drained_items = self.drained_items.saturating_add(1);
        if self.drained_items >= self.next_progress_log_at {
            debug!(
                pipeline = %self.name,
                drained_items = self.drained_items,
                "Pipeline progress"
            );
            self.next_progress_log_at = self
                .next_progress_log_at
                .saturating_add(PROGRESS_LOG_INTERVAL);
        }

        Some(item)
    }

    /// Call `handler` for every remaining item in arrival order, then wait for
    /// the stage workers to exit.
    pub async fn drain<F>(mut self, mut handler: F) -> DrainSummary
    where
        F: FnMut(Item<T>),
    {
        let already_drained = self.drained_items;
        while let Some(item) = self.recv().await {
            handler(item);
        }

        let items = self.drained_items - already_drained;
        let failed_stages = self.finish().await;
        DrainSummary {
            items,
            failed_stages,
        }
    }

    /// Wait for the stage workers to exit and return the stages that panicked.
    ///
    /// Meant to be called after [`recv`](Self::recv) returned `None`; any
    /// item still queued is dropped.
    pub async fn finish(self) -> Vec<&'static str> {
        let Self {
            name, rx, workers, ..
        } = self;
        drop(rx);
        settle_workers(&name, workers).await
    }
}

/// Builder collecting stages before the pipeline is started
pub struct PipelineBuilder<T> {
    config: PipelineConfig,
    stages: Vec<Arc<dyn Stage<T>>>,
}

impl<T> PipelineBuilder<T>
where
    T: Send + 'static,
{
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            stages: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a stage to the end of the pipeline.
    pub fn add_stage<S: Stage<T> + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Add a stage that may also be used by other pipelines.
    pub fn add_shared_stage(mut self, stage: Arc<dyn Stage<T>>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Start every stage worker.
    pub fn build(self) -> Pipeline<T> {
        Pipeline::with_config(self.config, self.stages)
    }
}

impl<T> Default for PipelineBuilder<T>
where
    T: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
