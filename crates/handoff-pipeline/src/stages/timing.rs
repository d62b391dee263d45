//! # TimingStage
//!
//! Measures how long an inner stage spends on each item.
//!
//! For every incoming item the stage builds a private one-stage pipeline
//! around the inner stage, feeds the item in from a helper task, forwards
//! whatever comes out, and then reports `(start, elapsed)` to the callback.
//! Items are handled strictly one after another, so the callback for an item
//! always runs before the next item enters the inner stage.
//!
//! An inner stage that never finishes with an item stalls this stage forever;
//! there is no timeout.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use time::OffsetDateTime;
use tracing::{debug, trace};

use crate::config::PipelineConfig;
use crate::pipeline::Pipeline;
use crate::stage::{ItemReceiver, ItemSender, Stage};

/// Receives the wall-clock start of an item and the time it took.
pub type TimingCallback = dyn Fn(OffsetDateTime, Duration) + Send + Sync;

pub struct TimingStage<T> {
    inner: Arc<dyn Stage<T>>,
    callback: Box<TimingCallback>,
    inner_config: PipelineConfig,
}

impl<T> TimingStage<T>
where
    T: Send + 'static,
{
    pub fn new<S, F>(inner: S, callback: F) -> Self
    where
        S: Stage<T> + 'static,
        F: Fn(OffsetDateTime, Duration) + Send + Sync + 'static,
    {
        Self::with_shared(Arc::new(inner), callback)
    }

    /// Time a stage that is also used elsewhere.
    pub fn with_shared<F>(inner: Arc<dyn Stage<T>>, callback: F) -> Self
    where
        F: Fn(OffsetDateTime, Duration) + Send + Sync + 'static,
    {
        let inner_config = PipelineConfig::builder()
            .name(format!("timed-{}", inner.name()))
            .build();

        Self {
            inner,
            callback: Box::new(callback),
            inner_config,
        }
    }
}

#[async_trait]
impl<T> Stage<T> for TimingStage<T>
where
    T: Send + 'static,
{
    fn name(&self) -> &'static str {
        "Timing"
    }

    async fn run(&self, input: ItemReceiver<T>, output: ItemSender<T>) {
        while let Ok(item) = input.recv_async().await {
            let begin = OffsetDateTime::now_utc();
            let started = Instant::now();

            let (inner_input, mut inner_output) =
                Pipeline::with_config(self.inner_config.clone(), vec![Arc::clone(&self.inner)])
                    .split();

            let feeder = tokio::spawn(async move {
                if inner_input.submit(item).await.is_err() {
                    debug!(stage = "Timing", "Inner stage stopped before taking the item");
                }
                inner_input.close();
            });

            let mut downstream_open = true;
            while let Some(response) = inner_output.recv().await {
                if downstream_open && output.send_async(response).await.is_err() {
                    downstream_open = false;
                }
            }
            inner_output.finish().await;
            if let Err(e) = feeder.await {
                debug!(stage = "Timing", error = %e, "Inner feeder did not complete");
            }

            let elapsed = started.elapsed();
            trace!(
                stage = "Timing",
                inner = self.inner.name(),
                elapsed = ?elapsed,
                "Item timed"
            );
            (self.callback)(begin, elapsed);

            if !downstream_open {
                debug!(stage = "Timing", "Downstream closed, stopping");
                return;
            }
        }
    }
}
