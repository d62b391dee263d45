//! # Stage Trait
//!
//! A stage turns one stream of [`Item`]s into another. The pipeline spawns one
//! worker task per stage and hands it the receiving end of the upstream queue
//! and the sending end of the downstream queue.
//!
//! The output queue is closed when the worker drops its sender, which happens
//! once [`Stage::run`] returns. Implementations should therefore keep reading
//! until `recv_async` reports disconnection and only then return.

use async_trait::async_trait;

use crate::Item;

/// Receiving end of a handoff queue
pub type ItemReceiver<T> = flume::Receiver<Item<T>>;

/// Sending end of a handoff queue
pub type ItemSender<T> = flume::Sender<Item<T>>;

/// A processing unit inside a pipeline.
///
/// `run` takes `&self` so that a single stage value can be wired into several
/// pipelines, one run at a time or concurrently.
#[async_trait]
pub trait Stage<T>: Send + Sync {
    /// Name used in log records.
    fn name(&self) -> &'static str;

    /// Consume `input` until it is closed, emitting results to `output`.
    async fn run(&self, input: ItemReceiver<T>, output: ItemSender<T>);
}
