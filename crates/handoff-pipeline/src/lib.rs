//! # Handoff Pipeline
//!
//! This crate provides a small composable pipeline: independent stages, each
//! running in its own Tokio task, connected by rendezvous handoff queues.
//!
//! ## Features
//!
//! - Generic [`Item<T>`] carrying an opaque payload and the scoped temporary
//!   directories created for it
//! - [`Stage<T>`] trait, the one extension point for custom processing
//! - [`Pipeline<T>`] wiring stages into a chain with a single entry and exit
//! - [`PassThroughStage`] and [`TimingStage`] building blocks
//!
//! Closing the entry of a pipeline is the only shutdown signal; it reaches the
//! exit once every earlier item has gone through every stage.
//!
//! ## License
//!
//! MIT OR Apache-2.0
//!

pub mod config;
mod error;
mod item;
pub mod pipeline;
mod run_completion;
pub mod stage;
pub mod stages;

#[cfg(test)]
mod test_utils;

/// Re-export key traits and types
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use item::Item;
pub use pipeline::{DrainSummary, Pipeline, PipelineBuilder, PipelineInput, PipelineOutput};
pub use stage::{ItemReceiver, ItemSender, Stage};
pub use stages::{PassThroughStage, TimingCallback, TimingStage};
