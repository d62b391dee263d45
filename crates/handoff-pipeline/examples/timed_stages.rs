//! Runs a few items through two timed stages and prints the measurements.
//!
//! Set `RUST_LOG=handoff_pipeline=trace` to see the worker log records.

use std::sync::Arc;

use handoff_pipeline::{Item, PassThroughStage, Pipeline, PipelineConfig, Stage, TimingStage};
use tracing::{Level, info};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

fn init_logging() {
    let filter = EnvFilter::from_default_env().add_directive(Level::INFO.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    let shared: Arc<dyn Stage<String>> = Arc::new(PassThroughStage);
    let config = PipelineConfig::builder().name("timed-demo").build();

    let pipeline = Pipeline::builder()
        .with_config(config)
        .add_stage(TimingStage::with_shared(shared.clone(), |begin, elapsed| {
            info!(stage = "first", %begin, ?elapsed, "Item timed");
        }))
        .add_stage(TimingStage::with_shared(shared, |begin, elapsed| {
            info!(stage = "second", %begin, ?elapsed, "Item timed");
        }))
        .build();

    let mut items = Vec::new();
    for name in ["alpha", "beta", "gamma"] {
        let mut item = Item::new(name.to_string());
        match item.create_temp_dir("", "timed-demo") {
            Ok(dir) => info!(item = name, dir = %dir.display(), "Scratch directory ready"),
            Err(e) => info!(item = name, error = %e, "No scratch directory"),
        }
        items.push(item);
    }

    let summary = pipeline
        .run(items, |mut item| {
            info!(payload = %item.payload, dirs = item.temp_dirs().len(), "Drained");
            item.release_temp_dirs();
        })
        .await;

    info!(items = summary.items, "Pipeline finished");
}
