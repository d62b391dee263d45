//! Ready-made pipeline stages
//!
//! - **PassThrough**: forwards every item unchanged
//! - **Timing**: runs an inner stage one item at a time and reports how long
//!   each item took

mod passthrough;
mod timing;

pub use passthrough::PassThroughStage;
pub use timing::{TimingCallback, TimingStage};
