//! Gate status orchestration module
//!
//! Runs the analysis stages for one request and assembles the result record.

mod pipeline;
mod timing;
pub mod types;

#[cfg(test)]
mod tests;

pub use pipeline::GateStatusPipeline;
pub use timing::{PipelineTimings, StageTiming};
pub use types::GateStatus;
