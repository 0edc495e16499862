//! Debug artifact module
//!
//! Persistence of intermediate images, keyed by request id and stage.

mod sink;
mod file_sink;
pub mod types;

pub use sink::{DebugSink, NoopDebugSink};
pub use file_sink::FileDebugSink;
pub use types::{DebugArtifact, DebugStage};
