use crate::gate_pipeline::common::error::Result;
use crate::gate_pipeline::debug::types::{DebugArtifact, DebugStage};

pub trait DebugSink {
    fn persist(&self, id: &str, stage: DebugStage, artifact: DebugArtifact<'_>) -> Result<()>;
}

impl<T: DebugSink + ?Sized> DebugSink for &T {
    fn persist(&self, id: &str, stage: DebugStage, artifact: DebugArtifact<'_>) -> Result<()> {
        (**self).persist(id, stage, artifact)
    }
}

/// Discards every artifact.
pub struct NoopDebugSink;

impl DebugSink for NoopDebugSink {
    fn persist(&self, _id: &str, _stage: DebugStage, _artifact: DebugArtifact<'_>) -> Result<()> {
        Ok(())
    }
}
