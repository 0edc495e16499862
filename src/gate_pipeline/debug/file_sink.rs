use std::path::{Path, PathBuf};

use image::ImageFormat;
use tracing::debug;

use crate::gate_pipeline::common::error::{GateError, Result};
use crate::gate_pipeline::debug::sink::DebugSink;
use crate::gate_pipeline::debug::types::{DebugArtifact, DebugStage};

/// Writes each artifact as `<dir>/<id>_<NN>_<stage>.jpg`.
///
/// File names are prefixed with the request id, so concurrent requests
/// sharing one directory never write the same file.
pub struct FileDebugSink {
    dir: PathBuf,
}

impl FileDebugSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn artifact_path(&self, id: &str, stage: DebugStage) -> PathBuf {
        self.dir.join(format!("{}.jpg", stage.file_stem(id)))
    }
}

impl DebugSink for FileDebugSink {
    fn persist(&self, id: &str, stage: DebugStage, artifact: DebugArtifact<'_>) -> Result<()> {
        let (width, height) = artifact.dimensions();
        if width == 0 || height == 0 {
            return Err(GateError::DebugWriteError(format!(
                "{} artifact is empty ({}x{})",
                stage.name(),
                width,
                height
            )));
        }

        std::fs::create_dir_all(&self.dir).map_err(|e| {
            GateError::DebugWriteError(format!("{}: {}", self.dir.display(), e))
        })?;

        let path = self.artifact_path(id, stage);
        let saved = match artifact {
            DebugArtifact::Color(image) => image.save_with_format(&path, ImageFormat::Jpeg),
            DebugArtifact::Mask(image) => image.save_with_format(&path, ImageFormat::Jpeg),
        };
        saved.map_err(|e| GateError::DebugWriteError(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), "Wrote debug artifact");
        Ok(())
    }
}
