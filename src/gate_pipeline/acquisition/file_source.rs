use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::info;

use crate::gate_pipeline::common::error::{GateError, Result};
use crate::gate_pipeline::acquisition::source::{FrameSource, decode_frame};

/// Reads a previously captured frame from disk, for offline runs.
pub struct FileFrameSource {
    path: PathBuf,
}

impl FileFrameSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl FrameSource for FileFrameSource {
    fn acquire(&self) -> Result<RgbImage> {
        info!(path = %self.path.display(), "Reading frame from file");
        let data = std::fs::read(&self.path).map_err(|e| {
            GateError::InputReadError(format!("{}: {}", self.path.display(), e))
        })?;
        decode_frame(&data)
    }
}
