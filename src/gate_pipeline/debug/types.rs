//! Types for debug artifacts

use image::{GrayImage, RgbImage};

/// Pipeline stage an artifact was captured after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebugStage {
    /// Raw camera frame
    Source,
    /// Rectified region of interest
    Roi,
    /// Dark-region mask
    Threshold,
    /// Mask after vertical morphology
    Vertical,
    /// Slat edges and gate rectangle drawn on a blank canvas
    Result,
}

impl DebugStage {
    pub const ALL: [DebugStage; 5] = [
        DebugStage::Source,
        DebugStage::Roi,
        DebugStage::Threshold,
        DebugStage::Vertical,
        DebugStage::Result,
    ];

    pub fn ordinal(&self) -> u8 {
        match self {
            DebugStage::Source => 1,
            DebugStage::Roi => 2,
            DebugStage::Threshold => 3,
            DebugStage::Vertical => 4,
            DebugStage::Result => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DebugStage::Source => "src",
            DebugStage::Roi => "roi",
            DebugStage::Threshold => "thresh",
            DebugStage::Vertical => "vert",
            DebugStage::Result => "result",
        }
    }

    /// File stem unique per request and stage, e.g. `<id>_03_thresh`.
    pub fn file_stem(&self, id: &str) -> String {
        format!("{}_{:02}_{}", id, self.ordinal(), self.name())
    }
}

/// Borrowed image handed to a sink.
#[derive(Debug, Clone, Copy)]
pub enum DebugArtifact<'a> {
    Color(&'a RgbImage),
    Mask(&'a GrayImage),
}

impl DebugArtifact<'_> {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            DebugArtifact::Color(image) => image.dimensions(),
            DebugArtifact::Mask(image) => image.dimensions(),
        }
    }
}
