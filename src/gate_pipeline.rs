//! Gate status pipeline module
//!
//! This module estimates how far a gate is open from a single camera frame,
//! with separate modules for frame acquisition, the pure analysis stages,
//! debug artifact persistence, and request orchestration.

pub mod acquisition;
pub mod analysis;
pub mod common;
pub mod config;
pub mod debug;
pub mod status;

pub use common::{
    GateError,
    Result,
};

pub use config::{
    CameraConfig,
    GateConfig,
    GateConfigBuilder,
    RoiQuad,
};

pub use acquisition::{
    FileFrameSource,
    FrameSource,
    HttpFrameSource,
};

pub use analysis::{
    BoundingBox,
    GapEstimate,
    GateGeometry,
    GateRect,
    Slat,
};

pub use debug::{
    DebugArtifact,
    DebugSink,
    DebugStage,
    FileDebugSink,
    NoopDebugSink,
};

pub use status::{
    GateStatus,
    GateStatusPipeline,
    PipelineTimings,
    StageTiming,
};
