//! Configuration module
//!
//! Calibration constants for one camera placement and the camera endpoint
//! the frames are fetched from.

mod camera;
pub mod types;

pub use camera::CameraConfig;
pub use types::{GateConfig, GateConfigBuilder, RoiQuad};
