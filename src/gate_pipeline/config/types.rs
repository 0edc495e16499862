//! Gate calibration types

use serde::Deserialize;

use crate::gate_pipeline::common::error::{GateError, Result};

/// Quadrilateral enclosing the gate in the raw frame.
///
/// Points are ordered A (top-left), B (bottom-left), C (bottom-right),
/// D (top-right), each as `[x, y]` in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RoiQuad(pub [[f32; 2]; 4]);

impl RoiQuad {
    pub fn new(a: [f32; 2], b: [f32; 2], c: [f32; 2], d: [f32; 2]) -> Self {
        Self([a, b, c, d])
    }

    pub fn corners(&self) -> [(f32, f32); 4] {
        self.0.map(|[x, y]| (x, y))
    }
}

impl Default for RoiQuad {
    fn default() -> Self {
        Self([
            [1865.0, 421.0],
            [1838.0, 662.0],
            [2295.0, 868.0],
            [2355.0, 600.0],
        ])
    }
}

/// Calibration for one camera placement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Gate footprint in the raw frame
    pub roi: RoiQuad,
    /// Side of the square median window applied before thresholding (odd)
    pub median_kernel_size: u32,
    /// Inclusive per-channel upper bound for "dark" pixels by day
    pub day_threshold: [u8; 3],
    /// Inclusive per-channel upper bound for "dark" pixels by night
    pub night_threshold: [u8; 3],
    /// Height of the vertical structuring element used to isolate slats
    pub slat_kernel_height: u32,
    /// Bounding boxes must be strictly taller than this to count as a slat
    pub min_slat_height: u32,
    /// Pixel width of the fully closed gate in the rectified ROI
    pub closed_gate_width: f64,
    /// Physical gap when the gate is fully open
    pub full_gap: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            roi: RoiQuad::default(),
            median_kernel_size: 5,
            day_threshold: [80, 80, 80],
            night_threshold: [30, 30, 30],
            slat_kernel_height: 250,
            min_slat_height: 150,
            closed_gate_width: 513.0,
            full_gap: 3.2,
        }
    }
}

impl GateConfig {
    pub fn builder() -> GateConfigBuilder {
        GateConfigBuilder::default()
    }

    /// Dark threshold for the given illumination.
    pub fn threshold_for(&self, day: bool) -> [u8; 3] {
        if day { self.day_threshold } else { self.night_threshold }
    }

    pub fn validate(&self) -> Result<()> {
        if self.median_kernel_size == 0 || self.median_kernel_size % 2 == 0 {
            return Err(GateError::InvalidConfig(format!(
                "median kernel size must be odd and positive, got {}",
                self.median_kernel_size
            )));
        }
        if self.slat_kernel_height == 0 {
            return Err(GateError::InvalidConfig(
                "slat kernel height must be positive".to_string(),
            ));
        }
        if !self.closed_gate_width.is_finite() || self.closed_gate_width <= 0.0 {
            return Err(GateError::InvalidConfig(format!(
                "closed gate width must be a positive number, got {}",
                self.closed_gate_width
            )));
        }
        if !self.full_gap.is_finite() || self.full_gap < 0.0 {
            return Err(GateError::InvalidConfig(format!(
                "full gap must be a non-negative number, got {}",
                self.full_gap
            )));
        }
        if self.roi.0.iter().flatten().any(|v| !v.is_finite()) {
            return Err(GateError::InvalidConfig(
                "ROI corners must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for GateConfig
#[derive(Default)]
pub struct GateConfigBuilder {
    roi: Option<RoiQuad>,
    median_kernel_size: Option<u32>,
    day_threshold: Option<[u8; 3]>,
    night_threshold: Option<[u8; 3]>,
    slat_kernel_height: Option<u32>,
    min_slat_height: Option<u32>,
    closed_gate_width: Option<f64>,
    full_gap: Option<f64>,
}

impl GateConfigBuilder {
    pub fn roi(mut self, roi: RoiQuad) -> Self {
        self.roi = Some(roi);
        self
    }

    pub fn median_kernel_size(mut self, size: u32) -> Self {
        self.median_kernel_size = Some(size);
        self
    }

    pub fn day_threshold(mut self, upper: [u8; 3]) -> Self {
        self.day_threshold = Some(upper);
        self
    }

    pub fn night_threshold(mut self, upper: [u8; 3]) -> Self {
        self.night_threshold = Some(upper);
        self
    }

    pub fn slat_kernel_height(mut self, height: u32) -> Self {
        self.slat_kernel_height = Some(height);
        self
    }

    pub fn min_slat_height(mut self, height: u32) -> Self {
        self.min_slat_height = Some(height);
        self
    }

    pub fn closed_gate_width(mut self, width: f64) -> Self {
        self.closed_gate_width = Some(width);
        self
    }

    pub fn full_gap(mut self, gap: f64) -> Self {
        self.full_gap = Some(gap);
        self
    }

    pub fn build(self) -> GateConfig {
        let default = GateConfig::default();
        GateConfig {
            roi: self.roi.unwrap_or(default.roi),
            median_kernel_size: self.median_kernel_size.unwrap_or(default.median_kernel_size),
            day_threshold: self.day_threshold.unwrap_or(default.day_threshold),
            night_threshold: self.night_threshold.unwrap_or(default.night_threshold),
            slat_kernel_height: self.slat_kernel_height.unwrap_or(default.slat_kernel_height),
            min_slat_height: self.min_slat_height.unwrap_or(default.min_slat_height),
            closed_gate_width: self.closed_gate_width.unwrap_or(default.closed_gate_width),
            full_gap: self.full_gap.unwrap_or(default.full_gap),
        }
    }
}
