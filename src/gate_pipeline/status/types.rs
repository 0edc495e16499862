//! Result record returned for one status request

use serde::Serialize;

use crate::gate_pipeline::analysis::GateRect;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateStatus {
    /// Correlation id, also the prefix of any debug artifacts
    pub id: String,
    /// Number of detected slats
    pub slats: usize,
    /// How closed the gate is, in `[0, 1]`
    pub percentage_gate_fill: f64,
    /// Estimated physical opening, never negative
    pub gap_size: f64,
    pub day: bool,
    /// `[[min_x, min_y], [max_x, max_y]]` in rectified ROI pixels
    pub gate_rect: GateRect,
    /// Wall-clock seconds spent on the request
    pub runtime: f64,
}
