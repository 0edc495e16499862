//! Conversion of the gate's left edge into fill ratio and physical gap.

use tracing::info;

/// Left edge reported when no slat was detected.
pub const NO_DETECTION_EDGE: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapEstimate {
    /// How closed the gate is, in `[0, 1]`
    pub percentage_gate_fill: f64,
    /// Opening in the units of `full_gap`, never negative
    pub gap_size: f64,
}

/// `fill = 1 - left_edge / closed_width`, `gap = full_gap * (1 - fill)`.
///
/// A left edge of [`NO_DETECTION_EDGE`] forces the fill to 0 (fully open).
/// The gap is computed from the unclamped fill; afterwards fill is clamped to
/// `[0, 1]` and gap to `>= 0`.
pub fn estimate_gap(left_edge: i32, closed_width: f64, full_gap: f64) -> GapEstimate {
    let fill = if left_edge == NO_DETECTION_EDGE {
        info!("Setting percentage gate fill to 0 as left edge is -1");
        0.0
    } else {
        1.0 - left_edge as f64 / closed_width
    };
    let gap = full_gap * (1.0 - fill);

    // f64::max/min return the non-NaN operand, so NaN collapses to 0.
    GapEstimate {
        percentage_gate_fill: fill.max(0.0).min(1.0),
        gap_size: gap.max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: f64 = 513.0;
    const GAP: f64 = 3.2;

    #[test]
    fn test_no_detection_is_fully_open() {
        let estimate = estimate_gap(NO_DETECTION_EDGE, WIDTH, GAP);
        assert_eq!(estimate.percentage_gate_fill, 0.0);
        assert_eq!(estimate.gap_size, 3.2);
    }

    #[test]
    fn test_left_edge_at_zero_is_closed() {
        let estimate = estimate_gap(0, WIDTH, GAP);
        assert_eq!(estimate.percentage_gate_fill, 1.0);
        assert_eq!(estimate.gap_size, 0.0);
    }

    #[test]
    fn test_left_edge_at_reference_width_is_open() {
        let estimate = estimate_gap(513, WIDTH, GAP);
        assert_eq!(estimate.percentage_gate_fill, 0.0);
        assert!((estimate.gap_size - 3.2).abs() < 1e-12);
    }

    #[test]
    fn test_left_edge_past_reference_width_clamps_fill() {
        let estimate = estimate_gap(600, WIDTH, GAP);
        assert_eq!(estimate.percentage_gate_fill, 0.0);
        assert!(estimate.gap_size >= 3.2);
    }

    #[test]
    fn test_partial_opening() {
        let estimate = estimate_gap(100, WIDTH, GAP);
        assert!((estimate.percentage_gate_fill - (1.0 - 100.0 / 513.0)).abs() < 1e-12);
        assert!((estimate.percentage_gate_fill - 0.8051).abs() < 1e-4);
        assert!((estimate.gap_size - 3.2 * 100.0 / 513.0).abs() < 1e-12);
    }

    #[test]
    fn test_outputs_always_in_range() {
        for edge in [-1, -7, 0, 1, 256, 512, 513, 514, 2000, i32::MAX] {
            let estimate = estimate_gap(edge, WIDTH, GAP);
            assert!((0.0..=1.0).contains(&estimate.percentage_gate_fill), "edge {}", edge);
            assert!(estimate.gap_size >= 0.0, "edge {}", edge);
        }
    }
}
