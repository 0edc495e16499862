//! Perspective rectification of the gate ROI.

use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::Projection;
use tracing::{debug, warn};

use crate::gate_pipeline::config::RoiQuad;

fn distance(p: (f32, f32), q: (f32, f32)) -> f64 {
    let dx = p.0 as f64 - q.0 as f64;
    let dy = p.1 as f64 - q.1 as f64;
    (dx * dx + dy * dy).sqrt()
}

/// Width and height of the rectified ROI.
///
/// Width is the longer of edges A–D and B–C, height the longer of A–B and
/// C–D, each truncated to whole pixels.
pub fn output_size(quad: &RoiQuad) -> (u32, u32) {
    let [a, b, c, d] = quad.corners();
    let width = distance(a, d).max(distance(b, c));
    let height = distance(a, b).max(distance(c, d));
    (width as u32, height as u32)
}

/// Samples this close outside the frame still snap onto its border pixels,
/// absorbing the float error of the projective mapping at the ROI corners.
const EDGE_TOLERANCE: f32 = 1e-3;

/// Warps the quadrilateral `quad` of `frame` onto an axis-aligned rectangle
/// of [`output_size`] pixels using bilinear sampling.
///
/// Output pixel `(0, 0)` samples exactly source point A, `(width - 1, 0)`
/// samples D, and so on; pixel coordinates address pixel centres in both
/// images. Samples falling outside the frame are black. A degenerate
/// quadrilateral (collinear corners, or an output narrower than two pixels)
/// yields an all-black image of the computed size.
pub fn rectify(frame: &RgbImage, quad: &RoiQuad) -> RgbImage {
    let (width, height) = output_size(quad);
    let mut out = RgbImage::new(width, height);
    // The target rectangle collapses to a line below two pixels.
    if width < 2 || height < 2 {
        warn!(width, height, "Degenerate ROI, nothing to rectify");
        return out;
    }

    let right = (width - 1) as f32;
    let bottom = (height - 1) as f32;
    let target = [(0.0, 0.0), (0.0, bottom), (right, bottom), (right, 0.0)];

    // Maps output pixels back into the frame.
    let Some(to_source) = Projection::from_control_points(target, quad.corners()) else {
        warn!(width, height, "ROI corners admit no projective mapping");
        return out;
    };

    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let (sx, sy) = to_source * (x as f32, y as f32);
        *pixel = sample_bilinear(frame, sx, sy);
    }

    debug!(width, height, "Rectified ROI");
    out
}

fn sample_bilinear(frame: &RgbImage, x: f32, y: f32) -> Rgb<u8> {
    let (w, h) = frame.dimensions();
    if w == 0 || h == 0 {
        return Rgb([0, 0, 0]);
    }
    let (max_x, max_y) = ((w - 1) as f32, (h - 1) as f32);
    if !(x.is_finite() && y.is_finite())
        || x < -EDGE_TOLERANCE
        || y < -EDGE_TOLERANCE
        || x > max_x + EDGE_TOLERANCE
        || y > max_y + EDGE_TOLERANCE
    {
        return Rgb([0, 0, 0]);
    }

    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);
    let (x0, y0) = (x.floor() as u32, y.floor() as u32);
    let (x1, y1) = ((x0 + 1).min(w - 1), (y0 + 1).min(h - 1));
    let (fx, fy) = (x - x0 as f32, y - y0 as f32);

    let (p00, p10) = (frame.get_pixel(x0, y0), frame.get_pixel(x1, y0));
    let (p01, p11) = (frame.get_pixel(x0, y1), frame.get_pixel(x1, y1));

    Rgb(std::array::from_fn(|c| {
        let top = p00[c] as f32 * (1.0 - fx) + p10[c] as f32 * fx;
        let bottom = p01[c] as f32 * (1.0 - fx) + p11[c] as f32 * fx;
        (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8
    }))
}
