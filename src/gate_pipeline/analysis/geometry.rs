//! Contour-based gate geometry.

use image::{GrayImage, Rgb, RgbImage};
use imageproc::contours::{BorderType, find_contours};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;
use serde::Serialize;
use tracing::debug;

const SLAT_EDGE_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const GATE_RECT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Axis-aligned bounding box; `width` and `height` count pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn of_points(points: &[Point<i32>]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        })
    }

    /// One past the rightmost column.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// One past the bottom row.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// Aggregate extent of all slats, serialised as `[[min_x, min_y], [max_x, max_y]]`.
///
/// The maxima are exclusive. When nothing was detected the rectangle is
/// [`GateRect::NOT_DETECTED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "[[i32; 2]; 2]")]
pub struct GateRect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl GateRect {
    pub const NOT_DETECTED: GateRect = GateRect { min_x: -1, min_y: -1, max_x: 0, max_y: 0 };

    pub fn is_detected(&self) -> bool {
        self.min_x >= 0
    }
}

impl From<GateRect> for [[i32; 2]; 2] {
    fn from(rect: GateRect) -> Self {
        [[rect.min_x, rect.min_y], [rect.max_x, rect.max_y]]
    }
}

/// A tall contour accepted as one gate slat.
#[derive(Debug, Clone)]
pub struct Slat {
    pub contour: Vec<Point<i32>>,
    pub bounds: BoundingBox,
}

#[derive(Debug, Clone)]
pub struct GateGeometry {
    pub slats: Vec<Slat>,
    pub rect: GateRect,
}

/// Min/max over `boxes`; the result does not depend on iteration order.
pub fn aggregate_rect<'a, I>(boxes: I) -> GateRect
where
    I: IntoIterator<Item = &'a BoundingBox>,
{
    boxes
        .into_iter()
        .fold(None, |acc: Option<GateRect>, b| {
            Some(match acc {
                None => GateRect { min_x: b.x, min_y: b.y, max_x: b.right(), max_y: b.bottom() },
                Some(r) => GateRect {
                    min_x: r.min_x.min(b.x),
                    min_y: r.min_y.min(b.y),
                    max_x: r.max_x.max(b.right()),
                    max_y: r.max_y.max(b.bottom()),
                },
            })
        })
        .unwrap_or(GateRect::NOT_DETECTED)
}

/// Finds the outermost contours of `mask` and keeps those whose bounding box
/// is strictly taller than `min_height`.
pub fn extract_geometry(mask: &GrayImage, min_height: u32) -> GateGeometry {
    if mask.width() == 0 || mask.height() == 0 {
        return GateGeometry { slats: Vec::new(), rect: GateRect::NOT_DETECTED };
    }

    // Regions touching the image border are only traced as outer contours
    // when surrounded by background, so trace a copy with a 1 px empty frame.
    let mut padded = GrayImage::new(mask.width() + 2, mask.height() + 2);
    image::imageops::replace(&mut padded, mask, 1, 1);

    let contours = find_contours::<i32>(&padded);
    let total = contours.len();

    let slats: Vec<Slat> = contours
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .filter_map(|c| {
            let points: Vec<Point<i32>> =
                c.points.iter().map(|p| Point::new(p.x - 1, p.y - 1)).collect();
            let bounds = BoundingBox::of_points(&points)?;
            (bounds.height > min_height as i32).then_some(Slat { contour: points, bounds })
        })
        .collect();

    let rect = aggregate_rect(slats.iter().map(|s| &s.bounds));
    debug!(contours = total, slats = slats.len(), ?rect, "Extracted gate geometry");

    GateGeometry { slats, rect }
}

/// Diagnostic drawing: each slat's left edge in blue and the gate rectangle in
/// red, 2 px wide, on a white canvas of the mask's size.
pub fn render_geometry(geometry: &GateGeometry, width: u32, height: u32) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

    for slat in &geometry.slats {
        let b = &slat.bounds;
        for dx in 0..2 {
            let x = (b.x + dx) as f32;
            draw_line_segment_mut(&mut canvas, (x, b.y as f32), (x, b.bottom() as f32), SLAT_EDGE_COLOR);
        }
    }

    let r = geometry.rect;
    if r.is_detected() {
        let w = (r.max_x - r.min_x + 1) as u32;
        let h = (r.max_y - r.min_y + 1) as u32;
        draw_hollow_rect_mut(&mut canvas, Rect::at(r.min_x, r.min_y).of_size(w, h), GATE_RECT_COLOR);
        draw_hollow_rect_mut(&mut canvas, Rect::at(r.min_x - 1, r.min_y - 1).of_size(w + 2, h + 2), GATE_RECT_COLOR);
    }

    canvas
}
