//! Vertical morphology that keeps tall, thin structures.
//!
//! Masks are binary with threshold `> 0`; outputs are `0` or `255`. The
//! structuring element is a 1-pixel-wide column of `height` rows anchored at
//! row `height / 2`. Rows outside the image never take part in a window, so a
//! structure touching the top or bottom edge is judged only on its visible
//! part.

use image::{GrayImage, Luma};

use crate::gate_pipeline::analysis::segment::{BACKGROUND, FOREGROUND};

/// Erodes once, then dilates twice with the same vertical element.
///
/// The second dilation over-grows the surviving columns on purpose so that
/// contour detection is not split by small segmentation gaps.
pub fn isolate_slats(mask: &GrayImage, height: u32) -> GrayImage {
    let eroded = erode_vertical(mask, height);
    let dilated = dilate_vertical(&eroded, height);
    dilate_vertical(&dilated, height)
}

/// A pixel stays set only if every in-image pixel of its window is set.
pub fn erode_vertical(mask: &GrayImage, height: u32) -> GrayImage {
    vertical_window_filter(mask, height, |set, inside| set == inside)
}

/// A pixel becomes set if any pixel of its window is set.
pub fn dilate_vertical(mask: &GrayImage, height: u32) -> GrayImage {
    vertical_window_filter(mask, height, |set, _| set > 0)
}

fn vertical_window_filter<F>(mask: &GrayImage, height: u32, keep: F) -> GrayImage
where
    F: Fn(u32, u32) -> bool,
{
    let (w, h) = mask.dimensions();
    let mut out = GrayImage::new(w, h);
    if w == 0 || h == 0 || height == 0 {
        return out;
    }

    let anchor = (height / 2) as i64;
    let reach_up = anchor;
    let reach_down = height as i64 - 1 - anchor;

    // prefix[y] = number of set pixels in rows [0, y) of the current column
    let mut prefix = vec![0u32; h as usize + 1];
    for x in 0..w {
        for y in 0..h {
            let set = (mask.get_pixel(x, y)[0] != 0) as u32;
            prefix[y as usize + 1] = prefix[y as usize] + set;
        }

        for y in 0..h as i64 {
            let lo = (y - reach_up).max(0) as usize;
            let hi = (y + reach_down).min(h as i64 - 1) as usize;
            let set = prefix[hi + 1] - prefix[lo];
            let inside = (hi + 1 - lo) as u32;
            let value = if keep(set, inside) { FOREGROUND } else { BACKGROUND };
            out.put_pixel(x, y as u32, Luma([value]));
        }
    }

    out
}
