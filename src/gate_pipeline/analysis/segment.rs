//! Dark-region segmentation.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::filter::median_filter;
use imageproc::map::map_colors;

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// Median-blurs `roi` with a `kernel_size` square window, then marks every
/// pixel whose channels all lie in `[0, upper]` (inclusive) as foreground.
pub fn dark_mask(roi: &RgbImage, upper: [u8; 3], kernel_size: u32) -> GrayImage {
    if roi.width() == 0 || roi.height() == 0 {
        return GrayImage::new(roi.width(), roi.height());
    }

    let radius = kernel_size / 2;
    let smoothed = median_filter(roi, radius, radius);

    map_colors(&smoothed, |pixel: Rgb<u8>| {
        let dark = pixel.0.iter().zip(upper).all(|(&value, bound)| value <= bound);
        Luma([if dark { FOREGROUND } else { BACKGROUND }])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bright_roi_yields_empty_mask() {
        let roi = RgbImage::from_pixel(50, 40, Rgb([200, 210, 190]));
        let mask = dark_mask(&roi, [80, 80, 80], 5);
        assert!(mask.pixels().all(|p| p[0] == BACKGROUND));
    }

    #[test]
    fn test_threshold_bound_is_inclusive() {
        let roi = RgbImage::from_pixel(10, 10, Rgb([80, 80, 80]));
        let mask = dark_mask(&roi, [80, 80, 80], 5);
        assert!(mask.pixels().all(|p| p[0] == FOREGROUND));

        let mask = dark_mask(&roi, [30, 30, 30], 5);
        assert!(mask.pixels().all(|p| p[0] == BACKGROUND));
    }

    #[test]
    fn test_every_channel_must_be_dark() {
        let roi = RgbImage::from_pixel(10, 10, Rgb([10, 10, 120]));
        let mask = dark_mask(&roi, [80, 80, 80], 5);
        assert!(mask.pixels().all(|p| p[0] == BACKGROUND));
    }

    #[test]
    fn test_median_removes_speckle() {
        let mut roi = RgbImage::from_pixel(20, 20, Rgb([220, 220, 220]));
        roi.put_pixel(10, 10, Rgb([0, 0, 0]));
        roi.put_pixel(3, 15, Rgb([5, 5, 5]));

        let mask = dark_mask(&roi, [80, 80, 80], 5);
        assert!(mask.pixels().all(|p| p[0] == BACKGROUND));
    }

    #[test]
    fn test_wide_dark_bar_survives_blur() {
        let roi = RgbImage::from_fn(30, 20, |x, _| {
            if (10..16).contains(&x) { Rgb([20, 25, 30]) } else { Rgb([200, 200, 200]) }
        });

        let mask = dark_mask(&roi, [80, 80, 80], 5);
        for y in 0..20 {
            for x in 0..30 {
                let expected = if (10..16).contains(&x) { FOREGROUND } else { BACKGROUND };
                assert_eq!(mask.get_pixel(x, y)[0], expected, "pixel ({}, {})", x, y);
            }
        }
    }
}
