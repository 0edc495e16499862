//! Day/night classification from global colour statistics.

use image::RgbImage;

/// Mean intensity of each channel over the whole frame.
pub fn channel_means(frame: &RgbImage) -> [f64; 3] {
    let pixel_count = frame.width() as u64 * frame.height() as u64;
    if pixel_count == 0 {
        return [0.0; 3];
    }

    let mut sums = [0u64; 3];
    for pixel in frame.pixels() {
        for (sum, &value) in sums.iter_mut().zip(pixel.0.iter()) {
            *sum += value as u64;
        }
    }

    sums.map(|sum| sum as f64 / pixel_count as f64)
}

/// Returns `false` (night) when the first channel's mean equals the mean of
/// all channel means, which is what an IR-lit greyscale frame produces.
///
/// Frames are decoded as RGB, so the first channel is red. The camera's
/// native BGR order put blue first; for a greyscale frame the two agree, but
/// a coloured frame whose red mean happens to equal the overall mean
/// can read as night where blue-first ordering read it as day.
///
/// This is an exact float comparison, not a perceptual measure: almost any
/// colour cast reads as day. Kept as-is for compatibility with the deployed
/// thresholds.
pub fn is_day(frame: &RgbImage) -> bool {
    let means = channel_means(frame);
    let overall = means.iter().sum::<f64>() / means.len() as f64;
    means[0] != overall
}
