use image::RgbImage;
use tracing::debug;

use crate::gate_pipeline::common::error::{GateError, Result};

pub trait FrameSource {
    fn acquire(&self) -> Result<RgbImage>;
}

impl<T: FrameSource + ?Sized> FrameSource for &T {
    fn acquire(&self) -> Result<RgbImage> {
        (**self).acquire()
    }
}

/// Decodes an encoded frame (JPEG from the camera, anything `image` can
/// sniff otherwise) into 8-bit RGB.
pub fn decode_frame(data: &[u8]) -> Result<RgbImage> {
    debug!("Decoding frame, {} bytes", data.len());

    let decoded = image::load_from_memory(data)
        .map_err(|e| GateError::DecodeError(e.to_string()))?;

    debug!("Decoded frame: {}x{}", decoded.width(), decoded.height());
    Ok(decoded.to_rgb8())
}
