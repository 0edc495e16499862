//! Frame source backed by the camera's HTTP snapshot endpoint.

use std::io::Read;
use std::time::Duration;

use image::RgbImage;
use tracing::{debug, info};

use crate::gate_pipeline::common::error::{GateError, Result};
use crate::gate_pipeline::config::CameraConfig;
use crate::gate_pipeline::acquisition::source::{FrameSource, decode_frame};

/// Default upper bound on the snapshot body size.
pub const MAX_FRAME_BYTES: u64 = 32 * 1024 * 1024;

/// Fetches one JPEG snapshot per call.
///
/// Credentials are checked before any request is made; a missing username or
/// password fails with [`GateError::MissingCredentials`]. Failures are not
/// retried.
pub struct HttpFrameSource {
    camera: CameraConfig,
    agent: ureq::Agent,
    max_frame_bytes: u64,
}

impl HttpFrameSource {
    pub fn new(camera: CameraConfig) -> Self {
        Self {
            camera,
            agent: ureq::AgentBuilder::new().build(),
            max_frame_bytes: MAX_FRAME_BYTES,
        }
    }

    /// Bounds the whole request; without it a hung camera blocks the caller.
    pub fn with_timeout(camera: CameraConfig, timeout: Duration) -> Self {
        Self {
            camera,
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            max_frame_bytes: MAX_FRAME_BYTES,
        }
    }

    /// Rejects snapshot bodies larger than `limit` bytes.
    pub fn with_max_frame_bytes(mut self, limit: u64) -> Self {
        self.max_frame_bytes = limit;
        self
    }

    pub fn camera(&self) -> &CameraConfig {
        &self.camera
    }

    fn fetch_bytes(&self) -> Result<Vec<u8>> {
        let (user, password) = self.camera.credentials()?;
        let cache_buster = uuid::Uuid::new_v4().simple().to_string();

        debug!(url = %self.camera.snapshot_url, channel = self.camera.channel, "Requesting snapshot");

        let response = self.agent
            .get(&self.camera.snapshot_url)
            .query("cmd", "Snap")
            .query("channel", &self.camera.channel.to_string())
            .query("rs", &cache_buster)
            .query("user", user)
            .query("password", password)
            .call()
            .map_err(describe_error)?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(self.max_frame_bytes + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| GateError::FetchError(format!("reading snapshot body: {}", e)))?;

        if bytes.len() as u64 > self.max_frame_bytes {
            return Err(GateError::FetchError(format!(
                "snapshot exceeds {} bytes",
                self.max_frame_bytes
            )));
        }

        Ok(bytes)
    }
}

impl FrameSource for HttpFrameSource {
    fn acquire(&self) -> Result<RgbImage> {
        info!("Getting picture from camera...");
        let bytes = self.fetch_bytes()?;
        let frame = decode_frame(&bytes)?;
        info!("Got image from camera.");
        Ok(frame)
    }
}

// ureq error strings embed the request URL, which carries the password.
fn describe_error(err: ureq::Error) -> GateError {
    match err {
        ureq::Error::Status(code, response) => GateError::FetchError(format!(
            "camera returned HTTP {} {}",
            code,
            response.status_text()
        )),
        ureq::Error::Transport(transport) => GateError::FetchError(match transport.message() {
            Some(message) => format!("{}: {}", transport.kind(), message),
            None => transport.kind().to_string(),
        }),
    }
}
