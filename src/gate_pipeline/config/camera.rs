use serde::Deserialize;

use crate::gate_pipeline::common::error::{GateError, Result};

pub const DEFAULT_SNAPSHOT_URL: &str = "http://driveway.cam.bhop.local/cgi-bin/api.cgi";

const USER_VAR: &str = "CAM_USER";
const PASSWORD_VAR: &str = "CAM_PWD";
const URL_VAR: &str = "CAM_SNAPSHOT_URL";

/// Camera endpoint and the credentials used to authenticate against it.
///
/// Credentials stay optional here so that a missing value is reported per
/// request, before any network I/O, rather than at startup.
#[derive(Clone, Deserialize)]
pub struct CameraConfig {
    pub snapshot_url: String,
    #[serde(default)]
    pub channel: u32,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl CameraConfig {
    pub fn new(snapshot_url: impl Into<String>) -> Self {
        Self {
            snapshot_url: snapshot_url.into(),
            channel: 0,
            username: None,
            password: None,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Reads `CAM_USER`, `CAM_PWD` and optionally `CAM_SNAPSHOT_URL`.
    pub fn from_env() -> Self {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            snapshot_url: non_empty(URL_VAR).unwrap_or_else(|| DEFAULT_SNAPSHOT_URL.to_string()),
            channel: 0,
            username: non_empty(USER_VAR),
            password: non_empty(PASSWORD_VAR),
        }
    }

    /// Returns `(username, password)`, failing if either is absent or empty.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(password)) if !user.is_empty() && !password.is_empty() => {
                Ok((user, password))
            }
            _ => Err(GateError::MissingCredentials),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_URL)
    }
}

// Keeps the password out of logs.
impl std::fmt::Debug for CameraConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraConfig")
            .field("snapshot_url", &self.snapshot_url)
            .field("channel", &self.channel)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}
