//! Frame acquisition module
//!
//! This module provides the sources a raw camera frame can be obtained from.

mod source;
mod http_source;
mod file_source;

pub use source::{FrameSource, decode_frame};
pub use http_source::HttpFrameSource;
pub use file_source::FileFrameSource;
