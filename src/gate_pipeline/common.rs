//! Common utilities module
//!
//! This module contains shared utilities used across the gate pipeline.

pub mod error;

pub use error::{GateError, Result};
