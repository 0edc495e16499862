//! Frame analysis module
//!
//! Pure stages that turn a raw camera frame into a gate opening estimate.
//! Each stage takes its input by reference and returns a new value; none of
//! them perform I/O.

pub mod illumination;
pub mod perspective;
pub mod segment;
pub mod slats;
pub mod geometry;
pub mod gap;

pub use illumination::{channel_means, is_day};
pub use perspective::{output_size, rectify};
pub use segment::dark_mask;
pub use slats::{dilate_vertical, erode_vertical, isolate_slats};
pub use geometry::{BoundingBox, GateGeometry, GateRect, Slat, aggregate_rect, extract_geometry, render_geometry};
pub use gap::{GapEstimate, NO_DETECTION_EDGE, estimate_gap};
