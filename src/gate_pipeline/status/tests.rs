use std::sync::{Arc, Mutex};

use image::{Rgb, RgbImage};

use crate::gate_pipeline::common::error::{GateError, Result};
use crate::gate_pipeline::config::{GateConfig, RoiQuad};
use crate::gate_pipeline::acquisition::FrameSource;
use crate::gate_pipeline::analysis::{self, GateRect};
use crate::gate_pipeline::debug::{DebugArtifact, DebugSink, DebugStage, NoopDebugSink};
use crate::gate_pipeline::status::GateStatusPipeline;

const BRIGHT: Rgb<u8> = Rgb([200, 200, 200]);
const DARK: Rgb<u8> = Rgb([20, 20, 20]);

enum MockFrame {
    Frame(RgbImage),
    MissingCredentials,
    FetchFailure,
}

struct MockSource {
    frame: MockFrame,
}

impl FrameSource for MockSource {
    fn acquire(&self) -> Result<RgbImage> {
        match &self.frame {
            MockFrame::Frame(frame) => Ok(frame.clone()),
            MockFrame::MissingCredentials => Err(GateError::MissingCredentials),
            MockFrame::FetchFailure => Err(GateError::FetchError("Mock fetch error".to_string())),
        }
    }
}

#[derive(Default)]
struct RecordingSink {
    should_fail: bool,
    written: Arc<Mutex<Vec<(String, DebugStage, (u32, u32))>>>,
}

impl DebugSink for RecordingSink {
    fn persist(&self, id: &str, stage: DebugStage, artifact: DebugArtifact<'_>) -> Result<()> {
        if self.should_fail {
            return Err(GateError::DebugWriteError("Mock write error".to_string()));
        }
        self.written.lock().unwrap().push((id.to_string(), stage, artifact.dimensions()));
        Ok(())
    }
}

/// 620x320 frame; the ROI is its top-left 600x300 region so every sample
/// stays inside the frame.
fn frame_with_bar(bar: Option<std::ops::Range<u32>>) -> RgbImage {
    RgbImage::from_fn(620, 320, |x, _| match &bar {
        Some(cols) if cols.contains(&x) => DARK,
        _ => BRIGHT,
    })
}

fn test_config() -> GateConfig {
    GateConfig::builder()
        .roi(RoiQuad::new([0.0, 0.0], [0.0, 300.0], [600.0, 300.0], [600.0, 0.0]))
        .build()
}

fn pipeline_for(frame: MockFrame, sink: RecordingSink) -> GateStatusPipeline<MockSource, RecordingSink> {
    GateStatusPipeline::with_custom(MockSource { frame }, sink, test_config()).unwrap()
}

#[test]
fn test_bright_frame_reports_open_gate() {
    let pipeline = pipeline_for(MockFrame::Frame(frame_with_bar(None)), RecordingSink::default());
    let status = pipeline.status(false).unwrap();

    assert_eq!(status.slats, 0);
    assert_eq!(status.gate_rect, GateRect::NOT_DETECTED);
    assert_eq!(status.percentage_gate_fill, 0.0);
    assert_eq!(status.gap_size, 3.2);
    assert!(!status.day);
    assert!(status.runtime >= 0.0);
    assert!(uuid::Uuid::parse_str(&status.id).is_ok());
}

#[test]
fn test_single_bar_frame() {
    let pipeline = pipeline_for(MockFrame::Frame(frame_with_bar(Some(100..106))), RecordingSink::default());
    let status = pipeline.status(false).unwrap();

    assert_eq!(status.slats, 1);
    assert_eq!(status.gate_rect.min_x, 100, "rect {:?}", status.gate_rect);
    assert_eq!(status.gate_rect.min_y, 0);
    assert_eq!(status.gate_rect.max_y, 300);
    assert!((status.percentage_gate_fill - (1.0 - 100.0 / 513.0)).abs() < 1e-12);
}

#[test]
fn test_closed_gate_with_slat_on_roi_edge() {
    // The ROI starts at the frame's first column, where the leftmost slat sits.
    let pipeline = pipeline_for(MockFrame::Frame(frame_with_bar(Some(0..6))), RecordingSink::default());
    let status = pipeline.status(false).unwrap();

    assert_eq!(status.slats, 1);
    assert_eq!(status.gate_rect.min_x, 0);
    assert_eq!(status.percentage_gate_fill, 1.0);
    assert_eq!(status.gap_size, 0.0);
}

#[test]
fn test_noop_sink_accepts_debug_requests() {
    let pipeline = GateStatusPipeline::with_custom(
        MockSource { frame: MockFrame::Frame(frame_with_bar(Some(100..106))) },
        NoopDebugSink,
        test_config(),
    )
    .unwrap();

    let status = pipeline.status(true).unwrap();
    assert_eq!(status.slats, 1);
    assert_eq!(status.gate_rect.min_x, 100);
}

#[test]
fn test_each_request_gets_a_fresh_id() {
    let pipeline = pipeline_for(MockFrame::Frame(frame_with_bar(None)), RecordingSink::default());
    let first = pipeline.status(false).unwrap();
    let second = pipeline.status(false).unwrap();
    assert_ne!(first.id, second.id);
}

#[test]
fn test_debug_persists_every_stage() {
    let written = Arc::new(Mutex::new(Vec::new()));
    let sink = RecordingSink { should_fail: false, written: written.clone() };
    let pipeline = pipeline_for(MockFrame::Frame(frame_with_bar(Some(100..106))), sink);

    let status = pipeline.status(true).unwrap();

    let written = written.lock().unwrap();
    let stages: Vec<DebugStage> = written.iter().map(|(_, stage, _)| *stage).collect();
    assert_eq!(stages, DebugStage::ALL.to_vec());
    assert!(written.iter().all(|(id, _, _)| *id == status.id));
    assert_eq!(written[0].2, (620, 320));
    assert!(written[1..].iter().all(|(_, _, dims)| *dims == (600, 300)));
}

#[test]
fn test_debug_off_writes_nothing() {
    let written = Arc::new(Mutex::new(Vec::new()));
    let sink = RecordingSink { should_fail: false, written: written.clone() };
    let pipeline = pipeline_for(MockFrame::Frame(frame_with_bar(None)), sink);

    pipeline.status(false).unwrap();
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_debug_write_failure_does_not_fail_request() {
    let sink = RecordingSink { should_fail: true, ..Default::default() };
    let with_failing_sink = pipeline_for(MockFrame::Frame(frame_with_bar(Some(100..106))), sink);
    let plain = pipeline_for(MockFrame::Frame(frame_with_bar(Some(100..106))), RecordingSink::default());

    let debugged = with_failing_sink.status(true).unwrap();
    let reference = plain.status(false).unwrap();
    assert_eq!(debugged.slats, reference.slats);
    assert_eq!(debugged.gate_rect, reference.gate_rect);
    assert_eq!(debugged.percentage_gate_fill, reference.percentage_gate_fill);
}

#[test]
fn test_missing_credentials_propagate() {
    let written = Arc::new(Mutex::new(Vec::new()));
    let sink = RecordingSink { should_fail: false, written: written.clone() };
    let pipeline = pipeline_for(MockFrame::MissingCredentials, sink);

    let result = pipeline.status(true);
    assert!(matches!(result, Err(GateError::MissingCredentials)));
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_fetch_failure_propagates() {
    let pipeline = pipeline_for(MockFrame::FetchFailure, RecordingSink::default());
    let err = pipeline.status(false).unwrap_err();
    assert!(matches!(err, GateError::FetchError(_)));
    assert!(err.is_acquisition());
}

#[test]
fn test_invalid_config_rejected_at_construction() {
    let config = GateConfig::builder().slat_kernel_height(0).build();
    let result = GateStatusPipeline::with_custom(
        MockSource { frame: MockFrame::Frame(frame_with_bar(None)) },
        RecordingSink::default(),
        config,
    );
    assert!(matches!(result, Err(GateError::InvalidConfig(_))));
}

#[test]
fn test_timings_cover_every_stage() {
    let pipeline = pipeline_for(MockFrame::Frame(frame_with_bar(None)), RecordingSink::default());
    let (_, timings) = pipeline.status_with_timings(false).unwrap();

    let names: Vec<&str> = timings.stages().iter().map(|s| s.stage).collect();
    assert_eq!(names, vec!["acquire", "illumination", "roi", "threshold", "slats", "geometry", "gap"]);
    assert!(timings.get("geometry").is_some());
}

#[test]
fn test_status_serialises_with_expected_fields() {
    let pipeline = pipeline_for(MockFrame::Frame(frame_with_bar(None)), RecordingSink::default());
    let status = pipeline.status(false).unwrap();

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["slats"], 0);
    assert_eq!(json["day"], false);
    assert_eq!(json["gate_rect"], serde_json::json!([[-1, -1], [0, 0]]));
    assert_eq!(json["gap_size"], 3.2);
    for field in ["id", "percentage_gate_fill", "runtime"] {
        assert!(json.get(field).is_some(), "missing {}", field);
    }
}

// Stage-level scenarios on an already rectified ROI.

#[test]
fn test_bright_roi_scenario() {
    let config = GateConfig::default();
    let roi = RgbImage::from_pixel(521, 274, BRIGHT);

    let mask = analysis::dark_mask(&roi, config.day_threshold, config.median_kernel_size);
    assert!(mask.pixels().all(|p| p[0] == 0));

    let vert = analysis::isolate_slats(&mask, config.slat_kernel_height);
    let geometry = analysis::extract_geometry(&vert, config.min_slat_height);
    assert!(geometry.slats.is_empty());
    assert_eq!(geometry.rect, GateRect::NOT_DETECTED);

    let estimate = analysis::estimate_gap(geometry.rect.min_x, config.closed_gate_width, config.full_gap);
    assert_eq!(estimate.percentage_gate_fill, 0.0);
    assert_eq!(estimate.gap_size, 3.2);
}

#[test]
fn test_single_bar_roi_scenario() {
    let config = GateConfig::default();
    let roi = RgbImage::from_fn(521, 300, |x, _| if (100..106).contains(&x) { DARK } else { BRIGHT });

    let mask = analysis::dark_mask(&roi, config.day_threshold, config.median_kernel_size);
    let vert = analysis::isolate_slats(&mask, config.slat_kernel_height);
    let geometry = analysis::extract_geometry(&vert, config.min_slat_height);

    assert_eq!(geometry.slats.len(), 1);
    assert_eq!(geometry.rect, GateRect { min_x: 100, min_y: 0, max_x: 106, max_y: 300 });

    let estimate = analysis::estimate_gap(geometry.rect.min_x, config.closed_gate_width, config.full_gap);
    assert!((estimate.percentage_gate_fill - (1.0 - 100.0 / 513.0)).abs() < 1e-12);
    assert!((estimate.percentage_gate_fill - 0.8051).abs() < 1e-4);
}
