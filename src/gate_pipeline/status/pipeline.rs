use std::path::Path;
use std::time::Instant;

use image::RgbImage;
use tracing::{debug, info, instrument, warn};

use crate::gate_pipeline::{
    common::error::Result,
    config::{CameraConfig, GateConfig},
    acquisition::{FrameSource, HttpFrameSource},
    analysis,
    debug::{DebugArtifact, DebugSink, DebugStage, FileDebugSink},
    status::{GateStatus, PipelineTimings},
};

/// Estimates the gate opening from one frame per request.
///
/// The frame source and debug sink are the only collaborators with side
/// effects; every analysis stage is a pure function of its input and the
/// calibration in [`GateConfig`]. A pipeline holds no per-request state, so
/// one instance can serve concurrent requests.
pub struct GateStatusPipeline<S: FrameSource, D: DebugSink> {
    source: S,
    sink: D,
    config: GateConfig,
}

impl GateStatusPipeline<HttpFrameSource, FileDebugSink> {
    pub fn new<P: AsRef<Path>>(config: GateConfig, camera: CameraConfig, debug_dir: P) -> Result<Self> {
        Self::with_custom(HttpFrameSource::new(camera), FileDebugSink::new(debug_dir), config)
    }
}

impl<S: FrameSource, D: DebugSink> GateStatusPipeline<S, D> {
    pub fn with_custom(source: S, sink: D, config: GateConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source,
            sink,
            config,
        })
    }

    pub fn status(&self, save_artifacts: bool) -> Result<GateStatus> {
        self.status_with_timings(save_artifacts).map(|(status, _)| status)
    }

    #[instrument(skip(self), fields(id = tracing::field::Empty))]
    pub fn status_with_timings(&self, save_artifacts: bool) -> Result<(GateStatus, PipelineTimings)> {
        let id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        tracing::Span::current().record("id", id.as_str());

        let mut timings = PipelineTimings::new();

        let frame = timings.time("acquire", || self.source.acquire())?;
        self.persist(save_artifacts, &id, DebugStage::Source, DebugArtifact::Color(&frame));

        let mut status = self.analyze(&id, &frame, save_artifacts, &mut timings);
        status.runtime = started.elapsed().as_secs_f64();

        info!(
            slats = status.slats,
            fill = status.percentage_gate_fill,
            gap = status.gap_size,
            runtime = status.runtime,
            "Gate status complete"
        );
        Ok((status, timings))
    }

    /// Runs every stage after acquisition on `frame`.
    fn analyze(&self, id: &str, frame: &RgbImage, save_artifacts: bool, timings: &mut PipelineTimings) -> GateStatus {
        let config = &self.config;

        let day = timings.time("illumination", || analysis::is_day(frame));
        info!("Day = {}", day);

        let roi = timings.time("roi", || analysis::rectify(frame, &config.roi));
        self.persist(save_artifacts, id, DebugStage::Roi, DebugArtifact::Color(&roi));

        let upper = config.threshold_for(day);
        debug!(?upper, "Dark threshold");
        let thresh = timings.time("threshold", || {
            analysis::dark_mask(&roi, upper, config.median_kernel_size)
        });
        self.persist(save_artifacts, id, DebugStage::Threshold, DebugArtifact::Mask(&thresh));

        let vert = timings.time("slats", || {
            analysis::isolate_slats(&thresh, config.slat_kernel_height)
        });
        self.persist(save_artifacts, id, DebugStage::Vertical, DebugArtifact::Mask(&vert));

        let geometry = timings.time("geometry", || {
            analysis::extract_geometry(&vert, config.min_slat_height)
        });
        if save_artifacts {
            let canvas = analysis::render_geometry(&geometry, vert.width(), vert.height());
            self.persist(save_artifacts, id, DebugStage::Result, DebugArtifact::Color(&canvas));
        }

        let gate_left_edge = geometry.rect.min_x;
        info!("Gate left edge = {}", gate_left_edge);
        let estimate = timings.time("gap", || {
            analysis::estimate_gap(gate_left_edge, config.closed_gate_width, config.full_gap)
        });

        GateStatus {
            id: id.to_string(),
            slats: geometry.slats.len(),
            percentage_gate_fill: estimate.percentage_gate_fill,
            gap_size: estimate.gap_size,
            day,
            gate_rect: geometry.rect,
            runtime: 0.0,
        }
    }

    // Best-effort: a failed write is logged and never fails the request.
    fn persist(&self, save_artifacts: bool, id: &str, stage: DebugStage, artifact: DebugArtifact<'_>) {
        if !save_artifacts {
            return;
        }
        match self.sink.persist(id, stage, artifact) {
            Ok(()) => debug!(stage = stage.name(), "Persisted debug artifact"),
            Err(e) => warn!(stage = stage.name(), error = %e, "Failed to persist debug artifact"),
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }
}
