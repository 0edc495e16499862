//! Per-stage wall-clock timing for one status request.

use std::time::{Duration, Instant};

use tracing::info;

/// Duration of one named pipeline stage.
#[derive(Debug, Clone, Copy)]
pub struct StageTiming {
    pub stage: &'static str,
    pub duration: Duration,
}

/// Stage timings in execution order.
#[derive(Debug, Default)]
pub struct PipelineTimings {
    stages: Vec<StageTiming>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` inside an `info` span named after the stage and records how
    /// long it took.
    pub fn time<T>(&mut self, stage: &'static str, f: impl FnOnce() -> T) -> T {
        let span = tracing::info_span!("stage", name = stage);
        let started = Instant::now();
        let out = span.in_scope(f);
        self.stages.push(StageTiming {
            stage,
            duration: started.elapsed(),
        });
        out
    }

    pub fn stages(&self) -> &[StageTiming] {
        &self.stages
    }

    pub fn get(&self, stage: &str) -> Option<Duration> {
        self.stages.iter().find(|s| s.stage == stage).map(|s| s.duration)
    }

    pub fn total(&self) -> Duration {
        self.stages.iter().map(|s| s.duration).sum()
    }

    pub fn log_summary(&self) {
        let total = self.total().as_secs_f64();
        for timing in &self.stages {
            let secs = timing.duration.as_secs_f64();
            let share = if total > 0.0 { secs / total * 100.0 } else { 0.0 };
            info!(stage = timing.stage, ms = secs * 1000.0, percent = share, "stage timing");
        }
        info!(ms = total * 1000.0, "total stage time");
    }
}
