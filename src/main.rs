use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gate_status_rs::gate_pipeline::{
    CameraConfig, DebugSink, FileDebugSink, FileFrameSource, FrameSource, GateConfig,
    GateStatusPipeline, HttpFrameSource, NoopDebugSink,
};
use gate_status_rs::logger;

use tracing::{error, info};

#[derive(Parser)]
#[command(name = "gate_status")]
#[command(about = "Estimate how far the gate is open from a camera snapshot")]
#[command(version)]
struct Cli {
    /// Persist intermediate images for this request.
    #[arg(long)]
    debug: bool,

    /// Directory debug images are written to.
    #[arg(long, default_value = "debug")]
    debug_dir: PathBuf,

    /// Analyse a saved frame instead of fetching one from the camera.
    #[arg(long)]
    image: Option<PathBuf>,

    /// JSON file overriding calibration values (ROI, thresholds, kernel sizes).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log a per-stage timing summary.
    #[arg(long)]
    timings: bool,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<GateConfig> {
    let Some(path) = path else {
        return Ok(GateConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading calibration file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing calibration file {}", path.display()))
}

fn run<S: FrameSource, D: DebugSink>(pipeline: GateStatusPipeline<S, D>, cli: &Cli) -> anyhow::Result<()> {
    let (status, timings) = pipeline.status_with_timings(cli.debug)?;
    if cli.timings {
        timings.log_summary();
    }
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

/// Artifacts only touch the filesystem when `--debug` is given.
fn run_with_sink<S: FrameSource>(source: S, config: GateConfig, cli: &Cli) -> anyhow::Result<()> {
    if cli.debug {
        let sink = FileDebugSink::new(&cli.debug_dir);
        run(GateStatusPipeline::with_custom(source, sink, config)?, cli)
    } else {
        run(GateStatusPipeline::with_custom(source, NoopDebugSink, config)?, cli)
    }
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    info!("Starting gate_status...");
    info!("ROI: {:?}", config.roi.corners());
    info!(
        "Debug artifacts: {}",
        if cli.debug {
            cli.debug_dir.display().to_string()
        } else {
            "disabled".to_string()
        }
    );

    let result = match &cli.image {
        Some(path) => run_with_sink(FileFrameSource::new(path), config, &cli),
        None => run_with_sink(HttpFrameSource::new(CameraConfig::from_env()), config, &cli),
    };

    if let Err(e) = &result {
        error!("Gate status failed: {:#}", e);
    }
    result
}
