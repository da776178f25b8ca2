// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! ROICAP - Region Of Interest Capture
//!
//! An interactive tool for building labeled image datasets from a live
//! camera feed: a fixed-size ROI outline follows the cursor over the
//! preview, a click saves that region as a PNG plus an index row, and key
//! presses switch the label applied to subsequent captures. An auxiliary
//! mode overlays fiducial-marker detection on the same feed.

mod app;
mod error;
mod io;
mod markers;
mod models;
mod ui;
mod util;

use anyhow::Result;
use app::CaptureSession;
use error::CaptureError;
use io::camera::Camera;
use io::dataset::DatasetIndex;
use io::serialization;
use markers::MarkerDetector;
use models::config::CaptureConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

const USAGE: &str = "usage: roicap <device-index> <output-dir> [--markers] [--config PATH]
  device-index   camera index to open; a negative value probes 0..N in order
  output-dir     directory receiving the dataset index and image files
  --markers      overlay fiducial-marker detection on the preview
  --config PATH  session configuration (YAML or JSON)";

/// Parsed command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CliArgs {
    device: Option<i32>,
    output_dir: PathBuf,
    markers: bool,
    config: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<CliArgs, CaptureError> {
    let mut positional = Vec::new();
    let mut markers = false;
    let mut config = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--markers" => markers = true,
            "--config" => {
                let path = iter.next().ok_or_else(|| {
                    CaptureError::ArgumentError("--config requires a path".to_string())
                })?;
                config = Some(PathBuf::from(path));
            }
            other if other.starts_with("--") => {
                return Err(CaptureError::ArgumentError(format!(
                    "unknown flag: {}",
                    other
                )));
            }
            other => positional.push(other.to_string()),
        }
    }

    if positional.len() != 2 {
        return Err(CaptureError::ArgumentError(
            "expected <device-index> and <output-dir>".to_string(),
        ));
    }
    let index: i32 = positional[0].parse().map_err(|_| {
        CaptureError::ArgumentError(format!("invalid device index: {}", positional[0]))
    })?;

    Ok(CliArgs {
        device: (index >= 0).then_some(index),
        output_dir: PathBuf::from(&positional[1]),
        markers,
        config,
    })
}

fn run(args: CliArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => serialization::load_config(path)?,
        None => CaptureConfig::default(),
    };

    // The device must open before any dataset file is touched; probe
    // exhaustion leaves a pre-created output directory empty.
    let camera = Camera::acquire(
        args.device,
        config.probe_attempts,
        Duration::from_millis(config.settle_ms),
    )?;
    log::info!("Camera opened successfully (index {})", camera.index());

    let dataset = DatasetIndex::open(&args.output_dir)?;
    log::info!("Dataset index at {}", dataset.index_path().display());
    let detector = args.markers.then(MarkerDetector::new).transpose()?;

    CaptureSession::new(camera, dataset, config, detector).run()
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
