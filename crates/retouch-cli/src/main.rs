// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Retouch — command line front end.
//
// Entry point. Initialises logging, loads the service configuration, and runs
// a single transform from an input file to an output file through the same
// upload/transform path the service exposes.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use retouch_core::ServiceConfig;
use retouch_core::error::Result;
use retouch_core::types::{AdjustmentParameters, GeometryOp, OutputFormat};
use retouch_engine::codec;
use retouch_service::{ImageService, Transform};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "retouch")]
#[command(about = "Apply a tonal, resize, rotate/flip, or edge-detection pass to an image")]
#[command(version)]
struct Cli {
    /// JSON service configuration; missing file means defaults
    #[arg(long, global = true, default_value = "retouch.json")]
    config: PathBuf,

    /// Output container (png, jpg); inferred from the output extension if omitted
    #[arg(long, global = true)]
    format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct Files {
    /// Source image
    #[arg(short, long)]
    input: PathBuf,

    /// Destination image
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Brightness, contrast, gamma, then saturation
    Adjust {
        #[command(flatten)]
        files: Files,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        brightness: f32,
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        contrast: f32,
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        gamma: f32,
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        saturation: f32,
    },
    /// Bilinear resize by a uniform factor
    Resize {
        #[command(flatten)]
        files: Files,
        #[arg(long)]
        scale: f64,
    },
    /// Rotate and flip: r (clockwise), -r (counter-clockwise), vf, hf
    Geometry {
        #[command(flatten)]
        files: Files,
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        operations: Vec<String>,
    },
    /// Sobel edge magnitude
    Edges {
        #[command(flatten)]
        files: Files,
    },
}

impl Command {
    fn files(&self) -> &Files {
        match self {
            Self::Adjust { files, .. }
            | Self::Resize { files, .. }
            | Self::Geometry { files, .. }
            | Self::Edges { files } => files,
        }
    }

    fn transform(&self) -> Result<Transform> {
        Ok(match self {
            Self::Adjust {
                brightness,
                contrast,
                gamma,
                saturation,
                ..
            } => Transform::Adjust(AdjustmentParameters {
                brightness: *brightness,
                contrast: *contrast,
                gamma: *gamma,
                saturation: *saturation,
            }),
            Self::Resize { scale, .. } => Transform::Resize { scale: *scale },
            Self::Geometry { operations, .. } => {
                Transform::Geometry(GeometryOp::parse_all(operations)?)
            }
            Self::Edges { .. } => Transform::Edges,
        })
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "retouch failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = ServiceConfig::load_or_default(&cli.config)?;
    let files = cli.command.files();
    let format = output_format(cli.format.as_deref(), &files.output, config.output_format)?;

    let transform = cli.command.transform()?;
    let service = ImageService::in_memory(config);

    let data = std::fs::read(&files.input)?;
    let upload = service.upload_bytes(&data)?;
    let result = service.transform(&upload.image_id, &transform)?;
    std::fs::write(&files.output, codec::encode(&result, format)?)?;

    info!(
        transform = transform.name(),
        output = %files.output.display(),
        width = result.width(),
        height = result.height(),
        "written"
    );
    Ok(())
}

/// `--format` wins, then the output extension, then the configured default.
fn output_format(flag: Option<&str>, output: &Path, configured: OutputFormat) -> Result<OutputFormat> {
    if let Some(name) = flag {
        return OutputFormat::parse(name);
    }
    let inferred = output
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| OutputFormat::parse(ext).ok());
    Ok(inferred.unwrap_or(configured))
}
