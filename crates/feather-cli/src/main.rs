//! feather - blur a square region of an image with a feathered edge
//!
//! Reads a PNG or JPEG, blurs the region around (x, y) and writes a PNG.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use feather_ops::{Anchor, BlurParams, KernelShape};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod interactive;

#[derive(Parser, Debug)]
#[command(name = "feather")]
#[command(author, version, about = "Blur a square image region with a feathered edge")]
#[command(long_about = "
Blurs a square region of an image and blends it back through a radial
mask, so the blur fades out toward the region's edge.

Examples:
  feather photo.jpg -x 320 -y 240 -s 64          # writes photo_out.png
  feather photo.png -x 10 -y 10 -s 32 -k 7 -n 3 -o soft.png
  feather photo.png --anchor top-left -x 0 -y 0 -s 100
  feather photo.png -i                           # prompt for the numbers
")]
struct Cli {
    /// Input image (PNG or JPEG)
    input: PathBuf,

    /// Output image (default: <input stem>_out.png in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Region X coordinate in pixels
    #[arg(short, default_value = "0")]
    x: u32,

    /// Region Y coordinate in pixels
    #[arg(short, default_value = "0")]
    y: u32,

    /// Side length of the blurred region
    #[arg(short, long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..))]
    size: u32,

    /// Side length of the kernel and feather mask
    #[arg(short, long = "kernel", default_value = "5", value_parser = clap::value_parser!(u32).range(1..))]
    kernel_size: u32,

    /// Number of blur passes
    #[arg(short = 'n', long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    iterations: u32,

    /// Kernel weighting
    #[arg(long, value_enum, default_value_t = ShapeArg::Gaussian)]
    kernel_shape: ShapeArg,

    /// Whether (x, y) is the region's center or its top-left corner
    #[arg(long, value_enum, default_value_t = AnchorArg::Center)]
    anchor: AnchorArg,

    /// Prompt for x, y, size, kernel size and iterations
    #[arg(short, long)]
    interactive: bool,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ShapeArg {
    Box,
    Tent,
    Gaussian,
}

impl From<ShapeArg> for KernelShape {
    fn from(shape: ShapeArg) -> Self {
        match shape {
            ShapeArg::Box => KernelShape::Box,
            ShapeArg::Tent => KernelShape::Tent,
            ShapeArg::Gaussian => KernelShape::Gaussian,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum AnchorArg {
    Center,
    TopLeft,
}

impl From<AnchorArg> for Anchor {
    fn from(anchor: AnchorArg) -> Self {
        match anchor {
            AnchorArg::Center => Anchor::Center,
            AnchorArg::TopLeft => Anchor::TopLeft,
        }
    }
}

impl Cli {
    /// Blur parameters as given on the command line.
    fn params(&self) -> BlurParams {
        BlurParams::at(self.x, self.y)
            .with_size(self.size)
            .with_kernel_size(self.kernel_size)
            .with_iterations(self.iterations)
            .with_kernel_shape(self.kernel_shape.into())
            .with_anchor(self.anchor.into())
    }
}

/// Installs the stderr subscriber, plus a file writer when requested.
///
/// `RUST_LOG` overrides the level chosen by `-v`.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let stderr = fmt::layer().with_writer(std::io::stderr).with_target(false);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .try_init()
                .context("Failed to install logger")?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .try_init()
                .context("Failed to install logger")?;
            Ok(None)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Keeps the file writer flushing until exit.
    let _guard = match init_logging(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match commands::blur::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
