//! Blur command
//!
//! Loads the input, runs the feathered blur and writes a PNG.

use crate::Cli;
use anyhow::{Context, Result};
use feather_ops::{apply, BlurParams};
use std::path::Path;
#[allow(unused_imports)]
use tracing::{debug, info, trace};

pub fn run(cli: &Cli) -> Result<()> {
    trace!(input = %cli.input.display(), interactive = cli.interactive, "blur::run");

    let mut params = cli.params();
    if cli.interactive {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        crate::interactive::prompt_params(&mut stdin.lock(), &mut stdout.lock(), &mut params)?;
    }
    params.validate().context("Invalid parameters")?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| super::derive_output_path(&cli.input));

    let summary = blur_file(&cli.input, &output, &params)?;
    println!("{}", summary);
    Ok(())
}

/// Blurs `input` into `output` and returns the summary line.
pub fn blur_file(input: &Path, output: &Path, params: &BlurParams) -> Result<String> {
    let image = super::load_image(input)?;
    info!(
        width = image.width(),
        height = image.height(),
        channels = image.channels(),
        x = params.x,
        y = params.y,
        size = params.size,
        "Applying feathered blur"
    );

    let outcome = apply(&image, params).context("Blur failed")?;
    debug!(region = %outcome.report.region, "Blurred region");

    super::save_image(output, &outcome.image)?;

    let (x, y) = params.clamped_anchor(image.width(), image.height());
    Ok(format!(
        "Wrote: {} ({}x{}x{}) (x={}, y={}, size={}) to {} in {:.3}s",
        input.display(),
        image.width(),
        image.height(),
        image.channels(),
        x,
        y,
        params.size,
        output.display(),
        outcome.report.convolve_time.as_secs_f64()
    ))
}
