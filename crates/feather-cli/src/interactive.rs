//! Interactive parameter entry.
//!
//! Each prompt shows the current value in brackets; an empty answer (or end
//! of input) keeps it.

use anyhow::{Context, Result};
use feather_ops::BlurParams;
use std::io::{BufRead, Write};

/// Asks for x, y, size, kernel size and iterations, updating `params`.
pub fn prompt_params<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    params: &mut BlurParams,
) -> Result<()> {
    params.x = ask(input, out, "x", params.x)?;
    params.y = ask(input, out, "y", params.y)?;
    params.size = ask(input, out, "size", params.size)?;
    params.kernel_size = ask(input, out, "kernel size", params.kernel_size)?;
    params.iterations = ask(input, out, "iterations", params.iterations)?;
    Ok(())
}

fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str, current: u32) -> Result<u32> {
    write!(out, "{} [{}]: ", label, current)?;
    out.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .with_context(|| format!("Failed to read {}", label))?;

    let answer = line.trim();
    if answer.is_empty() {
        return Ok(current);
    }
    answer
        .parse()
        .with_context(|| format!("invalid value for {}: '{}'", label, answer))
}
