//! Transcript command: session metrics for the status line.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use meter_core::{MeterConfig, SessionMetrics, read_transcript};

/// Output format for metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `T_*=value` lines for shell `eval`.
    Shell,
    Json,
}

/// Computes metrics for the transcript at `path` and writes them to `writer`.
///
/// A missing path or file is not an error: a `#` note goes to stderr and
/// nothing is written. `now` is epoch seconds.
pub fn run<W: Write>(
    writer: &mut W,
    path: Option<&Path>,
    config: &MeterConfig,
    format: Format,
    now: f64,
) -> Result<()> {
    let Some(path) = path else {
        eprintln!("# No transcript path provided");
        return Ok(());
    };
    if !path.exists() {
        eprintln!("# Transcript not found: {}", path.display());
        return Ok(());
    }

    let state = read_transcript(path)
        .with_context(|| format!("failed to read transcript {}", path.display()))?;
    let metrics = SessionMetrics::compute(&state, config, now);
    tracing::debug!(mode = %metrics.mode, "computed session metrics");

    match format {
        Format::Shell => crate::output::write_assignments(writer, &metrics)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut *writer, &metrics)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}
