//! Context command: token usage from the last `/context` report.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use meter_core::read_context_usage;

/// Writes the last context report in the transcript as a single JSON line.
///
/// Prints nothing when there is no path, no file, no readable content, or no
/// report with usable values.
pub fn run<W: Write>(writer: &mut W, path: Option<&Path>, now: DateTime<Utc>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    if !path.exists() {
        tracing::debug!(path = %path.display(), "transcript not found");
        return Ok(());
    }

    let usage = match read_context_usage(path, now) {
        Ok(usage) => usage,
        Err(e) => {
            tracing::debug!(error = %e, "failed to read transcript");
            return Ok(());
        }
    };

    if usage.has_values() {
        serde_json::to_writer(&mut *writer, &usage)?;
        writeln!(writer)?;
    }
    Ok(())
}
