//! Reading transcript JSONL files into a [`SessionState`].

use std::path::Path;

use thiserror::Error;

use crate::state::SessionState;

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Line counts from one accumulation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub processed: usize,
    pub skipped: usize,
}

/// Reads a transcript file fully and folds every record into a fresh state.
pub fn read_transcript(path: &Path) -> Result<SessionState, TranscriptError> {
    let bytes = std::fs::read(path)?;
    let mut state = SessionState::new();
    let summary = accumulate(&mut state, &bytes);
    tracing::debug!(
        path = %path.display(),
        processed = summary.processed,
        skipped = summary.skipped,
        tool_ops = state.tool_ops.len(),
        "transcript accumulated"
    );
    Ok(state)
}

/// Folds newline-delimited records into `state`, skipping blank and malformed lines.
pub fn accumulate(state: &mut SessionState, bytes: &[u8]) -> PassSummary {
    let mut summary = PassSummary::default();
    for line in bytes.split(|&b| b == b'\n') {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        if state.process_line(line) {
            summary.processed += 1;
        } else {
            summary.skipped += 1;
        }
    }
    summary
}
