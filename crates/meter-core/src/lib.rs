//! Core logic for the session meter.
//!
//! This crate turns a Claude Code transcript into status line metrics:
//! - Accumulation: a single pass over transcript records into [`SessionState`]
//! - Metrics: timing, stride, mode, focus and infra computed from that state
//! - Context usage: token counts from the last `/context` report

pub mod bash;
pub mod config;
pub mod context;
pub mod event;
pub mod metrics;
pub mod state;
mod tally;
pub mod timestamp;
pub mod transcript;

pub use bash::{CommandKind, classify_command};
pub use config::{MeterConfig, ModeConfig};
pub use context::{ContextUsage, parse_context_usage, read_context_usage};
pub use event::{EventKind, RecordError, TranscriptEvent};
pub use metrics::{
    ActivityMode, FocusMetrics, FocusState, InfraMetrics, Mode, SessionMetrics, StrideMetrics,
    TimingMetrics,
};
pub use state::{FocusEntry, SessionState, Speaker, ToolOp};
pub use tally::Tally;
pub use timestamp::{parse_timestamp, to_epoch_seconds};
pub use transcript::{PassSummary, TranscriptError, accumulate, read_transcript};
