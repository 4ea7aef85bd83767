//! Single-pass session accumulator.
//!
//! [`SessionState`] is a fold over transcript events in file order. A
//! compaction boundary wipes it, so metrics only ever describe the context
//! that survived the most recent compaction.

use std::collections::BTreeSet;
use std::path::{Component, Path};

use serde_json::{Map, Value};

use crate::event::{ContentItem, EventKind, ToolUse, TranscriptEvent, input_arg};
use crate::tally::Tally;

/// Directory reported for a file path with no parent segment.
pub const CURRENT_DIR: &str = ".";

/// Who produced a conversational turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Speaker {
    User,
    Assistant,
}

/// A recorded tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOp {
    pub name: String,
    pub timestamp: Option<f64>,
    pub input: Map<String, Value>,
}

impl ToolOp {
    /// A non-empty string argument from the invocation input.
    pub fn arg(&self, key: &str) -> Option<&str> {
        input_arg(&self.input, key)
    }
}

/// A file touched by `Read`, `Edit` or `Write`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusEntry {
    /// Name of the parent directory (not the full path).
    pub dir: String,
    pub file: String,
}

/// Running state built from a transcript.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Every parsed event time, in arrival order.
    pub timestamps: Vec<f64>,
    /// Times of messages typed by the human operator.
    pub user_timestamps: Vec<f64>,
    /// One marker per human message or assistant text turn.
    pub stride_window: Vec<Speaker>,
    pub tool_ops: Vec<ToolOp>,
    pub focus_window: Vec<FocusEntry>,
    /// Edit/Write counts per file name.
    pub edits: Tally,
    pub skills_loaded: BTreeSet<String>,
    pub commands_used: BTreeSet<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every running structure.
    pub fn reset(&mut self) {
        self.timestamps.clear();
        self.user_timestamps.clear();
        self.stride_window.clear();
        self.tool_ops.clear();
        self.focus_window.clear();
        self.edits.clear();
        self.skills_loaded.clear();
        self.commands_used.clear();
    }

    /// Folds one event into the state.
    pub fn process(&mut self, event: TranscriptEvent) {
        if event.is_boundary() {
            tracing::debug!(
                discarded_events = self.timestamps.len(),
                discarded_tool_ops = self.tool_ops.len(),
                "compact boundary, resetting session state"
            );
            self.reset();
            return;
        }

        if let Some(ts) = event.timestamp {
            self.timestamps.push(ts);
        }

        match event.kind {
            EventKind::User(turn) if turn.is_human() => {
                if let Some(ts) = event.timestamp {
                    self.user_timestamps.push(ts);
                }
                self.stride_window.push(Speaker::User);
            }
            EventKind::Assistant(turn) => {
                let has_text = turn.has_text();
                for item in turn.content {
                    if let ContentItem::ToolUse(tool) = item {
                        self.process_tool_use(tool, event.timestamp);
                    }
                }
                if has_text {
                    self.stride_window.push(Speaker::Assistant);
                }
            }
            EventKind::User(_) | EventKind::Other => {}
        }
    }

    /// Parses and folds one JSONL line. Returns `false` if the line was skipped.
    pub fn process_line(&mut self, line: &[u8]) -> bool {
        match TranscriptEvent::from_slice(line) {
            Ok(event) => {
                self.process(event);
                true
            }
            Err(e) => {
                tracing::trace!(error = %e, "skipping malformed transcript line");
                false
            }
        }
    }

    fn process_tool_use(&mut self, tool: ToolUse, timestamp: Option<f64>) {
        let op = ToolOp {
            name: tool.name,
            timestamp,
            input: tool.input,
        };

        match op.name.as_str() {
            "Read" | "Edit" | "Write" => {
                if let Some(entry) = op.arg("file_path").map(split_file_path) {
                    if op.name != "Read" {
                        self.edits.add(&entry.file);
                    }
                    self.focus_window.push(entry);
                }
            }
            "Skill" => {
                if let Some(skill) = op.arg("skill") {
                    self.skills_loaded.insert(skill.to_string());
                }
            }
            "SlashCommand" => {
                if let Some(command) = op.arg("command").and_then(command_name) {
                    self.commands_used.insert(command.to_string());
                }
            }
            _ => {}
        }

        self.tool_ops.push(op);
    }
}

/// Splits a file path into its parent directory name and file name.
///
/// The root counts as a segment, so `/main.rs` lives in `/`; a bare file name
/// lives in [`CURRENT_DIR`]. A path with no segments (`.`) still yields an
/// entry, with an empty file name.
pub fn split_file_path(path: &str) -> FocusEntry {
    let segments: Vec<_> = Path::new(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    let Some((file, parents)) = segments.split_last() else {
        return FocusEntry {
            dir: CURRENT_DIR.to_string(),
            file: String::new(),
        };
    };
    FocusEntry {
        dir: parents.last().map_or_else(|| CURRENT_DIR.to_string(), Clone::clone),
        file: file.clone(),
    }
}

/// First token of a slash command, without the leading slashes.
fn command_name(command: &str) -> Option<&str> {
    command.trim_start_matches('/').split_whitespace().next()
}
