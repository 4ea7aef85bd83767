//! Transcript record model.
//!
//! Records are read defensively. Every field is optional, and a field with an
//! unexpected shape contributes nothing instead of failing the record.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::timestamp::parse_timestamp;

/// Subtype marking a compaction boundary. Everything before it is discarded.
pub const COMPACT_BOUNDARY: &str = "compact_boundary";

/// Why a transcript line could not be turned into an event.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record is not a JSON object")]
    NotAnObject,
}

/// One transcript record.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEvent {
    /// Epoch seconds, if the record carried a parsable timestamp.
    pub timestamp: Option<f64>,
    pub subtype: Option<String>,
    pub kind: EventKind,
}

/// Record payload, discriminated by the `type` field.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    User(UserTurn),
    Assistant(AssistantTurn),
    Other,
}

/// Origin markers of a `user` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserTurn {
    /// `userType` was `external`.
    pub external: bool,
    /// The record echoes a tool result back to the assistant.
    pub tool_result: bool,
    /// The record is a compaction summary.
    pub compact_summary: bool,
}

impl UserTurn {
    /// True for a message typed by the human operator.
    pub const fn is_human(&self) -> bool {
        self.external && !self.tool_result && !self.compact_summary
    }
}

/// Ordered content of an `assistant` record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssistantTurn {
    pub content: Vec<ContentItem>,
}

impl AssistantTurn {
    pub fn has_text(&self) -> bool {
        self.content.iter().any(|item| matches!(item, ContentItem::Text))
    }
}

/// A content block inside an assistant message.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentItem {
    Text,
    ToolUse(ToolUse),
    Other,
}

/// A `tool_use` content block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolUse {
    pub name: String,
    pub input: Map<String, Value>,
}

impl TranscriptEvent {
    /// Parses one JSONL line.
    pub fn from_slice(line: &[u8]) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_slice(line)?;
        Self::from_value(&value).ok_or(RecordError::NotAnObject)
    }

    /// Builds an event from a decoded record. Returns `None` for non-objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        let record = value.as_object()?;

        let kind = match str_field(record, "type") {
            Some("user") => EventKind::User(UserTurn {
                external: str_field(record, "userType") == Some("external"),
                tool_result: record.get("toolUseResult").is_some_and(|v| !v.is_null()),
                compact_summary: record
                    .get("isCompactSummary")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            }),
            Some("assistant") => EventKind::Assistant(AssistantTurn {
                content: record
                    .get("message")
                    .and_then(|message| message.get("content"))
                    .and_then(Value::as_array)
                    .map(|items| items.iter().map(ContentItem::from_value).collect())
                    .unwrap_or_default(),
            }),
            _ => EventKind::Other,
        };

        Some(Self {
            timestamp: parse_timestamp(str_field(record, "timestamp")),
            subtype: str_field(record, "subtype").map(String::from),
            kind,
        })
    }

    pub fn is_boundary(&self) -> bool {
        self.subtype.as_deref() == Some(COMPACT_BOUNDARY)
    }
}

impl ContentItem {
    fn from_value(value: &Value) -> Self {
        let Some(block) = value.as_object() else {
            return Self::Other;
        };
        match str_field(block, "type") {
            Some("text") => Self::Text,
            Some("tool_use") => Self::ToolUse(ToolUse {
                name: str_field(block, "name").unwrap_or_default().to_string(),
                input: block
                    .get("input")
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default(),
            }),
            _ => Self::Other,
        }
    }
}

/// Returns a string field, treating wrong types as absent.
pub(crate) fn str_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

/// Returns a non-empty string field from a tool input.
pub(crate) fn input_arg<'a>(input: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    str_field(input, key).filter(|s| !s.is_empty())
}
