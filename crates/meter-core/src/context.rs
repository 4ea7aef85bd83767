//! Context usage extraction.
//!
//! Scans raw transcript text for the last `/context` report, which the CLI
//! echoes inside `<local-command-stdout>` tags, and pulls token counts out of
//! it. No record parsing happens here; the report is matched as plain text.

use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::Serialize;

use crate::transcript::TranscriptError;

/// Command output blocks with a plain closing tag.
static STDOUT_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<local-command-stdout>(.*?)</local-command-stdout>").unwrap()
});

/// Command output blocks whose closing tag was JSON-escaped (`<\/...>`).
static ESCAPED_STDOUT_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<local-command-stdout>(.*?)<\\/local-command-stdout>").unwrap()
});

/// ANSI colour codes and cursor toggles, including ones whose escape byte was lost.
static ANSI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;]*m|\x1b\[\?[0-9]+[hl]|\[[\d;]*m").unwrap()
});

/// Headline categories such as `System prompt: 3.1k tokens`.
static CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(system prompt|system tools|mcp tools|memory files):\s*([\d.]+)(k)?\s*tokens")
        .unwrap()
});

/// Per-skill lines such as `└ pdf: 70 tokens`.
static SKILL_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*(\d+)\s*tokens").unwrap());

/// Marker that identifies a `/context` report.
const REPORT_MARKER: &str = "Context Usage";

/// Header that opens the per-skill section of the report.
const SKILLS_HEADER: &str = "Skills and slash commands";

/// Token counts from the last context report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextUsage {
    pub system_prompt: u64,
    pub system_tools: u64,
    pub mcp_tools: u64,
    pub memory: u64,
    pub skills: u64,
    /// When the extraction ran (RFC 3339).
    pub timestamp: String,
}

impl ContextUsage {
    fn empty(now: DateTime<Utc>) -> Self {
        Self {
            system_prompt: 0,
            system_tools: 0,
            mcp_tools: 0,
            memory: 0,
            skills: 0,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Micros, false),
        }
    }

    /// Whether a real report was found.
    pub const fn has_values(&self) -> bool {
        self.system_prompt > 0 || self.mcp_tools > 0
    }
}

/// Reads a transcript file and extracts its last context report.
pub fn read_context_usage(path: &Path, now: DateTime<Utc>) -> Result<ContextUsage, TranscriptError> {
    let bytes = std::fs::read(path)?;
    Ok(parse_context_usage(&String::from_utf8_lossy(&bytes), now))
}

/// Extracts token counts from the last context report in `text`.
pub fn parse_context_usage(text: &str, now: DateTime<Utc>) -> ContextUsage {
    let mut usage = ContextUsage::empty(now);
    let Some(report) = last_report(text) else {
        return usage;
    };
    let clean = strip_ansi(report);

    for caps in CATEGORY_RE.captures_iter(&clean) {
        let value = parse_token_count(&caps[2], caps.get(3).is_some());
        let slot = match caps[1].to_lowercase().as_str() {
            "system prompt" => &mut usage.system_prompt,
            "system tools" => &mut usage.system_tools,
            "mcp tools" => &mut usage.mcp_tools,
            _ => &mut usage.memory,
        };
        // First occurrence of each category wins.
        if *slot == 0 {
            *slot = value;
        }
    }

    usage.skills = clean
        .lines()
        .skip_while(|line| !line.contains(SKILLS_HEADER))
        .skip(1)
        .filter_map(|line| SKILL_LINE_RE.captures(line))
        .filter_map(|caps| caps[1].parse::<u64>().ok())
        .sum();

    usage
}

fn last_report(text: &str) -> Option<&str> {
    let blocks: Vec<&str> = STDOUT_BLOCK_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();
    let blocks = if blocks.is_empty() {
        ESCAPED_STDOUT_BLOCK_RE
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect()
    } else {
        blocks
    };

    blocks.into_iter().rev().find(|block| block.contains(REPORT_MARKER))
}

/// Undoes JSON string escapes that matter for parsing and removes ANSI codes.
fn strip_ansi(text: &str) -> String {
    let unescaped = text
        .replace("\\u001b", "\x1b")
        .replace("\\u001B", "\x1b")
        .replace("\\x1b", "\x1b")
        .replace("\\n", "\n");
    ANSI_RE.replace_all(&unescaped, "").into_owned()
}

/// Parses `3.1` / `3.1k` style counts, rounded to whole tokens.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "token counts are small and non-negative"
)]
fn parse_token_count(number: &str, thousands: bool) -> u64 {
    let Ok(value) = number.parse::<f64>() else {
        return 0;
    };
    let value = if thousands { value * 1000.0 } else { value };
    value.round() as u64
}
