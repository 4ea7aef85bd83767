//! Shell assignment rendering.
//!
//! Metrics are printed as `T_*` variable assignments sorted by name so a
//! status line script can `eval` them directly.

use std::fmt;
use std::io::{self, Write};

use meter_core::SessionMetrics;

/// A value on the right-hand side of a shell assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellValue {
    Int(u64),
    /// Rendered with one decimal place.
    Decimal(f64),
    /// Rendered single-quoted.
    Text(String),
}

impl fmt::Display for ShellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Decimal(v) => write!(f, "{v:.1}"),
            Self::Text(s) => write!(f, "'{}'", shell_quote(s)),
        }
    }
}

/// Escapes single quotes for use inside a single-quoted shell string.
pub fn shell_quote(s: &str) -> String {
    s.replace('\'', r"'\''")
}

fn count(n: usize) -> ShellValue {
    ShellValue::Int(u64::try_from(n).unwrap_or(u64::MAX))
}

/// Flattens metrics into named values, sorted by name.
pub fn assignments(metrics: &SessionMetrics) -> Vec<(&'static str, ShellValue)> {
    let SessionMetrics {
        timing,
        stride,
        mode,
        focus,
        infra,
    } = metrics;

    let mut vars = vec![
        ("T_INACTIVE_SECS", ShellValue::Int(timing.inactive_secs)),
        ("T_PACE_AVG", ShellValue::Decimal(timing.pace_avg)),
        ("T_PACE_VALS", ShellValue::Text(timing.sparkline())),
        ("T_USER_TOTAL", count(stride.user_total)),
        ("T_CLAUDE_TOTAL", count(stride.assistant_total)),
        ("T_USER_RECENT", count(stride.user_recent)),
        ("T_CLAUDE_RECENT", count(stride.assistant_recent)),
        ("T_MODE", ShellValue::Text(mode.to_string())),
        ("T_FOCUS_PREV_TYPE", ShellValue::Text(focus.previous.kind().to_string())),
        ("T_FOCUS_PREV_LABEL", ShellValue::Text(focus.previous.label())),
        ("T_FOCUS_CURR_TYPE", ShellValue::Text(focus.current.kind().to_string())),
        ("T_FOCUS_CURR_LABEL", ShellValue::Text(focus.current.label())),
        ("T_TOP_EDIT_FILE", ShellValue::Text(focus.top_edit_file.clone())),
        ("T_TOP_EDIT_COUNT", count(focus.top_edit_count)),
        ("T_SKILLS_LOADED", ShellValue::Text(infra.skills_text())),
        ("T_COMMANDS_USED", ShellValue::Text(infra.commands_text())),
    ];
    vars.sort_by_key(|(name, _)| *name);
    vars
}

/// Writes one `NAME=value` line per metric.
pub fn write_assignments<W: Write>(writer: &mut W, metrics: &SessionMetrics) -> io::Result<()> {
    for (name, value) in assignments(metrics) {
        writeln!(writer, "{name}={value}")?;
    }
    Ok(())
}
