//! Heuristic activity classification.
//!
//! Mode detection is an ordered list of guarded rules evaluated against the
//! full tool history; the first rule that produces a mode wins:
//!
//! 1. Idle: the last tool call is older than the idle threshold.
//! 2. Stuck: one file has been edited many times and recent pace is slow.
//! 3. Window: classify a short and a mid window of recent tool calls and
//!    report a transition (`mid → short`) when they disagree.

use std::fmt;

use serde::Serialize;

use super::{ACTIVE_GAP_CEILING, mean, tail};
use crate::bash::{CommandKind, classify_command};
use crate::config::{MeterConfig, ModeConfig};
use crate::state::{SessionState, ToolOp};

/// Tools that only look at the codebase or the web.
pub const READ_TOOLS: &[&str] = &["Read", "Glob", "Grep", "WebFetch", "WebSearch"];

/// Tools that change files.
pub const WRITE_TOOLS: &[&str] = &["Edit", "Write"];

/// Tools that hand work to a subagent.
pub const AGENT_TOOLS: &[&str] = &["Task"];

/// Share of a window a build/test/agent category needs to dominate.
const RATIO_COMMAND: f64 = 0.3;

/// Share of a window reads or writes need to dominate.
const RATIO_DOMINANT: f64 = 0.6;

/// Category ratio rules in priority order.
const RATIO_RULES: &[(ToolCategory, f64, ActivityMode)] = &[
    (ToolCategory::Build, RATIO_COMMAND, ActivityMode::Building),
    (ToolCategory::Test, RATIO_COMMAND, ActivityMode::Testing),
    (ToolCategory::Agent, RATIO_COMMAND, ActivityMode::Delegating),
    (ToolCategory::Write, RATIO_DOMINANT, ActivityMode::Shipping),
    (ToolCategory::Read, RATIO_DOMINANT, ActivityMode::Exploring),
];

/// Override and window rules in priority order.
const MODE_RULES: &[ModeRule] = &[idle_override, stuck_override, window_modes];

type ModeRule = fn(&RuleInput<'_>) -> Option<Mode>;

/// What a window of tool calls was mostly doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityMode {
    Talking,
    Building,
    Testing,
    Delegating,
    Shipping,
    Exploring,
    Coding,
}

impl ActivityMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Talking => "talking",
            Self::Building => "building",
            Self::Testing => "testing",
            Self::Delegating => "delegating",
            Self::Shipping => "shipping",
            Self::Exploring => "exploring",
            Self::Coding => "coding",
        }
    }
}

impl fmt::Display for ActivityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The session mode reported to the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Stuck,
    Steady(ActivityMode),
    /// The mid window says `from`, the short window already says `to`.
    Transition {
        from: ActivityMode,
        to: ActivityMode,
    },
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Stuck => f.write_str("stuck"),
            Self::Steady(mode) => f.write_str(mode.as_str()),
            Self::Transition { from, to } => write!(f, "{from} → {to}"),
        }
    }
}

impl Serialize for Mode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Bucket a tool call falls into for window classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolCategory {
    Read,
    Write,
    Build,
    Test,
    Agent,
}

impl ToolCategory {
    /// Classifies a tool call. `Bash` is classified by its command.
    pub fn of(op: &ToolOp) -> Option<Self> {
        let name = op.name.as_str();
        if READ_TOOLS.contains(&name) {
            Some(Self::Read)
        } else if WRITE_TOOLS.contains(&name) {
            Some(Self::Write)
        } else if name == "Bash" {
            match classify_command(op.arg("command").unwrap_or_default())? {
                CommandKind::Build => Some(Self::Build),
                CommandKind::Test => Some(Self::Test),
            }
        } else if AGENT_TOOLS.contains(&name) {
            Some(Self::Agent)
        } else {
            None
        }
    }
}

/// Per-category counts over a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CategoryCounts {
    read: usize,
    write: usize,
    build: usize,
    test: usize,
    agent: usize,
}

impl CategoryCounts {
    fn from_ops(ops: &[ToolOp]) -> Self {
        let mut counts = Self::default();
        for category in ops.iter().filter_map(ToolCategory::of) {
            *counts.get_mut(category) += 1;
        }
        counts
    }

    const fn get_mut(&mut self, category: ToolCategory) -> &mut usize {
        match category {
            ToolCategory::Read => &mut self.read,
            ToolCategory::Write => &mut self.write,
            ToolCategory::Build => &mut self.build,
            ToolCategory::Test => &mut self.test,
            ToolCategory::Agent => &mut self.agent,
        }
    }

    const fn get(&self, category: ToolCategory) -> usize {
        match category {
            ToolCategory::Read => self.read,
            ToolCategory::Write => self.write,
            ToolCategory::Build => self.build,
            ToolCategory::Test => self.test,
            ToolCategory::Agent => self.agent,
        }
    }

    const fn total(&self) -> usize {
        self.read + self.write + self.build + self.test + self.agent
    }
}

struct RuleInput<'a> {
    state: &'a SessionState,
    config: &'a ModeConfig,
    now: f64,
}

/// Classifies the session. `now` is epoch seconds.
pub fn compute(state: &SessionState, config: &MeterConfig, now: f64) -> Mode {
    let input = RuleInput {
        state,
        config: &config.mode,
        now,
    };
    MODE_RULES
        .iter()
        .find_map(|rule| rule(&input))
        .unwrap_or(Mode::Steady(ActivityMode::Talking))
}

/// Classifies a bounded window of tool calls.
#[expect(clippy::cast_precision_loss, reason = "window counts are small")]
pub fn window_mode(ops: &[ToolOp]) -> ActivityMode {
    let counts = CategoryCounts::from_ops(ops);
    let total = counts.total();
    if total == 0 {
        return ActivityMode::Talking;
    }

    RATIO_RULES
        .iter()
        .find(|(category, threshold, _)| counts.get(*category) as f64 / total as f64 > *threshold)
        .map_or(ActivityMode::Coding, |(_, _, mode)| *mode)
}

fn idle_override(input: &RuleInput<'_>) -> Option<Mode> {
    let last = input.state.tool_ops.last()?.timestamp?;
    (input.now - last > input.config.idle_threshold).then_some(Mode::Idle)
}

fn stuck_override(input: &RuleInput<'_>) -> Option<Mode> {
    let (file, revisions) = input.state.edits.top()?;
    if revisions < input.config.stuck_edit_threshold {
        return None;
    }

    let recent = tail(&input.state.tool_ops, input.config.mid_window);
    let gaps: Vec<f64> = recent
        .windows(2)
        .filter_map(|pair| Some(pair[1].timestamp? - pair[0].timestamp?))
        .filter(|gap| (0.0..ACTIVE_GAP_CEILING).contains(gap))
        .collect();
    let pace = mean(&gaps)?;

    if pace > input.config.slow_pace {
        tracing::debug!(file, revisions, pace, "slow pace on a heavily edited file");
        Some(Mode::Stuck)
    } else {
        None
    }
}

fn window_modes(input: &RuleInput<'_>) -> Option<Mode> {
    let ops = &input.state.tool_ops;
    let short = window_mode(tail(ops, input.config.short_window));
    let mid = window_mode(tail(ops, input.config.mid_window));

    Some(if short == mid {
        Mode::Steady(mid)
    } else {
        Mode::Transition {
            from: mid,
            to: short,
        }
    })
}
