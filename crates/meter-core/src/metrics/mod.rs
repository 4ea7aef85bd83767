//! Derived session metrics.
//!
//! Each computator reads a finished [`SessionState`] and never mutates it:
//!
//! - [`timing`]: inactivity and pace
//! - [`stride`]: user/assistant turn counts
//! - [`mode`]: heuristic activity classification
//! - [`focus`]: file and directory concentration
//! - [`infra`]: skills and slash commands

pub mod focus;
pub mod infra;
pub mod mode;
pub mod stride;
pub mod timing;

use serde::Serialize;

use crate::config::MeterConfig;
use crate::state::SessionState;

pub use focus::{FocusMetrics, FocusState};
pub use infra::InfraMetrics;
pub use mode::{ActivityMode, Mode, ToolCategory};
pub use stride::StrideMetrics;
pub use timing::TimingMetrics;

/// Gaps at or above this many seconds never count toward pace.
pub const ACTIVE_GAP_CEILING: f64 = 1800.0;

/// All metrics for one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionMetrics {
    pub timing: TimingMetrics,
    pub stride: StrideMetrics,
    pub mode: Mode,
    pub focus: FocusMetrics,
    pub infra: InfraMetrics,
}

impl SessionMetrics {
    /// Runs every computator against `state`. `now` is epoch seconds.
    pub fn compute(state: &SessionState, config: &MeterConfig, now: f64) -> Self {
        Self {
            timing: timing::compute(state, config),
            stride: stride::compute(state, config),
            mode: mode::compute(state, config, now),
            focus: focus::compute(state, config),
            infra: infra::compute(state),
        }
    }
}

/// The last `n` items of `items`, or all of them if there are fewer.
pub(crate) fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

#[expect(clippy::cast_precision_loss, reason = "gap counts are small")]
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
