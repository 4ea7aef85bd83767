//! Inactivity and pace.

use serde::Serialize;

use super::{ACTIVE_GAP_CEILING, mean};
use crate::config::MeterConfig;
use crate::state::SessionState;

/// Timing metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimingMetrics {
    /// Whole seconds spent in inactivity gaps.
    pub inactive_secs: u64,
    /// Mean active gap in seconds to one decimal (0 when there are none).
    pub pace_avg: f64,
    /// Mean active gap per sparkline segment, to one decimal; empty when
    /// there are too few gaps.
    pub pace_segments: Vec<f64>,
}

impl TimingMetrics {
    /// Segment means to one decimal place, comma-joined.
    pub fn sparkline(&self) -> String {
        self.pace_segments
            .iter()
            .map(|v| format!("{v:.1}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "inactive time is a non-negative sum of gaps"
)]
pub fn compute(state: &SessionState, config: &MeterConfig) -> TimingMetrics {
    let mut inactive = 0.0;
    let mut active_gaps = Vec::new();

    for pair in state.timestamps.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let gap = end - start;
        if gap <= 0.0 {
            continue;
        }

        let slept = config.sleep_times.iter().any(|&t| start < t && t < end);
        if slept || gap >= config.inactivity_gap {
            inactive += gap;
        } else if gap < ACTIVE_GAP_CEILING {
            active_gaps.push(gap);
        }
    }

    TimingMetrics {
        inactive_secs: inactive as u64,
        pace_avg: mean(&active_gaps).map_or(0.0, round_tenth),
        pace_segments: segment_means(&active_gaps, config.sparkline_length),
    }
}

/// Splits gaps into `segments` equal chunks and averages each.
///
/// Needs at least two gaps per segment; the remainder is dropped.
fn segment_means(gaps: &[f64], segments: usize) -> Vec<f64> {
    if segments == 0 || gaps.len() < segments.saturating_mul(2) {
        return Vec::new();
    }
    let chunk = gaps.len() / segments;
    gaps.chunks_exact(chunk)
        .take(segments)
        .filter_map(mean)
        .map(round_tenth)
        .collect()
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
