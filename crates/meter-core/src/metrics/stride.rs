//! User/assistant turn alternation.

use serde::Serialize;

use super::tail;
use crate::config::MeterConfig;
use crate::state::{SessionState, Speaker};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StrideMetrics {
    pub user_total: usize,
    pub assistant_total: usize,
    pub user_recent: usize,
    pub assistant_recent: usize,
}

pub fn compute(state: &SessionState, config: &MeterConfig) -> StrideMetrics {
    let count = |markers: &[Speaker], speaker: Speaker| {
        markers.iter().filter(|&&m| m == speaker).count()
    };
    let recent = tail(&state.stride_window, config.stride_window);

    StrideMetrics {
        user_total: count(&state.stride_window, Speaker::User),
        assistant_total: count(&state.stride_window, Speaker::Assistant),
        user_recent: count(recent, Speaker::User),
        assistant_recent: count(recent, Speaker::Assistant),
    }
}
