//! Tunables for metric computation.

use serde::{Deserialize, Serialize};

/// Configuration for the metric computators.
///
/// Every field has a default, so a partial mapping deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    /// Number of trailing turn markers counted as "recent". Default: 20.
    pub stride_window: usize,

    /// Focus window size in file operations. Default: 15.
    pub focus_window: usize,

    /// Percent of a window on one file to call it focused. Default: 70.
    pub focus_file_threshold: usize,

    /// Percent of a window in one directory to call it focused. Default: 50.
    pub focus_dir_threshold: usize,

    /// Gap in seconds counted as inactivity. Default: 1800 (30 minutes).
    pub inactivity_gap: f64,

    /// Number of pace sparkline segments. Default: 6.
    pub sparkline_length: usize,

    /// Epoch instants (e.g. detected sleeps) that turn the enclosing gap
    /// into inactivity regardless of its length.
    pub sleep_times: Vec<f64>,

    /// Mode classification thresholds.
    pub mode: ModeConfig,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            stride_window: 20,
            focus_window: 15,
            focus_file_threshold: 70,
            focus_dir_threshold: 50,
            inactivity_gap: 1800.0,
            sparkline_length: 6,
            sleep_times: Vec::new(),
            mode: ModeConfig::default(),
        }
    }
}

/// Thresholds for mode classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeConfig {
    /// Seconds since the last tool call before the session is idle. Default: 600.
    pub idle_threshold: f64,

    /// Edits to a single file that arm the stuck check. Default: 10.
    pub stuck_edit_threshold: usize,

    /// Mean seconds between tool calls above which pace is slow. Default: 15.
    pub slow_pace: f64,

    /// Short classification window in tool calls. Default: 3.
    pub short_window: usize,

    /// Mid classification window in tool calls, also used for stuck pace.
    /// Default: 10.
    pub mid_window: usize,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            idle_threshold: 600.0,
            stuck_edit_threshold: 10,
            slow_pace: 15.0,
            short_window: 3,
            mid_window: 10,
        }
    }
}
