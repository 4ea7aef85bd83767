//! File and directory concentration.

use serde::Serialize;
use serde::ser::SerializeStruct;

use crate::config::MeterConfig;
use crate::state::{FocusEntry, SessionState};
use crate::tally::Tally;

/// Where attention sat within one focus window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusState {
    /// No file operations in the window.
    None,
    /// One file dominates.
    File(String),
    /// One directory dominates.
    Dir(String),
    /// Work is spread across the repository; holds the distinct file count.
    Repo(usize),
}

impl FocusState {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::File(_) => "file",
            Self::Dir(_) => "dir",
            Self::Repo(_) => "repo",
        }
    }

    /// Display label: file name, `dir/`, or `(n)` distinct files.
    pub fn label(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::File(file) => file.clone(),
            Self::Dir(dir) => format!("{dir}/"),
            Self::Repo(files) => format!("({files})"),
        }
    }
}

impl Serialize for FocusState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("FocusState", 2)?;
        state.serialize_field("type", self.kind())?;
        state.serialize_field("label", &self.label())?;
        state.end()
    }
}

/// Focus metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusMetrics {
    /// The window before the current one.
    pub previous: FocusState,
    pub current: FocusState,
    /// Most edited file in the session (empty if nothing was edited).
    pub top_edit_file: String,
    pub top_edit_count: usize,
}

pub fn compute(state: &SessionState, config: &MeterConfig) -> FocusMetrics {
    let entries = &state.focus_window;
    let window = config.focus_window;
    let current_start = entries.len().saturating_sub(window);
    let previous_start = entries.len().saturating_sub(window.saturating_mul(2));

    let (top_edit_file, top_edit_count) = state
        .edits
        .top()
        .map_or_else(|| (String::new(), 0), |(file, count)| (file.to_string(), count));

    FocusMetrics {
        previous: window_state(&entries[previous_start..current_start], config),
        current: window_state(&entries[current_start..], config),
        top_edit_file,
        top_edit_count,
    }
}

/// Reduces one window to a focus state.
///
/// Concentration is the top count as a truncated percentage of the whole
/// window. File focus is checked before directory focus.
pub fn window_state(entries: &[FocusEntry], config: &MeterConfig) -> FocusState {
    let complete = || {
        entries
            .iter()
            .filter(|e| !e.dir.is_empty() && !e.file.is_empty())
    };
    let dirs: Tally = complete().map(|e| e.dir.as_str()).collect();
    let files: Tally = complete().map(|e| e.file.as_str()).collect();

    let (Some((top_file, file_count)), Some((top_dir, dir_count))) = (files.top(), dirs.top())
    else {
        return FocusState::None;
    };

    let concentration = |count: usize| count * 100 / entries.len();

    if concentration(file_count) >= config.focus_file_threshold {
        FocusState::File(top_file.to_string())
    } else if concentration(dir_count) >= config.focus_dir_threshold {
        FocusState::Dir(top_dir.to_string())
    } else {
        FocusState::Repo(files.len())
    }
}
