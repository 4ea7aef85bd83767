//! Skills and slash commands seen in the session.

use serde::Serialize;

use crate::state::SessionState;

/// Infra usage, each list sorted lexicographically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InfraMetrics {
    pub skills: Vec<String>,
    pub commands: Vec<String>,
}

impl InfraMetrics {
    pub fn skills_text(&self) -> String {
        self.skills.join(" ")
    }

    pub fn commands_text(&self) -> String {
        self.commands.join(" ")
    }
}

pub fn compute(state: &SessionState) -> InfraMetrics {
    InfraMetrics {
        skills: state.skills_loaded.iter().cloned().collect(),
        commands: state.commands_used.iter().cloned().collect(),
    }
}
