use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::completion::TokenUsage;

/// Result of one executed task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutput {
    pub task_id: String,
    pub name: String,
    /// Title of the executing role.
    pub agent: String,
    /// Description after placeholder interpolation.
    pub description: String,
    pub expected_output: String,
    pub raw: String,
    pub model: String,
    /// Backend calls made, including the successful one.
    pub attempts: u32,
    pub duration_ms: u64,
    pub usage: TokenUsage,
}

/// Result of a whole workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewOutput {
    pub run_id: String,
    pub workflow: String,
    pub started_at: DateTime<Utc>,
    /// Output of the last task.
    pub raw: String,
    /// One entry per task, in execution order.
    pub tasks_output: Vec<TaskOutput>,
    pub token_usage: TokenUsage,
    pub duration_ms: u64,
}

impl CrewOutput {
    pub fn task(&self, task_id: &str) -> Option<&TaskOutput> {
        self.tasks_output.iter().find(|t| t.task_id == task_id)
    }

    pub fn write_json(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}
