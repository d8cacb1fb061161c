use std::path::Path;

use serde::{Deserialize, Serialize};

use super::section::Label;
use crate::crew::{RoleConfig, TaskConfig};
use crate::error::DefinitionError;

/// The five fields a definition document can provide.
///
/// Role documents fill `role`, `goal` and `backstory`; task documents fill
/// `description` and `expected_output`. Unused fields stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionRecord {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub description: String,
    pub expected_output: String,
}

impl DefinitionRecord {
    /// Parses an in-memory document.
    pub fn parse(document: &str) -> Self {
        let normalized;
        let document = if document.contains("\r\n") {
            normalized = document.replace("\r\n", "\n");
            normalized.as_str()
        } else {
            document
        };

        Self {
            role: Label::Role.extract(document),
            goal: Label::Goal.extract(document),
            backstory: Label::Backstory.extract(document),
            description: Label::Description.extract(document),
            expected_output: Label::ExpectedOutput.extract(document),
        }
    }

    pub fn get(&self, label: Label) -> &str {
        match label {
            Label::Role => &self.role,
            Label::Goal => &self.goal,
            Label::Backstory => &self.backstory,
            Label::Description => &self.description,
            Label::ExpectedOutput => &self.expected_output,
        }
    }

    pub fn into_role(self, id: impl Into<String>) -> Result<RoleConfig, DefinitionError> {
        RoleConfig::new(id, self.role, self.goal, self.backstory)
    }

    pub fn into_task(
        self,
        id: impl Into<String>,
        name: impl Into<String>,
        agent: impl Into<String>,
    ) -> Result<TaskConfig, DefinitionError> {
        Ok(TaskConfig::new(id, self.description, self.expected_output, agent)?.with_name(name))
    }

    /// Labels whose section was absent or empty.
    pub fn missing(&self) -> Vec<Label> {
        Label::ALL
            .into_iter()
            .filter(|label| self.get(*label).is_empty())
            .collect()
    }
}

/// Reads and parses a definition file.
pub fn load_definition(path: impl AsRef<Path>) -> Result<DefinitionRecord, DefinitionError> {
    let path = path.as_ref();
    let content =
        std::fs::read_to_string(path).map_err(|e| DefinitionError::from_io(path, e))?;
    let record = DefinitionRecord::parse(&content);
    tracing::debug!(
        path = %path.display(),
        missing = ?record.missing(),
        "loaded definition"
    );
    Ok(record)
}
