use serde::{Deserialize, Serialize};

use crate::definition::DefinitionRecord;
use crate::error::DefinitionError;

/// Which earlier task outputs a task may read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextSpec {
    /// Every task that runs before this one.
    #[default]
    Previous,
    /// Exactly these tasks, in this order. An empty list means no context.
    Explicit(Vec<String>),
}

/// A unit of work bound to one executing role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    pub id: String,
    /// Human-readable name; defaults to the id.
    pub name: String,
    /// May contain `{placeholder}` tokens resolved from run-time inputs.
    pub description: String,
    pub expected_output: String,
    /// Id of the executing role.
    pub agent: String,
    pub context: ContextSpec,
}

impl TaskConfig {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: impl Into<String>,
    ) -> Result<Self, DefinitionError> {
        let id = id.into();
        let cfg = Self {
            name: id.clone(),
            id,
            description: description.into(),
            expected_output: expected_output.into(),
            agent: agent.into(),
            context: ContextSpec::Previous,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_definition(
        id: impl Into<String>,
        agent: impl Into<String>,
        record: &DefinitionRecord,
    ) -> Result<Self, DefinitionError> {
        Self::new(
            id,
            record.description.clone(),
            record.expected_output.clone(),
            agent,
        )
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_context<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context = ContextSpec::Explicit(ids.into_iter().map(Into::into).collect());
        self
    }

    fn validate(&self) -> Result<(), DefinitionError> {
        let record = format!("task '{}'", self.id);
        if self.description.trim().is_empty() {
            return Err(DefinitionError::MissingField {
                record,
                field: "description",
            });
        }
        if self.expected_output.trim().is_empty() {
            return Err(DefinitionError::MissingField {
                record,
                field: "expected_output",
            });
        }
        if self.agent.trim().is_empty() {
            return Err(DefinitionError::MissingField {
                record,
                field: "agent",
            });
        }
        Ok(())
    }
}
