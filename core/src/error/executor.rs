use thiserror::Error;

use super::{BackendError, DefinitionError};

/// Errors raised while assembling or executing a workflow.
#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Duplicate task ID: {0}")]
    DuplicateTaskId(String),

    #[error("Duplicate role ID: {0}")]
    DuplicateRoleId(String),

    #[error("Unknown executor: task '{task_id}' is assigned to undeclared role '{role_id}'")]
    UnknownExecutor { task_id: String, role_id: String },

    #[error("Dependency not found: task '{task_id}' depends on '{missing_dep}'")]
    DependencyNotFound {
        task_id: String,
        missing_dep: String,
    },

    #[error("Dependency not ready: task '{task_id}' reads '{dep}', which runs later")]
    DependencyNotReady { task_id: String, dep: String },

    #[error("Circular dependency detected: {0}")]
    CircularDependency(String),

    #[error("Workflow '{0}' has no tasks")]
    EmptyWorkflow(String),

    #[error("Task '{task_id}' failed after {attempts} attempt(s): {source}")]
    Backend {
        task_id: String,
        attempts: u32,
        source: BackendError,
    },

    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

impl ExecutorError {
    /// Whether the error was raised before any backend call was made.
    pub fn is_assembly_error(&self) -> bool {
        !matches!(self, Self::Backend { .. } | Self::Definition(_))
    }
}
