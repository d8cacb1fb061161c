//! Role and task records and their assembly into a workflow.

mod graph;
mod manifest;
mod role;
mod task;
mod workflow;

pub use graph::{TaskGraph, TaskLike};
pub use manifest::{Crew, CrewManifest, DefinitionSource, DirSource, RoleEntry, TaskEntry};
pub use role::RoleConfig;
pub use task::{ContextSpec, TaskConfig};
pub use workflow::{Workflow, WorkflowStep};
