//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `crewkit_core::api` instead of reaching into internal modules.

pub use crate::check::{
    generic_checks, inspect_json, run_checks, CheckCase, CheckReport, CheckSpec, JsonShape,
};
pub use crate::config::{
    load_default, load_explicit, load_from_path, AppConfig, BackendConfig, DryRunBackendConfig,
    ExecutionConfig, LoggingConfig, OpenAiBackendConfig, RetryConfig,
};
pub use crate::crew::{
    ContextSpec, Crew, CrewManifest, DefinitionSource, DirSource, RoleConfig, TaskConfig,
    Workflow, WorkflowStep,
};
pub use crate::definition::{extract_section, load_definition, DefinitionRecord, Label};
pub use crate::error::{BackendError, CliError, DefinitionError, ExecutorError};
pub use crate::executor::{
    ChatMessage, ChatRole, Completion, CompletionBackend, CompletionRequest, CrewOutput,
    ExecutionEngine, ExecutionOpts, OutputRenderer, RenderEvent, RetryStrategy, TaskOutput,
    TokenUsage,
};
pub use crate::template::{interpolate, placeholders, Inputs};
