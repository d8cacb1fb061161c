//! Sequential workflow execution.
//!
//! ```text
//! Workflow (ordered steps, resolved context)
//!   ↓
//! ExecutionEngine::run()
//!   ↓  per step: build_prompt() → RequestPacer::wait() → CompletionBackend::complete()
//!   ↓            (retried up to the role's max_iter, delays from RetryStrategy)
//!   ↓
//! CrewOutput { raw, tasks_output, token_usage }
//! ```
//!
//! Progress is reported through an optional [`traits::OutputRenderer`] and an
//! indicatif spinner.

mod engine;
mod progress;
pub mod prompt;
mod rate_limit;
pub mod traits;
pub mod types;

pub use engine::{ExecutionEngine, ExecutionEngineBuilder};
pub use progress::ProgressMonitor;
pub use rate_limit::RequestPacer;
pub use traits::{CompletionBackend, OutputRenderer, RenderEvent, RetryStrategy};
pub use types::{
    ChatMessage, ChatRole, Completion, CompletionRequest, CrewOutput, ExecutionOpts, TaskOutput,
    TokenUsage,
};
