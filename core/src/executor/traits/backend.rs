use async_trait::async_trait;

use crate::error::BackendError;
use crate::executor::types::{Completion, CompletionRequest};

/// A chat-completion provider.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Model used when a request does not override it.
    fn model_name(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, BackendError>;
}
