use async_trait::async_trait;
use crewkit_core::api::{
    BackendError, ChatRole, Completion, CompletionBackend, CompletionRequest, DryRunBackendConfig,
    TokenUsage,
};

const DEFAULT_MODEL: &str = "dry-run";

/// Offline backend that answers with a digest of the prompt it received.
///
/// Lets a crew be exercised end to end (ordering, context wiring, interpolation)
/// without network access or credentials.
pub struct DryRunBackend {
    model: String,
}

impl DryRunBackend {
    pub fn new(cfg: &DryRunBackendConfig) -> Self {
        Self {
            model: cfg
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }
}

impl Default for DryRunBackend {
    fn default() -> Self {
        Self::new(&DryRunBackendConfig::default())
    }
}

#[async_trait]
impl CompletionBackend for DryRunBackend {
    fn name(&self) -> &str {
        "dry-run"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, BackendError> {
        let system = request
            .messages
            .iter()
            .find(|m| m.role == ChatRole::System)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        let user = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        let persona = system.lines().next().unwrap_or_default();
        let task = user
            .strip_prefix("Current Task: ")
            .unwrap_or(user)
            .lines()
            .next()
            .unwrap_or_default();
        let context_tasks: Vec<&str> = user
            .lines()
            .filter_map(|l| l.strip_prefix("# Task: "))
            .collect();

        let mut content = format!("[dry-run] {persona}\nTask: {task}");
        if !context_tasks.is_empty() {
            content.push_str(&format!("\nContext: {}", context_tasks.join(", ")));
        }

        let prompt_tokens = words(system) + words(user);
        let completion_tokens = words(&content);
        Ok(Completion {
            content,
            model: request.model.unwrap_or_else(|| self.model.clone()),
            usage: TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
        })
    }
}

fn words(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}
