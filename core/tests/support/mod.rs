#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use crewkit_core::api::{BackendError, Completion, CompletionBackend, CompletionRequest, TokenUsage};

pub fn crew_manifest(scenario: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../cli/crews")
        .join(scenario)
        .join("crew.toml")
}

/// Answers every request with `answer from <n>` and keeps the requests.
#[derive(Default)]
pub struct RecordingBackend {
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl RecordingBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn user_prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.messages.last().map(|m| m.content.clone()).unwrap_or_default())
            .collect()
    }
}

#[async_trait]
impl CompletionBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn model_name(&self) -> &str {
        "recording-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, BackendError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request);
        Ok(Completion {
            content: format!("answer from {}", requests.len()),
            model: "recording-model".to_string(),
            usage: TokenUsage {
                prompt_tokens: 3,
                completion_tokens: 2,
                total_tokens: 5,
            },
        })
    }
}
