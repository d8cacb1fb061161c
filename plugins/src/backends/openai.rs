use std::time::Duration;

use async_trait::async_trait;
use crewkit_core::api::{
    BackendError, ChatMessage, Completion, CompletionBackend, CompletionRequest,
    OpenAiBackendConfig, TokenUsage,
};
use serde::{Deserialize, Serialize};

const BODY_PREVIEW_LIMIT: usize = 512;

#[derive(Debug, Serialize)]
struct ChatRequestBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseBody {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: Option<u64>,
}

/// Client for any server speaking the OpenAI chat completions protocol.
pub struct OpenAiBackend {
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    http: reqwest::Client,
}

impl OpenAiBackend {
    pub fn new(cfg: &OpenAiBackendConfig) -> Result<Self, BackendError> {
        if cfg.base_url.trim().is_empty() {
            return Err(BackendError::Config("base_url is empty".to_string()));
        }
        if cfg.model.trim().is_empty() {
            return Err(BackendError::Config("model is empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| BackendError::Config(e.to_string()))?;

        Ok(Self {
            base_url: normalize_base_url(&cfg.base_url),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone().filter(|k| !k.trim().is_empty()),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
            http,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, BackendError> {
        let url = self.endpoint();
        let model = request.model.as_deref().unwrap_or(&self.model);
        let body = ChatRequestBody {
            model,
            messages: &request.messages,
            temperature: request.temperature.or(self.temperature),
            max_tokens: request.max_tokens.or(self.max_tokens),
        };

        tracing::debug!(
            url = %url,
            model,
            messages = request.messages.len(),
            "chat completion request"
        );

        let response = self
            .auth(self.http.post(&url).json(&body))
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: preview_body(&text),
            });
        }

        let parsed: ChatResponseBody =
            serde_json::from_str(&text).map_err(|e| BackendError::Decode(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(BackendError::EmptyResponse)?;

        let usage = parsed
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u
                    .total_tokens
                    .unwrap_or(u.prompt_tokens + u.completion_tokens),
            })
            .unwrap_or_default();

        Ok(Completion {
            content,
            model: parsed.model.unwrap_or_else(|| model.to_string()),
            usage,
        })
    }
}

/// Accepts both `https://host` and the conventional `https://host/v1`.
fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    trimmed.strip_suffix("/v1").unwrap_or(trimmed).to_string()
}

fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    if trimmed.chars().count() <= BODY_PREVIEW_LIMIT {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewkit_core::api::{AppConfig, BackendConfig};
    use crewkit_core::config::apply_overrides;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn config(base_url: String) -> OpenAiBackendConfig {
        OpenAiBackendConfig {
            base_url,
            model: "Llama-3.2-3B-Instruct-Q4_K_M".to_string(),
            api_key: Some("sk-test".to_string()),
            temperature: Some(0.2),
            max_tokens: None,
            timeout_ms: 1_000,
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new(vec![
            ChatMessage::system("You are Tech Lead."),
            ChatMessage::user("Decide."),
        ])
    }

    #[test]
    fn test_request_body_skips_unset_options() {
        let messages = vec![ChatMessage::user("Hello")];
        let body = ChatRequestBody {
            model: "gpt-4o-mini",
            messages: &messages,
            temperature: None,
            max_tokens: Some(64),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["max_tokens"], 64);
        assert!(value.get("temperature").is_none());
    }

    #[test]
    fn test_preview_body_truncates() {
        assert_eq!(preview_body("  "), "<empty body>");
        let long = "x".repeat(BODY_PREVIEW_LIMIT + 5);
        assert!(preview_body(&long).ends_with("..."));
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("https://api.openai.com/v1/"), "https://api.openai.com");
        assert_eq!(normalize_base_url("http://localhost:11434"), "http://localhost:11434");
        assert_eq!(normalize_base_url("http://proxy/llm/v1"), "http://proxy/llm");
    }

    #[tokio::test]
    async fn test_versioned_base_url_hits_single_v1() {
        let mut server = Server::new_async().await;
        let good = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"ok"}}]}"#)
            .expect(1)
            .create_async()
            .await;
        let doubled = server
            .mock("POST", "/v1/v1/chat/completions")
            .with_status(404)
            .expect(0)
            .create_async()
            .await;

        let base = format!("{}/v1", server.url());
        let mut app = AppConfig::default();
        apply_overrides(&mut app, |key| (key == "OPENAI_BASE_URL").then(|| base.clone()));
        let BackendConfig::OpenAi(cfg) = &app.backend else {
            panic!("expected openai backend");
        };
        let backend = OpenAiBackend::new(cfg).unwrap();
        let completion = backend.complete(request()).await.unwrap();

        assert_eq!(completion.content, "ok");
        good.assert_async().await;
        doubled.assert_async().await;
    }

    #[test]
    fn test_rejects_empty_model() {
        let mut cfg = config("http://localhost".to_string());
        cfg.model = " ".to_string();
        assert!(matches!(OpenAiBackend::new(&cfg), Err(BackendError::Config(_))));
    }

    #[tokio::test]
    async fn test_complete_parses_first_choice_and_usage() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "Llama-3.2-3B-Instruct-Q4_K_M",
                "messages": [
                    {"role": "system", "content": "You are Tech Lead."},
                    {"role": "user", "content": "Decide."}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "model": "Llama-3.2-3B-Instruct-Q4_K_M",
                    "choices": [{"index": 0, "message": {"role": "assistant", "content": "approve"}, "finish_reason": "stop"}],
                    "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let backend = OpenAiBackend::new(&config(server.url())).unwrap();
        let completion = backend.complete(request()).await.unwrap();

        assert_eq!(completion.content, "approve");
        assert_eq!(completion.usage.total_tokens, 15);
    }

    #[tokio::test]
    async fn test_request_model_override_is_sent() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/chat/completions")
            .match_body(Matcher::PartialJson(json!({"model": "gpt-4o-mini"})))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"plan"}}]}"#)
            .create_async()
            .await;

        let backend = OpenAiBackend::new(&config(server.url())).unwrap();
        let completion = backend
            .complete(request().with_model(Some("gpt-4o-mini".to_string())))
            .await
            .unwrap();
        assert_eq!(completion.model, "gpt-4o-mini");
        assert_eq!(completion.usage, TokenUsage::default());
    }

    #[tokio::test]
    async fn test_status_error_keeps_body() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let backend = OpenAiBackend::new(&config(server.url())).unwrap();
        let err = backend.complete(request()).await.unwrap_err();
        assert!(err.is_transient());
        assert!(matches!(
            err,
            BackendError::Status { status: 429, ref body } if body == "rate limited"
        ));
    }

    #[tokio::test]
    async fn test_null_content_is_empty_response() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#)
            .create_async()
            .await;

        let backend = OpenAiBackend::new(&config(server.url())).unwrap();
        assert!(matches!(
            backend.complete(request()).await.unwrap_err(),
            BackendError::EmptyResponse
        ));
    }

    #[tokio::test]
    async fn test_garbage_body_is_decode_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let backend = OpenAiBackend::new(&config(server.url())).unwrap();
        let err = backend.complete(request()).await.unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
        assert!(!err.is_transient());
    }
}
