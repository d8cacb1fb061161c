use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Secrets file parsed into this config at load time (`KEY=VALUE` lines).
    #[serde(default)]
    pub env_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            backend: BackendConfig::default(),
            execution: ExecutionConfig::default(),
            env_file: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "crewkit_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_file() -> bool {
    false
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider")]
pub enum BackendConfig {
    #[serde(rename = "openai")]
    OpenAi(OpenAiBackendConfig),
    #[serde(rename = "dry-run")]
    DryRun(DryRunBackendConfig),
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::OpenAi(OpenAiBackendConfig::default())
    }
}

impl BackendConfig {
    pub fn provider_name(&self) -> &'static str {
        match self {
            BackendConfig::OpenAi(_) => "openai",
            BackendConfig::DryRun(_) => "dry-run",
        }
    }
}

/// Any server speaking the OpenAI chat completions protocol (OpenAI, Ollama, llama.cpp).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiBackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub temperature: Option<f32>,

    #[serde(default)]
    pub max_tokens: Option<u32>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_ms() -> u64 {
    120_000
}

impl Default for OpenAiBackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            temperature: None,
            max_tokens: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DryRunBackendConfig {
    /// Reported model name; purely cosmetic.
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Attempts per task when the role does not set `max_iter`.
    #[serde(default = "default_max_iter")]
    pub default_max_iter: u32,

    /// Requests per minute per role when the role does not set `max_rpm`.
    #[serde(default)]
    pub default_max_rpm: Option<u32>,

    /// "text" or "jsonl"
    #[serde(default = "default_stream_format")]
    pub stream_format: String,

    /// Show a spinner while a task is running (text output on a terminal only).
    #[serde(default = "default_progress_bar")]
    pub progress_bar: bool,

    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_max_iter() -> u32 {
    3
}

fn default_stream_format() -> String {
    "text".to_string()
}

fn default_progress_bar() -> bool {
    true
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            default_max_iter: default_max_iter(),
            default_max_rpm: None,
            stream_format: default_stream_format(),
            progress_bar: default_progress_bar(),
            retry: RetryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// "exponential-backoff" or "linear"
    #[serde(default = "default_retry_strategy")]
    pub strategy: String,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_retry_strategy() -> String {
    "exponential-backoff".to_string()
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            strategy: default_retry_strategy(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.backend.provider_name(), "openai");
        assert_eq!(cfg.execution.default_max_iter, 3);
        assert_eq!(cfg.execution.stream_format, "text");
        assert_eq!(cfg.execution.retry.strategy, "exponential-backoff");
        assert!(cfg.logging.console);
    }

    #[test]
    fn backend_section_selects_provider() {
        let cfg: AppConfig = toml::from_str(
            r#"
[backend]
provider = "openai"
base_url = "http://localhost:11434"
model = "llama3"
temperature = 0.2

[execution]
default_max_iter = 2
default_max_rpm = 10
"#,
        )
        .unwrap();

        let BackendConfig::OpenAi(oai) = &cfg.backend else {
            panic!("expected openai backend");
        };
        assert_eq!(oai.base_url, "http://localhost:11434");
        assert_eq!(oai.model, "llama3");
        assert_eq!(oai.temperature, Some(0.2));
        assert_eq!(oai.timeout_ms, 120_000);
        assert_eq!(cfg.execution.default_max_iter, 2);
        assert_eq!(cfg.execution.default_max_rpm, Some(10));
    }

    #[test]
    fn dry_run_provider_parses() {
        let cfg: AppConfig = toml::from_str("[backend]\nprovider = \"dry-run\"\n").unwrap();
        assert_eq!(cfg.backend.provider_name(), "dry-run");
    }
}
