use std::sync::Arc;

use anyhow::Result;

use crewkit_core::api::{
    AppConfig, BackendConfig, CompletionBackend, OutputRenderer, RetryConfig, RetryStrategy,
};

use crate::backends::{DryRunBackend, OpenAiBackend};
use crate::executor::{
    ExponentialBackoffPlugin, JsonlRendererPlugin, LinearRetryPlugin, TextRendererPlugin,
};

pub fn build_backend(cfg: &AppConfig) -> Result<Arc<dyn CompletionBackend>> {
    match &cfg.backend {
        BackendConfig::OpenAi(oai_cfg) => Ok(Arc::new(OpenAiBackend::new(oai_cfg)?)),
        BackendConfig::DryRun(dry_cfg) => Ok(Arc::new(DryRunBackend::new(dry_cfg))),
    }
}

pub fn build_renderer(stream_format: &str, verbose: bool) -> Arc<dyn OutputRenderer> {
    match stream_format {
        "jsonl" => Arc::new(JsonlRendererPlugin::new(false)),
        // Anything other than jsonl behaves like text.
        _ => Arc::new(TextRendererPlugin::new(verbose)),
    }
}

pub fn build_retry(cfg: &RetryConfig) -> Arc<dyn RetryStrategy> {
    match cfg.strategy.as_str() {
        "linear" => Arc::new(LinearRetryPlugin::new(cfg.clone())),
        _ => Arc::new(ExponentialBackoffPlugin::new(cfg.clone())),
    }
}
