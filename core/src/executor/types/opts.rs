use crate::config::ExecutionConfig;

/// Per-run knobs for the execution engine.
#[derive(Debug, Clone)]
pub struct ExecutionOpts {
    /// Backend attempts per task when the role sets no `max_iter`.
    pub default_max_iter: u32,

    /// Requests per minute when the role sets no `max_rpm`.
    pub default_max_rpm: Option<u32>,

    /// Show the indicatif spinner while tasks run.
    pub progress_bar: bool,
}

impl Default for ExecutionOpts {
    fn default() -> Self {
        Self {
            default_max_iter: 3,
            default_max_rpm: None,
            progress_bar: false,
        }
    }
}

impl ExecutionOpts {
    pub fn from_config(cfg: &ExecutionConfig) -> Self {
        Self {
            default_max_iter: cfg.default_max_iter.max(1),
            default_max_rpm: cfg.default_max_rpm,
            progress_bar: cfg.progress_bar && cfg.stream_format == "text",
        }
    }
}
