use crewkit_core::api::{OutputRenderer, RenderEvent};

/// Human-readable progress lines on stderr; stdout is left for the final report.
pub struct TextRendererPlugin {
    /// Also print every task's raw output as it completes.
    verbose: bool,
}

impl TextRendererPlugin {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn format_event(&self, event: &RenderEvent) -> String {
        match event {
            RenderEvent::RunStart {
                run_id,
                workflow,
                total_tasks,
            } => format!("RUN START {} {} (tasks: {})", workflow, run_id, total_tasks),
            RenderEvent::TaskStart {
                task_id,
                name,
                agent,
                index,
                total_tasks,
                ..
            } => format!(
                "TASK START [{}/{}] {} ({}, agent: {})",
                index + 1,
                total_tasks,
                name,
                task_id,
                agent
            ),
            RenderEvent::TaskRetry {
                task_id,
                attempt,
                delay_ms,
                error,
                ..
            } => format!(
                "TASK RETRY {} (attempt {} failed: {}; retrying in {}ms)",
                task_id, attempt, error, delay_ms
            ),
            RenderEvent::TaskComplete { output, .. } => {
                let mut line = format!(
                    "TASK END {} (status OK, attempts {}, duration {}ms, tokens {})",
                    output.task_id, output.attempts, output.duration_ms, output.usage.total_tokens
                );
                if self.verbose {
                    line.push_str(&format!("\n--- {} ({}) ---\n{}", output.name, output.agent, output.raw));
                }
                line
            }
            RenderEvent::TaskFailed {
                task_id,
                attempts,
                error,
                ..
            } => format!(
                "TASK END {} (status FAILED, attempts {}): {}",
                task_id, attempts, error
            ),
            RenderEvent::RunEnd {
                run_id,
                completed,
                total_tasks,
                duration_ms,
                ..
            } => format!(
                "RUN END {} (completed {}/{}, duration {}ms)",
                run_id, completed, total_tasks, duration_ms
            ),
        }
    }
}

impl OutputRenderer for TextRendererPlugin {
    fn name(&self) -> &str {
        "text-renderer"
    }

    fn format(&self) -> &str {
        "text"
    }

    fn render(&self, event: &RenderEvent) {
        eprintln!("{}", self.format_event(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewkit_core::api::{TaskOutput, TokenUsage};

    fn output() -> TaskOutput {
        TaskOutput {
            task_id: "review_security".to_string(),
            name: "Review Security".to_string(),
            agent: "Security Engineer".to_string(),
            description: "Review".to_string(),
            expected_output: "JSON".to_string(),
            raw: "{\"blocking\": true}".to_string(),
            model: "m".to_string(),
            attempts: 2,
            duration_ms: 5,
            usage: TokenUsage {
                prompt_tokens: 1,
                completion_tokens: 1,
                total_tokens: 2,
            },
        }
    }

    #[test]
    fn test_text_renderer_task_complete() {
        let renderer = TextRendererPlugin::new(false);
        let line = renderer.format_event(&RenderEvent::TaskComplete {
            run_id: "run".to_string(),
            output: output(),
        });
        assert_eq!(
            line,
            "TASK END review_security (status OK, attempts 2, duration 5ms, tokens 2)"
        );
    }

    #[test]
    fn test_text_renderer_verbose_includes_output() {
        let renderer = TextRendererPlugin::new(true);
        let line = renderer.format_event(&RenderEvent::TaskComplete {
            run_id: "run".to_string(),
            output: output(),
        });
        assert!(line.ends_with("--- Review Security (Security Engineer) ---\n{\"blocking\": true}"));
    }

    #[test]
    fn test_text_renderer_task_start_is_one_based() {
        let renderer = TextRendererPlugin::new(false);
        let line = renderer.format_event(&RenderEvent::TaskStart {
            run_id: "run".to_string(),
            task_id: "t".to_string(),
            name: "Plan".to_string(),
            agent: "Research Planner".to_string(),
            index: 0,
            total_tasks: 4,
        });
        assert!(line.starts_with("TASK START [1/4] Plan"));
    }
}
