use chrono::Local;
use crewkit_core::api::{OutputRenderer, RenderEvent};
use serde_json::{json, Value};

/// One JSON object per event on stdout.
pub struct JsonlRendererPlugin {
    pretty_print: bool,
}

impl JsonlRendererPlugin {
    pub fn new(pretty_print: bool) -> Self {
        Self { pretty_print }
    }

    fn event_to_json(&self, event: &RenderEvent) -> Value {
        let ts = Local::now().to_rfc3339();
        match event {
            RenderEvent::RunStart {
                run_id,
                workflow,
                total_tasks,
            } => json!({
                "v": 1,
                "event_type": "run.start",
                "ts": ts,
                "run_id": run_id,
                "metadata": {
                    "workflow": workflow,
                    "total_tasks": total_tasks,
                }
            }),
            RenderEvent::TaskStart {
                run_id,
                task_id,
                name,
                agent,
                index,
                total_tasks,
            } => json!({
                "v": 1,
                "event_type": "task.start",
                "ts": ts,
                "run_id": run_id,
                "task_id": task_id,
                "metadata": {
                    "name": name,
                    "agent": agent,
                    "index": index,
                    "total_tasks": total_tasks,
                }
            }),
            RenderEvent::TaskRetry {
                run_id,
                task_id,
                attempt,
                delay_ms,
                error,
            } => json!({
                "v": 1,
                "event_type": "task.retry",
                "ts": ts,
                "run_id": run_id,
                "task_id": task_id,
                "metadata": {
                    "attempt": attempt,
                    "delay_ms": delay_ms,
                    "error": error,
                }
            }),
            RenderEvent::TaskComplete { run_id, output } => json!({
                "v": 1,
                "event_type": "task.end",
                "ts": ts,
                "run_id": run_id,
                "task_id": output.task_id,
                "output": output.raw,
                "metadata": {
                    "name": output.name,
                    "agent": output.agent,
                    "model": output.model,
                    "attempts": output.attempts,
                    "duration_ms": output.duration_ms,
                    "usage": output.usage,
                    "success": true,
                }
            }),
            RenderEvent::TaskFailed {
                run_id,
                task_id,
                attempts,
                error,
            } => json!({
                "v": 1,
                "event_type": "task.end",
                "ts": ts,
                "run_id": run_id,
                "task_id": task_id,
                "metadata": {
                    "attempts": attempts,
                    "error": error,
                    "success": false,
                }
            }),
            RenderEvent::RunEnd {
                run_id,
                completed,
                total_tasks,
                duration_ms,
                output,
            } => json!({
                "v": 1,
                "event_type": "run.end",
                "ts": ts,
                "run_id": run_id,
                "output": output.as_ref().map(|o| o.raw.as_str()),
                "metadata": {
                    "completed": completed,
                    "total_tasks": total_tasks,
                    "duration_ms": duration_ms,
                    "token_usage": output.as_ref().map(|o| o.token_usage),
                    "success": output.is_some(),
                }
            }),
        }
    }
}

impl OutputRenderer for JsonlRendererPlugin {
    fn name(&self) -> &str {
        "jsonl-renderer"
    }

    fn format(&self) -> &str {
        "jsonl"
    }

    fn render(&self, event: &RenderEvent) {
        let value = self.event_to_json(event);
        if self.pretty_print {
            println!("{}", serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".into()));
        } else {
            println!("{}", serde_json::to_string(&value).unwrap_or_else(|_| "{}".into()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jsonl_renderer_event_type() {
        let renderer = JsonlRendererPlugin::new(false);
        let value = renderer.event_to_json(&RenderEvent::RunStart {
            run_id: "run".to_string(),
            workflow: "research".to_string(),
            total_tasks: 4,
        });
        assert_eq!(value["event_type"], "run.start");
        assert_eq!(value["metadata"]["workflow"], "research");
    }

    #[test]
    fn test_jsonl_renderer_task_failed() {
        let renderer = JsonlRendererPlugin::new(false);
        let value = renderer.event_to_json(&RenderEvent::TaskFailed {
            run_id: "run".to_string(),
            task_id: "gather_research_data".to_string(),
            attempts: 2,
            error: "backend returned HTTP 503: busy".to_string(),
        });
        assert_eq!(value["event_type"], "task.end");
        assert_eq!(value["metadata"]["success"], false);
        assert_eq!(value["metadata"]["attempts"], 2);
    }

    #[test]
    fn test_jsonl_renderer_failed_run_has_null_output() {
        let renderer = JsonlRendererPlugin::new(false);
        let value = renderer.event_to_json(&RenderEvent::RunEnd {
            run_id: "run".to_string(),
            completed: 1,
            total_tasks: 3,
            duration_ms: 100,
            output: None,
        });
        assert!(value["output"].is_null());
        assert_eq!(value["metadata"]["success"], false);
    }
}
