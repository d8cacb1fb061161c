use crate::executor::types::{CrewOutput, TaskOutput};

/// Progress sink for a workflow run (text or JSONL).
pub trait OutputRenderer: Send + Sync {
    fn name(&self) -> &str;
    fn format(&self) -> &str;
    fn render(&self, event: &RenderEvent);
}

#[derive(Debug, Clone)]
pub enum RenderEvent {
    RunStart {
        run_id: String,
        workflow: String,
        total_tasks: usize,
    },
    TaskStart {
        run_id: String,
        task_id: String,
        name: String,
        agent: String,
        index: usize,
        total_tasks: usize,
    },
    TaskRetry {
        run_id: String,
        task_id: String,
        attempt: u32,
        delay_ms: u64,
        error: String,
    },
    TaskComplete {
        run_id: String,
        output: TaskOutput,
    },
    TaskFailed {
        run_id: String,
        task_id: String,
        attempts: u32,
        error: String,
    },
    RunEnd {
        run_id: String,
        completed: usize,
        total_tasks: usize,
        duration_ms: u64,
        output: Option<CrewOutput>,
    },
}
