use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use uuid::Uuid;

use crate::crew::{RoleConfig, Workflow, WorkflowStep};
use crate::error::{BackendError, ExecutorError};
use crate::template::Inputs;

use super::progress::ProgressMonitor;
use super::prompt::{build_prompt, ContextEntry};
use super::rate_limit::RequestPacer;
use super::traits::{CompletionBackend, OutputRenderer, RenderEvent, RetryStrategy};
use super::types::{CrewOutput, ExecutionOpts, TaskOutput, TokenUsage};

/// Runs a workflow's tasks one at a time against a completion backend.
pub struct ExecutionEngine {
    backend: Arc<dyn CompletionBackend>,
    opts: ExecutionOpts,
    renderer: Option<Arc<dyn OutputRenderer>>,
    retry_strategy: Option<Arc<dyn RetryStrategy>>,
}

pub struct ExecutionEngineBuilder {
    backend: Arc<dyn CompletionBackend>,
    opts: ExecutionOpts,
    renderer: Option<Arc<dyn OutputRenderer>>,
    retry_strategy: Option<Arc<dyn RetryStrategy>>,
}

impl ExecutionEngineBuilder {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            backend,
            opts: ExecutionOpts::default(),
            renderer: None,
            retry_strategy: None,
        }
    }

    pub fn opts(mut self, opts: ExecutionOpts) -> Self {
        self.opts = opts;
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn OutputRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn retry_strategy(mut self, strategy: Arc<dyn RetryStrategy>) -> Self {
        self.retry_strategy = Some(strategy);
        self
    }

    pub fn build(self) -> ExecutionEngine {
        ExecutionEngine {
            backend: self.backend,
            opts: self.opts,
            renderer: self.renderer,
            retry_strategy: self.retry_strategy,
        }
    }
}

struct RunState<'w> {
    run_id: String,
    workflow: &'w Workflow,
    outputs: Vec<TaskOutput>,
    pacer: RequestPacer,
    progress: ProgressMonitor,
}

impl ExecutionEngine {
    pub fn new(backend: Arc<dyn CompletionBackend>, opts: ExecutionOpts) -> Self {
        ExecutionEngineBuilder::new(backend).opts(opts).build()
    }

    pub fn builder(backend: Arc<dyn CompletionBackend>) -> ExecutionEngineBuilder {
        ExecutionEngineBuilder::new(backend)
    }

    /// Executes every step in order and returns the collected outputs.
    ///
    /// Stops at the first task whose attempts are exhausted.
    pub async fn run(&self, workflow: &Workflow, inputs: &Inputs) -> Result<CrewOutput, ExecutorError> {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut state = RunState {
            run_id: Uuid::new_v4().to_string(),
            workflow,
            outputs: Vec::with_capacity(workflow.len()),
            pacer: RequestPacer::new(),
            progress: ProgressMonitor::new(workflow.len(), self.opts.progress_bar),
        };

        tracing::info!(
            run_id = %state.run_id,
            workflow = workflow.name(),
            tasks = workflow.len(),
            backend = self.backend.name(),
            model = self.backend.model_name(),
            "run start"
        );
        self.emit(RenderEvent::RunStart {
            run_id: state.run_id.clone(),
            workflow: workflow.name().to_string(),
            total_tasks: workflow.len(),
        });

        for (index, step) in workflow.steps().iter().enumerate() {
            match self.execute_step(&mut state, index, step, inputs).await {
                Ok(output) => state.outputs.push(output),
                Err(err) => {
                    state.progress.finish(false);
                    self.emit(RenderEvent::RunEnd {
                        run_id: state.run_id.clone(),
                        completed: state.outputs.len(),
                        total_tasks: workflow.len(),
                        duration_ms: start.elapsed().as_millis() as u64,
                        output: None,
                    });
                    return Err(err);
                }
            }
        }
        state.progress.finish(true);

        let mut token_usage = TokenUsage::default();
        for out in &state.outputs {
            token_usage.add(&out.usage);
        }

        let output = CrewOutput {
            run_id: state.run_id.clone(),
            workflow: workflow.name().to_string(),
            started_at,
            raw: state
                .outputs
                .last()
                .map(|o| o.raw.clone())
                .unwrap_or_default(),
            tasks_output: std::mem::take(&mut state.outputs),
            token_usage,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        tracing::info!(
            run_id = %output.run_id,
            duration_ms = output.duration_ms,
            total_tokens = output.token_usage.total_tokens,
            "run end"
        );
        self.emit(RenderEvent::RunEnd {
            run_id: output.run_id.clone(),
            completed: output.tasks_output.len(),
            total_tasks: workflow.len(),
            duration_ms: output.duration_ms,
            output: Some(output.clone()),
        });

        Ok(output)
    }

    async fn execute_step(
        &self,
        state: &mut RunState<'_>,
        index: usize,
        step: &WorkflowStep,
        inputs: &Inputs,
    ) -> Result<TaskOutput, ExecutorError> {
        let task = &step.task;
        let workflow = state.workflow;
        let role = workflow
            .role(&task.agent)
            .ok_or_else(|| ExecutorError::UnknownExecutor {
                task_id: task.id.clone(),
                role_id: task.agent.clone(),
            })?;

        let context = context_entries(state, step);
        let prompt = build_prompt(role, task, &context, inputs);
        if !prompt.unresolved.is_empty() {
            tracing::warn!(
                task = %task.id,
                unresolved = ?prompt.unresolved,
                "placeholders without a matching input were left as-is"
            );
        }

        self.emit(RenderEvent::TaskStart {
            run_id: state.run_id.clone(),
            task_id: task.id.clone(),
            name: task.name.clone(),
            agent: role.role.clone(),
            index,
            total_tasks: workflow.len(),
        });
        state.progress.start_task(&task.name, &role.role);

        let max_iter = self.max_iter(role);
        let max_rpm = role.max_rpm.or(self.opts.default_max_rpm);
        let request = prompt.to_request(role.model.clone());
        let start = Instant::now();
        let mut attempt: u32 = 0;

        let completion = loop {
            attempt += 1;
            state.pacer.wait(&role.id, max_rpm).await;

            let error = match self.backend.complete(request.clone()).await {
                Ok(c) if !c.content.trim().is_empty() => break c,
                Ok(_) => BackendError::EmptyResponse,
                Err(e) => e,
            };

            let fatal = self.is_fatal(&error);
            tracing::warn!(
                task = %task.id,
                attempt,
                max_iter,
                fatal,
                error = %error,
                "backend attempt failed"
            );

            if fatal || attempt >= max_iter {
                let duration_ms = start.elapsed().as_millis() as u64;
                state.progress.complete_task(false, duration_ms);
                self.emit(RenderEvent::TaskFailed {
                    run_id: state.run_id.clone(),
                    task_id: task.id.clone(),
                    attempts: attempt,
                    error: error.to_string(),
                });
                return Err(ExecutorError::Backend {
                    task_id: task.id.clone(),
                    attempts: attempt,
                    source: error,
                });
            }

            let delay = self.retry_delay(attempt);
            self.emit(RenderEvent::TaskRetry {
                run_id: state.run_id.clone(),
                task_id: task.id.clone(),
                attempt,
                delay_ms: delay.as_millis() as u64,
                error: error.to_string(),
            });
            state.progress.note_retry(attempt + 1);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        state.progress.complete_task(true, duration_ms);

        let output = TaskOutput {
            task_id: task.id.clone(),
            name: task.name.clone(),
            agent: role.role.clone(),
            description: prompt.description,
            expected_output: prompt.expected_output,
            raw: completion.content.trim().to_string(),
            model: completion.model,
            attempts: attempt,
            duration_ms,
            usage: completion.usage,
        };

        tracing::info!(
            task = %output.task_id,
            attempts = output.attempts,
            duration_ms,
            tokens = output.usage.total_tokens,
            "task complete"
        );
        self.emit(RenderEvent::TaskComplete {
            run_id: state.run_id.clone(),
            output: output.clone(),
        });

        Ok(output)
    }

    fn max_iter(&self, role: &RoleConfig) -> u32 {
        role.max_iter.unwrap_or(self.opts.default_max_iter).max(1)
    }

    fn is_fatal(&self, error: &BackendError) -> bool {
        match &self.retry_strategy {
            Some(strategy) => strategy.is_fatal_error(error),
            None => !error.is_transient(),
        }
    }

    fn retry_delay(&self, attempt: u32) -> Duration {
        self.retry_strategy
            .as_ref()
            .map(|s| s.next_delay(attempt))
            .unwrap_or(Duration::ZERO)
    }

    fn emit(&self, event: RenderEvent) {
        if let Some(renderer) = &self.renderer {
            renderer.render(&event);
        }
    }
}

fn context_entries<'a>(state: &'a RunState<'_>, step: &WorkflowStep) -> Vec<ContextEntry<'a>> {
    step.context
        .iter()
        .filter_map(|dep| state.outputs.iter().find(|o| &o.task_id == dep))
        .map(|o| ContextEntry {
            name: &o.name,
            raw: &o.raw,
        })
        .collect()
}
