use std::collections::HashSet;

use serde::Serialize;

use super::graph::{TaskGraph, TaskLike};
use super::role::RoleConfig;
use super::task::{ContextSpec, TaskConfig};
use crate::error::ExecutorError;

/// A task with its context resolved to concrete upstream task ids.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowStep {
    pub task: TaskConfig,
    pub context: Vec<String>,
}

impl TaskLike for WorkflowStep {
    fn id(&self) -> &str {
        &self.task.id
    }

    fn dependencies(&self) -> &[String] {
        &self.context
    }
}

/// An ordered, validated pipeline of tasks bound to declared roles.
///
/// Steps run in the order they were passed to [`Workflow::assemble`]; every
/// context reference points at a step listed earlier.
#[derive(Debug, Clone, Serialize)]
pub struct Workflow {
    name: String,
    roles: Vec<RoleConfig>,
    steps: Vec<WorkflowStep>,
    #[serde(skip)]
    stages: Vec<Vec<String>>,
}

impl Workflow {
    pub fn assemble(
        name: impl Into<String>,
        roles: Vec<RoleConfig>,
        tasks: Vec<TaskConfig>,
    ) -> Result<Self, ExecutorError> {
        let name = name.into();
        if tasks.is_empty() {
            return Err(ExecutorError::EmptyWorkflow(name));
        }

        let mut role_ids = HashSet::new();
        for role in &roles {
            if !role_ids.insert(role.id.as_str()) {
                return Err(ExecutorError::DuplicateRoleId(role.id.clone()));
            }
        }

        for task in &tasks {
            if !role_ids.contains(task.agent.as_str()) {
                return Err(ExecutorError::UnknownExecutor {
                    task_id: task.id.clone(),
                    role_id: task.agent.clone(),
                });
            }
        }

        let steps = resolve_context(tasks);
        let graph = TaskGraph::from_tasks(&steps)?;
        graph.validate()?;

        for (idx, step) in steps.iter().enumerate() {
            for dep in &step.context {
                if graph.position(dep) >= idx {
                    return Err(ExecutorError::DependencyNotReady {
                        task_id: step.task.id.clone(),
                        dep: dep.clone(),
                    });
                }
            }
        }

        let stages = graph.topological_sort()?;

        tracing::debug!(
            workflow = %name,
            roles = roles.len(),
            tasks = steps.len(),
            stages = stages.len(),
            "assembled workflow"
        );

        Ok(Self {
            name,
            roles,
            steps,
            stages,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn roles(&self) -> &[RoleConfig] {
        &self.roles
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    pub fn tasks(&self) -> impl Iterator<Item = &TaskConfig> {
        self.steps.iter().map(|s| &s.task)
    }

    pub fn role(&self, id: &str) -> Option<&RoleConfig> {
        self.roles.iter().find(|r| r.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&TaskConfig> {
        self.step(id).map(|s| &s.task)
    }

    pub fn step(&self, id: &str) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.task.id == id)
    }

    /// The role bound to a task. Always present for tasks of an assembled workflow.
    pub fn executor_of(&self, task_id: &str) -> Option<&RoleConfig> {
        self.task(task_id).and_then(|t| self.role(&t.agent))
    }

    /// Upstream task ids visible to `task_id`, in declared order.
    pub fn context_of(&self, task_id: &str) -> Option<&[String]> {
        self.step(task_id).map(|s| s.context.as_slice())
    }

    pub fn execution_order(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.task.id.as_str()).collect()
    }

    /// Groups of tasks with no dependencies between members of the same group.
    pub fn stages(&self) -> &[Vec<String>] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

fn resolve_context(tasks: Vec<TaskConfig>) -> Vec<WorkflowStep> {
    let mut earlier: Vec<String> = Vec::with_capacity(tasks.len());
    let mut steps = Vec::with_capacity(tasks.len());

    for task in tasks {
        let context = match &task.context {
            ContextSpec::Previous => earlier.clone(),
            ContextSpec::Explicit(ids) => ids.clone(),
        };
        earlier.push(task.id.clone());
        steps.push(WorkflowStep { task, context });
    }

    steps
}
