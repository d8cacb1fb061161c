use serde::{Deserialize, Serialize};

use super::report::{CheckCase, CheckReport};
use crate::crew::Workflow;
use crate::template::has_placeholder;

/// A declarative check from a crew manifest's `[[checks]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckSpec {
    /// The task's expected output mentions `word` (case-insensitive).
    TaskMentions { task: String, word: String },
    /// The task's expected output names every key in `keys`.
    TaskMentionsKeys { task: String, keys: Vec<String> },
    /// The task is executed by the role with this title.
    TaskExecutor { task: String, role: String },
    /// The task description carries `{placeholder}`.
    TaskHasPlaceholder { task: String, placeholder: String },
    /// Number of resolved context tasks.
    TaskContextLen { task: String, len: usize },
    RoleCount { count: usize },
    TaskCount { count: usize },
    /// Number of tools declared by the role with this id.
    RoleToolCount { role: String, count: usize },
}

const MISSING_TASK: &str = "<no such task>";
const MISSING_ROLE: &str = "<no such role>";

impl CheckSpec {
    pub fn name(&self) -> String {
        match self {
            Self::TaskMentions { task, word } => format!("{task}.mentions[{word}]"),
            Self::TaskMentionsKeys { task, .. } => format!("{task}.mentions_keys"),
            Self::TaskExecutor { task, .. } => format!("{task}.executor"),
            Self::TaskHasPlaceholder { task, placeholder } => {
                format!("{task}.placeholder[{placeholder}]")
            }
            Self::TaskContextLen { task, .. } => format!("{task}.context_len"),
            Self::RoleCount { .. } => "role_count".to_string(),
            Self::TaskCount { .. } => "task_count".to_string(),
            Self::RoleToolCount { role, .. } => format!("{role}.tool_count"),
        }
    }

    pub fn evaluate(&self, workflow: &Workflow) -> CheckCase {
        let name = self.name();
        match self {
            Self::TaskMentions { task, word } => match workflow.task(task) {
                Some(t) => {
                    let found = t
                        .expected_output
                        .to_lowercase()
                        .contains(&word.to_lowercase());
                    CheckCase::new(
                        name,
                        found,
                        format!("Expected output of '{task}' should mention '{word}'"),
                        true,
                        found,
                    )
                }
                None => missing_task(name, task),
            },
            Self::TaskMentionsKeys { task, keys } => match workflow.task(task) {
                Some(t) => {
                    let missing: Vec<&str> = keys
                        .iter()
                        .filter(|k| !t.expected_output.contains(k.as_str()))
                        .map(String::as_str)
                        .collect();
                    CheckCase::new(
                        name,
                        missing.is_empty(),
                        format!("Expected output of '{task}' should name every key"),
                        keys.join(", "),
                        if missing.is_empty() {
                            keys.join(", ")
                        } else {
                            format!("missing {}", missing.join(", "))
                        },
                    )
                }
                None => missing_task(name, task),
            },
            Self::TaskExecutor { task, role } => {
                let Some(t) = workflow.task(task) else {
                    return missing_task(name, task);
                };
                let got = workflow
                    .executor_of(&t.id)
                    .map(|r| r.role.as_str())
                    .unwrap_or(MISSING_ROLE);
                CheckCase::new(
                    name,
                    got == role,
                    format!("Task '{task}' should be executed by '{role}'"),
                    role,
                    got,
                )
            }
            Self::TaskHasPlaceholder { task, placeholder } => match workflow.task(task) {
                Some(t) => {
                    let found = has_placeholder(&t.description, placeholder);
                    CheckCase::new(
                        name,
                        found,
                        format!("Description of '{task}' should contain {{{placeholder}}}"),
                        true,
                        found,
                    )
                }
                None => missing_task(name, task),
            },
            Self::TaskContextLen { task, len } => match workflow.context_of(task) {
                Some(ctx) => CheckCase::new(
                    name,
                    ctx.len() == *len,
                    format!("Task '{task}' should read {len} context task(s)"),
                    len,
                    ctx.len(),
                ),
                None => missing_task(name, task),
            },
            Self::RoleCount { count } => CheckCase::new(
                name,
                workflow.roles().len() == *count,
                "Crew should declare the expected number of roles",
                count,
                workflow.roles().len(),
            ),
            Self::TaskCount { count } => CheckCase::new(
                name,
                workflow.len() == *count,
                "Crew should declare the expected number of tasks",
                count,
                workflow.len(),
            ),
            Self::RoleToolCount { role, count } => match workflow.role(role) {
                Some(r) => CheckCase::new(
                    name,
                    r.tools.len() == *count,
                    format!("Role '{role}' should declare {count} tool(s)"),
                    count,
                    r.tools.len(),
                ),
                None => CheckCase::new(
                    name,
                    false,
                    format!("Role '{role}' is not declared"),
                    role,
                    MISSING_ROLE,
                ),
            },
        }
    }
}

fn missing_task(name: String, task: &str) -> CheckCase {
    CheckCase::new(
        name,
        false,
        format!("Task '{task}' is not part of the workflow"),
        task,
        MISSING_TASK,
    )
}

/// Checks every workflow must pass regardless of its manifest.
pub fn generic_checks(workflow: &Workflow) -> Vec<CheckCase> {
    let mut cases = Vec::new();

    for role in workflow.roles() {
        for (field, value) in [
            ("role", &role.role),
            ("goal", &role.goal),
            ("backstory", &role.backstory),
        ] {
            cases.push(CheckCase::new(
                format!("{}.{field}", role.id),
                !value.trim().is_empty(),
                format!("Role '{}' should have a non-empty {field}", role.id),
                "non-empty text",
                if value.trim().is_empty() { "empty" } else { "text" },
            ));
        }
    }

    for task in workflow.tasks() {
        for (field, value) in [
            ("description", &task.description),
            ("expected_output", &task.expected_output),
        ] {
            cases.push(CheckCase::new(
                format!("{}.{field}", task.id),
                !value.trim().is_empty(),
                format!("Task '{}' should have a non-empty {field}", task.id),
                "non-empty text",
                if value.trim().is_empty() { "empty" } else { "text" },
            ));
        }
    }

    cases
}

/// Runs the generic checks followed by `specs`, in order.
pub fn run_checks(workflow: &Workflow, specs: &[CheckSpec]) -> CheckReport {
    let mut cases = generic_checks(workflow);
    cases.extend(specs.iter().map(|spec| spec.evaluate(workflow)));

    let report = CheckReport::new(cases);
    tracing::debug!(
        workflow = workflow.name(),
        total = report.cases.len(),
        failed = report.failed_count(),
        "checks evaluated"
    );
    report
}
