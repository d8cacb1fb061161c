use std::collections::BTreeSet;

use crate::crew::{RoleConfig, TaskConfig};
use crate::executor::types::{ChatMessage, CompletionRequest};
use crate::template::{interpolate, Inputs};

/// Output of an upstream task made visible to the current one.
#[derive(Debug, Clone, Copy)]
pub struct ContextEntry<'a> {
    pub name: &'a str,
    pub raw: &'a str,
}

/// The messages sent for one task, plus what interpolation left behind.
#[derive(Debug, Clone)]
pub struct TaskPrompt {
    pub system: String,
    pub user: String,
    pub description: String,
    pub expected_output: String,
    pub unresolved: BTreeSet<String>,
}

impl TaskPrompt {
    pub fn to_request(&self, model: Option<String>) -> CompletionRequest {
        CompletionRequest::new(vec![
            ChatMessage::system(self.system.clone()),
            ChatMessage::user(self.user.clone()),
        ])
        .with_model(model)
    }
}

pub fn system_prompt(role: &RoleConfig) -> String {
    let mut out = format!(
        "You are {}. {}\nYour personal goal is: {}",
        role.role, role.backstory, role.goal
    );
    if !role.tools.is_empty() {
        out.push_str("\nTools declared for this role (not callable in this run): ");
        out.push_str(&role.tools.join(", "));
    }
    out
}

/// Renders upstream outputs as a delimited block; empty outputs are skipped.
pub fn context_block(context: &[ContextEntry<'_>]) -> Option<String> {
    let mut block = String::from("=== Context ===\n\n");
    let mut added = false;

    for entry in context {
        if entry.raw.trim().is_empty() {
            continue;
        }
        block.push_str(&format!("# Task: {}\n", entry.name));
        block.push_str(entry.raw);
        if !entry.raw.ends_with('\n') {
            block.push('\n');
        }
        block.push('\n');
        added = true;
    }

    if !added {
        return None;
    }
    block.push_str("=== End Context ===");
    Some(block)
}

pub fn build_prompt(
    role: &RoleConfig,
    task: &TaskConfig,
    context: &[ContextEntry<'_>],
    inputs: &Inputs,
) -> TaskPrompt {
    let description = interpolate(&task.description, inputs);
    let expected_output = interpolate(&task.expected_output, inputs);

    let mut user = format!(
        "Current Task: {}\n\nThis is the expected criteria for your final answer: {}\nyou MUST return the actual complete content as the final answer, not a summary.",
        description.text, expected_output.text
    );
    if let Some(block) = context_block(context) {
        user.push_str("\n\nThis is the context you're working with:\n");
        user.push_str(&block);
    }

    let mut unresolved = description.unresolved;
    unresolved.extend(expected_output.unresolved);

    TaskPrompt {
        system: system_prompt(role),
        user,
        description: description.text,
        expected_output: expected_output.text,
        unresolved,
    }
}
