use serde::{Deserialize, Serialize};

use crate::definition::DefinitionRecord;
use crate::error::DefinitionError;

/// An actor in a crew: title, objective and expertise framing.
///
/// `role`, `goal` and `backstory` are guaranteed non-empty once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    pub id: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    /// Upper bound on backend attempts per task; falls back to the engine default.
    pub max_iter: Option<u32>,
    /// Requests per minute for this role; `None` means unpaced.
    pub max_rpm: Option<u32>,
    /// Tool names advertised in the prompt. Tools are never invoked.
    pub tools: Vec<String>,
    /// Model override for this role's requests.
    pub model: Option<String>,
    /// Carried for manifest compatibility; delegation between roles is never performed.
    pub allow_delegation: bool,
}

impl RoleConfig {
    pub fn new(
        id: impl Into<String>,
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Result<Self, DefinitionError> {
        let cfg = Self {
            id: id.into(),
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            max_iter: None,
            max_rpm: None,
            tools: Vec::new(),
            model: None,
            allow_delegation: false,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_definition(
        id: impl Into<String>,
        record: &DefinitionRecord,
    ) -> Result<Self, DefinitionError> {
        Self::new(
            id,
            record.role.clone(),
            record.goal.clone(),
            record.backstory.clone(),
        )
    }

    pub fn with_max_iter(mut self, max_iter: u32) -> Self {
        self.max_iter = Some(max_iter);
        self
    }

    pub fn with_max_rpm(mut self, max_rpm: u32) -> Self {
        self.max_rpm = Some(max_rpm);
        self
    }

    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = tools.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_allow_delegation(mut self, allow: bool) -> Self {
        self.allow_delegation = allow;
        self
    }

    fn validate(&self) -> Result<(), DefinitionError> {
        let fields = [
            ("role", &self.role),
            ("goal", &self.goal),
            ("backstory", &self.backstory),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(DefinitionError::MissingField {
                    record: format!("role '{}'", self.id),
                    field,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_role_document() {
        let record = DefinitionRecord::parse(
            "**Role:** Tech Lead\n\n**Goal:** Decide.\n\n**Backstory:** Seasoned reviewer.",
        );
        let role = RoleConfig::from_definition("tech_lead", &record)
            .unwrap()
            .with_max_iter(2)
            .with_max_rpm(10);
        assert_eq!(role.role, "Tech Lead");
        assert_eq!(role.max_iter, Some(2));
        assert_eq!(role.max_rpm, Some(10));
        assert!(role.tools.is_empty());
    }

    #[test]
    fn missing_backstory_fails_fast() {
        let record = DefinitionRecord::parse("**Role:** Tech Lead\n\n**Goal:** Decide.");
        let err = RoleConfig::from_definition("tech_lead", &record).unwrap_err();
        match err {
            DefinitionError::MissingField { record, field } => {
                assert_eq!(record, "role 'tech_lead'");
                assert_eq!(field, "backstory");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn task_document_is_not_a_role() {
        let record = DefinitionRecord::parse("**Description:** Do it.\n\n**Expected Output:** Done.");
        assert!(RoleConfig::from_definition("x", &record).is_err());
    }
}
