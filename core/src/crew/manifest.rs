use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::role::RoleConfig;
use super::task::TaskConfig;
use super::workflow::Workflow;
use crate::check::CheckSpec;
use crate::definition::DefinitionRecord;
use crate::error::{DefinitionError, ExecutorError};
use crate::template::Inputs;

/// Where manifest-relative files (definitions, input files) are read from.
pub trait DefinitionSource {
    fn read_to_string(&self, relative: &str) -> Result<String, DefinitionError>;

    /// Display form of `relative` for error messages.
    fn describe(&self, relative: &str) -> PathBuf {
        PathBuf::from(relative)
    }
}

/// Reads files relative to a directory on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DefinitionSource for DirSource {
    fn read_to_string(&self, relative: &str) -> Result<String, DefinitionError> {
        let path = self.root.join(relative);
        std::fs::read_to_string(&path).map_err(|e| DefinitionError::from_io(path, e))
    }

    fn describe(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleEntry {
    pub id: String,
    /// Markdown file with `Role`, `Goal` and `Backstory` sections.
    pub definition: String,
    #[serde(default)]
    pub max_iter: Option<u32>,
    #[serde(default)]
    pub max_rpm: Option<u32>,
    #[serde(default)]
    pub allow_delegation: bool,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEntry {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Markdown file with `Description` and `Expected Output` sections.
    pub definition: String,
    pub agent: String,
    /// Upstream task ids; omitted means every earlier task.
    #[serde(default)]
    pub context: Option<Vec<String>>,
}

/// On-disk description of one crew (`crew.toml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewManifest {
    pub name: String,
    /// Banner printed above the final result.
    #[serde(default)]
    pub title: Option<String>,
    /// Execution order by task id; defaults to declaration order.
    #[serde(default)]
    pub order: Option<Vec<String>>,
    #[serde(default)]
    pub inputs: BTreeMap<String, String>,
    /// Inputs whose value is the content of a manifest-relative file.
    #[serde(default)]
    pub input_files: BTreeMap<String, String>,
    #[serde(default)]
    pub roles: Vec<RoleEntry>,
    #[serde(default)]
    pub tasks: Vec<TaskEntry>,
    #[serde(default)]
    pub checks: Vec<CheckSpec>,
    /// Where the manifest was read from; named in validation errors.
    #[serde(skip)]
    pub origin: PathBuf,
}

/// A fully loaded crew: assembled workflow plus run defaults and checks.
#[derive(Debug, Clone)]
pub struct Crew {
    pub name: String,
    pub title: String,
    pub workflow: Workflow,
    pub inputs: Inputs,
    pub checks: Vec<CheckSpec>,
}

impl CrewManifest {
    pub fn parse(content: &str, origin: &Path) -> Result<Self, DefinitionError> {
        let mut manifest: Self =
            toml::from_str(content).map_err(|e| DefinitionError::Manifest {
                path: origin.to_path_buf(),
                message: e.to_string(),
            })?;
        manifest.origin = origin.to_path_buf();
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self, DefinitionError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| DefinitionError::from_io(path, e))?;
        Self::parse(&content, path)
    }

    /// Loads every definition through `source` and assembles the workflow.
    pub fn build(&self, source: &dyn DefinitionSource) -> Result<Crew, ExecutorError> {
        let roles = self
            .roles
            .iter()
            .map(|entry| build_role(entry, source))
            .collect::<Result<Vec<_>, _>>()?;

        let tasks = self
            .ordered_tasks()?
            .into_iter()
            .map(|entry| build_task(entry, source))
            .collect::<Result<Vec<_>, _>>()?;

        let workflow = Workflow::assemble(self.name.clone(), roles, tasks)?;

        let mut inputs = self.inputs.clone();
        for (key, file) in &self.input_files {
            inputs.insert(key.clone(), source.read_to_string(file)?);
        }

        Ok(Crew {
            name: self.name.clone(),
            title: self.title.clone().unwrap_or_else(|| self.name.clone()),
            workflow,
            inputs,
            checks: self.checks.clone(),
        })
    }

    fn ordered_tasks(&self) -> Result<Vec<&TaskEntry>, DefinitionError> {
        let Some(order) = &self.order else {
            return Ok(self.tasks.iter().collect());
        };

        let manifest_err = |message: String| DefinitionError::Manifest {
            path: self.origin.clone(),
            message,
        };

        if order.len() != self.tasks.len() {
            return Err(manifest_err(format!(
                "order lists {} task(s) but {} are declared",
                order.len(),
                self.tasks.len()
            )));
        }

        order
            .iter()
            .map(|id| {
                self.tasks
                    .iter()
                    .find(|t| &t.id == id)
                    .ok_or_else(|| manifest_err(format!("order names undeclared task '{id}'")))
            })
            .collect()
    }
}

impl Crew {
    pub fn load(manifest_path: &Path) -> Result<Self, ExecutorError> {
        let manifest = CrewManifest::load(manifest_path)?;
        let root = manifest_path.parent().unwrap_or_else(|| Path::new("."));
        manifest.build(&DirSource::new(root))
    }
}

fn build_role(
    entry: &RoleEntry,
    source: &dyn DefinitionSource,
) -> Result<RoleConfig, DefinitionError> {
    let record = DefinitionRecord::parse(&source.read_to_string(&entry.definition)?);
    let mut role = record
        .into_role(entry.id.clone())?
        .with_tools(entry.tools.iter().cloned())
        .with_allow_delegation(entry.allow_delegation);
    role.max_iter = entry.max_iter;
    role.max_rpm = entry.max_rpm;
    role.model = entry.model.clone();
    Ok(role)
}

fn build_task(
    entry: &TaskEntry,
    source: &dyn DefinitionSource,
) -> Result<TaskConfig, DefinitionError> {
    let record = DefinitionRecord::parse(&source.read_to_string(&entry.definition)?);
    let name = entry.name.clone().unwrap_or_else(|| entry.id.clone());
    let task = record.into_task(entry.id.clone(), name, entry.agent.clone())?;
    Ok(match &entry.context {
        Some(ids) => task.with_context(ids.iter().cloned()),
        None => task,
    })
}
