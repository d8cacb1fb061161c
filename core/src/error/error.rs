use thiserror::Error;

use super::{BackendError, DefinitionError, ExecutorError};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("definition error: {0}")]
    Definition(#[from] DefinitionError),
    #[error("workflow error: {0}")]
    Executor(#[from] ExecutorError),
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("{0} quality check(s) failed")]
    Checks(usize),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}
