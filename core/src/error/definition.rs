use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading definition files, crew manifests, or building records.
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("definition file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{record} is missing required field '{field}'")]
    MissingField { record: String, field: &'static str },

    #[error("invalid crew manifest {}: {message}", path.display())]
    Manifest { path: PathBuf, message: String },
}

impl DefinitionError {
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}
