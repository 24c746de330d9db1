use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the extraction and recognition pipelines.
///
/// Only `NotFound` (and configuration problems) stop a run. Every other
/// variant is scoped to the unit that produced it and ends up in the
/// run summary.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input root does not exist: {0:?}")]
    NotFound(PathBuf),

    #[error("failed to decode resource {id}: {reason}")]
    Decode { id: String, reason: String },

    #[error("no resource matches reference {0:?}")]
    UnresolvedReference(String),

    #[error("failed to read container {path:?}: {reason}")]
    ContainerRead { path: PathBuf, reason: String },

    #[error("recognition failed for {path:?}: {reason}")]
    Recognition { path: PathBuf, reason: String },

    #[error("failed to render pages of {path:?}: {reason}")]
    Render { path: PathBuf, reason: String },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn container(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        PipelineError::ContainerRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn recognition(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        PipelineError::Recognition {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn render(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        PipelineError::Render {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
