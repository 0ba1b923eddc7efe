//! Error taxonomy shared across the template commands and the sync engine.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    /// A local candidate file is not valid JSON. Per-file: the walker
    /// collects it and keeps going.
    #[error("malformed template file {}: {source}", path.display())]
    MalformedTemplateFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A local file carries an id that no longer resolves remotely.
    /// Per-file: the reconciler skips it and keeps going.
    #[error("{} references template {id}, which does not exist remotely", path.display())]
    OrphanedReference { path: PathBuf, id: String },

    /// A symlink loop was found during a recursive walk. Aborts the walk.
    #[error("symbolic link cycle detected at {}", path.display())]
    CycleDetected { path: PathBuf },

    /// Listing or paging the remote collection failed. Aborts the whole
    /// sync before any mutation, so a partial index is never acted on.
    #[error("remote service unavailable: {0}")]
    RemoteUnavailable(String),

    /// A single-id operation targeted a template the service doesn't know.
    #[error("template not found: {0}")]
    NotFound(String),

    /// The service rejected the request (validation, duplicate name, ...).
    /// Surfaced verbatim, never retried.
    #[error("rejected by remote service: {0}")]
    RemoteRejected(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TemplateError {
    /// Errors that are local to one file and must not abort sibling work.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            TemplateError::MalformedTemplateFile { .. } | TemplateError::OrphanedReference { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;
