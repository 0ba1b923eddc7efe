//! The sync engine.
//!
//! Brings the remote template collection in line with the local tree, for
//! exactly the files the walker discovered. Remote templates with no local
//! counterpart are out of scope and never deleted: sync pushes local intent
//! outward, it does not mirror the account.

use futures_util::future;
use std::path::PathBuf;

use crate::client::{ModifyRequest, TemplateClient};
use crate::error::TemplateError;
use crate::index::RemoteIndex;
use crate::template::TemplateFile;

/// What happened to one file during a run.
#[derive(Debug)]
enum FileOutcome {
    Created { id: String },
    Updated,
    Unchanged,
}

/// Aggregate result of a run. Failures are per-file and never abort the
/// rest of the run; they are accumulated here for reporting.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failures: Vec<(PathBuf, TemplateError)>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Diffs local files against a [`RemoteIndex`] snapshot and applies the
/// minimal remote operations.
pub struct Reconciler<'a> {
    client: &'a dyn TemplateClient,
    index: RemoteIndex,
}

impl<'a> Reconciler<'a> {
    pub fn new(client: &'a dyn TemplateClient, index: RemoteIndex) -> Self {
        Self { client, index }
    }

    /// Reconcile every file, dispatching independent files concurrently and
    /// gathering all outcomes before returning. Operations on a single file
    /// (create, then id write-back) stay strictly sequenced.
    pub async fn run(&self, files: Vec<TemplateFile>) -> SyncReport {
        let tasks = files.into_iter().map(|file| {
            let path = file.path.clone();
            async move { (path, self.reconcile_file(file).await) }
        });

        let mut report = SyncReport::default();
        for (path, outcome) in future::join_all(tasks).await {
            match outcome {
                Ok(FileOutcome::Created { id }) => {
                    tracing::info!(path = %path.display(), id = %id, "Created template");
                    report.created += 1;
                }
                Ok(FileOutcome::Updated) => {
                    tracing::info!(path = %path.display(), "Updated template content");
                    report.updated += 1;
                }
                Ok(FileOutcome::Unchanged) => {
                    tracing::debug!(path = %path.display(), "Template already current");
                    report.unchanged += 1;
                }
                Err(err) => {
                    tracing::error!(path = %path.display(), error = %err, "Template sync failed");
                    report.failures.push((path, err));
                }
            }
        }
        report
    }

    async fn reconcile_file(&self, mut file: TemplateFile) -> Result<FileOutcome, TemplateError> {
        let Some(id) = file.id.clone() else {
            // Not yet remote: create, then tag the source file with the
            // assigned id.
            let created = self.client.create(&file.name, &file.content()).await?;
            file.write_with_id(&created.id)?;
            return Ok(FileOutcome::Created { id: created.id });
        };

        let Some(remote) = self.index.get(&id) else {
            return Err(TemplateError::OrphanedReference {
                path: file.path.clone(),
                id,
            });
        };

        // Structural comparison: key order and formatting are insignificant.
        // The local body is desired state; the server keeps the name.
        if remote.content == file.content() {
            return Ok(FileOutcome::Unchanged);
        }

        self.client
            .modify(&id, ModifyRequest::content(file.content()))
            .await?;
        Ok(FileOutcome::Updated)
    }
}
