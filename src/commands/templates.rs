//! Template commands.
//!
//! Thin adapters from user-facing parameters to client/reconciler calls.
//! Commands emit results and diagnostics into the [`OutputSink`] instead of
//! printing; mutating commands stay silent on success, so an empty sink
//! means a fully clean run.

use clap::Args;
use futures_util::future;
use std::path::PathBuf;

use crate::client::{ModifyRequest, TemplateClient};
use crate::error::Result;
use crate::index::RemoteIndex;
use crate::output::{OutputEvent, OutputSink};
use crate::reconciler::{Reconciler, SyncReport};
use crate::template::TemplateFile;
use crate::walker;

/// Arguments for creating a template
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name for the new template
    pub name: String,
    /// JSON file holding the template definition
    pub file: PathBuf,
}

/// Arguments for fetching templates
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Template ids, printed in the order given
    #[arg(required = true)]
    pub templates: Vec<String>,
}

/// Arguments for modifying one template
#[derive(Args, Debug)]
pub struct ModifyArgs {
    /// Template id to modify
    pub template: String,
    /// New name for the template
    #[arg(short, long)]
    pub name: Option<String>,
    /// JSON file with the new definition; an empty file leaves content alone
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// Arguments for deleting templates
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Template ids to delete
    #[arg(required = true)]
    pub templates: Vec<String>,
}

/// Arguments for syncing a local tree
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Recurse into subdirectories of directory roots
    #[arg(short, long)]
    pub recursive: bool,
    /// Files or directories holding template definitions
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Create one remote template from one local file, then tag the file with
/// the assigned id. Emits a single `print` event: the new id as message,
/// the server's response as payload.
pub async fn create(
    output: &dyn OutputSink,
    client: &dyn TemplateClient,
    args: CreateArgs,
) -> Result<()> {
    let mut file = TemplateFile::load(&args.file)?;
    let created = client.create(&args.name, &file.content()).await?;
    file.write_with_id(&created.id)?;
    output.emit(OutputEvent::print(
        created.id.clone(),
        Some(serde_json::to_value(&created).expect("template is serializable")),
    ));
    Ok(())
}

/// Fetch each id, dispatching concurrently but emitting results in caller
/// order regardless of response arrival. Failures become `error` events in
/// the same position.
pub async fn get(
    output: &dyn OutputSink,
    client: &dyn TemplateClient,
    args: GetArgs,
) -> Result<()> {
    let fetches = args.templates.iter().map(|id| client.get(id));
    for (id, result) in args
        .templates
        .iter()
        .zip(future::join_all(fetches).await)
    {
        match result {
            Ok(template) => {
                let json = serde_json::to_value(&template).expect("template is serializable");
                output.emit(OutputEvent::print(
                    serde_json::to_string_pretty(&json).expect("value is serializable"),
                    Some(json),
                ));
            }
            Err(err) => {
                tracing::error!(id = %id, error = %err, "Failed to fetch template");
                output.emit(OutputEvent::error(err.to_string()));
            }
        }
    }
    Ok(())
}

/// Apply a name and/or content update to one existing template. Name and
/// content are independent; leaving one out leaves it untouched remotely.
/// Emits nothing on success.
pub async fn modify(
    _output: &dyn OutputSink,
    client: &dyn TemplateClient,
    args: ModifyArgs,
) -> Result<()> {
    let content = match &args.file {
        None => None,
        Some(path) => {
            // An empty file means "rename only": no content change.
            if std::fs::read_to_string(path)?.trim().is_empty() {
                None
            } else {
                Some(TemplateFile::load(path)?.content())
            }
        }
    };

    let request = ModifyRequest {
        name: args.name,
        content,
    };
    if request.is_empty() {
        return Ok(());
    }
    client.modify(&args.template, request).await
}

/// Delete each id concurrently. Emits nothing on success; failures are
/// aggregated as `error` events, one per failed id.
pub async fn delete(
    output: &dyn OutputSink,
    client: &dyn TemplateClient,
    args: DeleteArgs,
) -> Result<()> {
    let deletions = args.templates.iter().map(|id| client.delete(id));
    for (id, result) in args
        .templates
        .iter()
        .zip(future::join_all(deletions).await)
    {
        if let Err(err) = result {
            tracing::error!(id = %id, error = %err, "Failed to delete template");
            output.emit(OutputEvent::error(err.to_string()));
        }
    }
    Ok(())
}

/// Reconcile the local tree against the remote collection.
///
/// Walks the roots, snapshots the remote collection, then lets the
/// [`Reconciler`] apply the diff. Walker skips and per-file failures become
/// `error` events; a fully clean run emits nothing. Listing failures abort
/// before any mutation.
pub async fn sync(
    output: &dyn OutputSink,
    client: &dyn TemplateClient,
    args: SyncArgs,
) -> Result<SyncReport> {
    let walked = walker::collect_templates(&args.files, args.recursive)?;
    for skip in &walked.skipped {
        output.emit(OutputEvent::error(skip.to_string()));
    }

    if walked.files.is_empty() {
        return Ok(SyncReport::default());
    }

    let index = RemoteIndex::build(client).await?;
    let report = Reconciler::new(client, index).run(walked.files).await;

    for (path, err) in &report.failures {
        if err.is_per_file() {
            output.emit(OutputEvent::error(err.to_string()));
        } else {
            output.emit(OutputEvent::error(format!("{}: {err}", path.display())));
        }
    }

    tracing::info!(
        created = report.created,
        updated = report.updated,
        unchanged = report.unchanged,
        failed = report.failures.len(),
        "Sync finished"
    );
    Ok(report)
}

/// List every template in the account, one `print` event per template in
/// listing order.
pub async fn list(output: &dyn OutputSink, client: &dyn TemplateClient) -> Result<()> {
    let mut page = 1;
    loop {
        let batch = client.list(page).await?;
        let exhausted = !batch.has_more || batch.items.is_empty();
        for template in batch.items {
            output.emit(OutputEvent::print(
                format!("{} {}", template.id, template.name),
                Some(serde_json::to_value(&template).expect("template is serializable")),
            ));
        }
        if exhausted {
            return Ok(());
        }
        page += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Command behavior is covered end-to-end in tests/, where a shared
    // in-memory client exists.

    #[test]
    fn test_modify_request_requires_nothing_upfront() {
        let request = ModifyRequest {
            name: None,
            content: None,
        };
        assert!(request.is_empty());
    }
}
