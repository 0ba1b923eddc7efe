//! Snapshot of the remote template collection.
//!
//! Built once per sync run by paging the listing endpoint to exhaustion.
//! The index is keyed by id, so pages arriving in any order de-duplicate
//! (last write wins). A failed page aborts the build: the sync engine must
//! never act on a partial view of the remote collection.

use std::collections::HashMap;

use crate::client::{RemoteTemplate, TemplateClient};
use crate::error::{Result, TemplateError};

/// Immutable id → template view of the remote collection for one run.
#[derive(Debug, Default)]
pub struct RemoteIndex {
    templates: HashMap<String, RemoteTemplate>,
}

impl RemoteIndex {
    /// Page through the listing until an empty page or `has_more == false`.
    pub async fn build(client: &dyn TemplateClient) -> Result<Self> {
        let mut templates = HashMap::new();
        let mut page = 1;

        loop {
            let batch = client.list(page).await.map_err(|err| match err {
                err @ TemplateError::RemoteUnavailable(_) => err,
                other => TemplateError::RemoteUnavailable(other.to_string()),
            })?;

            let exhausted = !batch.has_more || batch.items.is_empty();
            for template in batch.items {
                templates.insert(template.id.clone(), template);
            }
            if exhausted {
                break;
            }
            page += 1;
        }

        tracing::debug!(templates = templates.len(), pages = page, "Built remote index");
        Ok(Self { templates })
    }

    pub fn get(&self, id: &str) -> Option<&RemoteTemplate> {
        self.templates.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
