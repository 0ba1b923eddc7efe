//! Shared test fixtures: an in-memory template service.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use templatesync::client::{ModifyRequest, RemoteTemplate, TemplateClient, TemplatePage};
use templatesync::error::TemplateError;

const PAGE_SIZE: usize = 2;

/// In-memory stand-in for the remote service. Counts every mutation so
/// tests can assert on idempotence, and can be told to fail listing or to
/// delay individual gets.
#[derive(Default)]
pub struct MockClient {
    templates: Mutex<BTreeMap<String, RemoteTemplate>>,
    next_id: AtomicUsize,
    pub creates: AtomicUsize,
    pub modifies: AtomicUsize,
    pub deletes: AtomicUsize,
    pub fail_listing: AtomicBool,
    get_delays: Mutex<HashMap<String, Duration>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, id: &str, name: &str, content: Value) {
        self.templates.lock().unwrap().insert(
            id.to_string(),
            RemoteTemplate {
                id: id.to_string(),
                name: name.to_string(),
                content,
            },
        );
    }

    pub fn template(&self, id: &str) -> Option<RemoteTemplate> {
        self.templates.lock().unwrap().get(id).cloned()
    }

    pub fn template_count(&self) -> usize {
        self.templates.lock().unwrap().len()
    }

    pub fn mutation_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
            + self.modifies.load(Ordering::SeqCst)
            + self.deletes.load(Ordering::SeqCst)
    }

    /// Make the next `get(id)` stall, to exercise response-order races.
    pub fn delay_get(&self, id: &str, delay: Duration) {
        self.get_delays
            .lock()
            .unwrap()
            .insert(id.to_string(), delay);
    }
}

#[async_trait]
impl TemplateClient for MockClient {
    async fn create(&self, name: &str, content: &Value) -> Result<RemoteTemplate, TemplateError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let id = format!("tid_{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let template = RemoteTemplate {
            id: id.clone(),
            name: name.to_string(),
            content: content.clone(),
        };
        self.templates.lock().unwrap().insert(id, template.clone());
        Ok(template)
    }

    async fn get(&self, id: &str) -> Result<RemoteTemplate, TemplateError> {
        let delay = self.get_delays.lock().unwrap().get(id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.templates
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    async fn modify(&self, id: &str, request: ModifyRequest) -> Result<(), TemplateError> {
        self.modifies.fetch_add(1, Ordering::SeqCst);
        let mut templates = self.templates.lock().unwrap();
        let template = templates
            .get_mut(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;
        if let Some(name) = request.name {
            template.name = name;
        }
        if let Some(content) = request.content {
            template.content = content;
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), TemplateError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.templates
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    async fn list(&self, page: usize) -> Result<TemplatePage, TemplateError> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(TemplateError::RemoteUnavailable(
                "listing is down".to_string(),
            ));
        }
        let templates = self.templates.lock().unwrap();
        let items: Vec<RemoteTemplate> = templates
            .values()
            .skip((page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .cloned()
            .collect();
        let has_more = page * PAGE_SIZE < templates.len();
        Ok(TemplatePage { items, has_more })
    }
}
