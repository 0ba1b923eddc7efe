//! The remote template capability.
//!
//! [`TemplateClient`] is the seam between the sync engine and the service:
//! commands and the reconciler only ever talk to the trait, so tests run
//! against an in-memory implementation. [`HttpTemplateClient`] is the
//! production implementation over the service's JSON API. Request signing
//! and retry policy are the transport's concern, not handled here.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{Result, TemplateError};

/// Templates per listing page requested from the service.
pub const PAGE_SIZE: usize = 50;

/// One remote template record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteTemplate {
    /// Server-assigned, immutable once created.
    pub id: String,
    pub name: String,
    pub content: Value,
}

/// One page of the remote listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatePage {
    pub items: Vec<RemoteTemplate>,
    #[serde(rename = "has_more")]
    pub has_more: bool,
}

/// A partial update. Unset fields are no-ops on the remote side: a call
/// that changes only content must not alter the name, and vice versa.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModifyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl ModifyRequest {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn content(content: Value) -> Self {
        Self {
            content: Some(content),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.content.is_none()
    }
}

/// Capability for creating, reading, mutating, and enumerating remote
/// templates.
#[async_trait]
pub trait TemplateClient: Send + Sync {
    async fn create(&self, name: &str, content: &Value) -> Result<RemoteTemplate>;

    /// Fails with [`TemplateError::NotFound`] for unknown ids.
    async fn get(&self, id: &str) -> Result<RemoteTemplate>;

    async fn modify(&self, id: &str, request: ModifyRequest) -> Result<()>;

    /// Fails with [`TemplateError::NotFound`] for unknown ids.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Pages are 1-based. The last page has `has_more == false`.
    async fn list(&self, page: usize) -> Result<TemplatePage>;
}

impl From<reqwest::Error> for TemplateError {
    fn from(err: reqwest::Error) -> Self {
        TemplateError::RemoteUnavailable(err.to_string())
    }
}

/// HTTP implementation of [`TemplateClient`].
pub struct HttpTemplateClient {
    http: reqwest::Client,
    base: Url,
    auth_key: String,
    auth_secret: String,
}

impl HttpTemplateClient {
    pub fn new(base: Url, auth_key: impl Into<String>, auth_secret: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
            auth_key: auth_key.into(),
            auth_secret: auth_secret.into(),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                TemplateError::RemoteUnavailable(format!("endpoint {} cannot be a base", self.base))
            })?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("Transloadit-Key", &self.auth_key)
            .header("Transloadit-Secret", &self.auth_secret)
    }

    /// Map non-success statuses into the error taxonomy. `id` feeds the
    /// NotFound variant for single-id operations.
    async fn check(id: Option<&str>, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            return Err(TemplateError::NotFound(
                id.map(str::to_string).unwrap_or(body),
            ));
        }
        if status.is_client_error() {
            return Err(TemplateError::RemoteRejected(body));
        }
        Err(TemplateError::RemoteUnavailable(format!(
            "{status}: {body}"
        )))
    }
}

#[async_trait]
impl TemplateClient for HttpTemplateClient {
    async fn create(&self, name: &str, content: &Value) -> Result<RemoteTemplate> {
        let url = self.endpoint(&["templates"])?;
        let response = self
            .authed(self.http.post(url))
            .json(&serde_json::json!({ "name": name, "content": content }))
            .send()
            .await?;
        let response = Self::check(None, response).await?;
        Ok(response.json().await?)
    }

    async fn get(&self, id: &str) -> Result<RemoteTemplate> {
        let url = self.endpoint(&["templates", id])?;
        let response = self.authed(self.http.get(url)).send().await?;
        let response = Self::check(Some(id), response).await?;
        Ok(response.json().await?)
    }

    async fn modify(&self, id: &str, request: ModifyRequest) -> Result<()> {
        let url = self.endpoint(&["templates", id])?;
        let response = self
            .authed(self.http.put(url))
            .json(&request)
            .send()
            .await?;
        Self::check(Some(id), response).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&["templates", id])?;
        let response = self.authed(self.http.delete(url)).send().await?;
        Self::check(Some(id), response).await?;
        Ok(())
    }

    async fn list(&self, page: usize) -> Result<TemplatePage> {
        let url = self.endpoint(&["templates"])?;
        let response = self
            .authed(self.http.get(url))
            .query(&[("page", page), ("pagesize", PAGE_SIZE)])
            .send()
            .await?;
        let response = Self::check(None, response).await?;
        Ok(response.json().await?)
    }
}
