//! HTTP implementation of the identity and content gateways.
//!
//! Endpoint contract:
//! - `GET {identity_path}` → user JSON, or a body with an `error` key
//! - `GET {content_path}?section=<name>` → `{ "content": <document> }`
//! - `POST|PUT {content_path}` with `{ "section", "content" }` → status only
//!
//! Every request carries `Authorization: Bearer <token>`.

use std::time::Duration;

use async_trait::async_trait;
use pagesync_core::content::{ContentDocument, ContentGateway, SectionId};
use pagesync_core::error::Result;
use pagesync_core::session::{IdentityGateway, User};
use pagesync_core::{FetchError, IdentityError, PageSyncError, SaveError, Token};
use reqwest::{Client, RequestBuilder, header::AUTHORIZATION};
use serde::Serialize;
use serde_json::Value;

use crate::config::{BackendConfig, SaveMethod};

#[derive(Debug, Serialize)]
struct SaveRequest<'a> {
    section: &'a SectionId,
    content: &'a ContentDocument,
}

/// Backend client over reqwest.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    identity_path: String,
    content_path: String,
    save_method: SaveMethod,
    timeout: Option<Duration>,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        reqwest::Url::parse(&config.base_url).map_err(|e| {
            PageSyncError::config(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;

        Ok(Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            identity_path: config.identity_path.clone(),
            content_path: config.content_path.clone(),
            save_method: config.save_method,
            timeout: config.request_timeout_secs.map(Duration::from_secs),
        })
    }

    /// Reuses an existing client (connection pool, proxies).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn authorized(&self, request: RequestBuilder, token: &Token) -> RequestBuilder {
        let request = request.header(AUTHORIZATION, token.bearer_header());
        match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }
}

/// Human-readable text of an `error` indicator, whatever its JSON type.
fn error_text(indicator: &Value) -> String {
    match indicator {
        Value::String(message) => message.clone(),
        other => other.to_string(),
    }
}

/// Whether an `error` indicator actually signals an error: `null`, `false`,
/// `0` and `""` do not.
fn is_truthy(indicator: &Value) -> bool {
    match indicator {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(message) => !message.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[async_trait]
impl IdentityGateway for HttpBackend {
    async fn fetch_identity(&self, token: &Token) -> std::result::Result<User, IdentityError> {
        let url = self.endpoint(&self.identity_path);
        tracing::debug!("[HttpBackend] GET {}", url);

        let response = self
            .authorized(self.client.get(&url), token)
            .send()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::Rejected(format!("status {}", status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| IdentityError::Decode(e.to_string()))?;

        if let Some(indicator) = body.get("error").filter(|v| is_truthy(v)) {
            return Err(IdentityError::Rejected(error_text(indicator)));
        }
        if body.is_null() {
            return Err(IdentityError::Decode("empty identity body".to_string()));
        }

        Ok(User::new(body))
    }
}

#[async_trait]
impl ContentGateway for HttpBackend {
    async fn fetch_section(
        &self,
        section: &SectionId,
        token: &Token,
    ) -> std::result::Result<ContentDocument, FetchError> {
        let url = self.endpoint(&self.content_path);
        tracing::debug!("[HttpBackend] GET {}?section={}", url, section);

        let response = self
            .authorized(
                self.client.get(&url).query(&[("section", section.as_str())]),
                token,
            )
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let mut body: Value = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        let content = body
            .as_object_mut()
            .and_then(|fields| fields.remove("content"))
            .filter(|content| !content.is_null())
            .ok_or(FetchError::MissingContent)?;

        ContentDocument::from_value(content).map_err(|e| FetchError::Decode(e.to_string()))
    }

    async fn save_section(
        &self,
        section: &SectionId,
        document: &ContentDocument,
        token: &Token,
    ) -> std::result::Result<(), SaveError> {
        let url = self.endpoint(&self.content_path);
        let request = match self.save_method {
            SaveMethod::Post => self.client.post(&url),
            SaveMethod::Put => self.client.put(&url),
        };
        tracing::debug!("[HttpBackend] {:?} {} section={}", self.save_method, url, section);

        let response = self
            .authorized(request, token)
            .json(&SaveRequest {
                section,
                content: document,
            })
            .send()
            .await
            .map_err(|e| SaveError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SaveError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}
