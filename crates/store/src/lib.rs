use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use shared::{
    domain::{Chore, DocumentId},
    error::ApiError,
};

/// Collection the chore documents live in unless configured otherwise.
pub const DEFAULT_COLLECTION: &str = "chores_list";

/// Seam over the managed document store: insert-one, get-all,
/// query-by-equality-on-name, delete-by-document-id. No update.
#[async_trait]
pub trait ChoreStore: Send + Sync {
    async fn insert(&self, chore: &Chore) -> Result<DocumentId>;
    async fn fetch_all(&self) -> Result<Vec<Chore>>;
    async fn find_first_by_name(&self, name: &str) -> Result<Option<DocumentId>>;
    async fn delete(&self, id: &DocumentId) -> Result<()>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The service rejected the request and said why.
    #[error("{0}")]
    Backend(String),
    /// Non-2xx response without a parseable error body.
    #[error("document store returned {0}")]
    Status(StatusCode),
}

#[derive(Debug, Serialize, Deserialize)]
struct InsertResponse {
    document_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct DocumentEnvelope {
    document_id: String,
    chore: Chore,
}

/// REST client for the hosted document-store service.
pub struct HttpChoreStore {
    http: Client,
    base_url: String,
    collection: String,
}

impl HttpChoreStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_collection(base_url, DEFAULT_COLLECTION)
    }

    pub fn with_collection(base_url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            collection: collection.into(),
        }
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/collections/{}/documents",
            self.base_url, self.collection
        )
    }

    /// Maps a non-2xx response to an error carrying the server's `ApiError`
    /// message when the body parses as one, otherwise the status line.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        if let Ok(api_error) = serde_json::from_str::<ApiError>(&body) {
            return Err(StoreError::Backend(api_error.message).into());
        }
        Err(StoreError::Status(status).into())
    }
}

#[async_trait]
impl ChoreStore for HttpChoreStore {
    async fn insert(&self, chore: &Chore) -> Result<DocumentId> {
        let response = self
            .http
            .post(self.documents_url())
            .json(chore)
            .send()
            .await
            .context("failed to reach document store")?;
        let body: InsertResponse = Self::check(response).await?.json().await?;
        Ok(DocumentId(body.document_id))
    }

    async fn fetch_all(&self) -> Result<Vec<Chore>> {
        let response = self
            .http
            .get(self.documents_url())
            .send()
            .await
            .context("failed to reach document store")?;
        let envelopes: Vec<DocumentEnvelope> = Self::check(response).await?.json().await?;
        Ok(envelopes.into_iter().map(|e| e.chore).collect())
    }

    async fn find_first_by_name(&self, name: &str) -> Result<Option<DocumentId>> {
        let response = self
            .http
            .get(self.documents_url())
            .query(&[("name", name)])
            .send()
            .await
            .context("failed to reach document store")?;
        let envelopes: Vec<DocumentEnvelope> = Self::check(response).await?.json().await?;
        Ok(envelopes
            .into_iter()
            .next()
            .map(|e| DocumentId(e.document_id)))
    }

    async fn delete(&self, id: &DocumentId) -> Result<()> {
        let response = self
            .http
            .delete(format!("{}/{}", self.documents_url(), id.0))
            .send()
            .await
            .context("failed to reach document store")?;
        Self::check(response).await?;
        Ok(())
    }
}

/// In-process store for demos and tests. Insertion order is listing order.
#[derive(Default)]
pub struct MemoryChoreStore {
    documents: Mutex<Vec<(DocumentId, Chore)>>,
}

impl MemoryChoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChoreStore for MemoryChoreStore {
    async fn insert(&self, chore: &Chore) -> Result<DocumentId> {
        let id = DocumentId(uuid::Uuid::new_v4().to_string());
        self.documents
            .lock()
            .await
            .push((id.clone(), chore.clone()));
        debug!(document_id = %id, name = %chore.name, "store: inserted chore");
        Ok(id)
    }

    async fn fetch_all(&self) -> Result<Vec<Chore>> {
        let documents = self.documents.lock().await;
        Ok(documents.iter().map(|(_, chore)| chore.clone()).collect())
    }

    async fn find_first_by_name(&self, name: &str) -> Result<Option<DocumentId>> {
        let documents = self.documents.lock().await;
        Ok(documents
            .iter()
            .find(|(_, chore)| chore.name == name)
            .map(|(id, _)| id.clone()))
    }

    async fn delete(&self, id: &DocumentId) -> Result<()> {
        let mut documents = self.documents.lock().await;
        documents.retain(|(doc_id, _)| doc_id != id);
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
