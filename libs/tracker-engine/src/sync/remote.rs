//! Remote document store transport.

use crate::sync::SyncError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;

/// Per-item document store keyed by collection + id.
///
/// Implementations handle the actual transport; the engine only ever issues
/// independent idempotent operations, so out-of-order completion is
/// harmless.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch every document in a collection.
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Value>, SyncError>;

    /// Upsert one document with field-merge semantics: fields absent from
    /// `data` are preserved remotely.
    async fn upsert(&self, collection: &str, id: &str, data: Value) -> Result<(), SyncError>;

    /// Best-effort delete of one document.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), SyncError>;

    /// Drop an entire collection.
    async fn wipe(&self, collection: &str) -> Result<(), SyncError>;
}

/// HTTP implementation speaking a REST per-document protocol:
/// `GET /{collection}` lists, `PATCH /{collection}/{id}` merge-upserts,
/// `DELETE /{collection}[/{id}]` removes.
pub struct HttpRemoteStore {
    client: Client,
    base_url: String,
}

impl HttpRemoteStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, SyncError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            Err(SyncError::Backend { status, message })
        }
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Value>, SyncError> {
        let url = format!("{}/{}", self.base_url, collection);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;
        Self::check(resp)
            .await?
            .json()
            .await
            .map_err(|e| SyncError::Parse(e.to_string()))
    }

    async fn upsert(&self, collection: &str, id: &str, data: Value) -> Result<(), SyncError> {
        let url = format!("{}/{}/{}", self.base_url, collection, id);
        let resp = self
            .client
            .patch(&url)
            .json(&data)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;
        Self::check(resp).await.map(|_| ())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), SyncError> {
        let url = format!("{}/{}/{}", self.base_url, collection, id);
        let resp = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;
        Self::check(resp).await.map(|_| ())
    }

    async fn wipe(&self, collection: &str) -> Result<(), SyncError> {
        let url = format!("{}/{}", self.base_url, collection);
        let resp = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;
        Self::check(resp).await.map(|_| ())
    }
}

/// In-memory remote, used in tests and offline development.
#[derive(Default)]
pub struct MemoryRemoteStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document directly, bypassing merge semantics.
    pub async fn seed(&self, collection: &str, id: &str, data: Value) {
        self.collections
            .lock()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
    }

    pub async fn get(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections
            .lock()
            .await
            .get(collection)
            .and_then(|docs| docs.get(id).cloned())
    }

    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Value>, SyncError> {
        Ok(self
            .collections
            .lock()
            .await
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn upsert(&self, collection: &str, id: &str, data: Value) -> Result<(), SyncError> {
        let mut collections = self.collections.lock().await;
        let docs = collections.entry(collection.to_string()).or_default();
        let merged = match (docs.remove(id), data) {
            (Some(Value::Object(mut existing)), Value::Object(patch)) => {
                for (key, value) in patch {
                    existing.insert(key, value);
                }
                Value::Object(existing)
            }
            (_, data) => data,
        };
        docs.insert(id.to_string(), merged);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), SyncError> {
        if let Some(docs) = self.collections.lock().await.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn wipe(&self, collection: &str) -> Result<(), SyncError> {
        self.collections.lock().await.remove(collection);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn memory_upsert_merges_fields() {
        let remote = MemoryRemoteStore::new();
        remote
            .upsert("questions", "q1", json!({"name": "two sum", "streak": 1}))
            .await
            .unwrap();
        remote
            .upsert("questions", "q1", json!({"streak": 2}))
            .await
            .unwrap();

        let doc = remote.get("questions", "q1").await.unwrap();
        assert_eq!(doc["name"], "two sum");
        assert_eq!(doc["streak"], 2);
    }

    #[tokio::test]
    async fn memory_delete_and_wipe() {
        let remote = MemoryRemoteStore::new();
        remote.seed("questions", "q1", json!({"a": 1})).await;
        remote.seed("questions", "q2", json!({"a": 2})).await;

        remote.delete("questions", "q1").await.unwrap();
        assert_eq!(remote.len("questions").await, 1);

        remote.wipe("questions").await.unwrap();
        assert_eq!(remote.len("questions").await, 0);
        assert!(remote.fetch_all("questions").await.unwrap().is_empty());
    }
}
