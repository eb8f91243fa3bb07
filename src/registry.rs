//! Collaborator interface to the cluster connection registry.
//!
//! The engine never opens database connections itself: the host resolves a
//! (cluster, database) pair to a live handle and the engine works through
//! that. Resolution failures are propagated to callers unchanged. Connection
//! pooling, retries, and timeouts are the registry implementation's concern.

use crate::models::IndexSpec;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait ClusterRegistry: Send + Sync {
    /// Resolve a cluster/database pair to a live database handle.
    async fn resolve_database(
        &self,
        cluster: &str,
        database: &str,
    ) -> anyhow::Result<Box<dyn DatabaseHandle>>;
}

#[async_trait]
pub trait DatabaseHandle: Send + Sync {
    /// Collection names in the server's discovery order.
    async fn list_collections(&self) -> anyhow::Result<Vec<String>>;

    /// Handle to a named collection. Referring to a collection that does not
    /// exist yet is valid; it materializes on first insert.
    fn collection(&self, name: &str) -> Box<dyn CollectionHandle>;
}

#[async_trait]
pub trait CollectionHandle: Send + Sync {
    async fn find_all(&self) -> anyhow::Result<Vec<Value>>;

    async fn list_indexes(&self) -> anyhow::Result<Vec<IndexSpec>>;

    /// Collection statistics document. Callers treat a failure here as
    /// non-fatal and substitute an empty document.
    async fn stats(&self) -> anyhow::Result<Value>;

    /// Unordered bulk insert: one rejected document must not block the rest
    /// of the batch. Returns the number of documents actually inserted.
    async fn insert_many(&self, documents: Vec<Value>) -> anyhow::Result<u64>;

    /// Drop the collection. Dropping a collection that does not exist is not
    /// an error.
    async fn drop_collection(&self) -> anyhow::Result<()>;

    async fn create_index(&self, index: &IndexSpec) -> anyhow::Result<()>;
}
