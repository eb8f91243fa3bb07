//! In-memory collaborator fakes shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Utc};
use docstore_backup::registry::{ClusterRegistry, CollectionHandle, DatabaseHandle};
use docstore_backup::store::ConfigStore;
use docstore_backup::{EngineConfig, EngineState, IndexSpec};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ── Registry fake ──

#[derive(Default)]
pub struct MemoryRegistry {
    databases: Mutex<HashMap<(String, String), MemoryDatabase>>,
}

impl MemoryRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_database(&self, cluster: &str, database: &str) -> MemoryDatabase {
        let db = MemoryDatabase::default();
        self.databases
            .lock()
            .unwrap()
            .insert((cluster.into(), database.into()), db.clone());
        db
    }
}

#[async_trait]
impl ClusterRegistry for MemoryRegistry {
    async fn resolve_database(
        &self,
        cluster: &str,
        database: &str,
    ) -> anyhow::Result<Box<dyn DatabaseHandle>> {
        let databases = self.databases.lock().unwrap();
        let db = databases
            .get(&(cluster.to_string(), database.to_string()))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown cluster/database: {cluster}/{database}"))?;
        Ok(Box::new(db))
    }
}

#[derive(Clone, Default)]
pub struct MemoryDatabase {
    // Vec keeps discovery order stable.
    collections: Arc<Mutex<Vec<MemoryCollection>>>,
}

impl MemoryDatabase {
    pub fn add_collection(&self, name: &str) -> MemoryCollection {
        let coll = MemoryCollection::new(name);
        self.collections.lock().unwrap().push(coll.clone());
        coll
    }

    pub fn collection_named(&self, name: &str) -> Option<MemoryCollection> {
        self.collections
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.name() == name)
            .cloned()
    }
}

#[async_trait]
impl DatabaseHandle for MemoryDatabase {
    async fn list_collections(&self) -> anyhow::Result<Vec<String>> {
        Ok(self
            .collections
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.name().to_string())
            .collect())
    }

    fn collection(&self, name: &str) -> Box<dyn CollectionHandle> {
        let coll = self
            .collection_named(name)
            .unwrap_or_else(|| self.add_collection(name));
        Box::new(coll)
    }
}

#[derive(Clone)]
pub struct MemoryCollection {
    inner: Arc<CollectionState>,
}

struct CollectionState {
    name: String,
    documents: Mutex<Vec<Value>>,
    indexes: Mutex<Vec<IndexSpec>>,
    fail_find: Mutex<Option<String>>,
    fail_list_indexes: Mutex<Option<String>>,
    fail_stats: Mutex<bool>,
}

impl MemoryCollection {
    fn new(name: &str) -> Self {
        Self {
            inner: Arc::new(CollectionState {
                name: name.to_string(),
                documents: Mutex::new(Vec::new()),
                indexes: Mutex::new(Vec::new()),
                fail_find: Mutex::new(None),
                fail_list_indexes: Mutex::new(None),
                fail_stats: Mutex::new(false),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn insert(&self, document: Value) {
        self.inner.documents.lock().unwrap().push(document);
    }

    pub fn documents(&self) -> Vec<Value> {
        self.inner.documents.lock().unwrap().clone()
    }

    pub fn add_index(&self, index: IndexSpec) {
        self.inner.indexes.lock().unwrap().push(index);
    }

    pub fn indexes(&self) -> Vec<IndexSpec> {
        self.inner.indexes.lock().unwrap().clone()
    }

    pub fn fail_find(&self, message: &str) {
        *self.inner.fail_find.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_list_indexes(&self, message: &str) {
        *self.inner.fail_list_indexes.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_stats(&self) {
        *self.inner.fail_stats.lock().unwrap() = true;
    }
}

#[async_trait]
impl CollectionHandle for MemoryCollection {
    async fn find_all(&self) -> anyhow::Result<Vec<Value>> {
        if let Some(message) = self.inner.fail_find.lock().unwrap().clone() {
            anyhow::bail!("{message}");
        }
        Ok(self.documents())
    }

    async fn list_indexes(&self) -> anyhow::Result<Vec<IndexSpec>> {
        if let Some(message) = self.inner.fail_list_indexes.lock().unwrap().clone() {
            anyhow::bail!("{message}");
        }
        Ok(self.indexes())
    }

    async fn stats(&self) -> anyhow::Result<Value> {
        if *self.inner.fail_stats.lock().unwrap() {
            anyhow::bail!("stats unavailable");
        }
        Ok(serde_json::json!({
            "count": self.inner.documents.lock().unwrap().len(),
        }))
    }

    async fn insert_many(&self, documents: Vec<Value>) -> anyhow::Result<u64> {
        let inserted = documents.len() as u64;
        self.inner.documents.lock().unwrap().extend(documents);
        Ok(inserted)
    }

    async fn drop_collection(&self) -> anyhow::Result<()> {
        self.inner.documents.lock().unwrap().clear();
        self.inner.indexes.lock().unwrap().clear();
        Ok(())
    }

    async fn create_index(&self, index: &IndexSpec) -> anyhow::Result<()> {
        self.inner.indexes.lock().unwrap().push(index.clone());
        Ok(())
    }
}

// ── Config store fake ──

#[derive(Default)]
pub struct MemoryStore {
    settings: Mutex<HashMap<String, String>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn put(&self, key: &str, value: &str) {
        self.settings
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.settings.lock().unwrap().get(key).cloned()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl ConfigStore for MemoryStore {
    fn get_setting(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn set_setting(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.put(key, value);
        Ok(())
    }

    fn save(&self) -> anyhow::Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ── Helpers ──

pub fn engine(
    root: &Path,
    registry: Arc<MemoryRegistry>,
    store: Arc<MemoryStore>,
) -> Arc<EngineState> {
    Arc::new(EngineState::new(
        EngineConfig::with_root(root),
        registry,
        store,
    ))
}

/// Handcraft an uncompressed backup directory whose manifest is `age_days`
/// old, bypassing the snapshot path.
pub fn write_aged_backup(root: &Path, name: &str, age_days: i64) {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).unwrap();
    let created_at = (Utc::now() - Duration::days(age_days)).to_rfc3339();
    let manifest = serde_json::json!({
        "cluster": "main",
        "database": "app",
        "createdAt": created_at,
        "collections": [],
        "totalDocuments": 0,
        "totalSize": 0,
        "compressed": false,
    });
    std::fs::write(
        dir.join("backup-info.json"),
        serde_json::to_vec_pretty(&manifest).unwrap(),
    )
    .unwrap();
}
