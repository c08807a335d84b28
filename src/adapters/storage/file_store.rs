//! File-based Document Store Adapter
//!
//! Stores each collection as one YAML file (`<collection>.yaml`) mapping
//! keys to documents. Readable by hand, which makes it convenient for
//! local development and debugging.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

use crate::ports::{Collection, Persistence, PersistenceError, QueryFilter};

type Documents = BTreeMap<String, Value>;

/// File-based document store.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
    /// Serializes read-modify-write cycles on collection files.
    write_lock: Arc<Mutex<()>>,
}

impl FileStore {
    /// Create a new file store rooted at `base_path`.
    ///
    /// The directory is created on first write.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn collection_path(&self, collection: Collection) -> PathBuf {
        self.base_path.join(format!("{}.yaml", collection.name()))
    }

    async fn load(&self, collection: Collection) -> Result<Documents, PersistenceError> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(Documents::new());
        }

        let yaml = fs::read_to_string(&path).await?;
        if yaml.trim().is_empty() {
            return Ok(Documents::new());
        }
        serde_yaml::from_str(&yaml).map_err(|e| {
            PersistenceError::Serialization(format!("{}: {}", path.display(), e))
        })
    }

    async fn save(&self, collection: Collection, docs: &Documents) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.base_path).await?;

        let yaml = serde_yaml::to_string(docs)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;

        // Write beside the target and rename so readers never see a torn file.
        let path = self.collection_path(collection);
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml).await?;
        fs::rename(&tmp, &path).await?;

        tracing::debug!(collection = %collection, documents = docs.len(), "Collection file written");
        Ok(())
    }
}

#[async_trait]
impl Persistence for FileStore {
    async fn get(
        &self,
        collection: Collection,
        key: &str,
    ) -> Result<Option<Value>, PersistenceError> {
        let mut docs = self.load(collection).await?;
        Ok(docs.remove(key))
    }

    async fn put(
        &self,
        collection: Collection,
        key: &str,
        value: Value,
    ) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock().await;
        let mut docs = self.load(collection).await?;
        docs.insert(key.to_string(), value);
        self.save(collection, &docs).await
    }

    async fn query(
        &self,
        collection: Collection,
        filter: &QueryFilter,
    ) -> Result<Vec<Value>, PersistenceError> {
        let docs = self.load(collection).await?;
        Ok(docs.into_values().filter(|doc| filter.matches(doc)).collect())
    }
}
