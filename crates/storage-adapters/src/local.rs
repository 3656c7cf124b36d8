//! Local filesystem implementation of `DocumentGateway`.
//!
//! One `<root>/<collection>/<id>.json` file per document. No locking and
//! no write transactions: consistency is best-effort read-then-write, the
//! same contract the remote store offers.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tracing::debug;

use domains::{AppError, DocumentGateway, Result};

pub struct JsonDocStore {
    /// Root directory for all collections (e.g. "./data")
    root: PathBuf,
}

impl JsonDocStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn doc_path(&self, collection: &str, id: &str) -> Result<PathBuf> {
        // Collection names are fixed and ids are UUIDs; anything else is a
        // caller bug, refused before it can become a path.
        for part in [collection, id] {
            if part.is_empty()
                || !part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(AppError::Validation(format!(
                    "invalid document key segment: {part:?}"
                )));
            }
        }
        Ok(self.root.join(collection).join(format!("{id}.json")))
    }

    async fn read_doc(path: &Path) -> Result<Option<Value>> {
        match fs::read(path).await {
            Ok(bytes) => {
                let doc = serde_json::from_slice(&bytes)
                    .map_err(|e| AppError::Gateway(format!("corrupt document {path:?}: {e}")))?;
                Ok(Some(doc))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(AppError::Gateway(err.to_string())),
        }
    }

    async fn write_doc(&self, path: &Path, doc: &Value) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Gateway(e.to_string()))?;
        }
        let bytes =
            serde_json::to_vec_pretty(doc).map_err(|e| AppError::Gateway(e.to_string()))?;
        fs::write(path, bytes)
            .await
            .map_err(|e| AppError::Gateway(e.to_string()))
    }
}

#[async_trait]
impl DocumentGateway for JsonDocStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let path = self.doc_path(collection, id)?;
        Self::read_doc(&path).await
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>> {
        let dir = self.root.join(collection);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(AppError::Gateway(err.to_string())),
        };

        let mut docs = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::Gateway(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Some(doc) = Self::read_doc(&path).await? {
                docs.push((id.to_string(), doc));
            }
        }
        Ok(docs)
    }

    async fn set(&self, collection: &str, id: &str, fields: Value) -> Result<()> {
        let path = self.doc_path(collection, id)?;
        self.write_doc(&path, &fields).await?;
        debug!(collection, id, "document written");
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<()> {
        let path = self.doc_path(collection, id)?;
        let mut doc = Self::read_doc(&path)
            .await?
            .ok_or_else(|| AppError::NotFound(collection.into(), id.into()))?;

        let Value::Object(fields) = fields else {
            return Err(AppError::Validation(
                "update fields must be a JSON object".into(),
            ));
        };
        let Value::Object(existing) = &mut doc else {
            return Err(AppError::Gateway(format!(
                "stored document {path:?} is not an object"
            )));
        };
        for (key, value) in fields {
            existing.insert(key, value);
        }

        self.write_doc(&path, &doc).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let path = self.doc_path(collection, id)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(collection, id, "document deleted");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::Gateway(err.to_string())),
        }
    }
}
