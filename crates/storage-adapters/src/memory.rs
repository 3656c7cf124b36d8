//! In-memory implementation of `DocumentGateway`.
//!
//! Backs tests and ephemeral runs. Merge semantics match the remote
//! store's shallow `update`: top-level fields overwrite, an explicit JSON
//! `null` is stored as written (optional fields deserialize it the same
//! as absent).

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use domains::{AppError, DocumentGateway, Result};

#[derive(Default)]
pub struct MemoryStore {
    docs: DashMap<(String, String), Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(collection: &str, id: &str) -> (String, String) {
        (collection.to_string(), id.to_string())
    }
}

fn merge_fields(doc: &mut Value, fields: Value) -> Result<()> {
    let Value::Object(fields) = fields else {
        return Err(AppError::Validation(
            "update fields must be a JSON object".into(),
        ));
    };
    let Value::Object(doc) = doc else {
        return Err(AppError::Gateway("stored document is not an object".into()));
    };
    for (key, value) in fields {
        doc.insert(key, value);
    }
    Ok(())
}

#[async_trait]
impl DocumentGateway for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        Ok(self
            .docs
            .get(&Self::key(collection, id))
            .map(|doc| doc.value().clone()))
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>> {
        Ok(self
            .docs
            .iter()
            .filter(|entry| entry.key().0 == collection)
            .map(|entry| (entry.key().1.clone(), entry.value().clone()))
            .collect())
    }

    async fn set(&self, collection: &str, id: &str, fields: Value) -> Result<()> {
        self.docs.insert(Self::key(collection, id), fields);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<()> {
        let mut entry = self
            .docs
            .get_mut(&Self::key(collection, id))
            .ok_or_else(|| AppError::NotFound(collection.into(), id.into()))?;
        merge_fields(entry.value_mut(), fields)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.docs.remove(&Self::key(collection, id));
        Ok(())
    }
}
