//! Typed access to the `threads` collection.
//!
//! The store hands back loose JSON; this layer is where shapes are
//! enforced. Documents deserialize with explicit defaults and pass through
//! answer-state normalization, so nothing downstream ever sees a half-set
//! answer pair or a dangling comment reference.

use std::sync::Arc;

use domains::{AppError, Comment, DocumentGateway, NewThread, Result, Thread};
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

pub const THREADS: &str = "threads";

#[derive(Clone)]
pub struct Threads {
    gateway: Arc<dyn DocumentGateway>,
}

impl Threads {
    pub fn new(gateway: Arc<dyn DocumentGateway>) -> Self {
        Self { gateway }
    }

    fn decode(id: &str, doc: Value) -> Result<Thread> {
        let mut thread: Thread = serde_json::from_value(doc)
            .map_err(|e| AppError::Gateway(format!("malformed thread document {id}: {e}")))?;
        if thread.normalize_answer_state() {
            warn!(thread = %thread.id, "cleared inconsistent answer state on fetched thread");
        }
        Ok(thread)
    }

    fn encode<T: serde::Serialize>(value: &T) -> Result<Value> {
        serde_json::to_value(value).map_err(|e| AppError::Gateway(e.to_string()))
    }

    /// Persist a fresh thread: v7 id, current timestamp, status New,
    /// unlocked, no comments.
    pub async fn create(&self, input: NewThread) -> Result<Thread> {
        let thread = Thread::create(input);
        let doc = Self::encode(&thread)?;
        self.gateway.set(THREADS, &thread.id.to_string(), doc).await?;
        debug!(thread = %thread.id, "thread created");
        Ok(thread)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Thread>> {
        let id = id.to_string();
        match self.gateway.get(THREADS, &id).await? {
            Some(doc) => Ok(Some(Self::decode(&id, doc)?)),
            None => Ok(None),
        }
    }

    /// Every thread, newest first.
    pub async fn get_all(&self) -> Result<Vec<Thread>> {
        let docs = self.gateway.list(THREADS).await?;
        let mut threads = Vec::with_capacity(docs.len());
        for (id, doc) in docs {
            threads.push(Self::decode(&id, doc)?);
        }
        threads.sort_by(|a, b| b.creation_date.cmp(&a.creation_date));
        Ok(threads)
    }

    pub async fn set_locked(&self, id: Uuid, locked: bool) -> Result<()> {
        self.gateway
            .update(THREADS, &id.to_string(), json!({ "isLocked": locked }))
            .await
    }

    /// Merge partial fields into the stored document.
    pub async fn update(&self, id: Uuid, fields: Value) -> Result<()> {
        self.gateway.update(THREADS, &id.to_string(), fields).await
    }

    /// Read-modify-write append. The aggregate's lock gate applies here
    /// too: a locked thread refuses the comment before anything is written.
    pub async fn append_comment(&self, thread_id: Uuid, comment: Comment) -> Result<Comment> {
        let Some(mut thread) = self.get(thread_id).await? else {
            return Err(AppError::NotFound("Thread".into(), thread_id.to_string()));
        };
        thread.admit_comment(comment.clone())?;
        let comments = Self::encode(&thread.comments)?;
        self.gateway
            .update(THREADS, &thread_id.to_string(), json!({ "comments": comments }))
            .await?;
        Ok(comment)
    }

    /// Comments are denormalized inline, so removing the document is the
    /// whole cascade.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.gateway.delete(THREADS, &id.to_string()).await
    }
}
