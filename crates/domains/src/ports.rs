//! # Gateway Ports
//!
//! Contracts to the external collaborators: the remote document store and
//! the identity service. Adapters implement these; the core only consumes
//! them through `Arc<dyn ...>`.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;

use crate::error::Result;
use crate::models::Session;

/// Document-store contract, keyed by collection and document id.
///
/// `update` merges the given top-level fields into the stored document; an
/// explicit JSON `null` clears a field. Collections in use: `threads`
/// (creator and comments denormalized inline) and `users`.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait DocumentGateway: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>>;
    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>>;
    async fn set(&self, collection: &str, id: &str, fields: Value) -> Result<()>;
    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<()>;
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;
}

/// Identity and session contract.
///
/// `subscribe` replays the current session state to each new receiver;
/// dropping the receiver is the unsubscribe. Exactly one consumer per
/// process is expected to drive session state from it (the session
/// tracker); everything else reads the tracker's snapshot.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    fn subscribe(&self) -> watch::Receiver<Option<Session>>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    async fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<Session>;

    async fn sign_out(&self) -> Result<()>;
}
