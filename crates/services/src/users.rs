//! Typed access to the `users` collection.

use std::sync::Arc;

use domains::{AppError, DocumentGateway, Result, User};
use uuid::Uuid;

pub const USERS: &str = "users";

/// Profile lookups over the raw document gateway.
///
/// The stored document carries more than the core needs (the identity
/// adapter keeps a hashed password in it); deserializing into [`User`]
/// drops those fields here, at the boundary, instead of trusting the
/// loose shape at every call site.
#[derive(Clone)]
pub struct Users {
    gateway: Arc<dyn DocumentGateway>,
}

impl Users {
    pub fn new(gateway: Arc<dyn DocumentGateway>) -> Self {
        Self { gateway }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<User>> {
        let Some(doc) = self.gateway.get(USERS, &id.to_string()).await? else {
            return Ok(None);
        };
        let user = serde_json::from_value(doc)
            .map_err(|e| AppError::Gateway(format!("malformed user document {id}: {e}")))?;
        Ok(Some(user))
    }
}
