//! # auth-adapters
//!
//! Argon2-based implementation of `IdentityGateway` over a document
//! gateway. Accounts live in the `users` collection as the profile fields
//! plus a hashed `password`; session state is broadcast on a watch
//! channel, and each new subscriber starts from the current value.

pub mod password;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;

use domains::{AppError, DocumentGateway, IdentityGateway, Result, Session, User};

const USERS: &str = "users";
const MIN_PASSWORD_LEN: usize = 6;

/// The stored account document: the public profile plus the hash the core
/// never sees.
#[derive(Serialize, Deserialize)]
struct UserRecord {
    #[serde(flatten)]
    user: User,
    password: String,
}

pub struct LocalIdentityGateway {
    store: Arc<dyn DocumentGateway>,
    sessions: watch::Sender<Option<Session>>,
}

impl LocalIdentityGateway {
    pub fn new(store: Arc<dyn DocumentGateway>) -> Self {
        let (sessions, _) = watch::channel(None);
        Self { store, sessions }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        for (id, doc) in self.store.list(USERS).await? {
            let record: UserRecord = match serde_json::from_value(doc) {
                Ok(record) => record,
                Err(err) => {
                    warn!(user = %id, error = %err, "skipping malformed user document");
                    continue;
                }
            };
            if record.user.email.eq_ignore_ascii_case(email) {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl IdentityGateway for LocalIdentityGateway {
    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.sessions.subscribe()
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let record = self.find_by_email(email).await?;
        // One rejection message for both failure modes; which part was
        // wrong is not for the caller to learn.
        let denied = || AppError::Unauthorized("invalid email or password".into());
        let record = record.ok_or_else(denied)?;
        if !password::verify_password(password, &record.password) {
            return Err(denied());
        }

        let session = Session {
            id: record.user.id,
            display_name: record.user.username,
            email: record.user.email,
        };
        self.sessions.send_replace(Some(session.clone()));
        info!(user = %session.id, "signed in");
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<Session> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::Validation("a valid email is required".into()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict(
                "an account with this email already exists".into(),
            ));
        }

        let id = Uuid::now_v7();
        let record = UserRecord {
            user: User {
                id,
                username: display_name.to_string(),
                name: display_name.to_string(),
                email: email.to_string(),
                is_moderator: false,
            },
            password: password::hash_password(password)?,
        };
        let doc = serde_json::to_value(&record).map_err(|e| AppError::Gateway(e.to_string()))?;
        self.store.set(USERS, &id.to_string(), doc).await?;

        let session = Session {
            id,
            display_name: display_name.to_string(),
            email: email.to_string(),
        };
        self.sessions.send_replace(Some(session.clone()));
        info!(user = %id, "account created");
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        self.sessions.send_replace(None);
        Ok(())
    }
}
