//! # Session State Coordinator
//!
//! One subscription to the identity gateway per process; every other
//! component reads a snapshot instead of reaching into shared mutable
//! state. `loaded` latches true after the first determination, which lets
//! consumers tell "still resolving" apart from "definitely signed out".

use std::sync::Arc;

use domains::{IdentityGateway, User};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::users::Users;

/// Snapshot of the current principal.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub principal: Option<User>,
    /// True once session determination has completed at least once.
    /// Never reverts to false.
    pub loaded: bool,
}

/// Drives [`SessionState`] from identity-gateway notifications.
///
/// Each notification carrying a session triggers a profile lookup; the
/// principal is the merge of session-supplied and profile-supplied fields.
/// A lookup miss or failure resolves to "signed out" rather than an error:
/// consumers only ever see a snapshot.
pub struct SessionTracker {
    state: watch::Receiver<SessionState>,
    task: JoinHandle<()>,
}

impl SessionTracker {
    pub fn spawn(identity: Arc<dyn IdentityGateway>, users: Users) -> Self {
        let (tx, rx) = watch::channel(SessionState::default());
        let mut sessions = identity.subscribe();
        let task = tokio::spawn(async move {
            // The gateway replays the current value, so resolve it before
            // waiting for changes; `loaded` flips on the first pass.
            loop {
                let session = sessions.borrow_and_update().clone();
                let principal = match session {
                    Some(session) => match users.get(session.id).await {
                        Ok(Some(profile)) => {
                            debug!(user = %session.id, "session resolved");
                            Some(session.into_user(&profile))
                        }
                        Ok(None) => {
                            warn!(user = %session.id, "no profile document for session");
                            None
                        }
                        Err(err) => {
                            warn!(user = %session.id, error = %err, "profile lookup failed");
                            None
                        }
                    },
                    None => None,
                };
                let _ = tx.send(SessionState {
                    principal,
                    loaded: true,
                });
                if sessions.changed().await.is_err() {
                    // Gateway gone; the last snapshot stays readable.
                    break;
                }
            }
        });
        SessionTracker { state: rx, task }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Watch snapshot changes; the presentation layer re-renders off this.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }
}

impl Drop for SessionTracker {
    fn drop(&mut self) {
        // Teardown unsubscribes: aborting the task drops its receiver.
        self.task.abort();
    }
}
