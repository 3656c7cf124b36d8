//! # Thread View Coordinator
//!
//! Owns the working copy of the currently displayed thread and applies
//! intents against it. Comment submission is optimistic; lock, answer,
//! edit and delete reflect locally only after the store write
//! acknowledges — lock and answer state gate other operations' validity,
//! so they must not be shown before they are real.
//!
//! The working copy is a cache of the system of record: across concurrent
//! editors it can diverge until the next [`ThreadView::load_thread`].

use domains::{policy, AppError, Comment, Result, Thread, ThreadPatch, User};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::threads::Threads;

pub struct ThreadView {
    threads: Threads,
    current: Option<Thread>,
}

impl ThreadView {
    pub fn new(threads: Threads) -> Self {
        Self {
            threads,
            current: None,
        }
    }

    /// The working thread, if one is loaded.
    pub fn thread(&self) -> Option<&Thread> {
        self.current.as_ref()
    }

    /// The accepted answer of the working thread, derived on read.
    pub fn answered_comment(&self) -> Option<&Comment> {
        self.current.as_ref().and_then(|t| t.answered_comment())
    }

    fn loaded(&self) -> Result<&Thread> {
        self.current
            .as_ref()
            .ok_or_else(|| AppError::Validation("no thread is loaded".into()))
    }

    fn loaded_mut(&mut self) -> Result<&mut Thread> {
        self.current
            .as_mut()
            .ok_or_else(|| AppError::Validation("no thread is loaded".into()))
    }

    /// Load a thread into the working set, fully replacing the previous
    /// one; derived answer state comes from the fetched document. A miss
    /// is the caller's signal to redirect away from the thread view.
    pub async fn load_thread(&mut self, id: Uuid) -> Result<&Thread> {
        match self.threads.get(id).await? {
            Some(thread) => {
                self.current = Some(thread);
                self.loaded()
            }
            None => Err(AppError::NotFound("Thread".into(), id.to_string())),
        }
    }

    /// Optimistically append an already-persisted comment to the working
    /// set. Constructing and writing the comment through the store is the
    /// submitting collaborator's job ([`Threads::append_comment`]); no
    /// ordering reconciliation happens here — last appended wins locally
    /// until the next load.
    pub fn submit_comment(&mut self, principal: Option<&User>, comment: Comment) -> Result<&Comment> {
        let thread = self.loaded_mut()?;
        if !policy::can_comment(principal, thread) {
            return Err(AppError::Unauthorized(
                "commenting requires a signed-in user and an unlocked thread".into(),
            ));
        }
        thread.admit_comment(comment)
    }

    /// Flip the lock. Write-then-reflect: the local flag changes only
    /// after the store acknowledges, never optimistically — a rollback of
    /// an optimistic flip would be user-visible on the comment gate.
    pub async fn toggle_lock(&mut self, principal: Option<&User>) -> Result<&Thread> {
        let thread = self.loaded()?;
        if !policy::can_lock_toggle(principal, thread) {
            return Err(AppError::Unauthorized(
                "only the creator or a moderator can lock or unlock this thread".into(),
            ));
        }
        let id = thread.id;
        let next = !thread.is_locked;

        self.threads.set_locked(id, next).await?;

        let thread = self.loaded_mut()?;
        thread.is_locked = next;
        info!(thread = %id, locked = next, "thread lock toggled");
        Ok(&*thread)
    }

    /// Toggle the accepted answer: marking the already-marked comment
    /// un-marks it, any other comment overwrites the mark. Write-through
    /// first, local state after.
    pub async fn mark_answered(
        &mut self,
        principal: Option<&User>,
        comment_id: Uuid,
    ) -> Result<&Thread> {
        let thread = self.loaded()?;
        if !policy::can_mark_answered(principal, thread) {
            return Err(AppError::Unauthorized(
                "only the thread creator can mark a comment as the answer".into(),
            ));
        }
        let id = thread.id;
        let state = thread.answer_toggle(comment_id)?;

        self.threads
            .update(
                id,
                json!({
                    "isAnswered": state.is_answered,
                    "answeredCommentId": state.answered_comment_id,
                }),
            )
            .await?;

        let thread = self.loaded_mut()?;
        thread.set_answer_state(state);
        Ok(&*thread)
    }

    /// Remove the thread. Comments live inline in the document, so the
    /// store delete is the whole cascade. Clears the working set.
    pub async fn delete_thread(&mut self, principal: Option<&User>) -> Result<()> {
        let thread = self.loaded()?;
        if !policy::can_delete(principal, thread) {
            return Err(AppError::Unauthorized(
                "only the creator or a moderator can delete this thread".into(),
            ));
        }
        let id = thread.id;

        self.threads.delete(id).await?;

        self.current = None;
        info!(thread = %id, "thread deleted");
        Ok(())
    }

    /// Apply an edit patch. Turning Q&A mode off while an answer is marked
    /// clears the answer state in the same write, keeping the pair
    /// invariant intact in the store and locally.
    pub async fn edit_thread(
        &mut self,
        principal: Option<&User>,
        patch: ThreadPatch,
    ) -> Result<&Thread> {
        let thread = self.loaded()?;
        if !policy::can_edit(principal, thread) {
            return Err(AppError::Unauthorized(
                "only the creator or a moderator can edit this thread".into(),
            ));
        }
        let id = thread.id;
        let mut fields =
            serde_json::to_value(&patch).map_err(|e| AppError::Gateway(e.to_string()))?;
        if patch.clears_answer(thread) {
            fields["isAnswered"] = json!(false);
            fields["answeredCommentId"] = Value::Null;
        }

        self.threads.update(id, fields).await?;

        let thread = self.loaded_mut()?;
        thread.apply_patch(&patch);
        Ok(&*thread)
    }
}
