//! # Authorization Policy
//!
//! Pure allow/deny decisions over (principal, thread). No side effects, no
//! I/O; an absent principal always denies. Callers get a boolean back and
//! never an error-shaped control path.

use crate::models::{Thread, User};

fn is_creator_or_moderator(principal: Option<&User>, thread: &Thread) -> bool {
    principal.is_some_and(|p| p.id == thread.creator.id || p.is_moderator)
}

/// Creator or any moderator may lock and unlock.
pub fn can_lock_toggle(principal: Option<&User>, thread: &Thread) -> bool {
    is_creator_or_moderator(principal, thread)
}

/// Creator or any moderator may edit.
pub fn can_edit(principal: Option<&User>, thread: &Thread) -> bool {
    is_creator_or_moderator(principal, thread)
}

/// Creator or any moderator may delete.
pub fn can_delete(principal: Option<&User>, thread: &Thread) -> bool {
    is_creator_or_moderator(principal, thread)
}

/// Only the thread creator may mark an answer, and only in Q&A mode.
///
/// Moderator status alone is NOT enough here, unlike lock/edit/delete.
pub fn can_mark_answered(principal: Option<&User>, thread: &Thread) -> bool {
    thread.is_qna && principal.is_some_and(|p| p.id == thread.creator.id)
}

/// Any signed-in principal may comment while the thread is unlocked.
pub fn can_comment(principal: Option<&User>, thread: &Thread) -> bool {
    principal.is_some() && !thread.is_locked
}
