//! # Domain Models
//!
//! These structs mirror the document shapes persisted in the store, so the
//! serde field names are the document field names (camelCase, plus the
//! irregular `isQnA`). Every optional field carries an explicit default;
//! documents are never trusted shapeless past this boundary.
//!
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// A registered account, carried as the authenticated principal.
///
/// The persisted `users` document additionally holds a server-hashed
/// `password` field; only the identity adapter ever reads that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_moderator: bool,
}

/// Payload of an identity-provider notification.
///
/// Merged with the `users` profile document to form a full [`User`]:
/// id, username and email come from the session, name and the moderator
/// flag from the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
}

impl Session {
    /// Enrich this session with its profile document.
    pub fn into_user(self, profile: &User) -> User {
        User {
            id: self.id,
            username: self.display_name,
            name: profile.name.clone(),
            email: self.email,
            is_moderator: profile.is_moderator,
        }
    }
}

/// The closed set of board categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Software Development")]
    SoftwareDevelopment,
    #[serde(rename = "Networking & Security")]
    NetworkingSecurity,
    #[serde(rename = "Hardware & Gadgets")]
    HardwareGadgets,
    #[serde(rename = "Cloud Computing")]
    CloudComputing,
    #[serde(rename = "Tech News & Trends")]
    TechNewsTrends,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::SoftwareDevelopment,
        Category::NetworkingSecurity,
        Category::HardwareGadgets,
        Category::CloudComputing,
        Category::TechNewsTrends,
    ];

    /// Display label, identical to the persisted document value.
    pub fn label(&self) -> &'static str {
        match self {
            Category::SoftwareDevelopment => "Software Development",
            Category::NetworkingSecurity => "Networking & Security",
            Category::HardwareGadgets => "Hardware & Gadgets",
            Category::CloudComputing => "Cloud Computing",
            Category::TechNewsTrends => "Tech News & Trends",
        }
    }

    /// The URL slug (e.g. "software-development" for /threads/software-development/<id>)
    pub fn slug(&self) -> &'static str {
        match self {
            Category::SoftwareDevelopment => "software-development",
            Category::NetworkingSecurity => "networking-security",
            Category::HardwareGadgets => "hardware-gadgets",
            Category::CloudComputing => "cloud-computing",
            Category::TechNewsTrends => "tech-news-trends",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Listing badge for a thread. Absent on older documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreadStatus {
    New,
    Hot,
}

/// A label attached to a thread. The name is the canonical identity; the id
/// is its derived slug and is never empty (see `services::tags`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
}

/// A reply attached to a thread, optionally nested via `parent_id`.
///
/// Immutable once created. Whether a comment is "the answer" is not stored
/// here; it is derived by comparing `id` to the owning thread's
/// `answered_comment_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub creation_date: DateTime<Utc>,
    pub creator: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
}

impl Comment {
    pub fn new(content: impl Into<String>, creator: User, parent_id: Option<Uuid>) -> Self {
        Comment {
            id: Uuid::now_v7(),
            content: content.into(),
            creation_date: Utc::now(),
            creator,
            parent_id,
        }
    }
}

/// Answer bookkeeping of a Q&A thread, always written and cleared as a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnswerState {
    pub is_answered: bool,
    pub answered_comment_id: Option<Uuid>,
}

/// A top-level discussion post with its comments denormalized inline.
///
/// Invariants owned here:
/// - `answered_comment_id` is set iff `is_answered && is_qna`, and then
///   references a comment present in `comments`;
/// - `is_locked == true` forbids admitting new comments but never
///   invalidates existing ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: Uuid,
    pub title: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ThreadStatus>,
    pub creation_date: DateTime<Utc>,
    pub description: String,
    pub creator: User,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(rename = "isQnA", default)]
    pub is_qna: bool,
    #[serde(default)]
    pub is_answered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answered_comment_id: Option<Uuid>,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Input for creating a thread. Everything else is filled in at creation:
/// fresh v7 id, current timestamp, status New, unlocked, no comments.
#[derive(Debug, Clone)]
pub struct NewThread {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub is_qna: bool,
    pub tags: Vec<Tag>,
    pub creator: User,
}

/// The editable field set of a thread. Serializes to a partial document:
/// absent fields are left untouched by the store.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(rename = "isQnA", skip_serializing_if = "Option::is_none")]
    pub is_qna: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl ThreadPatch {
    /// Turning Q&A mode off while an answer is marked must clear the answer
    /// state in the same write, or the thread would carry a dangling mark.
    pub fn clears_answer(&self, thread: &Thread) -> bool {
        self.is_qna == Some(false) && (thread.is_answered || thread.answered_comment_id.is_some())
    }
}

impl Thread {
    pub fn create(input: NewThread) -> Self {
        Thread {
            id: Uuid::now_v7(),
            title: input.title,
            category: input.category,
            status: Some(ThreadStatus::New),
            creation_date: Utc::now(),
            description: input.description,
            creator: input.creator,
            comments: Vec::new(),
            is_qna: input.is_qna,
            is_answered: false,
            answered_comment_id: None,
            is_locked: false,
            tags: input.tags,
        }
    }

    pub fn comment(&self, id: Uuid) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    /// The accepted answer, if this is a Q&A thread with one marked.
    pub fn answered_comment(&self) -> Option<&Comment> {
        if !self.is_qna || !self.is_answered {
            return None;
        }
        self.answered_comment_id.and_then(|id| self.comment(id))
    }

    /// Append a comment. Only valid while the thread is in the Open state.
    pub fn admit_comment(&mut self, comment: Comment) -> Result<&Comment> {
        if self.is_locked {
            return Err(AppError::Unauthorized(
                "thread is locked, no further comments can be added".into(),
            ));
        }
        let idx = self.comments.len();
        self.comments.push(comment);
        Ok(&self.comments[idx])
    }

    /// Compute the answer state that marking `comment_id` toggles to,
    /// without applying it. Same id un-marks; a different id overwrites.
    ///
    /// The caller writes the returned state through the store first and
    /// applies it locally via [`Thread::set_answer_state`] after the write
    /// acknowledges.
    pub fn answer_toggle(&self, comment_id: Uuid) -> Result<AnswerState> {
        if !self.is_qna {
            return Err(AppError::Validation(
                "answers can only be marked on Q&A threads".into(),
            ));
        }
        let marking = self.answered_comment_id != Some(comment_id);
        if marking && self.comment(comment_id).is_none() {
            return Err(AppError::NotFound("Comment".into(), comment_id.to_string()));
        }
        Ok(if marking {
            AnswerState {
                is_answered: true,
                answered_comment_id: Some(comment_id),
            }
        } else {
            AnswerState::default()
        })
    }

    pub fn set_answer_state(&mut self, state: AnswerState) {
        self.is_answered = state.is_answered;
        self.answered_comment_id = state.answered_comment_id;
    }

    /// Clear answer state that violates the invariant (non-Q&A thread,
    /// half-set pair, or a dangling comment reference). Returns true when
    /// anything changed. Fetched documents pass through this before the
    /// rest of the core sees them.
    pub fn normalize_answer_state(&mut self) -> bool {
        let consistent = match self.answered_comment_id {
            Some(id) => self.is_qna && self.is_answered && self.comment(id).is_some(),
            None => !self.is_answered,
        };
        if !consistent {
            self.set_answer_state(AnswerState::default());
        }
        !consistent
    }

    /// Apply an edit patch locally. Clears the answer state when the patch
    /// turns Q&A mode off, keeping the pair invariant intact.
    pub fn apply_patch(&mut self, patch: &ThreadPatch) {
        let clear = patch.clears_answer(self);
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(is_qna) = patch.is_qna {
            self.is_qna = is_qna;
        }
        if let Some(tags) = &patch.tags {
            self.tags = tags.clone();
        }
        if clear {
            self.set_answer_state(AnswerState::default());
        }
    }
}
