//! # AppError
//!
//! Centralized error handling for the forum core.
//! Maps domain-specific failures to the outcomes callers report: a redirect
//! (NotFound), a user-visible rejection (Unauthorized, Validation), or a
//! transient failure notice (Gateway). None of these is process-fatal.

use thiserror::Error;

/// The primary error type for all forum-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource lookup miss (e.g. Thread, User, Comment)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Input rejected before any effect took place
    #[error("validation error: {0}")]
    Validation(String),

    /// An authorization predicate denied the action
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource already exists (e.g. duplicate account email)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Persistence or identity call failed; working in-memory state is
    /// left unchanged by the caller
    #[error("gateway failure: {0}")]
    Gateway(String),
}

/// A specialized Result type for forum-core logic.
pub type Result<T> = std::result::Result<T, AppError>;
