//! # Store Errors
//!
//! Fatal local-state errors of the managing stores. User-facing outcomes are
//! `ResponseCode`s; these represent broken caller discipline.

use shared_types::EntityId;
use thiserror::Error;

/// Errors raised by [`crate::EntityStore`] and [`crate::ScheduleStore`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The id is neither the pending creation nor a committed entity.
    #[error("Argument 'id={0}' does not refer to an extant entity")]
    NotFound(EntityId),

    /// Commit or rollback was requested with nothing pending.
    #[error("No pending creation")]
    NoCreationPending,

    /// A second provisional creation was attempted before commit/rollback.
    #[error("Creation of {0} is still pending")]
    CreationAlreadyPending(EntityId),

    /// A mutation of a committed entity failed.
    #[error("Change to {id} failed unexpectedly: {reason}")]
    ChangeFailed { id: EntityId, reason: String },
}
