//! Domain entities and business logic
//!
//! This module contains the core domain types for notepush:
//! - Newtypes for validated identifiers (`NoteId`)
//! - Sync targets and the URL target parser
//! - Per-note outcomes and batch summaries
//! - Domain-specific error types

pub mod errors;
pub mod newtypes;
pub mod outcome;
pub mod sync_target;

// Re-export commonly used types
pub use errors::{DomainError, SyncError};
pub use newtypes::NoteId;
pub use outcome::{BatchSummary, SyncOutcome};
pub use sync_target::SyncTarget;
