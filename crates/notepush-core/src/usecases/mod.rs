//! Use cases (interactors) for notepush
//!
//! This module contains the application use cases that orchestrate
//! domain entities and port interfaces. Use cases are thin coordinators
//! that delegate business rules to domain methods and I/O to ports.
//!
//! ## Use Cases
//!
//! - [`SettingsState`] - Shared settings with save-before-publish mutations
//! - [`TargetRegistry`] - Note to remote target mapping
//! - [`SyncNoteUseCase`] - Push one note to its remote target

pub mod settings_state;
pub mod sync_note;
pub mod target_registry;

pub use settings_state::SettingsState;
pub use sync_note::{commit_message, SyncNoteUseCase};
pub use target_registry::TargetRegistry;
