//! notepush core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain types** - `NoteId`, `SyncTarget`, `SyncOutcome`, `BatchSummary`
//! - **Use cases** - `TargetRegistry`, `SyncNoteUseCase`, `SettingsState`
//! - **Port definitions** - Traits for adapters: `IRemoteStore`, `IVault`,
//!   `ISettingsStore`, `INotificationService`
//! - **Configuration** - The `Settings` object and its YAML layout
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no I/O.
//! Ports define trait interfaces that adapter crates implement.
//! Use cases orchestrate domain types through port interfaces.

pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
