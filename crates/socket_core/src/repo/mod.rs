//! Persistence adapters for person snapshots.
//!
//! # Responsibility
//! - Define the full-snapshot load/save contract used by the service layer.
//! - Keep SQL details out of the command engine.
//!
//! # Invariants
//! - Loaded data is validated before it reaches the store.
//! - Saves are all-or-nothing.

pub mod person_repo;
