//! In-memory person store and its version history.
//!
//! # Responsibility
//! - Hold the session's person sequence behind the store contract.
//! - Provide snapshot-per-commit undo/redo on top of it.
//!
//! # Invariants
//! - Store operations are all-or-nothing.
//! - History restoration reproduces a prior snapshot exactly, order included.

pub mod person_store;
pub mod versioned_store;
