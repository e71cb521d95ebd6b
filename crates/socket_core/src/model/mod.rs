//! Contact record model.
//!
//! # Responsibility
//! - Define the validated value types a person is built from.
//! - Name the two person comparisons explicitly: identity (pluggable policy)
//!   and full value equality.
//!
//! # Invariants
//! - Invalid raw input never becomes a model value.
//! - Model values are immutable; edits produce new values.

pub mod field;
pub mod identity;
pub mod person;
pub mod predicate;
