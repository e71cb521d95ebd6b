//! Session services.
//!
//! # Responsibility
//! - Own the session model (store, history, view predicate, listeners).
//! - Run commands and coordinate history commits with persistence.
//!
//! # Invariants
//! - Presentation layers read through `Model::filtered_persons` and mutate
//!   only through `SocketService::run_command`.

pub mod model;
pub mod socket_service;
