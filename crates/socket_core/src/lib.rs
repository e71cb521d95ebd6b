//! Core domain logic for SoCket.
//! This crate owns the person record invariants and the versioned command
//! engine; input parsing and presentation live in front-end crates.

pub mod command;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use command::descriptor::{EditPersonDescriptor, RemovePersonDescriptor};
pub use command::{Command, CommandError, CommandResult, Removal, Target};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::field::{
    Address, Email, FieldValidationError, Language, Name, Phone, Profile, Tag,
};
pub use model::identity::{
    default_identity_policy, parse_identity_policy, ContactIdentity, IdentityPolicy,
    IdentityPolicyError, NameIdentity, ProfileIdentity,
};
pub use model::person::{Person, PersonDraft};
pub use model::predicate::{FindKeywords, PersonPredicate};
pub use repo::person_repo::{
    InMemoryPersonRepository, PersonRepository, SqlitePersonRepository, StorageError,
    StorageResult,
};
pub use service::model::{FilteredView, Model, ModelEvent, SubscriptionId};
pub use service::socket_service::SocketService;
pub use store::person_store::{PersonStore, StoreError, StoreResult};
pub use store::versioned_store::{HistoryError, HistoryResult, Snapshot, VersionedStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
