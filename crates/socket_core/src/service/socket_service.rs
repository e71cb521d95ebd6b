//! Command execution service.
//!
//! # Responsibility
//! - Provide the single entry point that runs parsed commands.
//! - Commit history after successful mutating commands.
//! - Persist the full snapshot whenever store content changed.
//!
//! # Invariants
//! - Failed commands are never committed and never persisted.
//! - A failed save restores the model to its state before the command, so
//!   every `Err` from `run_command` leaves store, history and predicate
//!   unchanged.
//! - List/Find never create history versions.
//! - Log lines carry metadata only, never person field values.

use crate::command::{Command, CommandError, CommandResult};
use crate::model::identity::IdentityPolicy;
use crate::repo::person_repo::{PersonRepository, StorageError, StorageResult};
use crate::service::model::{Model, ModelEvent, SubscriptionId};
use crate::store::person_store::PersonStore;
use log::{info, warn};
use std::sync::Arc;
use std::time::Instant;

/// Execution façade over one session model and its repository.
pub struct SocketService<R: PersonRepository> {
    model: Model,
    repo: R,
}

impl<R: PersonRepository> SocketService<R> {
    /// Loads the saved snapshot from `repo` and starts a session on it.
    ///
    /// A repository with no saved snapshot starts an empty store.
    ///
    /// # Errors
    /// - `StorageError::DataLoad` when saved rows are invalid or contain two
    ///   identity-equivalent persons.
    /// - `StorageError::Db` on transport failures.
    pub fn open(repo: R, identity: Arc<dyn IdentityPolicy>) -> StorageResult<Self> {
        let store = Self::load_store(&repo, identity)?;
        Ok(Self::with_store(repo, store))
    }

    /// Builds the seed store from the snapshot saved in `repo`.
    ///
    /// Callers that want to recover from `StorageError::DataLoad` keep `repo`
    /// and pass a fresh store to `with_store`.
    pub fn load_store(repo: &R, identity: Arc<dyn IdentityPolicy>) -> StorageResult<PersonStore> {
        let persons = repo.load_persons()?.unwrap_or_default();
        let mut store = PersonStore::new(Arc::clone(&identity));
        for (record, person) in persons.into_iter().enumerate() {
            store
                .add(person)
                .map_err(|err| StorageError::DataLoad {
                    record,
                    field: "person",
                    message: err.to_string(),
                })?;
        }

        info!(
            "event=session_open module=service status=ok identity={} count={}",
            identity.policy_id(),
            store.len()
        );
        Ok(store)
    }

    /// Starts a session on `store` without reading from `repo`.
    pub fn with_store(repo: R, store: PersonStore) -> Self {
        Self {
            model: Model::new(store),
            repo,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Registers a model change listener; see `Model::subscribe`.
    pub fn subscribe(&mut self, listener: impl FnMut(ModelEvent) + 'static) -> SubscriptionId {
        self.model.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.model.unsubscribe(id)
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Executes `command`, commits history and persists as needed.
    pub fn run_command(&mut self, command: Command) -> Result<CommandResult, CommandError> {
        let started_at = Instant::now();
        let command_word = command.command_word();

        let checkpoint = command.changes_store().then(|| self.model.checkpoint());
        let outcome = command.execute(&mut self.model).map(|result| {
            if command.commits_history() {
                self.model.commit();
            }
            result
        });
        let outcome = match (outcome, checkpoint) {
            (Ok(result), Some(checkpoint)) => match self.save() {
                Ok(()) => Ok(result),
                Err(err) => {
                    self.model.rollback(checkpoint);
                    Err(err)
                }
            },
            (outcome, _) => outcome,
        };

        match &outcome {
            Ok(_) => info!(
                "event=command_run module=service status=ok command={} duration_ms={} version={} count={}",
                command_word,
                started_at.elapsed().as_millis(),
                self.model.history().cursor(),
                self.model.store().len()
            ),
            Err(err) => warn!(
                "event=command_run module=service status=error command={} duration_ms={} error_kind={}",
                command_word,
                started_at.elapsed().as_millis(),
                error_kind(err)
            ),
        }
        outcome
    }

    fn save(&mut self) -> Result<(), CommandError> {
        self.repo
            .save_persons(self.model.store().persons())
            .map_err(|err| {
                warn!(
                    "event=snapshot_save module=service status=error error={}",
                    err
                );
                CommandError::Persistence(err.to_string())
            })
    }
}

fn error_kind(err: &CommandError) -> &'static str {
    match err {
        CommandError::Validation(_) => "validation",
        CommandError::DuplicatePerson => "duplicate_person",
        CommandError::PersonNotFound => "person_not_found",
        CommandError::InvalidIndex { .. } => "invalid_index",
        CommandError::NoPreviousState => "no_previous_state",
        CommandError::NoNextState => "no_next_state",
        CommandError::NothingToEdit => "nothing_to_edit",
        CommandError::NothingToRemove => "nothing_to_remove",
        CommandError::FieldMismatch { .. } => "field_mismatch",
        CommandError::Persistence(_) => "persistence",
    }
}
