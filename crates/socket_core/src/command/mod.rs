//! Executable commands over the session model.
//!
//! # Responsibility
//! - Define the typed unit of work produced by input parsers.
//! - Translate store/history contract failures into `CommandError`.
//!
//! # Invariants
//! - A failing command leaves store content and view predicate unchanged.
//! - Commands never commit history themselves; the execution service does
//!   that for commands where `commits_history()` is true.

pub mod descriptor;

use crate::model::field::FieldValidationError;
use crate::model::person::Person;
use crate::model::predicate::PersonPredicate;
use crate::service::model::Model;
use crate::store::person_store::StoreError;
use crate::store::versioned_store::HistoryError;
use descriptor::{EditPersonDescriptor, RemovePersonDescriptor};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use descriptor::Removal;

/// Typed command failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Validation(FieldValidationError),
    DuplicatePerson,
    PersonNotFound,
    /// One-based `index` is outside the `size` persons currently shown.
    InvalidIndex {
        index: usize,
        size: usize,
    },
    NoPreviousState,
    NoNextState,
    NothingToEdit,
    NothingToRemove,
    /// A field value requested for removal is not present on the person.
    FieldMismatch {
        field: &'static str,
    },
    /// The command succeeded in memory but the snapshot could not be saved.
    Persistence(String),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicatePerson => write!(f, "{}", StoreError::DuplicatePerson),
            Self::PersonNotFound => write!(f, "{}", StoreError::PersonNotFound),
            Self::InvalidIndex { index, size } => write!(
                f,
                "The person index provided is invalid: {index} (showing {size})"
            ),
            Self::NoPreviousState => write!(f, "{}", HistoryError::NoPreviousState),
            Self::NoNextState => write!(f, "{}", HistoryError::NoNextState),
            Self::NothingToEdit => write!(f, "At least one field to edit must be provided."),
            Self::NothingToRemove => write!(f, "At least one field to remove must be provided."),
            Self::FieldMismatch { field } => {
                write!(f, "The {field} to remove is not present in the person")
            }
            Self::Persistence(message) => write!(f, "Could not save data: {message}"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FieldValidationError> for CommandError {
    fn from(value: FieldValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for CommandError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicatePerson => Self::DuplicatePerson,
            StoreError::PersonNotFound => Self::PersonNotFound,
        }
    }
}

impl From<HistoryError> for CommandError {
    fn from(value: HistoryError) -> Self {
        match value {
            HistoryError::NoPreviousState => Self::NoPreviousState,
            HistoryError::NoNextState => Self::NoNextState,
            HistoryError::Store(err) => err.into(),
        }
    }
}

/// Successful command outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Human-readable feedback.
    pub feedback: String,
    /// Whether the session should end.
    pub exit: bool,
}

impl CommandResult {
    pub fn new(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            exit: false,
        }
    }

    pub fn exit(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            exit: true,
        }
    }
}

/// Person addressed by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// One-based position in the filtered view.
    Index(usize),
    /// Identity-equivalent stored person.
    Person(Person),
}

impl Target {
    /// Resolves to the stored person this target refers to.
    fn resolve(&self, model: &Model) -> Result<Person, CommandError> {
        match self {
            Self::Index(index) => {
                let view = model.filtered_persons();
                index
                    .checked_sub(1)
                    .and_then(|zero_based| view.get(zero_based))
                    .cloned()
                    .ok_or(CommandError::InvalidIndex {
                        index: *index,
                        size: view.len(),
                    })
            }
            Self::Person(person) => {
                let store = model.store();
                let identity = store.identity_policy();
                store
                    .persons()
                    .iter()
                    .find(|stored| identity.same_identity(stored, person))
                    .cloned()
                    .ok_or(CommandError::PersonNotFound)
            }
        }
    }
}

/// Unit of work executed against the session model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Person),
    Remove(Target),
    Edit {
        target: Target,
        descriptor: EditPersonDescriptor,
    },
    RemoveFields {
        target: Target,
        descriptor: RemovePersonDescriptor,
    },
    List,
    Find(PersonPredicate),
    Undo,
    Redo,
    Clear,
    Exit,
}

pub const MESSAGE_ADD_SUCCESS: &str = "New person added";
pub const MESSAGE_REMOVE_SUCCESS: &str = "Deleted Person";
pub const MESSAGE_EDIT_SUCCESS: &str = "Edited Person";
pub const MESSAGE_REMOVE_FIELDS_SUCCESS: &str = "Removed field(s) from Person";
pub const MESSAGE_LIST_SUCCESS: &str = "Listed all persons";
pub const MESSAGE_UNDO_SUCCESS: &str = "Undo success!";
pub const MESSAGE_REDO_SUCCESS: &str = "Redo success!";
pub const MESSAGE_CLEAR_SUCCESS: &str = "SoCket has been cleared!";
pub const MESSAGE_EXIT: &str = "Exiting SoCket as requested ...";

impl Command {
    /// Stable command word used in logs.
    pub fn command_word(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Remove(_) => "delete",
            Self::Edit { .. } => "edit",
            Self::RemoveFields { .. } => "remove",
            Self::List => "list",
            Self::Find(_) => "find",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Clear => "clear",
            Self::Exit => "exit",
        }
    }

    /// Whether a successful run must be recorded as a new history version.
    pub fn commits_history(&self) -> bool {
        matches!(
            self,
            Self::Add(_)
                | Self::Remove(_)
                | Self::Edit { .. }
                | Self::RemoveFields { .. }
                | Self::Clear
        )
    }

    /// Whether a successful run changes store content.
    pub fn changes_store(&self) -> bool {
        self.commits_history() || matches!(self, Self::Undo | Self::Redo)
    }

    pub fn execute(&self, model: &mut Model) -> Result<CommandResult, CommandError> {
        match self {
            Self::Add(person) => {
                model.add_person(person.clone())?;
                Ok(CommandResult::new(format!("{MESSAGE_ADD_SUCCESS}: {person}")))
            }
            Self::Remove(target) => {
                let person = target.resolve(model)?;
                let removed = model.remove_person(&person)?;
                Ok(CommandResult::new(format!(
                    "{MESSAGE_REMOVE_SUCCESS}: {removed}"
                )))
            }
            Self::Edit { target, descriptor } => {
                if descriptor.is_empty() {
                    return Err(CommandError::NothingToEdit);
                }
                let person = target.resolve(model)?;
                let edited = descriptor.apply(&person);
                model.set_person(&person, edited.clone())?;
                model.update_predicate(PersonPredicate::All);
                Ok(CommandResult::new(format!("{MESSAGE_EDIT_SUCCESS}: {edited}")))
            }
            Self::RemoveFields { target, descriptor } => {
                if descriptor.is_empty() {
                    return Err(CommandError::NothingToRemove);
                }
                let person = target.resolve(model)?;
                let stripped = descriptor.apply(&person)?;
                model.set_person(&person, stripped.clone())?;
                model.update_predicate(PersonPredicate::All);
                Ok(CommandResult::new(format!(
                    "{MESSAGE_REMOVE_FIELDS_SUCCESS}: {stripped}"
                )))
            }
            Self::List => {
                model.update_predicate(PersonPredicate::All);
                Ok(CommandResult::new(MESSAGE_LIST_SUCCESS))
            }
            Self::Find(predicate) => {
                model.update_predicate(predicate.clone());
                let shown = model.filtered_persons().len();
                Ok(CommandResult::new(format!("{shown} persons listed!")))
            }
            Self::Undo => {
                model.undo()?;
                model.update_predicate(PersonPredicate::All);
                Ok(CommandResult::new(MESSAGE_UNDO_SUCCESS))
            }
            Self::Redo => {
                model.redo()?;
                model.update_predicate(PersonPredicate::All);
                Ok(CommandResult::new(MESSAGE_REDO_SUCCESS))
            }
            Self::Clear => {
                model.set_persons(Vec::new())?;
                model.update_predicate(PersonPredicate::All);
                Ok(CommandResult::new(MESSAGE_CLEAR_SUCCESS))
            }
            Self::Exit => Ok(CommandResult::exit(MESSAGE_EXIT)),
        }
    }
}
