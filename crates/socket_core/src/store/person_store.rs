//! Ordered collection of unique persons.
//!
//! # Responsibility
//! - Own the current person sequence of a session.
//! - Enforce uniqueness under the configured identity policy.
//!
//! # Invariants
//! - No two stored persons are identity-equivalent.
//! - Insertion order is preserved; replacement keeps the position.
//! - Every operation validates before mutating, so a failed call leaves the
//!   sequence untouched.

use crate::model::identity::{default_identity_policy, IdentityPolicy};
use crate::model::person::Person;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type StoreResult<T> = Result<T, StoreError>;

/// Person store contract violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// An identity-equivalent person is already stored.
    DuplicatePerson,
    /// No identity-equivalent person is stored.
    PersonNotFound,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicatePerson => write!(f, "This person already exists in SoCket"),
            Self::PersonNotFound => write!(f, "This person does not exist in SoCket"),
        }
    }
}

impl Error for StoreError {}

/// Mutable person sequence with identity-based uniqueness.
#[derive(Debug, Clone)]
pub struct PersonStore {
    persons: Vec<Person>,
    identity: Arc<dyn IdentityPolicy>,
}

impl Default for PersonStore {
    fn default() -> Self {
        Self::new(default_identity_policy())
    }
}

impl PersonStore {
    /// Creates an empty store using `identity` for uniqueness checks.
    pub fn new(identity: Arc<dyn IdentityPolicy>) -> Self {
        Self {
            persons: Vec::new(),
            identity,
        }
    }

    /// Creates a store seeded with `persons`.
    ///
    /// # Errors
    /// - `DuplicatePerson` when the input holds two identity-equivalent entries.
    pub fn with_persons(
        identity: Arc<dyn IdentityPolicy>,
        persons: Vec<Person>,
    ) -> StoreResult<Self> {
        let mut store = Self::new(identity);
        store.set_all(persons)?;
        Ok(store)
    }

    pub fn identity_policy(&self) -> &Arc<dyn IdentityPolicy> {
        &self.identity
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// Returns whether an identity-equivalent person is stored.
    pub fn contains(&self, person: &Person) -> bool {
        self.position_of(person).is_some()
    }

    /// Appends `person`.
    pub fn add(&mut self, person: Person) -> StoreResult<()> {
        if self.contains(&person) {
            return Err(StoreError::DuplicatePerson);
        }
        self.persons.push(person);
        Ok(())
    }

    /// Removes the person identity-equivalent to `person` and returns it.
    pub fn remove(&mut self, person: &Person) -> StoreResult<Person> {
        let index = self.position_of(person).ok_or(StoreError::PersonNotFound)?;
        Ok(self.persons.remove(index))
    }

    /// Replaces `target` with `edited` at the same position.
    ///
    /// `edited` may stay identity-equivalent to `target`; it must not collide
    /// with any other stored person.
    pub fn set_person(&mut self, target: &Person, edited: Person) -> StoreResult<()> {
        let index = self.position_of(target).ok_or(StoreError::PersonNotFound)?;
        let collides = self
            .persons
            .iter()
            .enumerate()
            .any(|(other, stored)| other != index && self.identity.same_identity(stored, &edited));
        if collides {
            return Err(StoreError::DuplicatePerson);
        }
        self.persons[index] = edited;
        Ok(())
    }

    /// Replaces the whole sequence.
    pub fn set_all(&mut self, persons: Vec<Person>) -> StoreResult<()> {
        if !self.all_unique(&persons) {
            return Err(StoreError::DuplicatePerson);
        }
        self.persons = persons;
        Ok(())
    }

    fn position_of(&self, person: &Person) -> Option<usize> {
        self.persons
            .iter()
            .position(|stored| self.identity.same_identity(stored, person))
    }

    fn all_unique(&self, persons: &[Person]) -> bool {
        persons.iter().enumerate().all(|(index, person)| {
            persons[index + 1..]
                .iter()
                .all(|other| !self.identity.same_identity(person, other))
        })
    }
}

/// Stores compare by content; the identity policy is session configuration.
impl PartialEq for PersonStore {
    fn eq(&self, other: &Self) -> bool {
        self.persons == other.persons
    }
}
