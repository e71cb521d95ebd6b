//! Snapshot-based undo/redo over `PersonStore`.
//!
//! # Responsibility
//! - Record one immutable snapshot per committed mutation.
//! - Step the live store backward/forward through recorded snapshots.
//!
//! # Invariants
//! - `snapshots` is never empty and `cursor < snapshots.len()`.
//! - Snapshots after `cursor` are redo-reachable; `commit` discards them.
//! - Restoring replaces the whole store through `set_all`, never field by
//!   field.

use crate::model::person::Person;
use crate::store::person_store::{PersonStore, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type HistoryResult<T> = Result<T, HistoryError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    /// Cursor already at the oldest snapshot.
    NoPreviousState,
    /// Cursor already at the newest snapshot.
    NoNextState,
    /// Snapshot could not be restored into the store.
    Store(StoreError),
}

impl Display for HistoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPreviousState => write!(f, "No more commands to undo!"),
            Self::NoNextState => write!(f, "No more commands to redo!"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HistoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for HistoryError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Immutable, shareable copy of the store's ordered sequence.
pub type Snapshot = Arc<[Person]>;

/// Person store plus its version history.
#[derive(Debug, Clone)]
pub struct VersionedStore {
    store: PersonStore,
    snapshots: Vec<Snapshot>,
    cursor: usize,
}

impl VersionedStore {
    /// Starts history with the current content of `store` as version 0.
    pub fn new(store: PersonStore) -> Self {
        let initial = snapshot_of(&store);
        Self {
            store,
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    /// Read access to the live store.
    pub fn store(&self) -> &PersonStore {
        &self.store
    }

    /// Write access to the live store.
    ///
    /// Mutations are not versioned until `commit` is called.
    pub fn store_mut(&mut self) -> &mut PersonStore {
        &mut self.store
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn version_count(&self) -> usize {
        self.snapshots.len()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Snapshot at the cursor.
    pub fn current_snapshot(&self) -> &Snapshot {
        &self.snapshots[self.cursor]
    }

    /// Records the live store as the newest version.
    ///
    /// Any redo-reachable snapshots are discarded first.
    pub fn commit(&mut self) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot_of(&self.store));
        self.cursor += 1;
    }

    /// Restores the previous version.
    pub fn undo(&mut self) -> HistoryResult<()> {
        if !self.can_undo() {
            return Err(HistoryError::NoPreviousState);
        }
        self.restore(self.cursor - 1)
    }

    /// Restores the next version.
    pub fn redo(&mut self) -> HistoryResult<()> {
        if !self.can_redo() {
            return Err(HistoryError::NoNextState);
        }
        self.restore(self.cursor + 1)
    }

    fn restore(&mut self, target: usize) -> HistoryResult<()> {
        let persons = self.snapshots[target].to_vec();
        self.store.set_all(persons)?;
        self.cursor = target;
        Ok(())
    }
}

fn snapshot_of(store: &PersonStore) -> Snapshot {
    Arc::from(store.persons())
}

#[cfg(test)]
mod tests {
    use super::{HistoryError, VersionedStore};
    use crate::model::person::PersonDraft;
    use crate::store::person_store::PersonStore;

    #[test]
    fn starts_with_single_version_and_no_moves() {
        let mut history = VersionedStore::new(PersonStore::default());
        assert_eq!(history.version_count(), 1);
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.undo().unwrap_err(), HistoryError::NoPreviousState);
        assert_eq!(history.redo().unwrap_err(), HistoryError::NoNextState);
    }

    #[test]
    fn commit_after_undo_truncates_redo_branch() {
        let mut history = VersionedStore::new(PersonStore::default());
        for (name, profile) in [("Amy", "amy"), ("Bob", "bob"), ("Cat", "cat")] {
            let person = PersonDraft::new(name, profile).build().unwrap();
            history.store_mut().add(person).unwrap();
            history.commit();
        }
        assert_eq!(history.version_count(), 4);

        history.undo().unwrap();
        history.undo().unwrap();
        assert_eq!(history.cursor(), 1);
        assert!(history.can_redo());

        let dan = PersonDraft::new("Dan", "dan").build().unwrap();
        history.store_mut().add(dan).unwrap();
        history.commit();

        assert_eq!(history.version_count(), 3);
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.redo().unwrap_err(), HistoryError::NoNextState);
        let names: Vec<_> = history
            .store()
            .persons()
            .iter()
            .map(|person| person.name().as_str().to_string())
            .collect();
        assert_eq!(names, vec!["Amy", "Dan"]);
    }
}
