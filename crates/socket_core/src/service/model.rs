//! Session model: versioned store, view predicate and change listeners.
//!
//! # Responsibility
//! - Be the single writer over the session's `VersionedStore`.
//! - Expose the filtered person view as a borrowed, live projection.
//! - Notify subscribers after every observable change.
//!
//! # Invariants
//! - Listeners are only called after a change actually happened; failed
//!   operations emit nothing.
//! - The filtered view never copies the store; it is recomputed on read.
//! - `rollback` restores the redo tail too, not just the live store.

use crate::model::person::Person;
use crate::model::predicate::PersonPredicate;
use crate::store::person_store::{PersonStore, StoreResult};
use crate::store::versioned_store::{HistoryResult, VersionedStore};
use std::fmt::{Debug, Formatter};

/// Observable model change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEvent {
    /// Store content changed (mutation, undo or redo).
    PersonsChanged,
    /// View predicate changed.
    FilterChanged,
}

/// Handle returned by `Model::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(ModelEvent)>;

/// Model state captured before a command so it can be restored wholesale.
#[derive(Debug, Clone)]
pub(crate) struct Checkpoint {
    history: VersionedStore,
    predicate: PersonPredicate,
}

pub struct Model {
    history: VersionedStore,
    predicate: PersonPredicate,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl Debug for Model {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("history", &self.history)
            .field("predicate", &self.predicate)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Model {
    /// Creates a model whose history starts at `store`.
    pub fn new(store: PersonStore) -> Self {
        Self {
            history: VersionedStore::new(store),
            predicate: PersonPredicate::All,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn store(&self) -> &PersonStore {
        self.history.store()
    }

    pub fn history(&self) -> &VersionedStore {
        &self.history
    }

    pub fn predicate(&self) -> &PersonPredicate {
        &self.predicate
    }

    /// Live view of the store under the current predicate.
    pub fn filtered_persons(&self) -> FilteredView<'_> {
        FilteredView {
            persons: self.history.store().persons(),
            predicate: &self.predicate,
        }
    }

    pub fn add_person(&mut self, person: Person) -> StoreResult<()> {
        self.history.store_mut().add(person)?;
        self.notify(ModelEvent::PersonsChanged);
        Ok(())
    }

    pub fn remove_person(&mut self, person: &Person) -> StoreResult<Person> {
        let removed = self.history.store_mut().remove(person)?;
        self.notify(ModelEvent::PersonsChanged);
        Ok(removed)
    }

    pub fn set_person(&mut self, target: &Person, edited: Person) -> StoreResult<()> {
        self.history.store_mut().set_person(target, edited)?;
        self.notify(ModelEvent::PersonsChanged);
        Ok(())
    }

    pub fn set_persons(&mut self, persons: Vec<Person>) -> StoreResult<()> {
        self.history.store_mut().set_all(persons)?;
        self.notify(ModelEvent::PersonsChanged);
        Ok(())
    }

    /// Records the current store content as a new version.
    pub fn commit(&mut self) {
        self.history.commit();
    }

    pub fn undo(&mut self) -> HistoryResult<()> {
        self.history.undo()?;
        self.notify(ModelEvent::PersonsChanged);
        Ok(())
    }

    pub fn redo(&mut self) -> HistoryResult<()> {
        self.history.redo()?;
        self.notify(ModelEvent::PersonsChanged);
        Ok(())
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            history: self.history.clone(),
            predicate: self.predicate.clone(),
        }
    }

    /// Restores store, history and predicate exactly as captured.
    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
        let filter_changed = self.predicate != checkpoint.predicate;
        self.history = checkpoint.history;
        self.predicate = checkpoint.predicate;
        self.notify(ModelEvent::PersonsChanged);
        if filter_changed {
            self.notify(ModelEvent::FilterChanged);
        }
    }

    /// Replaces the view predicate.
    pub fn update_predicate(&mut self, predicate: PersonPredicate) {
        self.predicate = predicate;
        self.notify(ModelEvent::FilterChanged);
    }

    /// Registers a change listener.
    ///
    /// Listeners run synchronously on the writer thread, after the change.
    pub fn subscribe(&mut self, listener: impl FnMut(ModelEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` for unknown ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, event: ModelEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }
}

/// Borrowed projection of the store under a predicate.
#[derive(Debug, Clone, Copy)]
pub struct FilteredView<'a> {
    persons: &'a [Person],
    predicate: &'a PersonPredicate,
}

impl<'a> FilteredView<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a Person> + 'a {
        let predicate = self.predicate;
        self.persons
            .iter()
            .filter(move |person| predicate.test(person))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Person at zero-based `index` within the view.
    pub fn get(&self, index: usize) -> Option<&'a Person> {
        self.iter().nth(index)
    }

    pub fn to_vec(&self) -> Vec<Person> {
        self.iter().cloned().collect()
    }
}
