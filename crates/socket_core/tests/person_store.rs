mod common;

use common::{amy, bob, person};
use socket_core::{ContactIdentity, PersonDraft, PersonStore, StoreError};
use std::sync::Arc;

#[test]
fn add_preserves_insertion_order() {
    let mut store = PersonStore::default();
    store.add(bob()).unwrap();
    store.add(amy()).unwrap();

    assert_eq!(store.persons(), &[bob(), amy()]);
    assert!(store.contains(&amy()));
}

#[test]
fn add_identity_duplicate_fails_and_leaves_store_unchanged() {
    let mut store = PersonStore::default();
    store.add(amy()).unwrap();
    let before = store.clone();

    let same_profile = person("Someone Else", "amy-bee");
    assert_eq!(store.add(same_profile).unwrap_err(), StoreError::DuplicatePerson);
    assert_eq!(store, before);
    assert_eq!(store.len(), 1);
}

#[test]
fn remove_missing_person_fails_and_leaves_store_unchanged() {
    let mut store = PersonStore::default();
    store.add(amy()).unwrap();
    let before = store.clone();

    assert_eq!(store.remove(&bob()).unwrap_err(), StoreError::PersonNotFound);
    assert_eq!(store, before);
}

#[test]
fn remove_matches_by_identity_not_full_value() {
    let mut store = PersonStore::default();
    store.add(amy()).unwrap();
    store.add(bob()).unwrap();

    let removed = store.remove(&person("Different Name", "AMY-BEE")).unwrap();
    assert_eq!(removed, amy());
    assert_eq!(store.persons(), &[bob()]);
}

#[test]
fn set_person_replaces_in_place() {
    let mut store = PersonStore::default();
    store.add(amy()).unwrap();
    store.add(bob()).unwrap();
    store.add(person("Carl Kurz", "carl")).unwrap();

    let edited = bob().with_tags(Vec::new());
    store.set_person(&bob(), edited.clone()).unwrap();

    assert_eq!(store.persons()[1], edited);
    assert_eq!(store.len(), 3);
}

#[test]
fn set_person_rejects_missing_target_and_collisions() {
    let mut store = PersonStore::default();
    store.add(amy()).unwrap();
    store.add(bob()).unwrap();
    let before = store.clone();

    assert_eq!(
        store
            .set_person(&person("Carl Kurz", "carl"), person("Carl", "carl"))
            .unwrap_err(),
        StoreError::PersonNotFound
    );
    assert_eq!(
        store
            .set_person(&amy(), person("Amy Bee", "bob-choo"))
            .unwrap_err(),
        StoreError::DuplicatePerson
    );
    assert_eq!(store, before);
}

#[test]
fn set_all_replaces_everything_or_nothing() {
    let mut store = PersonStore::default();
    store.add(amy()).unwrap();

    store.set_all(vec![bob(), person("Carl Kurz", "carl")]).unwrap();
    assert_eq!(store.persons(), &[bob(), person("Carl Kurz", "carl")]);

    let err = store.set_all(vec![amy(), amy()]).unwrap_err();
    assert_eq!(err, StoreError::DuplicatePerson);
    assert_eq!(store.persons(), &[bob(), person("Carl Kurz", "carl")]);
}

#[test]
fn contact_policy_allows_shared_profiles_with_different_contacts() {
    let mut store = PersonStore::new(Arc::new(ContactIdentity));
    store.add(amy()).unwrap();

    let same_name_new_phone = PersonDraft {
        phone: Some("33333333".to_string()),
        email: Some("amy@example.com".to_string()),
        ..PersonDraft::new("Amy Bee", "amy-bee")
    }
    .build()
    .unwrap();
    store.add(same_name_new_phone).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.identity_policy().policy_id(), "contact");
}

#[test]
fn with_persons_rejects_duplicate_seed() {
    let err = PersonStore::with_persons(
        socket_core::default_identity_policy(),
        vec![amy(), person("Amy Again", "amy-bee")],
    )
    .unwrap_err();
    assert_eq!(err, StoreError::DuplicatePerson);
}
