#![allow(dead_code)]

use socket_core::{Person, PersonDraft};

pub fn amy() -> Person {
    PersonDraft {
        phone: Some("11111111".to_string()),
        email: Some("amy@example.com".to_string()),
        address: Some("Block 312, Amy Street 1".to_string()),
        ..PersonDraft::new("Amy Bee", "amy-bee")
    }
    .build()
    .unwrap()
}

pub fn bob() -> Person {
    PersonDraft {
        phone: Some("22222222".to_string()),
        email: Some("bob@example.com".to_string()),
        address: Some("Block 123, Bobby Street 3".to_string()),
        languages: vec!["C++".to_string()],
        tags: vec!["husband".to_string(), "friend".to_string()],
        ..PersonDraft::new("Bob Choo", "bob-choo")
    }
    .build()
    .unwrap()
}

pub fn person(name: &str, profile: &str) -> Person {
    PersonDraft::new(name, profile).build().unwrap()
}

pub fn living_at(name: &str, profile: &str, address: &str) -> Person {
    PersonDraft {
        address: Some(address.to_string()),
        ..PersonDraft::new(name, profile)
    }
    .build()
    .unwrap()
}
