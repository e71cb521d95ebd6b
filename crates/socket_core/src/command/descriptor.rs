//! Partial-update descriptors for `edit` and `remove` commands.
//!
//! # Invariants
//! - Applying a descriptor never mutates the source person; it returns a new
//!   value.
//! - Removal checks run before any field is dropped, so a mismatch yields no
//!   partially stripped person.

use crate::command::CommandError;
use crate::model::field::{Address, Email, Language, Name, Phone, Profile, Tag};
use crate::model::person::Person;
use std::collections::BTreeSet;

/// Fields to overwrite on an existing person.
///
/// `None` keeps the current value. Set fields are replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPersonDescriptor {
    pub name: Option<Name>,
    pub profile: Option<Profile>,
    pub phone: Option<Phone>,
    pub email: Option<Email>,
    pub address: Option<Address>,
    pub languages: Option<BTreeSet<Language>>,
    pub tags: Option<BTreeSet<Tag>>,
}

impl EditPersonDescriptor {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.profile.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.languages.is_none()
            && self.tags.is_none()
    }

    /// Builds the edited copy of `person`.
    pub fn apply(&self, person: &Person) -> Person {
        let mut edited = person.clone();
        if let Some(name) = &self.name {
            edited = edited.with_name(name.clone());
        }
        if let Some(profile) = &self.profile {
            edited = edited.with_profile(profile.clone());
        }
        if let Some(phone) = &self.phone {
            edited = edited.with_phone(Some(phone.clone()));
        }
        if let Some(email) = &self.email {
            edited = edited.with_email(Some(email.clone()));
        }
        if let Some(address) = &self.address {
            edited = edited.with_address(Some(address.clone()));
        }
        if let Some(languages) = &self.languages {
            edited = edited.with_languages(languages.iter().cloned());
        }
        if let Some(tags) = &self.tags {
            edited = edited.with_tags(tags.iter().cloned());
        }
        edited
    }
}

/// How one field is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal<T> {
    /// Remove whatever is present. For sets this clears the set.
    Any,
    /// Remove only if the current value matches. For sets every listed
    /// member must be present.
    Exact(T),
}

/// Fields to strip from an existing person.
///
/// Name and profile are mandatory and cannot be removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovePersonDescriptor {
    pub phone: Option<Removal<Phone>>,
    pub email: Option<Removal<Email>>,
    pub address: Option<Removal<Address>>,
    pub languages: Option<Removal<BTreeSet<Language>>>,
    pub tags: Option<Removal<BTreeSet<Tag>>>,
}

impl RemovePersonDescriptor {
    pub fn is_empty(&self) -> bool {
        self.phone.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.languages.is_none()
            && self.tags.is_none()
    }

    /// Builds the stripped copy of `person`.
    ///
    /// # Errors
    /// - `FieldMismatch` when a requested value is not present on `person`.
    pub fn apply(&self, person: &Person) -> Result<Person, CommandError> {
        check_single(Phone::FIELD, self.phone.as_ref(), person.phone())?;
        check_single(Email::FIELD, self.email.as_ref(), person.email())?;
        check_single(Address::FIELD, self.address.as_ref(), person.address())?;
        let languages = remaining(Language::FIELD, self.languages.as_ref(), person.languages())?;
        let tags = remaining(Tag::FIELD, self.tags.as_ref(), person.tags())?;

        let mut stripped = person.clone().with_languages(languages).with_tags(tags);
        if self.phone.is_some() {
            stripped = stripped.with_phone(None);
        }
        if self.email.is_some() {
            stripped = stripped.with_email(None);
        }
        if self.address.is_some() {
            stripped = stripped.with_address(None);
        }
        Ok(stripped)
    }
}

fn check_single<T: PartialEq>(
    field: &'static str,
    removal: Option<&Removal<T>>,
    current: Option<&T>,
) -> Result<(), CommandError> {
    match (removal, current) {
        (None, _) => Ok(()),
        (Some(Removal::Any), Some(_)) => Ok(()),
        (Some(Removal::Exact(expected)), Some(value)) if expected == value => Ok(()),
        _ => Err(CommandError::FieldMismatch { field }),
    }
}

fn remaining<T: Ord + Clone>(
    field: &'static str,
    removal: Option<&Removal<BTreeSet<T>>>,
    current: &BTreeSet<T>,
) -> Result<BTreeSet<T>, CommandError> {
    match removal {
        None => Ok(current.clone()),
        Some(Removal::Any) if current.is_empty() => Err(CommandError::FieldMismatch { field }),
        Some(Removal::Any) => Ok(BTreeSet::new()),
        Some(Removal::Exact(values)) => {
            if values.is_empty() || !values.is_subset(current) {
                return Err(CommandError::FieldMismatch { field });
            }
            Ok(current.difference(values).cloned().collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EditPersonDescriptor, Removal, RemovePersonDescriptor};
    use crate::command::CommandError;
    use crate::model::field::{Language, Phone};
    use crate::model::person::{Person, PersonDraft};
    use std::collections::BTreeSet;

    fn amy() -> Person {
        PersonDraft {
            phone: Some("11111111".to_string()),
            languages: vec!["Python".to_string(), "C++".to_string()],
            ..PersonDraft::new("Amy Bee", "amy-bee")
        }
        .build()
        .unwrap()
    }

    #[test]
    fn edit_overwrites_only_given_fields() {
        let descriptor = EditPersonDescriptor {
            phone: Some(Phone::parse("99999999").unwrap()),
            ..EditPersonDescriptor::default()
        };
        let edited = descriptor.apply(&amy());
        assert_eq!(edited.phone().unwrap().as_str(), "99999999");
        assert_eq!(edited.name(), amy().name());
        assert_eq!(edited.languages(), amy().languages());
        assert!(!descriptor.is_empty());
        assert!(EditPersonDescriptor::default().is_empty());
    }

    #[test]
    fn remove_exact_language_keeps_the_rest() {
        let descriptor = RemovePersonDescriptor {
            languages: Some(Removal::Exact(BTreeSet::from([
                Language::parse("C++").unwrap()
            ]))),
            ..RemovePersonDescriptor::default()
        };
        let stripped = descriptor.apply(&amy()).unwrap();
        let names: Vec<_> = stripped.languages().iter().map(|l| l.as_str()).collect();
        assert_eq!(names, vec!["Python"]);
    }

    #[test]
    fn remove_rejects_values_the_person_does_not_have() {
        let wrong_phone = RemovePersonDescriptor {
            phone: Some(Removal::Exact(Phone::parse("22222222").unwrap())),
            ..RemovePersonDescriptor::default()
        };
        assert_eq!(
            wrong_phone.apply(&amy()).unwrap_err(),
            CommandError::FieldMismatch { field: "phone" }
        );

        let missing_email = RemovePersonDescriptor {
            email: Some(Removal::Any),
            ..RemovePersonDescriptor::default()
        };
        assert_eq!(
            missing_email.apply(&amy()).unwrap_err(),
            CommandError::FieldMismatch { field: "email" }
        );
    }

    #[test]
    fn remove_any_clears_present_values() {
        let descriptor = RemovePersonDescriptor {
            phone: Some(Removal::Any),
            languages: Some(Removal::Any),
            ..RemovePersonDescriptor::default()
        };
        let stripped = descriptor.apply(&amy()).unwrap();
        assert!(stripped.phone().is_none());
        assert!(stripped.languages().is_empty());
    }
}
