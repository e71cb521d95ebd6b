//! Person record.
//!
//! # Responsibility
//! - Define the immutable person value stored by `PersonStore`.
//! - Provide a raw-input draft that validates every field in one place.
//!
//! # Invariants
//! - Every field of a `Person` has passed its validator.
//! - A `Person` is never mutated in place; `with_*` builders consume and
//!   return a new value.
//! - `PartialEq` is full value equality, with language/tag sets compared as
//!   sets. Identity equivalence lives in `model::identity`.

use crate::model::field::{
    Address, Email, FieldValidationError, Language, Name, Phone, Profile, Tag,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    name: Name,
    profile: Profile,
    #[serde(default)]
    phone: Option<Phone>,
    #[serde(default)]
    email: Option<Email>,
    #[serde(default)]
    address: Option<Address>,
    #[serde(default)]
    languages: BTreeSet<Language>,
    #[serde(default)]
    tags: BTreeSet<Tag>,
}

impl Person {
    /// Creates a person with only the mandatory fields set.
    pub fn new(name: Name, profile: Profile) -> Self {
        Self {
            name,
            profile,
            phone: None,
            email: None,
            address: None,
            languages: BTreeSet::new(),
            tags: BTreeSet::new(),
        }
    }

    pub fn with_name(self, name: Name) -> Self {
        Self { name, ..self }
    }

    pub fn with_profile(self, profile: Profile) -> Self {
        Self { profile, ..self }
    }

    pub fn with_phone(self, phone: Option<Phone>) -> Self {
        Self { phone, ..self }
    }

    pub fn with_email(self, email: Option<Email>) -> Self {
        Self { email, ..self }
    }

    pub fn with_address(self, address: Option<Address>) -> Self {
        Self { address, ..self }
    }

    pub fn with_languages(self, languages: impl IntoIterator<Item = Language>) -> Self {
        Self {
            languages: languages.into_iter().collect(),
            ..self
        }
    }

    pub fn with_tags(self, tags: impl IntoIterator<Item = Tag>) -> Self {
        Self {
            tags: tags.into_iter().collect(),
            ..self
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn phone(&self) -> Option<&Phone> {
        self.phone.as_ref()
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    pub fn languages(&self) -> &BTreeSet<Language> {
        &self.languages
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    /// Full value equivalence, used for snapshot comparison.
    pub fn same_value(&self, other: &Person) -> bool {
        self == other
    }
}

impl Display for Person {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}; Profile: {}", self.name, self.profile)?;
        if let Some(phone) = &self.phone {
            write!(f, "; Phone: {phone}")?;
        }
        if let Some(email) = &self.email {
            write!(f, "; Email: {email}")?;
        }
        if let Some(address) = &self.address {
            write!(f, "; Address: {address}")?;
        }
        if !self.languages.is_empty() {
            f.write_str("; Languages: ")?;
            for language in &self.languages {
                write!(f, "{language}")?;
            }
        }
        if !self.tags.is_empty() {
            f.write_str("; Tags: ")?;
            for tag in &self.tags {
                write!(f, "{tag}")?;
            }
        }
        Ok(())
    }
}

/// Raw, unvalidated person input.
///
/// Used by text parsers and persistence adapters so that every raw string
/// goes through the same field validators before a `Person` exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonDraft {
    pub name: String,
    pub profile: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub languages: Vec<String>,
    pub tags: Vec<String>,
}

impl PersonDraft {
    pub fn new(name: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile: profile.into(),
            ..Self::default()
        }
    }

    /// Validates every field and builds the person.
    ///
    /// # Errors
    /// - Returns the first `FieldValidationError`, checked in declaration
    ///   order: name, profile, phone, email, address, languages, tags.
    pub fn build(&self) -> Result<Person, FieldValidationError> {
        let name = Name::parse(self.name.as_str())?;
        let profile = Profile::parse(self.profile.as_str())?;
        let phone = self.phone.as_deref().map(Phone::parse).transpose()?;
        let email = self.email.as_deref().map(Email::parse).transpose()?;
        let address = self.address.as_deref().map(Address::parse).transpose()?;
        let languages = self
            .languages
            .iter()
            .map(|raw| Language::parse(raw.as_str()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        let tags = self
            .tags
            .iter()
            .map(|raw| Tag::parse(raw.as_str()))
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Person::new(name, profile)
            .with_phone(phone)
            .with_email(email)
            .with_address(address)
            .with_languages(languages)
            .with_tags(tags))
    }
}

impl From<&Person> for PersonDraft {
    fn from(person: &Person) -> Self {
        Self {
            name: person.name.as_str().to_string(),
            profile: person.profile.as_str().to_string(),
            phone: person.phone.as_ref().map(|value| value.as_str().to_string()),
            email: person.email.as_ref().map(|value| value.as_str().to_string()),
            address: person.address.as_ref().map(|value| value.as_str().to_string()),
            languages: person
                .languages
                .iter()
                .map(|value| value.as_str().to_string())
                .collect(),
            tags: person
                .tags
                .iter()
                .map(|value| value.as_str().to_string())
                .collect(),
        }
    }
}
