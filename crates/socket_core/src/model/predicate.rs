//! Filter predicates for the person list view.
//!
//! # Invariants
//! - Keyword matching is case-insensitive.
//! - Name/address keywords match whole whitespace-separated words.
//! - A `FindKeywords` with no keywords at all matches nobody.

use crate::model::person::Person;

/// Predicate applied by the filtered person view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PersonPredicate {
    /// Shows every person.
    #[default]
    All,
    /// Shows persons matching any of the keywords.
    Keywords(FindKeywords),
}

impl PersonPredicate {
    pub fn test(&self, person: &Person) -> bool {
        match self {
            Self::All => true,
            Self::Keywords(keywords) => keywords.matches(person),
        }
    }
}

/// Per-field keyword lists for `find`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindKeywords {
    pub name: Vec<String>,
    pub profile: Vec<String>,
    pub phone: Vec<String>,
    pub email: Vec<String>,
    pub address: Vec<String>,
    pub languages: Vec<String>,
    pub tags: Vec<String>,
}

impl FindKeywords {
    /// Keywords matched against the name only.
    pub fn name<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: keywords.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Keywords matched against the address only.
    pub fn address<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            address: keywords.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.profile.is_empty()
            && self.phone.is_empty()
            && self.email.is_empty()
            && self.address.is_empty()
            && self.languages.is_empty()
            && self.tags.is_empty()
    }

    pub fn matches(&self, person: &Person) -> bool {
        any_word(&self.name, person.name().as_str())
            || any_whole(&self.profile, Some(person.profile().as_str()))
            || any_whole(&self.phone, person.phone().map(|phone| phone.as_str()))
            || any_whole(&self.email, person.email().map(|email| email.as_str()))
            || person
                .address()
                .is_some_and(|address| any_word(&self.address, address.as_str()))
            || person
                .languages()
                .iter()
                .any(|language| any_whole(&self.languages, Some(language.as_str())))
            || person
                .tags()
                .iter()
                .any(|tag| any_whole(&self.tags, Some(tag.as_str())))
    }
}

fn any_word(keywords: &[String], sentence: &str) -> bool {
    keywords
        .iter()
        .map(|keyword| keyword.trim())
        .filter(|keyword| !keyword.is_empty())
        .any(|keyword| {
            sentence
                .split_whitespace()
                .any(|word| word.eq_ignore_ascii_case(keyword))
        })
}

fn any_whole(keywords: &[String], value: Option<&str>) -> bool {
    let Some(value) = value else {
        return false;
    };
    keywords
        .iter()
        .map(|keyword| keyword.trim())
        .any(|keyword| !keyword.is_empty() && value.eq_ignore_ascii_case(keyword))
}
