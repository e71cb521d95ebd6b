//! Validated value types for person sub-fields.
//!
//! # Responsibility
//! - Own the validation rule of every person sub-field.
//! - Reject invalid raw input at construction instead of storing it.
//!
//! # Invariants
//! - A constructed field value always satisfies its `is_valid` predicate.
//! - Deserialization goes through the same validation as `parse`.
//! - `Language` and `Tag` render bracketed but compare by raw token.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{N}][\p{L}\p{N} ]*$").expect("valid name regex"));
static PROFILE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]+(-[A-Za-z0-9]+)*$").expect("valid profile regex")
});
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3,}$").expect("valid phone regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9]+([+_.\-][A-Za-z0-9]+)*@([A-Za-z0-9]+(-[A-Za-z0-9]+)*\.)*[A-Za-z0-9]([A-Za-z0-9]|-[A-Za-z0-9])*[A-Za-z0-9]$",
    )
    .expect("valid email regex")
});
static LANGUAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+#\-]*$").expect("valid language regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("valid tag regex"));

const PROFILE_MAX_CHARS: usize = 39;

pub const NAME_CONSTRAINTS: &str =
    "Names should only contain alphanumeric characters and spaces, and it should not be blank";
pub const PROFILE_CONSTRAINTS: &str = "Profiles should be valid GitHub usernames: at most 39 \
     alphanumeric characters or single hyphens, and cannot begin or end with a hyphen";
pub const PHONE_CONSTRAINTS: &str =
    "Phone numbers should only contain numbers, and it should be at least 3 digits long";
pub const EMAIL_CONSTRAINTS: &str = "Emails should be of the format local-part@domain. The \
     local-part contains alphanumeric segments joined by one of +_.-, and the domain is made of \
     dot-separated labels that start and end with alphanumerics, the last one at least 2 \
     characters long";
pub const ADDRESS_CONSTRAINTS: &str = "Addresses can take any values, and it should not be blank";
pub const LANGUAGE_CONSTRAINTS: &str = "Languages should start with a letter, followed by \
     alphanumeric characters or one of +-#";
pub const TAG_CONSTRAINTS: &str = "Tags names should be alphanumeric";

/// Validation failure for one person sub-field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidationError {
    /// Field name, e.g. `phone`.
    pub field: &'static str,
    /// Violated constraint in user-facing wording.
    pub message: &'static str,
}

impl FieldValidationError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl Display for FieldValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for FieldValidationError {}

macro_rules! validated_field {
    ($(#[$meta:meta])* $ty:ident, $field:literal, $constraints:ident, $check:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $ty(String);

        impl $ty {
            /// Stable field name used in validation errors.
            pub const FIELD: &'static str = $field;

            /// Returns whether `raw` satisfies this field's constraint.
            pub fn is_valid(raw: &str) -> bool {
                let check: fn(&str) -> bool = $check;
                check(raw)
            }

            /// Validates `raw` and wraps it.
            pub fn parse(raw: impl Into<String>) -> Result<Self, FieldValidationError> {
                let raw = raw.into();
                if Self::is_valid(&raw) {
                    Ok(Self(raw))
                } else {
                    Err(FieldValidationError::new(Self::FIELD, $constraints))
                }
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl TryFrom<String> for $ty {
            type Error = FieldValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }
    };
}

validated_field!(
    /// Person display name.
    Name,
    "name",
    NAME_CONSTRAINTS,
    |raw| NAME_RE.is_match(raw)
);

validated_field!(
    /// GitHub profile handle.
    Profile,
    "profile",
    PROFILE_CONSTRAINTS,
    |raw| raw.len() <= PROFILE_MAX_CHARS && PROFILE_RE.is_match(raw)
);

validated_field!(
    /// Phone number (digits only).
    Phone,
    "phone",
    PHONE_CONSTRAINTS,
    |raw| PHONE_RE.is_match(raw)
);

validated_field!(Email, "email", EMAIL_CONSTRAINTS, |raw| EMAIL_RE.is_match(raw));

validated_field!(
    /// Free-form postal address; only blank values are rejected.
    Address,
    "address",
    ADDRESS_CONSTRAINTS,
    |raw| raw.chars().next().is_some_and(|first| !first.is_whitespace())
);

validated_field!(
    /// Programming language token, e.g. `C++` or `Python`.
    Language,
    "language",
    LANGUAGE_CONSTRAINTS,
    |raw| LANGUAGE_RE.is_match(raw)
);

validated_field!(Tag, "tag", TAG_CONSTRAINTS, |raw| TAG_RE.is_match(raw));

impl Profile {
    /// GitHub handles are case-insensitive.
    pub fn eq_ignore_case(&self, other: &Profile) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

macro_rules! plain_display {
    ($($ty:ident),*) => {
        $(impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        })*
    };
}

plain_display!(Name, Profile, Phone, Email, Address);

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Address, Email, Language, Name, Phone, Profile, Tag};

    #[test]
    fn name_rules() {
        assert!(Name::is_valid("Amy Bee"));
        assert!(Name::is_valid("Capital Tan 2nd"));
        assert!(!Name::is_valid(""));
        assert!(!Name::is_valid(" leading"));
        assert!(!Name::is_valid("James&"));
    }

    #[test]
    fn profile_rules() {
        assert!(Profile::is_valid("amy-bee"));
        assert!(Profile::is_valid("x"));
        assert!(!Profile::is_valid("james^"));
        assert!(!Profile::is_valid("-amy"));
        assert!(!Profile::is_valid("amy-"));
        assert!(!Profile::is_valid("amy--bee"));
        assert!(!Profile::is_valid(&"a".repeat(40)));
        assert!(Profile::is_valid(&"a".repeat(39)));
    }

    #[test]
    fn phone_rules() {
        assert!(Phone::is_valid("911"));
        assert!(Phone::is_valid("11111111"));
        assert!(!Phone::is_valid("91"));
        assert!(!Phone::is_valid("911a"));
        assert!(!Phone::is_valid("9011 1234"));
    }

    #[test]
    fn email_rules() {
        assert!(Email::is_valid("amy@example.com"));
        assert!(Email::is_valid("a+b_c.d-e@mail-server.example.org"));
        assert!(Email::is_valid("peter_jack@very-very-very-long-example.com"));
        assert!(!Email::is_valid("bob!yahoo"));
        assert!(!Email::is_valid("@example.com"));
        assert!(!Email::is_valid("amy@example.c"));
        assert!(!Email::is_valid("amy..bee@example.com"));
        assert!(!Email::is_valid("amy@-example.com"));
        assert!(!Email::is_valid("amy@example.com-"));
    }

    #[test]
    fn address_rules() {
        assert!(Address::is_valid("Block 312, Amy Street 1"));
        assert!(Address::is_valid("-"));
        assert!(!Address::is_valid(""));
        assert!(!Address::is_valid(" "));
    }

    #[test]
    fn language_rules() {
        for valid in ["C", "Python", "C--", "C++", "C#", "X10", "abc-10"] {
            assert!(Language::is_valid(valid), "{valid} should be valid");
        }
        for invalid in ["", " ", "^", "1", "-", "+", "#", "C^"] {
            assert!(!Language::is_valid(invalid), "{invalid} should be invalid");
        }
    }

    #[test]
    fn tag_rules() {
        assert!(Tag::is_valid("friend"));
        assert!(!Tag::is_valid("hubby*"));
        assert!(!Tag::is_valid(""));
    }

    #[test]
    fn parse_error_names_field_and_constraint() {
        let err = Phone::parse("911a").unwrap_err();
        assert_eq!(err.field, "phone");
        assert_eq!(err.message, super::PHONE_CONSTRAINTS);
        assert_eq!(err.to_string(), super::PHONE_CONSTRAINTS);
    }

    #[test]
    fn language_and_tag_render_bracketed() {
        assert_eq!(Language::parse("Python").unwrap().to_string(), "[Python]");
        assert_eq!(Tag::parse("friend").unwrap().to_string(), "[friend]");
        assert_eq!(Language::parse("Python").unwrap().as_str(), "Python");
    }

    #[test]
    fn profile_comparison_ignores_case() {
        let lower = Profile::parse("amy-bee").unwrap();
        let upper = Profile::parse("Amy-Bee").unwrap();
        assert!(lower.eq_ignore_case(&upper));
        assert_ne!(lower, upper);
    }
}
