//! Identity equivalence policies.
//!
//! # Responsibility
//! - Decide when two persons are "the same person" for duplicate detection
//!   and target lookup.
//! - Keep this decision separate from full value equality.
//!
//! # Invariants
//! - A policy must be reflexive and symmetric.
//! - The store holds exactly one policy for its lifetime.

use crate::model::person::Person;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// Pluggable identity comparison.
pub trait IdentityPolicy: Send + Sync + Debug {
    /// Stable id used in configuration and logs.
    fn policy_id(&self) -> &'static str;
    fn same_identity(&self, left: &Person, right: &Person) -> bool;
}

/// Same GitHub profile, compared case-insensitively.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileIdentity;

impl IdentityPolicy for ProfileIdentity {
    fn policy_id(&self) -> &'static str {
        IDENTITY_POLICY_PROFILE
    }

    fn same_identity(&self, left: &Person, right: &Person) -> bool {
        left.profile().eq_ignore_case(right.profile())
    }
}

/// Same name.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameIdentity;

impl IdentityPolicy for NameIdentity {
    fn policy_id(&self) -> &'static str {
        IDENTITY_POLICY_NAME
    }

    fn same_identity(&self, left: &Person, right: &Person) -> bool {
        left.name() == right.name()
    }
}

/// Same name, phone and email.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactIdentity;

impl IdentityPolicy for ContactIdentity {
    fn policy_id(&self) -> &'static str {
        IDENTITY_POLICY_CONTACT
    }

    fn same_identity(&self, left: &Person, right: &Person) -> bool {
        left.name() == right.name() && left.phone() == right.phone() && left.email() == right.email()
    }
}

pub const IDENTITY_POLICY_PROFILE: &str = "profile";
pub const IDENTITY_POLICY_NAME: &str = "name";
pub const IDENTITY_POLICY_CONTACT: &str = "contact";

/// Returns the policy used when configuration does not choose one.
pub fn default_identity_policy() -> Arc<dyn IdentityPolicy> {
    Arc::new(ProfileIdentity)
}

/// Resolves a built-in policy from its configuration id.
pub fn parse_identity_policy(value: &str) -> Result<Arc<dyn IdentityPolicy>, IdentityPolicyError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Err(IdentityPolicyError::EmptyPolicy),
        IDENTITY_POLICY_PROFILE => Ok(Arc::new(ProfileIdentity)),
        IDENTITY_POLICY_NAME => Ok(Arc::new(NameIdentity)),
        IDENTITY_POLICY_CONTACT => Ok(Arc::new(ContactIdentity)),
        other => Err(IdentityPolicyError::UnsupportedPolicy(other.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityPolicyError {
    EmptyPolicy,
    UnsupportedPolicy(String),
}

impl Display for IdentityPolicyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPolicy => write!(f, "identity policy must not be empty"),
            Self::UnsupportedPolicy(value) => write!(
                f,
                "identity policy `{value}` is unsupported; expected profile|name|contact"
            ),
        }
    }
}

impl Error for IdentityPolicyError {}

#[cfg(test)]
mod tests {
    use super::{parse_identity_policy, IdentityPolicyError};
    use crate::model::person::PersonDraft;

    #[test]
    fn parses_builtin_policies() {
        assert_eq!(parse_identity_policy(" Profile ").unwrap().policy_id(), "profile");
        assert_eq!(parse_identity_policy("name").unwrap().policy_id(), "name");
        assert_eq!(parse_identity_policy("CONTACT").unwrap().policy_id(), "contact");
        assert_eq!(
            parse_identity_policy("email").unwrap_err(),
            IdentityPolicyError::UnsupportedPolicy("email".to_string())
        );
        assert_eq!(
            parse_identity_policy("  ").unwrap_err(),
            IdentityPolicyError::EmptyPolicy
        );
    }

    #[test]
    fn policies_compare_different_field_subsets() {
        let amy = PersonDraft {
            phone: Some("11111111".to_string()),
            ..PersonDraft::new("Amy Bee", "amy-bee")
        }
        .build()
        .unwrap();
        let same_profile_other_name = PersonDraft::new("Amy Tan", "AMY-BEE").build().unwrap();
        let same_name_other_phone = PersonDraft {
            phone: Some("22222222".to_string()),
            ..PersonDraft::new("Amy Bee", "someone-else")
        }
        .build()
        .unwrap();

        let profile = parse_identity_policy("profile").unwrap();
        let name = parse_identity_policy("name").unwrap();
        let contact = parse_identity_policy("contact").unwrap();

        assert!(profile.same_identity(&amy, &same_profile_other_name));
        assert!(!name.same_identity(&amy, &same_profile_other_name));

        assert!(name.same_identity(&amy, &same_name_other_phone));
        assert!(!contact.same_identity(&amy, &same_name_other_phone));
        assert!(contact.same_identity(&amy, &amy.clone()));
    }
}
