//! Value-policy validation.
//!
//! Checks every member's occurrences against its [`ValuePolicy`] and reports
//! all violations at once.

use crate::error::{InvalidArgument, ValidationError, Violation};
use crate::matcher::Occurrence;
use crate::registry::Registry;
use crate::spec::ValuePolicy;

/// Checks one member's occurrences against its policy.
///
/// An explicit empty value counts as a value.
///
/// # Examples
///
/// ```
/// use argbind_core::{check_policy, Occurrence, ValuePolicy, Violation};
///
/// let bare = Occurrence { value: None, raw: "--name".into() };
/// let empty = Occurrence { value: Some(String::new()), raw: "--name=".into() };
///
/// assert_eq!(check_policy(ValuePolicy::RequiredValue, &[]), Some(Violation::Missing));
/// assert_eq!(check_policy(ValuePolicy::RequiredValue, &[bare]), Some(Violation::MissingValue));
/// assert_eq!(check_policy(ValuePolicy::RequiredValue, &[empty.clone()]), None);
/// assert_eq!(check_policy(ValuePolicy::Flag, &[empty]), Some(Violation::UnexpectedValue));
/// ```
pub fn check_policy(policy: ValuePolicy, occurrences: &[Occurrence]) -> Option<Violation> {
    if occurrences.len() > 1 {
        return Some(Violation::Repeated);
    }

    let value = occurrences.first().map(|occurrence| occurrence.value.is_some());
    match (policy, value) {
        (ValuePolicy::RequiredValue, None) => Some(Violation::Missing),
        (ValuePolicy::RequiredValue | ValuePolicy::OptionalValue, Some(false)) => {
            Some(Violation::MissingValue)
        }
        (ValuePolicy::Flag, Some(true)) => Some(Violation::UnexpectedValue),
        _ => None,
    }
}

/// Validates all members of `registry`.
///
/// `occurrences` is indexed like [`Registry::members`].
///
/// # Errors
///
/// Returns a [`ValidationError`] listing every invalid member in declaration
/// order.
pub fn validate<T>(
    registry: &Registry<T>,
    occurrences: &[Vec<Occurrence>],
) -> Result<(), ValidationError> {
    let invalid: Vec<InvalidArgument> = registry
        .members()
        .iter()
        .zip(occurrences)
        .filter_map(|(member, found)| {
            check_policy(member.spec().value_policy, found).map(|violation| InvalidArgument {
                spec: member.spec().clone(),
                violation,
            })
        })
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { invalid })
    }
}
