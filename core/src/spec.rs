//! Argument declarations and option-name classification.
//!
//! An [`ArgumentSpec`] describes one bindable option: its short and long
//! names, help text, and [`ValuePolicy`]. Specs are plain data; pairing them
//! with a target field happens in [`crate::registry`].

use serde::{Deserialize, Serialize};

use crate::error::ParsingError;

/// Rule governing whether an option may or must appear, and whether it may
/// or must carry a value.
///
/// # Examples
///
/// ```
/// use argbind_core::ValuePolicy;
///
/// assert!(ValuePolicy::RequiredValue.is_required());
/// assert!(ValuePolicy::OptionalValue.wants_value());
/// assert!(!ValuePolicy::FlagWithOptionalValue.wants_value());
/// assert!(!ValuePolicy::Flag.accepts_value());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValuePolicy {
    /// No value ever; presence means `true`.
    Flag,
    /// Presence alone is legal; a value, if given, is accepted too.
    FlagWithOptionalValue,
    /// May be omitted entirely; if present, a value is mandatory.
    OptionalValue,
    /// Must be present and must carry a value.
    RequiredValue,
}

impl ValuePolicy {
    /// Whether an occurrence of the option must carry a value.
    pub fn wants_value(self) -> bool {
        matches!(self, Self::OptionalValue | Self::RequiredValue)
    }

    /// Whether an occurrence of the option may carry a value.
    pub fn accepts_value(self) -> bool {
        !matches!(self, Self::Flag)
    }

    /// Whether the option must appear at all.
    pub fn is_required(self) -> bool {
        matches!(self, Self::RequiredValue)
    }
}

/// Declarative description of one bindable command-line option.
///
/// Identity is the `(short_name, long_name)` pair. Names are stored without
/// their dash prefixes.
///
/// # Examples
///
/// ```
/// use argbind_core::{ArgumentSpec, ValuePolicy};
///
/// let spec = ArgumentSpec::required_value('r', "required")
///     .with_help("this is required");
/// assert_eq!(spec.value_policy, ValuePolicy::RequiredValue);
/// assert!(spec.matches("--Required").unwrap());
/// assert!(spec.matches("-R").unwrap());
/// assert!(!spec.matches("--other").unwrap());
/// assert!(spec.matches("-rq").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArgumentSpec {
    /// Single-character name, used as `-x`.
    pub short_name: char,
    /// Long name, used as `--name`.
    pub long_name: String,
    /// Free-text help shown in the usage table.
    #[serde(default)]
    pub help: String,
    /// Presence/value rule.
    pub value_policy: ValuePolicy,
}

impl ArgumentSpec {
    /// Creates a spec with empty help text.
    pub fn new(short_name: char, long_name: &str, value_policy: ValuePolicy) -> Self {
        Self {
            short_name,
            long_name: long_name.to_string(),
            help: String::new(),
            value_policy,
        }
    }

    /// Creates a [`ValuePolicy::Flag`] spec.
    pub fn flag(short_name: char, long_name: &str) -> Self {
        Self::new(short_name, long_name, ValuePolicy::Flag)
    }

    /// Creates a [`ValuePolicy::FlagWithOptionalValue`] spec.
    pub fn flag_with_optional_value(short_name: char, long_name: &str) -> Self {
        Self::new(short_name, long_name, ValuePolicy::FlagWithOptionalValue)
    }

    /// Creates a [`ValuePolicy::OptionalValue`] spec.
    pub fn optional_value(short_name: char, long_name: &str) -> Self {
        Self::new(short_name, long_name, ValuePolicy::OptionalValue)
    }

    /// Creates a [`ValuePolicy::RequiredValue`] spec.
    pub fn required_value(short_name: char, long_name: &str) -> Self {
        Self::new(short_name, long_name, ValuePolicy::RequiredValue)
    }

    /// Sets the help text.
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    /// Checks whether a raw option token names this spec.
    ///
    /// The token must not carry an inline value. `-`, `--` and `/` prefixes
    /// are all recognized here; long names and short names compare
    /// case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`ParsingError::CombinedShortOptions`] for tokens such as
    /// `-ab`.
    pub fn matches(&self, token: &str) -> Result<bool, ParsingError> {
        Ok(OptionName::parse(token, true)?.is_some_and(|name| self.matches_name(&name)))
    }

    /// Checks whether an already classified option name refers to this spec.
    pub fn matches_name(&self, name: &OptionName) -> bool {
        match name {
            OptionName::Short(c) => c.to_lowercase().eq(self.short_name.to_lowercase()),
            OptionName::Long(long) => eq_ignore_case(long, &self.long_name),
        }
    }
}

/// The name part of an option token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionName {
    /// `-x` (or `/x`).
    Short(char),
    /// `--name` (or `-/name`, `/-name`, `//name`).
    Long(String),
}

impl OptionName {
    /// Classifies the name part of a token (everything before any inline
    /// value separator).
    ///
    /// Returns `Ok(None)` for tokens that are not option-shaped: positionals,
    /// a lone `-`, and the bare terminator `--`.
    ///
    /// # Errors
    ///
    /// A single prefix followed by more than one character is a bundle of
    /// short options, which is rejected.
    pub fn parse(token: &str, slash_prefix: bool) -> Result<Option<Self>, ParsingError> {
        let is_prefix = |c: char| c == '-' || (slash_prefix && c == '/');

        let mut chars = token.chars();
        match chars.next() {
            Some(first) if is_prefix(first) => {}
            _ => return Ok(None),
        }

        let rest = chars.as_str();
        let mut rest_chars = rest.chars();
        let Some(second) = rest_chars.next() else {
            return Ok(None);
        };

        if is_prefix(second) {
            let long = rest_chars.as_str();
            if long.is_empty() {
                return Ok(None);
            }
            return Ok(Some(Self::Long(long.to_string())));
        }

        if rest_chars.as_str().is_empty() {
            Ok(Some(Self::Short(second)))
        } else {
            Err(ParsingError::CombinedShortOptions {
                token: token.to_string(),
            })
        }
    }
}

pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
