//! Error types for argument binding.
//!
//! Each stage of a parse has its own error type so callers can tell a broken
//! declaration apart from a bad command line. [`CommandLineError`] unifies them
//! for the façade.

use std::fmt;

use thiserror::Error;

use crate::spec::ArgumentSpec;
use crate::value::ValueKind;

/// A registry could not be built from its declarations.
///
/// These are programming errors in the target type, not user input errors,
/// and are never converted into printed usage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Two members share a short name (compared case-insensitively).
    #[error("duplicate short option name: -{0}")]
    DuplicateShortName(char),
    /// Two members share a long name (compared case-insensitively).
    #[error("duplicate long option name: --{0}")]
    DuplicateLongName(String),
    /// A member was declared without a long name.
    #[error("long option name cannot be empty (short name -{0})")]
    EmptyLongName(char),
    /// Short names must be a single alphanumeric character.
    #[error("invalid short option name: {0:?}")]
    InvalidShortName(char),
    /// `-h` and `--help` always request the usage document, so no member can
    /// claim them.
    #[error("option name is reserved for help: {0}")]
    ReservedName(String),
    /// The member's type cannot carry the declared policy, or is unknown.
    #[error("unsupported member type for --{member}: {kind}")]
    UnsupportedType { member: String, kind: String },
}

/// The argument vector contains a token the grammar rejects outright.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsingError {
    /// `-ab` style tokens; bundling several short options is not supported.
    #[error("multiple short options in one token are not supported: {token}")]
    CombinedShortOptions { token: String },
    /// An option prefix followed directly by a value separator, e.g. `--=x`.
    #[error("option token has no name: {token}")]
    MissingName { token: String },
}

/// How a matched argument broke its value policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// A required option did not appear.
    Missing,
    /// The option appeared without the value its policy demands.
    MissingValue,
    /// A flag was given a value.
    UnexpectedValue,
    /// The option appeared more than once.
    Repeated,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Missing => "missing",
            Self::MissingValue => "missing value",
            Self::UnexpectedValue => "unexpected value",
            Self::Repeated => "given more than once",
        };
        f.write_str(text)
    }
}

/// One offending argument in a [`ValidationError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidArgument {
    pub spec: ArgumentSpec,
    pub violation: Violation,
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "--{} (-{}): {}",
            self.spec.long_name, self.spec.short_name, self.violation
        )
    }
}

/// Every argument whose presence or value policy was violated.
///
/// Always lists all offenders found in one pass, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("these arguments were not specified correctly: {}", join_invalid(.invalid))]
pub struct ValidationError {
    pub invalid: Vec<InvalidArgument>,
}

impl ValidationError {
    /// Returns `true` if `long_name` is among the offenders.
    pub fn contains(&self, long_name: &str) -> bool {
        self.invalid
            .iter()
            .any(|entry| entry.spec.long_name == long_name)
    }
}

fn join_invalid(invalid: &[InvalidArgument]) -> String {
    invalid
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A value could not be coerced to its member's declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot bind '{raw}' to --{member} ({kind})")]
pub struct BindingError {
    /// Long name of the member.
    pub member: String,
    /// Declared type of the member.
    pub kind: ValueKind,
    /// The rejected text.
    pub raw: String,
}

/// Everything a parse call can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandLineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Parsing(#[from] ParsingError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Binding(#[from] BindingError),
    /// Not a failure: `-h`/`--help` was present. Carries the rendered usage.
    #[error("help requested")]
    HelpRequested { usage: String },
}

impl CommandLineError {
    /// The rendered usage text, for the help case.
    pub fn usage(&self) -> Option<&str> {
        match self {
            Self::HelpRequested { usage } => Some(usage),
            _ => None,
        }
    }

    /// The offending arguments, for the validation case.
    pub fn invalid(&self) -> &[InvalidArgument] {
        match self {
            Self::Validation(err) => &err.invalid,
            _ => &[],
        }
    }
}

/// Errors raised while loading an argument table file.
#[derive(Debug, Error)]
pub enum TableError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The file extension names no supported format.
    #[error("unrecognized table format: {0}")]
    UnknownFormat(String),
}
