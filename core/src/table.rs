//! Argument tables: runtime declarations loaded from JSON or YAML.
//!
//! A table declares the same metadata a [`crate::Arguments`] impl does, but
//! names member types by string. Binding targets a [`TableArgs`] map keyed by
//! long name.
//!
//! # Example YAML
//!
//! ```yaml
//! program: deploy
//! prolog: Deploys a build.
//! positionals: [target]
//! arguments:
//!   - short: f
//!     long: force
//!     help: skip confirmation
//!     policy: flag
//!   - short: r
//!     long: retries
//!     help: attempts before giving up
//!     policy: optional-value
//!     kind: i32
//! ```

use std::collections::BTreeMap;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, TableError};
use crate::registry::Registry;
use crate::spec::{ArgumentSpec, ValuePolicy};
use crate::value::{Value, ValueKind};

/// One declared argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub short: char,
    pub long: String,
    #[serde(default)]
    pub help: String,
    pub policy: ValuePolicy,
    /// Kind name (see [`ValueKind::from_name`]). Defaults to `bool` for
    /// flags and `string` otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl TableEntry {
    fn resolve_kind(&self) -> Result<ValueKind, ConfigurationError> {
        match &self.kind {
            None if self.policy == ValuePolicy::Flag => Ok(ValueKind::Bool),
            None => Ok(ValueKind::String),
            Some(name) => {
                ValueKind::from_name(name).ok_or_else(|| ConfigurationError::UnsupportedType {
                    member: self.long.clone(),
                    kind: name.clone(),
                })
            }
        }
    }
}

/// A serializable set of argument declarations plus usage metadata.
///
/// # Examples
///
/// ```
/// use argbind_core::{ArgumentTable, CommandLine, UsageMode, Value};
///
/// let table = ArgumentTable::from_yaml_str(
///     "arguments:\n  - { short: c, long: count, policy: required-value, kind: i32 }\n",
/// )
/// .unwrap();
/// let registry = table.registry().unwrap();
///
/// let parsed = CommandLine::new()
///     .parse_with(&registry, ["--count=3"], UsageMode::Throwing)
///     .unwrap()
///     .bound()
///     .unwrap();
/// assert_eq!(parsed.value.get("count"), Some(&Value::Int(3)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentTable {
    /// Program name shown in the synopsis, if not the running executable's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prolog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epilog: Option<String>,
    #[serde(default)]
    pub positionals: Vec<String>,
    #[serde(default)]
    pub arguments: Vec<TableEntry>,
}

impl ArgumentTable {
    /// Loads a table, choosing the format from the file extension
    /// (`.json`, `.yaml`, `.yml`).
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownFormat`] for other extensions, and I/O or
    /// parse errors otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let reader = || std::fs::File::open(path).map(BufReader::new);
        match extension.as_str() {
            "json" => Ok(serde_json::from_reader(reader()?)?),
            "yaml" | "yml" => Ok(serde_yaml::from_reader(reader()?)?),
            _ => Err(TableError::UnknownFormat(path.display().to_string())),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, TableError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, TableError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Builds a registry binding into [`TableArgs`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnsupportedType`] for unknown kind names,
    /// and any error of [`crate::RegistryBuilder::build`].
    pub fn registry(&self) -> Result<Registry<TableArgs>, ConfigurationError> {
        let mut builder = Registry::builder();
        if let Some(prolog) = &self.prolog {
            builder.prolog(prolog);
        }
        if let Some(epilog) = &self.epilog {
            builder.epilog(epilog);
        }
        for name in &self.positionals {
            builder.positional(name);
        }

        for entry in &self.arguments {
            let kind = entry.resolve_kind()?;
            let spec = ArgumentSpec::new(entry.short, &entry.long, entry.policy).with_help(&entry.help);
            let key = entry.long.clone();
            builder.member_with(spec, kind, move |args: &mut TableArgs, value| {
                args.values.insert(key.clone(), value);
            });
        }

        builder.build()
    }
}

/// Bound values of a table-declared command line, keyed by long name.
///
/// Only arguments that appeared are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TableArgs {
    pub values: BTreeMap<String, Value>,
}

impl TableArgs {
    pub fn get(&self, long_name: &str) -> Option<&Value> {
        self.values.get(long_name)
    }

    pub fn contains(&self, long_name: &str) -> bool {
        self.values.contains_key(long_name)
    }
}
