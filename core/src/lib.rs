//! Declarative command-line argument binding.
//!
//! A plain data type declares how each of its fields corresponds to a
//! command-line option; the binder parses an argument vector into a new
//! instance of that type and renders a usage document from the same
//! declarations.
//!
//! - [`ArgumentSpec`] / [`ValuePolicy`]: one option's names, help text, and
//!   presence/value rule.
//! - [`Arguments`] / [`registry`]: per-type declarations, built once and
//!   cached for the process lifetime.
//! - [`tokenize`] / [`Syntax`]: token classification and the
//!   value-attachment convention (`--name=value`, `--name:value`,
//!   `-n value`).
//! - [`match_tokens`], [`validate`], [`BoundMember::bind`]: matching,
//!   policy checks, and type coercion.
//! - [`UsageDoc`]: the synopsis line and aligned option table.
//! - [`CommandLine`]: the façade tying these together.
//! - [`ArgumentTable`]: the same declarations loaded from JSON or YAML.
//!
//! # Example
//!
//! ```
//! use argbind_core::*;
//!
//! #[derive(Debug, Default)]
//! struct CopyArgs {
//!     recursive: bool,
//!     exclude: Vec<String>,
//!     target: String,
//! }
//!
//! impl Arguments for CopyArgs {
//!     fn declare(builder: &mut RegistryBuilder<Self>) {
//!         builder
//!             .flag('r', "recursive", "copy directories", |c: &mut Self| &mut c.recursive)
//!             .optional_value('x', "exclude", "patterns to skip", |c: &mut Self| &mut c.exclude)
//!             .required_value('t', "target", "destination", |c: &mut Self| &mut c.target)
//!             .positional("source...");
//!     }
//! }
//!
//! let command_line = CommandLine::new().with_program_name("copy");
//! let parsed = command_line
//!     .parse::<CopyArgs, _, _>(["-r", "--exclude=*.o,*.a", "-t", "out", "src"], UsageMode::Throwing)
//!     .unwrap()
//!     .bound()
//!     .unwrap();
//!
//! assert!(parsed.value.recursive);
//! assert_eq!(parsed.value.exclude, vec!["*.o", "*.a"]);
//! assert_eq!(parsed.value.target, "out");
//! assert_eq!(parsed.extra_arguments, vec!["src"]);
//!
//! let usage = command_line.usage::<CopyArgs>(&[]).unwrap();
//! assert!(usage.starts_with("usage:  copy [-r] [-x value] -t value source...\n\n"));
//! ```

mod command_line;
mod error;
mod matcher;
mod registry;
mod spec;
mod table;
mod token;
mod usage;
mod validate;
mod value;

pub use command_line::{
    CommandLine, ExitReason, HELP_TOKENS, ParseOutcome, Parsed, UsageExit, UsageMode,
    is_help_requested,
};
pub use error::{
    BindingError, CommandLineError, ConfigurationError, InvalidArgument, ParsingError,
    TableError, ValidationError, Violation,
};
pub use matcher::{Matches, Occurrence, match_tokens};
pub use registry::{Arguments, BoundMember, Registry, RegistryBuilder, registry};
pub use spec::{ArgumentSpec, OptionName, ValuePolicy};
pub use table::{ArgumentTable, TableArgs, TableEntry};
pub use token::{ParsedToken, Syntax, TERMINATOR, tokenize};
pub use usage::{HELP_GUTTER, UsageDoc, UsageRow, render_usage, synopsis_fragment};
pub use validate::{check_policy, validate};
pub use value::{Bindable, Value, ValueKind};
