//! The parse façade.
//!
//! [`CommandLine`] runs a parse end to end: registry lookup, help check,
//! tokenizing, matching, validation, and binding. Help and failures are
//! either returned as errors or, in [`UsageMode::Automating`], turned into a
//! [`UsageExit`] for the caller to print and exit with. The library itself
//! never writes to stdout or terminates the process.

use std::path::Path;

use tracing::debug;

use crate::error::{CommandLineError, ConfigurationError};
use crate::matcher::match_tokens;
use crate::registry::{Arguments, Registry, registry};
use crate::token::{Syntax, tokenize};
use crate::usage::{UsageDoc, render_usage};
use crate::validate::validate;

/// Tokens that request the usage document, checked independently of any
/// registry.
pub const HELP_TOKENS: [&str; 2] = ["-h", "--help"];

/// What to do when help is requested or a parse fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UsageMode {
    /// Produce a [`UsageExit`] carrying the usage text and exit status 2.
    Automating,
    /// Return the structured error.
    #[default]
    Throwing,
}

impl From<bool> for UsageMode {
    fn from(automating_usage: bool) -> Self {
        if automating_usage {
            Self::Automating
        } else {
            Self::Throwing
        }
    }
}

/// A successfully bound instance and the tokens nothing claimed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    pub value: T,
    /// Positionals, in order.
    pub extra_arguments: Vec<String>,
    /// Option tokens that matched no argument, verbatim and in order.
    pub extra_options: Vec<String>,
}

/// Why an automating-mode parse ended in usage output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    HelpRequested,
    Failed(CommandLineError),
}

/// Signal to print `usage` to standard output and exit with
/// [`UsageExit::STATUS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageExit {
    pub usage: String,
    pub reason: ExitReason,
}

impl UsageExit {
    pub const STATUS: i32 = 2;

    pub fn status(&self) -> i32 {
        Self::STATUS
    }
}

/// Result of a parse that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome<T> {
    Bound(Parsed<T>),
    Exit(UsageExit),
}

impl<T> ParseOutcome<T> {
    /// The bound result, if the parse did not end in usage output.
    pub fn bound(self) -> Option<Parsed<T>> {
        match self {
            Self::Bound(parsed) => Some(parsed),
            Self::Exit(_) => None,
        }
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, Self::Exit(_))
    }
}

/// Parser configuration and entry point.
///
/// # Examples
///
/// ```
/// use argbind_core::{Arguments, CommandLine, RegistryBuilder, UsageMode};
///
/// #[derive(Debug, Default)]
/// struct Greet {
///     name: String,
///     loud: bool,
/// }
///
/// impl Arguments for Greet {
///     fn declare(builder: &mut RegistryBuilder<Self>) {
///         builder
///             .required_value('n', "name", "who to greet", |g: &mut Self| &mut g.name)
///             .flag('l', "loud", "shout", |g: &mut Self| &mut g.loud);
///     }
/// }
///
/// let command_line = CommandLine::new().with_program_name("greet");
/// let parsed = command_line
///     .parse::<Greet, _, _>(["--name:world", "-l", "extra"], UsageMode::Throwing)
///     .unwrap()
///     .bound()
///     .unwrap();
///
/// assert_eq!(parsed.value.name, "world");
/// assert!(parsed.value.loud);
/// assert_eq!(parsed.extra_arguments, vec!["extra"]);
/// ```
#[derive(Debug, Clone)]
pub struct CommandLine {
    program_name: String,
    syntax: Syntax,
}

impl Default for CommandLine {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandLine {
    /// Uses the file name of the running executable as the program name and
    /// the default [`Syntax`].
    pub fn new() -> Self {
        Self {
            program_name: current_program_name(),
            syntax: Syntax::default(),
        }
    }

    pub fn with_program_name(mut self, name: &str) -> Self {
        self.program_name = name.to_string();
        self
    }

    pub fn with_syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = syntax;
        self
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// Parses `args` (without the program name) into a new `T`.
    ///
    /// # Errors
    ///
    /// A [`ConfigurationError`] in `T`'s declarations is returned in either
    /// mode. In [`UsageMode::Throwing`], help yields
    /// [`CommandLineError::HelpRequested`] and parse failures their
    /// structured error; in [`UsageMode::Automating`] both become
    /// [`ParseOutcome::Exit`].
    pub fn parse<T, I, S>(&self, args: I, mode: UsageMode) -> Result<ParseOutcome<T>, CommandLineError>
    where
        T: Arguments,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let registry = registry::<T>()?;
        self.parse_with(&registry, args, mode)
    }

    /// Parses against an explicitly built registry.
    pub fn parse_with<T, I, S>(
        &self,
        registry: &Registry<T>,
        args: I,
        mode: UsageMode,
    ) -> Result<ParseOutcome<T>, CommandLineError>
    where
        T: Default,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();

        if is_help_requested(&args) {
            debug!(program = %self.program_name, "help requested");
            let usage = self.render(registry, &[]);
            return match mode {
                UsageMode::Automating => Ok(ParseOutcome::Exit(UsageExit {
                    usage,
                    reason: ExitReason::HelpRequested,
                })),
                UsageMode::Throwing => Err(CommandLineError::HelpRequested { usage }),
            };
        }

        match self.bind(registry, args) {
            Ok(parsed) => Ok(ParseOutcome::Bound(parsed)),
            Err(err) => {
                debug!(error = %err, "parse failed");
                match mode {
                    UsageMode::Automating => Ok(ParseOutcome::Exit(UsageExit {
                        usage: self.render(registry, &[]),
                        reason: ExitReason::Failed(err),
                    })),
                    UsageMode::Throwing => Err(err),
                }
            }
        }
    }

    fn bind<T: Default>(
        &self,
        registry: &Registry<T>,
        args: Vec<String>,
    ) -> Result<Parsed<T>, CommandLineError> {
        let tokens = tokenize(&args, &self.syntax)?;
        let matches = match_tokens(registry, tokens, &self.syntax);
        validate(registry, &matches.occurrences)?;

        let mut value = T::default();
        for (member, found) in registry.members().iter().zip(&matches.occurrences) {
            if let Some(occurrence) = found.first() {
                member.bind(&mut value, occurrence.value.as_deref())?;
            }
        }

        Ok(Parsed {
            value,
            extra_arguments: matches.extra_arguments,
            extra_options: matches.extra_options,
        })
    }

    /// Renders the usage text of `T`, appending `positionals` to the
    /// synopsis.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigurationError`] of `T`'s declarations, if any.
    pub fn usage<T: Arguments>(&self, positionals: &[&str]) -> Result<String, ConfigurationError> {
        let registry = registry::<T>()?;
        Ok(self.render(&registry, positionals))
    }

    /// Builds the structured usage document for a registry.
    pub fn usage_doc<T>(&self, registry: &Registry<T>, positionals: &[&str]) -> UsageDoc {
        UsageDoc::build(registry, &self.program_name, &self.syntax, positionals)
    }

    fn render<T>(&self, registry: &Registry<T>, positionals: &[&str]) -> String {
        render_usage(registry, &self.program_name, &self.syntax, positionals)
    }
}

/// Whether a help token appears anywhere in `args`, including after the
/// terminator.
pub fn is_help_requested<S: AsRef<str>>(args: &[S]) -> bool {
    args.iter()
        .map(AsRef::as_ref)
        .any(|arg| HELP_TOKENS.contains(&arg))
}

fn current_program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}
