//! Usage document rendering.
//!
//! The rendered text is a compatibility surface: tools scrape it, so the
//! layout below is fixed.
//!
//! ```text
//! {prolog}                          (when configured)
//!
//! usage:  {program} {fragment}... {positional}...
//!
//! -{s},--{long, padded}{help}       (one row per argument)
//!
//! {epilog}                          (when configured)
//! ```

use std::fmt;

use serde::Serialize;

use crate::registry::Registry;
use crate::spec::{ArgumentSpec, ValuePolicy};
use crate::token::Syntax;

/// Spaces between the longest long name and the help column.
pub const HELP_GUTTER: usize = 4;

/// One row of the option table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageRow {
    pub short_name: char,
    pub long_name: String,
    pub help: String,
}

/// Structured usage document; [`Display`](fmt::Display) renders it.
///
/// # Examples
///
/// ```
/// use argbind_core::{Registry, Syntax, UsageDoc};
///
/// #[derive(Default)]
/// struct Args {
///     required: String,
///     optional: String,
/// }
///
/// let mut builder = Registry::<Args>::builder();
/// builder
///     .required_value('r', "required", "this is required", |a: &mut Args| &mut a.required)
///     .optional_value('o', "optional", "this is optional", |a: &mut Args| &mut a.optional);
/// let registry = builder.build().unwrap();
///
/// let doc = UsageDoc::build(&registry, "app", &Syntax::default(), &[]);
/// assert_eq!(doc.synopsis, "usage:  app -r value [-o value]");
/// assert_eq!(
///     doc.to_string(),
///     "usage:  app -r value [-o value]\n\
///      \n\
///      -r,--required    this is required\n\
///      -o,--optional    this is optional\n"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageDoc {
    pub prolog: Option<String>,
    pub synopsis: String,
    pub rows: Vec<UsageRow>,
    pub epilog: Option<String>,
}

impl UsageDoc {
    /// Builds the document for `registry`.
    ///
    /// `extra_positionals` are appended to the synopsis after the registry's
    /// own positional names.
    pub fn build<T>(
        registry: &Registry<T>,
        program: &str,
        syntax: &Syntax,
        extra_positionals: &[&str],
    ) -> Self {
        let mut synopsis = format!("usage:  {program}");
        for spec in registry.specs() {
            synopsis.push(' ');
            synopsis.push_str(&synopsis_fragment(spec, syntax));
        }
        let positionals = registry
            .positionals()
            .iter()
            .map(String::as_str)
            .chain(extra_positionals.iter().copied());
        for name in positionals {
            synopsis.push(' ');
            synopsis.push_str(name);
        }

        Self {
            prolog: registry.prolog().map(str::to_string),
            synopsis,
            rows: registry
                .specs()
                .map(|spec| UsageRow {
                    short_name: spec.short_name,
                    long_name: spec.long_name.clone(),
                    help: spec.help.clone(),
                })
                .collect(),
            epilog: registry.epilog().map(str::to_string),
        }
    }

    /// Width of the long-name column.
    fn column_width(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.long_name.chars().count())
            .max()
            .unwrap_or(0)
            + HELP_GUTTER
    }
}

impl fmt::Display for UsageDoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prolog) = &self.prolog {
            write!(f, "{prolog}\n\n")?;
        }
        write!(f, "{}\n\n", self.synopsis)?;

        let width = self.column_width();
        for row in &self.rows {
            writeln!(
                f,
                "-{},--{:<width$}{}",
                row.short_name, row.long_name, row.help
            )?;
        }

        if let Some(epilog) = &self.epilog {
            write!(f, "\n{epilog}\n")?;
        }
        Ok(())
    }
}

/// Synopsis fragment for one argument.
///
/// ```
/// use argbind_core::{synopsis_fragment, ArgumentSpec, Syntax};
///
/// let mixed = Syntax::mixed();
/// assert_eq!(synopsis_fragment(&ArgumentSpec::flag('f', "flag"), &mixed), "[-f]");
/// assert_eq!(
///     synopsis_fragment(&ArgumentSpec::flag_with_optional_value('v', "value"), &mixed),
///     "[-v[:value]]"
/// );
/// assert_eq!(
///     synopsis_fragment(&ArgumentSpec::required_value('r', "required"), &Syntax::inline()),
///     "-r:value"
/// );
/// ```
pub fn synopsis_fragment(spec: &ArgumentSpec, syntax: &Syntax) -> String {
    let short = spec.short_name;
    let separator = syntax.display_separator();
    let attach = if syntax.consume_next {
        " ".to_string()
    } else {
        separator.to_string()
    };

    match spec.value_policy {
        ValuePolicy::Flag => format!("[-{short}]"),
        ValuePolicy::FlagWithOptionalValue => format!("[-{short}[{separator}value]]"),
        ValuePolicy::OptionalValue => format!("[-{short}{attach}value]"),
        ValuePolicy::RequiredValue => format!("-{short}{attach}value"),
    }
}

/// Renders the usage text for `registry`.
pub fn render_usage<T>(
    registry: &Registry<T>,
    program: &str,
    syntax: &Syntax,
    extra_positionals: &[&str],
) -> String {
    UsageDoc::build(registry, program, syntax, extra_positionals).to_string()
}
