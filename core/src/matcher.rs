//! Pairs classified tokens with registry members.

use tracing::debug;

use crate::registry::Registry;
use crate::token::{ParsedToken, Syntax};

/// One appearance of a matched option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// The attached value; `Some("")` for an explicit empty value.
    pub value: Option<String>,
    pub raw: String,
}

/// Result of matching a token stream against a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matches {
    /// Occurrences per member, indexed like [`Registry::members`].
    pub occurrences: Vec<Vec<Occurrence>>,
    /// Positionals that matched nothing, in order.
    pub extra_arguments: Vec<String>,
    /// Option tokens that matched no member, verbatim and in order.
    pub extra_options: Vec<String>,
}

/// Matches `tokens` against the members of `registry`.
///
/// An option that wants a value and carries none inline takes the following
/// token as its value when `syntax.consume_next` is set and that token is a
/// positional from before the terminator. Unmatched options never consume a
/// following token.
pub fn match_tokens<T>(registry: &Registry<T>, tokens: Vec<ParsedToken>, syntax: &Syntax) -> Matches {
    let mut matches = Matches {
        occurrences: vec![Vec::new(); registry.len()],
        ..Matches::default()
    };

    let mut tokens = tokens.into_iter().peekable();
    while let Some(token) = tokens.next() {
        let (name, inline_value, raw) = match token {
            ParsedToken::Positional { text, .. } => {
                matches.extra_arguments.push(text);
                continue;
            }
            ParsedToken::Option {
                name,
                inline_value,
                raw,
            } => (name, inline_value, raw),
        };

        let Some(index) = registry.position(&name) else {
            debug!(token = %raw, "no argument matches option");
            matches.extra_options.push(raw);
            continue;
        };

        let mut value = inline_value;
        let policy = registry.members()[index].spec().value_policy;
        if value.is_none() && syntax.consume_next && policy.wants_value() {
            let next = tokens.next_if(|next| {
                matches!(
                    next,
                    ParsedToken::Positional {
                        after_terminator: false,
                        ..
                    }
                )
            });
            if let Some(ParsedToken::Positional { text, .. }) = next {
                debug!(option = %raw, value = %text, "took next token as value");
                value = Some(text);
            }
        }

        matches.occurrences[index].push(Occurrence { value, raw });
    }

    matches
}
