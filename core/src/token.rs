//! Token classification.
//!
//! Splits an argument vector into option tokens (with an optional inline
//! value) and positionals, honoring the `--` terminator. Which characters
//! attach an inline value, and whether an option may take the following
//! token as its value, is decided by [`Syntax`].

use serde::{Deserialize, Serialize};

use crate::error::ParsingError;
use crate::spec::OptionName;

/// Standalone token that ends option scanning.
pub const TERMINATOR: &str = "--";

/// Value-attachment conventions.
///
/// Two conventions exist in the wild: `--name=value` with next-token values
/// (`-n value`), and colon-attached values for both forms (`--name:value`,
/// `-n:value`) without next-token consumption. [`Syntax::mixed`], the
/// default, accepts both.
///
/// # Examples
///
/// ```
/// use argbind_core::Syntax;
///
/// let syntax = Syntax::default();
/// assert_eq!(syntax.split("--name=value"), ("--name", Some("value")));
/// assert_eq!(syntax.split("-n:a=b"), ("-n", Some("a=b")));
/// assert_eq!(syntax.split("--name"), ("--name", None));
/// assert!(syntax.consume_next);
///
/// let inline = Syntax::inline();
/// assert_eq!(inline.split("--name=value"), ("--name=value", None));
/// assert!(!inline.consume_next);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syntax {
    /// Characters that attach an inline value. The first one is shown in
    /// usage text.
    pub separators: Vec<char>,
    /// Whether an option wanting a value may take the following token.
    pub consume_next: bool,
    /// Whether `/` is accepted as an option prefix alongside `-`.
    #[serde(default)]
    pub slash_prefix: bool,
}

impl Syntax {
    /// `--name:value` and `-n:value` only.
    pub fn inline() -> Self {
        Self {
            separators: vec![':'],
            consume_next: false,
            slash_prefix: false,
        }
    }

    /// `--name=value` and `-n value` / `--name value`.
    pub fn next_token() -> Self {
        Self {
            separators: vec!['='],
            consume_next: true,
            slash_prefix: false,
        }
    }

    /// Both `:` and `=` attach values, and next-token values are accepted.
    pub fn mixed() -> Self {
        Self {
            separators: vec![':', '='],
            consume_next: true,
            slash_prefix: false,
        }
    }

    pub fn with_slash_prefix(mut self) -> Self {
        self.slash_prefix = true;
        self
    }

    /// Separator shown in usage text.
    pub fn display_separator(&self) -> char {
        self.separators.first().copied().unwrap_or(':')
    }

    fn is_prefix(&self, c: char) -> bool {
        c == '-' || (self.slash_prefix && c == '/')
    }

    /// Whether `token` would be read as an option rather than a positional.
    pub fn is_option_shaped(&self, token: &str) -> bool {
        let mut chars = token.chars();
        matches!(chars.next(), Some(first) if self.is_prefix(first))
            && chars.next().is_some()
            && token != TERMINATOR
    }

    /// Splits a token at its first separator into name and inline value.
    pub fn split<'a>(&self, token: &'a str) -> (&'a str, Option<&'a str>) {
        match token.find(|c: char| self.separators.contains(&c)) {
            Some(index) => {
                let separator_len = token[index..].chars().next().map_or(1, char::len_utf8);
                (&token[..index], Some(&token[index + separator_len..]))
            }
            None => (token, None),
        }
    }
}

impl Default for Syntax {
    fn default() -> Self {
        Self::mixed()
    }
}

/// One classified argv element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedToken {
    Option {
        name: OptionName,
        inline_value: Option<String>,
        /// The token exactly as given, for reporting unmatched options.
        raw: String,
    },
    Positional {
        text: String,
        /// Set for tokens after `--`; these are never taken as option values.
        after_terminator: bool,
    },
}

/// Classifies every token of `args`.
///
/// The terminator itself is consumed and not emitted.
///
/// # Errors
///
/// Fails on bundled short options (`-ab`) and on option tokens with no name
/// before the separator (`--=x`).
///
/// # Examples
///
/// ```
/// use argbind_core::{tokenize, OptionName, ParsedToken, Syntax};
///
/// let tokens = tokenize(["-r:x", "one", "--", "-f"], &Syntax::default()).unwrap();
/// assert_eq!(tokens.len(), 3);
/// assert!(matches!(
///     &tokens[0],
///     ParsedToken::Option { name: OptionName::Short('r'), inline_value: Some(v), .. } if v == "x"
/// ));
/// assert!(matches!(
///     &tokens[2],
///     ParsedToken::Positional { text, after_terminator: true } if text == "-f"
/// ));
/// ```
pub fn tokenize<I, S>(args: I, syntax: &Syntax) -> Result<Vec<ParsedToken>, ParsingError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tokens = Vec::new();
    let mut terminated = false;

    for arg in args {
        let arg = arg.as_ref();

        if terminated {
            tokens.push(ParsedToken::Positional {
                text: arg.to_string(),
                after_terminator: true,
            });
            continue;
        }
        if arg == TERMINATOR {
            terminated = true;
            continue;
        }
        if !syntax.is_option_shaped(arg) {
            tokens.push(ParsedToken::Positional {
                text: arg.to_string(),
                after_terminator: false,
            });
            continue;
        }

        let (name_part, inline_value) = syntax.split(arg);
        let name = OptionName::parse(name_part, syntax.slash_prefix)?.ok_or_else(|| {
            ParsingError::MissingName {
                token: arg.to_string(),
            }
        })?;
        tokens.push(ParsedToken::Option {
            name,
            inline_value: inline_value.map(str::to_string),
            raw: arg.to_string(),
        });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positional(text: &str, after_terminator: bool) -> ParsedToken {
        ParsedToken::Positional {
            text: text.to_string(),
            after_terminator,
        }
    }

    #[test]
    fn test_tokenize_classifies_long_short_and_positional() {
        let tokens = tokenize(["--required=a", "-f", "file.txt"], &Syntax::mixed()).unwrap();
        assert_eq!(
            tokens,
            vec![
                ParsedToken::Option {
                    name: OptionName::Long("required".to_string()),
                    inline_value: Some("a".to_string()),
                    raw: "--required=a".to_string(),
                },
                ParsedToken::Option {
                    name: OptionName::Short('f'),
                    inline_value: None,
                    raw: "-f".to_string(),
                },
                positional("file.txt", false),
            ]
        );
    }

    #[test]
    fn test_tokenize_empty_inline_value_is_kept() {
        let tokens = tokenize(["--name:"], &Syntax::inline()).unwrap();
        assert!(matches!(
            &tokens[0],
            ParsedToken::Option { inline_value: Some(v), .. } if v.is_empty()
        ));
    }

    #[test]
    fn test_terminator_makes_rest_positional() {
        let tokens = tokenize(["one", "--", "-x", "--", "two"], &Syntax::mixed()).unwrap();
        assert_eq!(
            tokens,
            vec![
                positional("one", false),
                positional("-x", true),
                positional("--", true),
                positional("two", true),
            ]
        );
    }

    #[test]
    fn test_lone_dash_is_positional() {
        let tokens = tokenize(["-"], &Syntax::mixed()).unwrap();
        assert_eq!(tokens, vec![positional("-", false)]);
    }

    #[test]
    fn test_combined_short_options_fail() {
        let err = tokenize(["-ab"], &Syntax::mixed()).unwrap_err();
        assert_eq!(
            err,
            ParsingError::CombinedShortOptions {
                token: "-ab".to_string()
            }
        );
    }

    #[test]
    fn test_nameless_option_fails() {
        let err = tokenize(["--=x"], &Syntax::mixed()).unwrap_err();
        assert_eq!(
            err,
            ParsingError::MissingName {
                token: "--=x".to_string()
            }
        );
    }

    #[test]
    fn test_separator_depends_on_syntax() {
        // `=` is not a separator in the inline syntax, so the name swallows it.
        let tokens = tokenize(["--name=value"], &Syntax::inline()).unwrap();
        assert!(matches!(
            &tokens[0],
            ParsedToken::Option { name: OptionName::Long(n), inline_value: None, .. }
                if n == "name=value"
        ));
    }

    #[test]
    fn test_slash_prefix_is_opt_in() {
        let tokens = tokenize(["/v"], &Syntax::mixed()).unwrap();
        assert_eq!(tokens, vec![positional("/v", false)]);

        let tokens = tokenize(["/v", "//verbose:x"], &Syntax::mixed().with_slash_prefix()).unwrap();
        assert!(matches!(
            &tokens[0],
            ParsedToken::Option { name: OptionName::Short('v'), .. }
        ));
        assert!(matches!(
            &tokens[1],
            ParsedToken::Option { name: OptionName::Long(n), inline_value: Some(v), .. }
                if n == "verbose" && v == "x"
        ));
    }

    #[test]
    fn test_display_separator() {
        assert_eq!(Syntax::inline().display_separator(), ':');
        assert_eq!(Syntax::next_token().display_separator(), '=');
        assert_eq!(Syntax::mixed().display_separator(), ':');
    }
}
