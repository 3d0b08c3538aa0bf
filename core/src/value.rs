//! Value kinds and type coercion.
//!
//! Every bindable member has a [`ValueKind`]. Coercion turns the raw text of
//! an occurrence (or its absence) into a [`Value`] of that kind; the
//! [`Bindable`] trait connects the kinds to concrete Rust field types.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Declared type of a bindable member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Char,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    String,
    IntArray,
    LongArray,
    StringArray,
}

impl ValueKind {
    /// Canonical display name, used in messages and table files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Int => "i32",
            Self::Long => "i64",
            Self::String => "string",
            Self::IntArray => "i32[]",
            Self::LongArray => "i64[]",
            Self::StringArray => "string[]",
        }
    }

    /// Looks up a kind by name, accepting `int`/`long` style aliases.
    ///
    /// # Examples
    ///
    /// ```
    /// use argbind_core::ValueKind;
    ///
    /// assert_eq!(ValueKind::from_name("i64[]"), Some(ValueKind::LongArray));
    /// assert_eq!(ValueKind::from_name("Int"), Some(ValueKind::Int));
    /// assert_eq!(ValueKind::from_name("float"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.trim().to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Self::Bool,
            "char" => Self::Char,
            "i32" | "int" => Self::Int,
            "i64" | "long" => Self::Long,
            "string" | "str" => Self::String,
            "i32[]" | "int[]" => Self::IntArray,
            "i64[]" | "long[]" => Self::LongArray,
            "string[]" | "str[]" => Self::StringArray,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_array(self) -> bool {
        matches!(self, Self::IntArray | Self::LongArray | Self::StringArray)
    }

    /// The value bound when an option appears without one.
    ///
    /// Booleans become `true`; everything else takes its type's default.
    pub fn absent(self) -> Value {
        match self {
            Self::Bool => Value::Bool(true),
            Self::Char => Value::Char('\0'),
            Self::Int => Value::Int(0),
            Self::Long => Value::Long(0),
            Self::String => Value::String(String::new()),
            Self::IntArray => Value::IntArray(Vec::new()),
            Self::LongArray => Value::LongArray(Vec::new()),
            Self::StringArray => Value::StringArray(Vec::new()),
        }
    }

    /// Coerces raw option text to this kind.
    ///
    /// Returns `None` when the text is not a valid literal for the kind.
    /// Arrays split on `,` with no escaping; an empty string therefore
    /// yields one empty element, which is valid only for string arrays.
    ///
    /// # Examples
    ///
    /// ```
    /// use argbind_core::{Value, ValueKind};
    ///
    /// assert_eq!(
    ///     ValueKind::IntArray.coerce(Some("2,3,5")),
    ///     Some(Value::IntArray(vec![2, 3, 5]))
    /// );
    /// assert_eq!(ValueKind::Char.coerce(Some("ab")), None);
    /// assert_eq!(ValueKind::Bool.coerce(None), Some(Value::Bool(true)));
    /// ```
    pub fn coerce(self, raw: Option<&str>) -> Option<Value> {
        let Some(raw) = raw else {
            return Some(self.absent());
        };
        match self {
            Self::Bool => parse_bool(raw).map(Value::Bool),
            Self::Char => parse_char(raw).map(Value::Char),
            Self::Int => raw.parse().ok().map(Value::Int),
            Self::Long => raw.parse().ok().map(Value::Long),
            Self::String => Some(Value::String(raw.to_string())),
            Self::IntArray => parse_list(raw).map(Value::IntArray),
            Self::LongArray => parse_list(raw).map(Value::LongArray),
            Self::StringArray => Some(Value::StringArray(
                raw.split(',').map(str::to_string).collect(),
            )),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_char(raw: &str) -> Option<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn parse_list<V: FromStr>(raw: &str) -> Option<Vec<V>> {
    raw.split(',').map(|item| item.parse().ok()).collect()
}

/// A coerced value of some [`ValueKind`].
///
/// Serializes untagged, so a bound value appears in JSON as its plain
/// representation. `Display` renders the text form that coerces back to the
/// same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Char(char),
    Int(i32),
    Long(i64),
    String(String),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
    StringArray(Vec<String>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Char(_) => ValueKind::Char,
            Self::Int(_) => ValueKind::Int,
            Self::Long(_) => ValueKind::Long,
            Self::String(_) => ValueKind::String,
            Self::IntArray(_) => ValueKind::IntArray,
            Self::LongArray(_) => ValueKind::LongArray,
            Self::StringArray(_) => ValueKind::StringArray,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::IntArray(v) => f.write_str(&join(v)),
            Self::LongArray(v) => f.write_str(&join(v)),
            Self::StringArray(v) => f.write_str(&v.join(",")),
        }
    }
}

fn join<V: ToString>(items: &[V]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

mod sealed {
    pub trait Sealed {}
}

/// A Rust type a member can be declared with.
///
/// Sealed: only the supported kinds implement it, so an unsupported field
/// type is rejected when the registry is declared rather than at parse time.
///
/// Each supported type `V` also binds as `Option<V>`. An optional member
/// stays `None` unless the option appears, so a bare occurrence of a
/// flag-with-optional-value (bound as `Some` of the kind's default) can be
/// told apart from an omitted one.
///
/// # Examples
///
/// ```
/// use argbind_core::{Bindable, Value, ValueKind};
///
/// assert_eq!(<Option<String> as Bindable>::KIND, ValueKind::String);
/// assert_eq!(
///     Option::<String>::from_value(ValueKind::String.absent()),
///     Some(Some(String::new()))
/// );
/// assert_eq!(Option::<i32>::None.into_value(), None);
/// assert_eq!(7i32.into_value(), Some(Value::Int(7)));
/// ```
pub trait Bindable: sealed::Sealed + Sized + 'static {
    const KIND: ValueKind;

    /// Extracts a value of this type; `None` if the kind does not match.
    fn from_value(value: Value) -> Option<Self>;

    /// The value this member holds, or `None` for an unset optional member.
    fn into_value(self) -> Option<Value>;
}

macro_rules! bindable {
    ($ty:ty, $variant:ident) => {
        impl sealed::Sealed for $ty {}

        impl Bindable for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn into_value(self) -> Option<Value> {
                Some(Value::$variant(self))
            }
        }

        impl sealed::Sealed for Option<$ty> {}

        impl Bindable for Option<$ty> {
            const KIND: ValueKind = ValueKind::$variant;

            fn from_value(value: Value) -> Option<Self> {
                <$ty as Bindable>::from_value(value).map(Some)
            }

            fn into_value(self) -> Option<Value> {
                self.and_then(<$ty as Bindable>::into_value)
            }
        }
    };
}

bindable!(bool, Bool);
bindable!(char, Char);
bindable!(i32, Int);
bindable!(i64, Long);
bindable!(String, String);
bindable!(Vec<i32>, IntArray);
bindable!(Vec<i64>, LongArray);
bindable!(Vec<String>, StringArray);
