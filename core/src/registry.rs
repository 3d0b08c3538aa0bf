//! Registries pairing argument specs with write access into a target type.
//!
//! A target type declares its members once through [`Arguments::declare`];
//! [`registry`] builds the resulting [`Registry`] on first use and caches it
//! for the lifetime of the process. Runtime-declared registries (see
//! [`crate::table`]) are built directly with [`Registry::builder`].

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::debug;

use crate::error::{BindingError, ConfigurationError};
use crate::spec::{ArgumentSpec, OptionName, ValuePolicy, eq_ignore_case};
use crate::value::{Bindable, Value, ValueKind};

type Writer<T> = Box<dyn Fn(&mut T, Value) + Send + Sync>;

/// An [`ArgumentSpec`] paired with a write capability into one member of `T`.
pub struct BoundMember<T> {
    spec: ArgumentSpec,
    kind: ValueKind,
    write: Writer<T>,
}

impl<T> BoundMember<T> {
    pub fn spec(&self) -> &ArgumentSpec {
        &self.spec
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Coerces `raw` to the member's kind and writes it into `target`.
    ///
    /// # Errors
    ///
    /// Returns a [`BindingError`] naming the member, its kind, and the
    /// rejected text when coercion fails. `target` is left untouched.
    pub fn bind(&self, target: &mut T, raw: Option<&str>) -> Result<(), BindingError> {
        let value = self.kind.coerce(raw).ok_or_else(|| BindingError {
            member: self.spec.long_name.clone(),
            kind: self.kind,
            raw: raw.unwrap_or_default().to_string(),
        })?;
        (self.write)(target, value);
        Ok(())
    }
}

impl<T> fmt::Debug for BoundMember<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundMember")
            .field("spec", &self.spec)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// The complete, validated set of bindable members of a target type, plus
/// the usage metadata declared alongside them.
pub struct Registry<T> {
    members: Vec<BoundMember<T>>,
    prolog: Option<String>,
    epilog: Option<String>,
    positionals: Vec<String>,
}

impl<T> Registry<T> {
    pub fn builder() -> RegistryBuilder<T> {
        RegistryBuilder::default()
    }

    /// Members in declaration order.
    pub fn members(&self) -> &[BoundMember<T>] {
        &self.members
    }

    pub fn specs(&self) -> impl Iterator<Item = &ArgumentSpec> {
        self.members.iter().map(BoundMember::spec)
    }

    /// Index of the member an option name refers to, if any.
    pub fn position(&self, name: &OptionName) -> Option<usize> {
        self.members
            .iter()
            .position(|member| member.spec.matches_name(name))
    }

    pub fn prolog(&self) -> Option<&str> {
        self.prolog.as_deref()
    }

    pub fn epilog(&self) -> Option<&str> {
        self.epilog.as_deref()
    }

    /// Display names of positional arguments, appended to the synopsis.
    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("members", &self.members)
            .field("prolog", &self.prolog)
            .field("epilog", &self.epilog)
            .field("positionals", &self.positionals)
            .finish()
    }
}

/// Collects member declarations; [`build`](RegistryBuilder::build) checks
/// them.
///
/// # Examples
///
/// ```
/// use argbind_core::{Registry, ValuePolicy};
///
/// #[derive(Default)]
/// struct Args {
///     verbose: bool,
///     name: String,
/// }
///
/// let mut builder = Registry::<Args>::builder();
/// builder
///     .flag('v', "verbose", "print more", |a: &mut Args| &mut a.verbose)
///     .required_value('n', "name", "who to greet", |a: &mut Args| &mut a.name);
/// let registry = builder.build().unwrap();
///
/// assert_eq!(registry.len(), 2);
/// assert_eq!(
///     registry.members()[1].spec().value_policy,
///     ValuePolicy::RequiredValue
/// );
/// ```
pub struct RegistryBuilder<T> {
    members: Vec<BoundMember<T>>,
    prolog: Option<String>,
    epilog: Option<String>,
    positionals: Vec<String>,
}

impl<T> Default for RegistryBuilder<T> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            prolog: None,
            epilog: None,
            positionals: Vec::new(),
        }
    }
}

impl<T: 'static> RegistryBuilder<T> {
    /// Declares a member from a full spec and a typed field accessor.
    pub fn member<V, F>(&mut self, spec: ArgumentSpec, accessor: F) -> &mut Self
    where
        V: Bindable,
        F: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        self.member_with(spec, V::KIND, move |target: &mut T, value: Value| {
            if let Some(value) = V::from_value(value) {
                *accessor(target) = value;
            }
        })
    }

    /// Declares a member with an explicit kind and a writer receiving the
    /// coerced [`Value`].
    ///
    /// The writer is only ever called with values of `kind`.
    pub fn member_with<W>(&mut self, spec: ArgumentSpec, kind: ValueKind, writer: W) -> &mut Self
    where
        W: Fn(&mut T, Value) + Send + Sync + 'static,
    {
        self.members.push(BoundMember {
            spec,
            kind,
            write: Box::new(writer),
        });
        self
    }

    pub fn flag<V, F>(&mut self, short: char, long: &str, help: &str, accessor: F) -> &mut Self
    where
        V: Bindable,
        F: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        self.declare(short, long, help, ValuePolicy::Flag, accessor)
    }

    pub fn flag_with_optional_value<V, F>(
        &mut self,
        short: char,
        long: &str,
        help: &str,
        accessor: F,
    ) -> &mut Self
    where
        V: Bindable,
        F: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        self.declare(short, long, help, ValuePolicy::FlagWithOptionalValue, accessor)
    }

    pub fn optional_value<V, F>(
        &mut self,
        short: char,
        long: &str,
        help: &str,
        accessor: F,
    ) -> &mut Self
    where
        V: Bindable,
        F: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        self.declare(short, long, help, ValuePolicy::OptionalValue, accessor)
    }

    pub fn required_value<V, F>(
        &mut self,
        short: char,
        long: &str,
        help: &str,
        accessor: F,
    ) -> &mut Self
    where
        V: Bindable,
        F: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        self.declare(short, long, help, ValuePolicy::RequiredValue, accessor)
    }

    fn declare<V, F>(
        &mut self,
        short: char,
        long: &str,
        help: &str,
        policy: ValuePolicy,
        accessor: F,
    ) -> &mut Self
    where
        V: Bindable,
        F: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        self.member(ArgumentSpec::new(short, long, policy).with_help(help), accessor)
    }

    /// Paragraph printed before the synopsis.
    pub fn prolog(&mut self, text: &str) -> &mut Self {
        self.prolog = Some(text.to_string());
        self
    }

    /// Paragraph printed after the option table.
    pub fn epilog(&mut self, text: &str) -> &mut Self {
        self.epilog = Some(text.to_string());
        self
    }

    /// Adds a positional display name to the synopsis.
    pub fn positional(&mut self, name: &str) -> &mut Self {
        self.positionals.push(name.to_string());
        self
    }

    /// Validates the declarations and produces the registry.
    ///
    /// # Errors
    ///
    /// Fails on the first duplicate short or long name (case-insensitive),
    /// empty long name, non-alphanumeric short name, a name that collides
    /// with `-h`/`--help`, or a `Flag` declared on a non-boolean member.
    pub fn build(self) -> Result<Registry<T>, ConfigurationError> {
        let mut shorts = HashSet::new();
        let mut longs = HashSet::new();

        for member in &self.members {
            let spec = &member.spec;
            if !spec.short_name.is_alphanumeric() {
                return Err(ConfigurationError::InvalidShortName(spec.short_name));
            }
            if spec.long_name.trim().is_empty() {
                return Err(ConfigurationError::EmptyLongName(spec.short_name));
            }
            if spec.short_name.eq_ignore_ascii_case(&'h') {
                let name = format!("-{}", spec.short_name);
                return Err(ConfigurationError::ReservedName(name));
            }
            if eq_ignore_case(&spec.long_name, "help") {
                let name = format!("--{}", spec.long_name);
                return Err(ConfigurationError::ReservedName(name));
            }
            if !shorts.insert(spec.short_name.to_lowercase().collect::<String>()) {
                return Err(ConfigurationError::DuplicateShortName(spec.short_name));
            }
            if !longs.insert(spec.long_name.to_lowercase()) {
                return Err(ConfigurationError::DuplicateLongName(spec.long_name.clone()));
            }
            if spec.value_policy == ValuePolicy::Flag && member.kind != ValueKind::Bool {
                return Err(ConfigurationError::UnsupportedType {
                    member: spec.long_name.clone(),
                    kind: format!("{} cannot be a flag", member.kind),
                });
            }
        }

        Ok(Registry {
            members: self.members,
            prolog: self.prolog.filter(|text| !text.trim().is_empty()),
            epilog: self.epilog.filter(|text| !text.trim().is_empty()),
            positionals: self.positionals,
        })
    }
}

/// A type whose instances can be populated from a command line.
///
/// # Examples
///
/// ```
/// use argbind_core::{registry, Arguments, RegistryBuilder};
///
/// #[derive(Debug, Default)]
/// struct Options {
///     force: bool,
///     retries: i32,
/// }
///
/// impl Arguments for Options {
///     fn declare(builder: &mut RegistryBuilder<Self>) {
///         builder
///             .flag('f', "force", "overwrite existing files", |o: &mut Self| &mut o.force)
///             .optional_value('r', "retries", "retry count", |o: &mut Self| &mut o.retries);
///     }
/// }
///
/// let first = registry::<Options>().unwrap();
/// let second = registry::<Options>().unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// ```
pub trait Arguments: Default + 'static {
    fn declare(builder: &mut RegistryBuilder<Self>);
}

type Cache = RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>;

fn cache() -> &'static Cache {
    static CACHE: OnceLock<Cache> = OnceLock::new();
    CACHE.get_or_init(Default::default)
}

/// Returns the registry of `T`, building and caching it on first use.
///
/// Every successful call for the same `T` returns the same `Arc`. Concurrent
/// first calls may each build a registry; the first one published wins and
/// the others are dropped.
///
/// # Errors
///
/// Returns the [`ConfigurationError`] from [`RegistryBuilder::build`]. Failed
/// builds are not cached.
pub fn registry<T: Arguments>() -> Result<Arc<Registry<T>>, ConfigurationError> {
    let key = TypeId::of::<T>();

    let cached = cache()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
        .cloned();
    if let Some(registry) = cached.and_then(|entry| entry.downcast::<Registry<T>>().ok()) {
        return Ok(registry);
    }

    let mut builder = Registry::builder();
    T::declare(&mut builder);
    let built = Arc::new(builder.build()?);
    debug!(
        target_type = std::any::type_name::<T>(),
        members = built.len(),
        "built argument registry"
    );

    let mut guard = cache().write().unwrap_or_else(PoisonError::into_inner);
    let entry = guard
        .entry(key)
        .or_insert_with(|| Arc::clone(&built) as Arc<dyn Any + Send + Sync>);
    Ok(Arc::clone(entry).downcast::<Registry<T>>().unwrap_or(built))
}
