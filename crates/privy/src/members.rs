//! Namespace containers
//!
//! A class owns four containers: the public and private instance templates
//! (copied into every new object) and the public and private static
//! containers (shared by every object of the class). Each pair is a
//! [`Containers`]; the frozen instance pair is a [`Template`].

use crate::error::{ScopeError, ScopeResult};
use crate::value::Value;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Protocol keywords that can never be bound as member names
pub const RESERVED_NAMES: [&str; 7] = [
    "constructor",
    "namespace",
    "method",
    "static",
    "public",
    "private",
    "special",
];

/// Check if `name` is a protocol keyword
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Check if `name` is a special (protocol hook) name like `__str__`
pub fn is_special(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

/// Reject names that may not be bound in a class named `class`
pub(crate) fn validate_member_name(class: &str, name: &str) -> ScopeResult<()> {
    if name.is_empty() {
        return Err(ScopeError::declaration(class, "member names must not be empty"));
    }
    if is_reserved(name) {
        return Err(ScopeError::declaration(
            class,
            format!("'{}' is a reserved name", name),
        ));
    }
    if name == class {
        return Err(ScopeError::declaration(
            class,
            format!("'{}' is reserved for the constructor", name),
        ));
    }
    Ok(())
}

/// Member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Reachable from outside the class
    Public,
    /// Reachable only from the class's own methods
    Private,
}

impl Visibility {
    /// Lowercase keyword for messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

/// Name to value bindings for one visibility level
#[derive(Debug, Clone, Default)]
pub struct Members {
    entries: FxHashMap<String, Value>,
}

impl Members {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a binding
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Bind `name`, returning the previous value
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(name.into(), value)
    }

    /// Remove a binding
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.entries.remove(name)
    }

    /// Check if `name` is bound
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the container is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bound names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Iterate over all bindings
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over bindings that are data rather than methods
    pub fn data(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.iter().filter(|(_, v)| !v.is_method())
    }
}

/// Frozen public/private instance containers produced at declaration
#[derive(Debug, Clone, Default)]
pub struct Template {
    public: Members,
    private: Members,
}

impl Template {
    /// Container for `visibility`
    pub fn side(&self, visibility: Visibility) -> &Members {
        match visibility {
            Visibility::Public => &self.public,
            Visibility::Private => &self.private,
        }
    }
}

/// Live public/private container pair
///
/// Locks are held only while a value is copied in or out.
#[derive(Debug, Default)]
pub struct Containers {
    public: RwLock<Members>,
    private: RwLock<Members>,
}

impl Containers {
    /// Create an empty pair
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh copy of a template
    pub fn from_template(template: &Template) -> Self {
        Self {
            public: RwLock::new(template.public.clone()),
            private: RwLock::new(template.private.clone()),
        }
    }

    /// Lock guarding the container for `visibility`
    pub fn side(&self, visibility: Visibility) -> &RwLock<Members> {
        match visibility {
            Visibility::Public => &self.public,
            Visibility::Private => &self.private,
        }
    }

    /// Copy a binding out
    pub fn lookup(&self, visibility: Visibility, name: &str) -> Option<Value> {
        self.side(visibility).read().get(name).cloned()
    }

    /// Check if `name` is bound under `visibility`
    pub fn contains(&self, visibility: Visibility, name: &str) -> bool {
        self.side(visibility).read().contains(name)
    }

    /// Visibility `name` is bound under, public first
    pub fn visibility_of(&self, name: &str) -> Option<Visibility> {
        [Visibility::Public, Visibility::Private]
            .into_iter()
            .find(|vis| self.contains(*vis, name))
    }

    /// Bind a value; callers validate the name first
    pub fn bind(&self, visibility: Visibility, name: &str, value: Value) {
        self.side(visibility).write().insert(name, value);
    }

    /// Number of bindings under `visibility`
    pub fn len(&self, visibility: Visibility) -> usize {
        self.side(visibility).read().len()
    }

    /// Snapshot the current bindings as a template
    pub fn to_template(&self) -> Template {
        Template {
            public: self.public.read().clone(),
            private: self.private.read().clone(),
        }
    }

    /// Consume the pair into a template
    pub fn into_template(self) -> Template {
        Template {
            public: self.public.into_inner(),
            private: self.private.into_inner(),
        }
    }
}
