//! Scopes and scope proxies
//!
//! A [`Scope`] is the context every namespace routine, constructor and
//! method body runs in. It is built fresh for each declaration turn and each
//! call and is passed down explicitly, so two threads constructing objects
//! at the same time never share coordination state.
//!
//! A [`ScopeProxy`] is the `public` or `private` handle exposed by a scope.
//! Reads check the instance container first and fall back to the static
//! container of the same visibility. Writes go to the instance container;
//! [`ScopeProxy::statics`] targets the static container directly.

use crate::class::{Class, ClassRef};
use crate::error::{ScopeError, ScopeResult};
use crate::members::{validate_member_name, Containers, Visibility};
use crate::object::{Object, ObjectRef};
use crate::value::{Args, Method, Value};
use std::fmt;

/// Where static writes land in a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StaticWrites {
    /// Nearest class in the lineage that binds the name, else the bottom class
    Nearest,
    /// Always the bottom class; a derived declaration shadows its ancestors
    Own,
    /// Dropped; used while replaying an ancestor's routine
    Skip,
}

/// Where a proxy read was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Instance,
    Static,
}

/// Execution context for namespace routines and method bodies
#[derive(Clone, Copy)]
pub struct Scope<'a> {
    /// Bottom-level class of the object or declaration
    class_name: &'a str,
    /// Static containers of the bottom-level class
    statics: &'a Containers,
    /// Ancestors, nearest first
    lineage: &'a [ClassRef],
    /// Instance containers; absent in static scope
    instance: Option<&'a Containers>,
    /// Object the scope belongs to; absent in static and declaration scope
    this: Option<&'a Object>,
    static_writes: StaticWrites,
}

impl<'a> Scope<'a> {
    pub(crate) fn declaration(
        class_name: &'a str,
        statics: &'a Containers,
        lineage: &'a [ClassRef],
        instance: &'a Containers,
        static_writes: StaticWrites,
    ) -> Self {
        Self {
            class_name,
            statics,
            lineage,
            instance: Some(instance),
            this: None,
            static_writes,
        }
    }

    /// Static scope of a declared class
    pub(crate) fn for_class(class: &'a Class) -> Self {
        Self {
            class_name: class.name(),
            statics: class.statics(),
            lineage: class.lineage(),
            instance: None,
            this: None,
            static_writes: StaticWrites::Nearest,
        }
    }

    /// Instance scope of a constructed object
    pub(crate) fn for_object(object: &'a Object) -> Self {
        let class = object.class();
        Self {
            class_name: class.name(),
            statics: class.statics(),
            lineage: class.lineage(),
            instance: Some(object.containers()),
            this: Some(object),
            static_writes: StaticWrites::Nearest,
        }
    }

    /// Public handle
    pub fn public(&self) -> ScopeProxy<'a> {
        ScopeProxy::new(*self, Visibility::Public)
    }

    /// Private handle
    pub fn private(&self) -> ScopeProxy<'a> {
        ScopeProxy::new(*self, Visibility::Private)
    }

    /// Handle for `visibility`
    pub fn proxy(&self, visibility: Visibility) -> ScopeProxy<'a> {
        ScopeProxy::new(*self, visibility)
    }

    /// Name of the bottom-level class
    pub fn class_name(&self) -> &'a str {
        self.class_name
    }

    /// Whether instance members are out of reach
    pub fn is_static(&self) -> bool {
        self.instance.is_none()
    }

    /// The object this scope belongs to
    ///
    /// The handle is strong; storing it in the object's own members creates
    /// a cycle (see [`Value::Object`]).
    pub fn this(&self) -> Option<ObjectRef> {
        self.this.and_then(Object::handle)
    }

    /// Ancestors of the bottom-level class, nearest first
    pub fn lineage(&self) -> &'a [ClassRef] {
        self.lineage
    }

    /// Same scope with instance members removed
    pub fn static_view(&self) -> Scope<'a> {
        Scope {
            instance: None,
            this: None,
            ..*self
        }
    }

    /// Static containers binding `name`, nearest class first
    pub(crate) fn static_owner(&self, visibility: Visibility, name: &str) -> Option<&'a Containers> {
        if self.statics.contains(visibility, name) {
            return Some(self.statics);
        }
        self.lineage
            .iter()
            .map(|class| class.statics())
            .find(|statics| statics.contains(visibility, name))
    }

    fn find_static(&self, visibility: Visibility, name: &str) -> Option<Value> {
        self.static_owner(visibility, name)
            .and_then(|statics| statics.lookup(visibility, name))
    }

    fn write_static(&self, visibility: Visibility, name: &str, value: Value) {
        let owner = match self.static_writes {
            StaticWrites::Skip => {
                tracing::trace!(
                    class = self.class_name,
                    member = name,
                    "skipping ancestor static write during replay"
                );
                return;
            }
            StaticWrites::Own => self.statics,
            StaticWrites::Nearest => self.static_owner(visibility, name).unwrap_or(self.statics),
        };
        owner.bind(visibility, name, value);
    }
}

impl fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("class", &self.class_name)
            .field("static", &self.is_static())
            .field("lineage", &self.lineage.len())
            .finish()
    }
}

/// The `public` / `private` handle of a scope
#[derive(Debug, Clone, Copy)]
pub struct ScopeProxy<'a> {
    scope: Scope<'a>,
    visibility: Visibility,
    statics_only: bool,
}

impl<'a> ScopeProxy<'a> {
    fn new(scope: Scope<'a>, visibility: Visibility) -> Self {
        Self {
            scope,
            visibility,
            statics_only: false,
        }
    }

    /// Visibility this handle reads and writes
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Whether this handle targets the static container directly
    pub fn is_statics(&self) -> bool {
        self.statics_only
    }

    /// Handle targeting the static container of the same visibility
    pub fn statics(&self) -> ScopeProxy<'a> {
        ScopeProxy {
            statics_only: true,
            ..*self
        }
    }

    /// Read a member: instance container first, then statics
    pub fn get(&self, name: &str) -> ScopeResult<Value> {
        self.resolve(name)
            .map(|(value, _)| value)
            .ok_or_else(|| ScopeError::lookup(self.scope.class_name, name))
    }

    /// Check if a read of `name` would succeed
    pub fn has(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Bind a member
    ///
    /// The name is validated before anything is written.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> ScopeResult<()> {
        validate_member_name(self.scope.class_name, name)?;
        let value = value.into();
        if self.statics_only {
            self.scope.write_static(self.visibility, name, value);
            return Ok(());
        }
        match self.scope.instance {
            Some(instance) => {
                instance.bind(self.visibility, name, value);
                Ok(())
            }
            None => Err(ScopeError::access(
                self.scope.class_name,
                name,
                "is an instance member and cannot be written from static scope",
            )),
        }
    }

    /// Bind a method body under `name`
    pub fn method<F>(&self, name: &str, func: F) -> ScopeResult<()>
    where
        F: Fn(&Scope<'_>, Args<'_>) -> ScopeResult<Value> + Send + Sync + 'static,
    {
        self.set(name, Method::new(name, func))
    }

    /// Invoke a method member
    ///
    /// Instance methods run in this scope; static methods run in its static view.
    pub fn call(&self, name: &str, args: &[Value]) -> ScopeResult<Value> {
        let (value, origin) = self
            .resolve(name)
            .ok_or_else(|| ScopeError::lookup(self.scope.class_name, name))?;
        let method = value
            .as_method()
            .ok_or_else(|| ScopeError::not_callable(self.scope.class_name, name))?;
        match origin {
            Origin::Instance => method.invoke(&self.scope, args),
            Origin::Static => method.invoke(&self.scope.static_view(), args),
        }
    }

    fn resolve(&self, name: &str) -> Option<(Value, Origin)> {
        if !self.statics_only {
            if let Some(value) = self
                .scope
                .instance
                .and_then(|instance| instance.lookup(self.visibility, name))
            {
                return Some((value, Origin::Instance));
            }
        }
        self.scope
            .find_static(self.visibility, name)
            .map(|value| (value, Origin::Static))
    }
}
