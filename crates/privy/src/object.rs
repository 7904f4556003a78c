//! Scoped objects and the attribute interceptor
//!
//! An object owns a fresh copy of its class's instance containers. While
//! the constructor runs the object is unsealed and external reads and
//! writes see every container. Once construction finishes the object is
//! sealed and every external access goes through the interceptor:
//!
//! - special names (`__str__`, ...) are always reachable,
//! - static members are refused; they belong to the class,
//! - private members are refused unless a public member shares the name,
//! - everything else resolves against the public instance container.

use crate::class::{Class, ClassRef};
use crate::error::{ScopeError, ScopeResult};
use crate::members::{is_special, validate_member_name, Containers, Visibility};
use crate::scope::Scope;
use crate::special::Special;
use crate::value::Value;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Global counter for generating unique object IDs
static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique object ID
fn next_object_id() -> u64 {
    NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Shared handle to an object
pub type ObjectRef = Arc<Object>;

/// Object instance
pub struct Object {
    id: u64,
    class: ClassRef,
    containers: Containers,
    /// Set once construction succeeds; switches on the interceptor
    sealed: AtomicBool,
    handle: Weak<Object>,
}

impl Object {
    /// Allocate an unsealed object from the class template
    pub(crate) fn instantiate(class: &ClassRef) -> ObjectRef {
        Arc::new_cyclic(|handle| Object {
            id: next_object_id(),
            class: Arc::clone(class),
            containers: Containers::from_template(class.template()),
            sealed: AtomicBool::new(false),
            handle: handle.clone(),
        })
    }

    /// Process-unique object ID
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Class the object was constructed from
    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    /// Check if the object's class is `name` or inherits from it
    pub fn is_instance_of(&self, name: &str) -> bool {
        self.class.is_subclass_of(name)
    }

    /// Whether construction has finished
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    pub(crate) fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
    }

    /// Shared handle to this object
    pub fn handle(&self) -> Option<ObjectRef> {
        self.handle.upgrade()
    }

    pub(crate) fn containers(&self) -> &Containers {
        &self.containers
    }

    /// Representation used when no hook applies
    pub fn default_repr(&self) -> String {
        format!("<{} object #{}>", self.class.name(), self.id)
    }

    fn scope(&self) -> Scope<'_> {
        Scope::for_object(self)
    }

    /// Refuse static names and names bound only privately
    fn check_reachable(&self, name: &str) -> ScopeResult<()> {
        if let Some(visibility) = self.class.static_visibility(name) {
            tracing::trace!(class = self.class.name(), member = name, "denied static access through instance");
            return Err(ScopeError::access(
                self.class.name(),
                name,
                format!(
                    "is a {} static member and must be reached through the class",
                    visibility.as_str()
                ),
            ));
        }
        if self.containers.contains(Visibility::Private, name)
            && !self.containers.contains(Visibility::Public, name)
        {
            tracing::trace!(class = self.class.name(), member = name, "denied private access");
            return Err(ScopeError::access(self.class.name(), name, "is private"));
        }
        Ok(())
    }

    /// Read a member from outside the class
    pub fn get(&self, name: &str) -> ScopeResult<Value> {
        if !self.is_sealed() {
            return self.raw_get(name);
        }
        if is_special(name) {
            if let Some(hook) = Special::from_dunder(name).and_then(|hook| self.class.hooks().get(hook)) {
                return Ok(Value::Method(hook.clone()));
            }
        } else {
            self.check_reachable(name)?;
        }
        self.containers
            .lookup(Visibility::Public, name)
            .ok_or_else(|| ScopeError::lookup(self.class.name(), name))
    }

    /// Check if an external read of `name` would succeed
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// Write a member from outside the class
    pub fn set(&self, name: &str, value: impl Into<Value>) -> ScopeResult<()> {
        validate_member_name(self.class.name(), name)?;
        if self.is_sealed() && !is_special(name) {
            self.check_reachable(name)?;
            if !self.class.options().allow_dynamic_members
                && !self.containers.contains(Visibility::Public, name)
            {
                return Err(ScopeError::access(
                    self.class.name(),
                    name,
                    "is not a declared member",
                ));
            }
        }
        self.containers.bind(Visibility::Public, name, value.into());
        Ok(())
    }

    /// Call a public method from outside the class
    pub fn call(&self, name: &str, args: &[Value]) -> ScopeResult<Value> {
        if !self.is_sealed() {
            let scope = self.scope();
            return if scope.public().has(name) {
                scope.public().call(name, args)
            } else {
                scope.private().call(name, args)
            };
        }
        if is_special(name) {
            if let Some(hook) = Special::from_dunder(name) {
                return self.run_hook(hook, args);
            }
        } else {
            self.check_reachable(name)?;
        }
        self.scope().public().call(name, args)
    }

    /// Call the object itself
    pub fn invoke(&self, args: &[Value]) -> ScopeResult<Value> {
        self.run_hook(Special::Call, args)
    }

    /// String conversion through the `Str` hook
    pub fn render(&self) -> ScopeResult<String> {
        if !self.class.hooks().has(Special::Str) {
            return Ok(self.default_repr());
        }
        let value = self.run_hook(Special::Str, &[])?;
        Ok(value.expect_str()?.to_string())
    }

    /// Debug representation through the `Repr` hook, falling back to `render`
    pub fn repr(&self) -> ScopeResult<String> {
        if !self.class.hooks().has(Special::Repr) {
            return self.render();
        }
        let value = self.run_hook(Special::Repr, &[])?;
        Ok(value.expect_str()?.to_string())
    }

    /// Equality through the `Eq` hook, falling back to identity
    pub fn equals(&self, other: &ObjectRef) -> ScopeResult<bool> {
        if !self.class.hooks().has(Special::Eq) {
            return Ok(std::ptr::eq(self, Arc::as_ptr(other)));
        }
        let value = self.run_hook(Special::Eq, &[Value::Object(Arc::clone(other))])?;
        value.as_bool().ok_or_else(|| ScopeError::Type {
            expected: "bool".to_string(),
            actual: value.type_name().to_string(),
        })
    }

    pub(crate) fn run_hook(&self, hook: Special, args: &[Value]) -> ScopeResult<Value> {
        let method = self
            .class
            .hooks()
            .get(hook)
            .ok_or_else(|| ScopeError::not_callable(self.class.name(), hook.dunder()))?;
        method.invoke(&self.scope(), args)
    }

    fn raw_get(&self, name: &str) -> ScopeResult<Value> {
        let scope = self.scope();
        scope
            .public()
            .get(name)
            .or_else(|_| scope.private().get(name))
    }
}

impl Class {
    /// Construct an object
    ///
    /// The constructor name is checked before any author code runs. On
    /// failure the half-built object is dropped and never returned.
    pub fn construct(self: &Arc<Self>, args: &[Value]) -> ScopeResult<ObjectRef> {
        self.verify_constructor()?;
        let object = Object::instantiate(self);
        self.dispatch_constructor(&object.scope(), args)?;
        object.seal();
        tracing::debug!(class = self.name(), id = object.id(), "object constructed");
        Ok(object)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("id", &self.id)
            .field("class", &self.class.name())
            .field("sealed", &self.is_sealed())
            .finish()
    }
}

impl fmt::Display for Object {
    /// Uses the `Str` hook; a failing hook surfaces as `fmt::Error`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.render().map_err(|_| fmt::Error)?;
        write!(f, "{}", rendered)
    }
}
