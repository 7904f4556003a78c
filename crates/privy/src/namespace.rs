//! Namespace declaration
//!
//! Every class carries a setup routine that binds its members through a
//! [`Namespace`]. Declaring a class runs the routines of all its ancestors,
//! base classes first, and then its own, all against the same fresh
//! instance containers, so later bindings override earlier ones.
//!
//! Static initializers belong to the class whose routine declares them and
//! take effect only during that class's own declaration; replaying an
//! ancestor's routine for a subclass leaves the ancestor's statics alone.
//! A static the subclass declares itself binds into the subclass and
//! shadows any ancestor binding of the same name.

use crate::class::ClassRef;
use crate::constructor::Constructor;
use crate::error::{ScopeError, ScopeResult};
use crate::members::{Containers, Template, Visibility};
use crate::scope::{Scope, ScopeProxy, StaticWrites};
use crate::special::{Special, SpecialHooks};
use crate::value::{Args, Method, Value};
use std::fmt;
use std::sync::Arc;

/// Signature of a namespace setup routine
pub type SetupFn = dyn Fn(&mut Namespace<'_>) -> ScopeResult<()> + Send + Sync;

/// Container a method declaration binds into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// `public`
    Public,
    /// `private`
    Private,
    /// `public.static`
    PublicStatic,
    /// `private.static`
    PrivateStatic,
}

impl Target {
    /// Visibility of the target container
    pub fn visibility(&self) -> Visibility {
        match self {
            Target::Public | Target::PublicStatic => Visibility::Public,
            Target::Private | Target::PrivateStatic => Visibility::Private,
        }
    }

    /// Whether the target is a static container
    pub fn is_static(&self) -> bool {
        matches!(self, Target::PublicStatic | Target::PrivateStatic)
    }
}

/// Handle passed to a namespace setup routine
pub struct Namespace<'a> {
    scope: Scope<'a>,
    /// Class whose routine is running
    turn: &'a str,
    /// Whether the running routine belongs to the class being declared
    own_turn: bool,
    constructor: &'a mut Option<Constructor>,
    hooks: &'a mut SpecialHooks,
}

impl<'a> Namespace<'a> {
    /// Public handle
    pub fn public(&self) -> ScopeProxy<'a> {
        self.scope.public()
    }

    /// Private handle
    pub fn private(&self) -> ScopeProxy<'a> {
        self.scope.private()
    }

    /// Underlying scope
    pub fn scope(&self) -> Scope<'a> {
        self.scope
    }

    /// Name of the class being declared
    pub fn class_name(&self) -> &'a str {
        self.scope.class_name()
    }

    /// Name of the class whose routine is running
    pub fn declaring(&self) -> &'a str {
        self.turn
    }

    /// Declare the class constructor
    ///
    /// A later declaration replaces an earlier one. The name is checked
    /// against the class name when an object is constructed.
    pub fn constructor<F>(&mut self, name: &str, func: F) -> ScopeResult<()>
    where
        F: Fn(&Scope<'_>, Args<'_>) -> ScopeResult<Value> + Send + Sync + 'static,
    {
        if name.is_empty() {
            return Err(ScopeError::declaration(
                self.class_name(),
                "constructor name must not be empty",
            ));
        }
        if !self.own_turn {
            // Belongs to the ancestor, which captured it when it was declared.
            return Ok(());
        }
        if let Some(previous) = self.constructor.replace(Constructor::new(name, func)) {
            tracing::debug!(
                class = self.class_name(),
                replaced = previous.name(),
                "constructor redeclared"
            );
        }
        Ok(())
    }

    /// Bind a method into `target`
    pub fn method<F>(&mut self, target: Target, name: &str, func: F) -> ScopeResult<()>
    where
        F: Fn(&Scope<'_>, Args<'_>) -> ScopeResult<Value> + Send + Sync + 'static,
    {
        let proxy = self.scope.proxy(target.visibility());
        let proxy = if target.is_static() { proxy.statics() } else { proxy };
        proxy.method(name, func)
    }

    /// Forward a protocol hook to a scoped body
    pub fn special<F>(&mut self, hook: Special, func: F) -> ScopeResult<()>
    where
        F: Fn(&Scope<'_>, Args<'_>) -> ScopeResult<Value> + Send + Sync + 'static,
    {
        self.hooks.set(hook, Method::new(hook.dunder(), func));
        Ok(())
    }
}

impl fmt::Debug for Namespace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("class", &self.class_name())
            .field("declaring", &self.turn)
            .finish()
    }
}

/// Product of running every routine for one class
pub(crate) struct Declared {
    pub(crate) template: Template,
    pub(crate) constructor: Option<Constructor>,
    pub(crate) hooks: SpecialHooks,
}

/// Ancestors of a class with the given parents, base classes first
///
/// An ancestor reachable along several paths appears once.
pub(crate) fn linearize(
    class_name: &str,
    parents: &[ClassRef],
    max_depth: usize,
) -> ScopeResult<Vec<ClassRef>> {
    fn visit(
        class_name: &str,
        class: &ClassRef,
        depth: usize,
        max_depth: usize,
        out: &mut Vec<ClassRef>,
    ) -> ScopeResult<()> {
        if depth > max_depth {
            return Err(ScopeError::declaration(
                class_name,
                format!("inheritance chain deeper than {} levels", max_depth),
            ));
        }
        if out.iter().any(|seen| Arc::ptr_eq(seen, class)) {
            return Ok(());
        }
        for parent in class.parents() {
            visit(class_name, parent, depth + 1, max_depth, out)?;
        }
        if !out.iter().any(|seen| Arc::ptr_eq(seen, class)) {
            out.push(Arc::clone(class));
        }
        Ok(())
    }

    let mut out = Vec::new();
    for parent in parents {
        visit(class_name, parent, 1, max_depth, &mut out)?;
    }
    Ok(out)
}

/// Run ancestor routines (base first) and then the class's own routine
pub(crate) fn declare(
    class_name: &str,
    setup: Option<&Arc<SetupFn>>,
    ancestors: &[ClassRef],
    lineage: &[ClassRef],
    statics: &Containers,
) -> ScopeResult<Declared> {
    let instance = Containers::new();
    let mut constructor = None;
    let mut hooks = SpecialHooks::new();

    for ancestor in ancestors {
        if let Some(routine) = ancestor.setup() {
            tracing::trace!(class = class_name, ancestor = ancestor.name(), "replaying ancestor namespace");
            let mut ns = Namespace {
                scope: Scope::declaration(class_name, statics, lineage, &instance, StaticWrites::Skip),
                turn: ancestor.name(),
                own_turn: false,
                constructor: &mut constructor,
                hooks: &mut hooks,
            };
            routine(&mut ns)?;
        }
    }

    if let Some(routine) = setup {
        let mut ns = Namespace {
            scope: Scope::declaration(class_name, statics, lineage, &instance, StaticWrites::Own),
            turn: class_name,
            own_turn: true,
            constructor: &mut constructor,
            hooks: &mut hooks,
        };
        routine(&mut ns)?;
    }

    Ok(Declared {
        template: instance.into_template(),
        constructor,
        hooks,
    })
}
