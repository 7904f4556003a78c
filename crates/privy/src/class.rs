//! Class declarations
//!
//! [`ClassBuilder`] turns a name, a list of parents and a namespace setup
//! routine into an immutable [`Class`]. Declaring runs every setup routine
//! in the inheritance chain once, so reserved-name mistakes fail here,
//! before any object exists.

use crate::constructor::Constructor;
use crate::error::{ScopeError, ScopeResult};
use crate::members::{is_reserved, validate_member_name, Containers, Template, Visibility};
use crate::namespace::{self, Namespace, SetupFn};
use crate::options::ClassOptions;
use crate::scope::Scope;
use crate::special::SpecialHooks;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a declared class
pub type ClassRef = Arc<Class>;

/// Builder for a scoped class
pub struct ClassBuilder {
    name: String,
    parents: Vec<ClassRef>,
    setup: Option<Arc<SetupFn>>,
    options: ClassOptions,
}

impl ClassBuilder {
    /// Start declaring a class called `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parents: Vec::new(),
            setup: None,
            options: ClassOptions::default(),
        }
    }

    /// Add a parent class; parents apply in the order they are added
    pub fn parent(mut self, parent: &ClassRef) -> Self {
        self.parents.push(Arc::clone(parent));
        self
    }

    /// Add several parent classes
    pub fn parents<'p>(mut self, parents: impl IntoIterator<Item = &'p ClassRef>) -> Self {
        self.parents.extend(parents.into_iter().cloned());
        self
    }

    /// Set the namespace setup routine
    pub fn namespace<F>(mut self, setup: F) -> Self
    where
        F: Fn(&mut Namespace<'_>) -> ScopeResult<()> + Send + Sync + 'static,
    {
        self.setup = Some(Arc::new(setup));
        self
    }

    /// Set the class options
    pub fn options(mut self, options: ClassOptions) -> Self {
        self.options = options;
        self
    }

    /// Name of the class being declared
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the namespace routines and produce the class
    pub fn build(self) -> ScopeResult<ClassRef> {
        if self.name.is_empty() {
            return Err(ScopeError::declaration("<anonymous>", "class name must not be empty"));
        }
        if is_reserved(&self.name) {
            return Err(ScopeError::declaration(
                &self.name,
                format!("'{}' is a reserved name", self.name),
            ));
        }

        let ancestors = namespace::linearize(&self.name, &self.parents, self.options.max_lineage_depth)?;
        let lineage: Vec<ClassRef> = ancestors.iter().rev().cloned().collect();
        let statics = Containers::new();
        let declared = namespace::declare(
            &self.name,
            self.setup.as_ref(),
            &ancestors,
            &lineage,
            &statics,
        )?;

        tracing::debug!(
            class = %self.name,
            ancestors = lineage.len(),
            public = declared.template.side(Visibility::Public).len(),
            private = declared.template.side(Visibility::Private).len(),
            statics = statics.len(Visibility::Public) + statics.len(Visibility::Private),
            constructor = declared.constructor.is_some(),
            "class declared"
        );

        Ok(Arc::new(Class {
            name: self.name,
            parents: self.parents,
            lineage,
            setup: self.setup,
            template: declared.template,
            statics,
            constructor: declared.constructor,
            hooks: declared.hooks,
            options: self.options,
        }))
    }
}

impl fmt::Debug for ClassBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassBuilder")
            .field("name", &self.name)
            .field("parents", &self.parents.iter().map(|p| p.name()).collect::<Vec<_>>())
            .field("has_namespace", &self.setup.is_some())
            .field("options", &self.options)
            .finish()
    }
}

/// A declared class
///
/// Static containers live as long as the class and are shared by every
/// object constructed from it or resolving through it.
pub struct Class {
    name: String,
    parents: Vec<ClassRef>,
    /// Ancestors, nearest first
    lineage: Vec<ClassRef>,
    setup: Option<Arc<SetupFn>>,
    template: Template,
    statics: Containers,
    constructor: Option<Constructor>,
    hooks: SpecialHooks,
    options: ClassOptions,
}

impl Class {
    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct parents, in declaration order
    pub fn parents(&self) -> &[ClassRef] {
        &self.parents
    }

    /// Every ancestor, nearest first
    pub fn lineage(&self) -> &[ClassRef] {
        &self.lineage
    }

    /// Check if this class is `name` or inherits from it
    pub fn is_subclass_of(&self, name: &str) -> bool {
        self.name == name || self.lineage.iter().any(|class| class.name() == name)
    }

    /// Captured constructor
    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }

    /// Special hook table
    pub fn hooks(&self) -> &SpecialHooks {
        &self.hooks
    }

    /// Class options
    pub fn options(&self) -> &ClassOptions {
        &self.options
    }

    /// Names every new object starts with under `visibility`
    pub fn instance_members(&self, visibility: Visibility) -> Vec<String> {
        self.template.side(visibility).names()
    }

    /// Names bound in this class's own static container
    pub fn static_members(&self, visibility: Visibility) -> Vec<String> {
        self.statics.side(visibility).read().names()
    }

    pub(crate) fn setup(&self) -> Option<&Arc<SetupFn>> {
        self.setup.as_ref()
    }

    pub(crate) fn statics(&self) -> &Containers {
        &self.statics
    }

    pub(crate) fn template(&self) -> &Template {
        &self.template
    }

    /// Visibility of a static binding of `name` anywhere in the lineage
    pub(crate) fn static_visibility(&self, name: &str) -> Option<Visibility> {
        let scope = Scope::for_class(self);
        [Visibility::Public, Visibility::Private]
            .into_iter()
            .find(|vis| scope.static_owner(*vis, name).is_some())
    }

    fn deny_private_static(&self, name: &str) -> ScopeResult<()> {
        if Scope::for_class(self)
            .static_owner(Visibility::Private, name)
            .is_some()
        {
            tracing::trace!(class = %self.name, member = name, "denied private static access");
            return Err(ScopeError::access(&self.name, name, "is a private static member"));
        }
        Ok(())
    }

    /// Read a public static member
    pub fn get(&self, name: &str) -> ScopeResult<Value> {
        let public = Scope::for_class(self).public().statics();
        if public.has(name) {
            return public.get(name);
        }
        self.deny_private_static(name)?;
        Err(ScopeError::lookup(&self.name, name))
    }

    /// Check if a public static member is reachable through the class
    pub fn has(&self, name: &str) -> bool {
        Scope::for_class(self).public().statics().has(name)
    }

    /// Write a public static member
    ///
    /// The write lands in the nearest class that already binds the name,
    /// otherwise in this class.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> ScopeResult<()> {
        validate_member_name(&self.name, name)?;
        if !self.has(name) {
            self.deny_private_static(name)?;
        }
        Scope::for_class(self).public().statics().set(name, value)
    }

    /// Call a public static method
    pub fn call(&self, name: &str, args: &[Value]) -> ScopeResult<Value> {
        let public = Scope::for_class(self).public().statics();
        if !public.has(name) {
            self.deny_private_static(name)?;
            return Err(ScopeError::lookup(&self.name, name));
        }
        public.call(name, args)
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("lineage", &self.lineage.iter().map(|c| c.name()).collect::<Vec<_>>())
            .field("constructor", &self.constructor.as_ref().map(|c| c.name()))
            .field("hooks", &self.hooks.installed())
            .finish()
    }
}
