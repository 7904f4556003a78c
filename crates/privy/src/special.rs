//! Special protocol hooks
//!
//! Hooks are an explicit capability table rather than dynamically named
//! members: a class either fills a slot or leaves it empty.

use crate::value::Method;

/// Protocol hooks a class may forward to its scoped methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Special {
    /// Calling the object itself
    Call,
    /// String conversion
    Str,
    /// Debug representation
    Repr,
    /// Equality against another object
    Eq,
    /// State capture
    GetState,
    /// State restore
    SetState,
}

impl Special {
    /// Every hook, in declaration order
    pub const ALL: [Special; 6] = [
        Special::Call,
        Special::Str,
        Special::Repr,
        Special::Eq,
        Special::GetState,
        Special::SetState,
    ];

    /// Protocol name of the hook
    pub fn dunder(&self) -> &'static str {
        match self {
            Special::Call => "__call__",
            Special::Str => "__str__",
            Special::Repr => "__repr__",
            Special::Eq => "__eq__",
            Special::GetState => "__getstate__",
            Special::SetState => "__setstate__",
        }
    }

    /// Hook for a protocol name
    pub fn from_dunder(name: &str) -> Option<Special> {
        Special::ALL.into_iter().find(|hook| hook.dunder() == name)
    }
}

/// Optional handler per hook
#[derive(Debug, Clone, Default)]
pub struct SpecialHooks {
    call: Option<Method>,
    str: Option<Method>,
    repr: Option<Method>,
    eq: Option<Method>,
    get_state: Option<Method>,
    set_state: Option<Method>,
}

impl SpecialHooks {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, hook: Special) -> &Option<Method> {
        match hook {
            Special::Call => &self.call,
            Special::Str => &self.str,
            Special::Repr => &self.repr,
            Special::Eq => &self.eq,
            Special::GetState => &self.get_state,
            Special::SetState => &self.set_state,
        }
    }

    fn slot_mut(&mut self, hook: Special) -> &mut Option<Method> {
        match hook {
            Special::Call => &mut self.call,
            Special::Str => &mut self.str,
            Special::Repr => &mut self.repr,
            Special::Eq => &mut self.eq,
            Special::GetState => &mut self.get_state,
            Special::SetState => &mut self.set_state,
        }
    }

    /// Handler for `hook`
    pub fn get(&self, hook: Special) -> Option<&Method> {
        self.slot(hook).as_ref()
    }

    /// Install a handler, replacing any earlier one
    pub fn set(&mut self, hook: Special, method: Method) {
        *self.slot_mut(hook) = Some(method);
    }

    /// Check if `hook` has a handler
    pub fn has(&self, hook: Special) -> bool {
        self.slot(hook).is_some()
    }

    /// Hooks with handlers installed
    pub fn installed(&self) -> Vec<Special> {
        Special::ALL.into_iter().filter(|hook| self.has(*hook)).collect()
    }
}
