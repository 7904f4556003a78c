//! Constructor dispatch
//!
//! Only the bottom-level class's constructor runs automatically. Ancestor
//! constructors are never chained implicitly; a derived constructor calls
//! them itself through [`Scope::call_base_constructor`].

use crate::class::Class;
use crate::error::{ScopeError, ScopeResult};
use crate::scope::Scope;
use crate::value::{Args, Method, Value};

/// A constructor captured during namespace setup
#[derive(Debug, Clone)]
pub struct Constructor {
    method: Method,
}

impl Constructor {
    /// Wrap a constructor body declared under `name`
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Scope<'_>, Args<'_>) -> ScopeResult<Value> + Send + Sync + 'static,
    {
        Self {
            method: Method::new(name, func),
        }
    }

    /// Name the constructor was declared with
    pub fn name(&self) -> &str {
        self.method.name()
    }

    /// Constructor body
    pub fn method(&self) -> &Method {
        &self.method
    }
}

impl Class {
    /// Fail with a naming error if the constructor is not named after the class
    pub(crate) fn verify_constructor(&self) -> ScopeResult<()> {
        match self.constructor() {
            Some(ctor) if self.options().check_constructor_name && ctor.name() != self.name() => {
                Err(ScopeError::Naming {
                    class: self.name().to_string(),
                    found: ctor.name().to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Run this class's constructor against `scope`
    ///
    /// A class without a constructor constructs as a no-op.
    pub(crate) fn dispatch_constructor(&self, scope: &Scope<'_>, args: &[Value]) -> ScopeResult<Value> {
        self.verify_constructor()?;
        match self.constructor() {
            Some(ctor) => ctor.method().invoke(scope, args),
            None => {
                tracing::trace!(class = self.name(), "no constructor declared");
                Ok(Value::Null)
            }
        }
    }
}

impl Scope<'_> {
    /// Run the constructor of ancestor `base` against this object
    pub fn call_base_constructor(&self, base: &str, args: &[Value]) -> ScopeResult<Value> {
        let class = self
            .lineage()
            .iter()
            .find(|class| class.name() == base)
            .ok_or_else(|| ScopeError::lookup(self.class_name(), base))?;
        if self.is_static() {
            return Err(ScopeError::access(
                self.class_name(),
                base,
                "constructor can only run in instance scope",
            ));
        }
        class.dispatch_constructor(self, args)
    }
}
