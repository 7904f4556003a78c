//! Scoping errors

use thiserror::Error;

/// Errors raised while declaring classes, constructing objects, or accessing members
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScopeError {
    /// A member name is reserved or collides with the constructor name
    #[error("Declaration error in class {class}: {reason}")]
    Declaration {
        /// Class being declared or accessed
        class: String,
        /// Why the declaration was rejected
        reason: String,
    },

    /// The declared constructor is not named after its class
    #[error("Naming error: constructor '{found}' of class {class} must be named '{class}'")]
    Naming {
        /// Class being constructed
        class: String,
        /// Name the constructor was declared with
        found: String,
    },

    /// A member exists but is not reachable from the caller's position
    #[error("Access error: '{member}' of {class} {reason}")]
    Access {
        /// Class owning the member
        class: String,
        /// Member name
        member: String,
        /// Why access was denied
        reason: String,
    },

    /// No container visible to the caller binds the name
    #[error("Lookup error: {class} has no member '{member}'")]
    Lookup {
        /// Class that was searched
        class: String,
        /// Member name
        member: String,
    },

    /// A member was invoked but is not a method
    #[error("'{member}' of {class} is not callable")]
    NotCallable {
        /// Class owning the member
        class: String,
        /// Member name
        member: String,
    },

    /// A method received arguments it cannot use
    #[error("Argument error in {method}: {reason}")]
    Argument {
        /// Method that rejected its arguments
        method: String,
        /// What was wrong
        reason: String,
    },

    /// A value had the wrong dynamic type
    #[error("Type error: expected {expected}, got {actual}")]
    Type {
        /// Expected type name
        expected: String,
        /// Actual type name
        actual: String,
    },

    /// State capture or restore failed
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Raised by author code inside a method or constructor
    #[error("{0}")]
    Runtime(String),
}

impl ScopeError {
    /// Error raised from inside a method body
    pub fn runtime(message: impl Into<String>) -> Self {
        ScopeError::Runtime(message.into())
    }

    pub(crate) fn declaration(class: &str, reason: impl Into<String>) -> Self {
        ScopeError::Declaration {
            class: class.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn access(class: &str, member: &str, reason: impl Into<String>) -> Self {
        ScopeError::Access {
            class: class.to_string(),
            member: member.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn lookup(class: &str, member: &str) -> Self {
        ScopeError::Lookup {
            class: class.to_string(),
            member: member.to_string(),
        }
    }

    pub(crate) fn not_callable(class: &str, member: &str) -> Self {
        ScopeError::NotCallable {
            class: class.to_string(),
            member: member.to_string(),
        }
    }

    /// Whether this is an access violation (a recoverable per-call error)
    pub fn is_access(&self) -> bool {
        matches!(self, ScopeError::Access { .. })
    }

    /// Whether this is a missing-member error
    pub fn is_lookup(&self) -> bool {
        matches!(self, ScopeError::Lookup { .. })
    }
}

impl From<serde_json::Error> for ScopeError {
    fn from(err: serde_json::Error) -> Self {
        ScopeError::Snapshot(err.to_string())
    }
}

/// Result alias used throughout the crate
pub type ScopeResult<T> = Result<T, ScopeError>;
