//! Privy: scoped members for dynamic objects
//!
//! This crate provides runtime public/private visibility and static/instance
//! scoping for classes built on a dynamic member-table object model:
//! - Four namespaces per class: public and private instance members, public
//!   and private static members
//! - Namespace setup routines that declare members, applied base class first
//! - Constructors that must be named after their class
//! - An attribute interceptor that keeps private and static members out of
//!   reach of code holding an instance
//! - Special protocol hooks (call, string conversion, equality, state)
//!
//! ```
//! use privy::{ClassBuilder, Target, Value};
//!
//! let account = ClassBuilder::new("Account")
//!     .namespace(|ns| {
//!         ns.private().set("balance", 0)?;
//!         ns.constructor("Account", |this, args| {
//!             this.private().set("balance", args.int(0)?)?;
//!             Ok(Value::Null)
//!         })?;
//!         ns.method(Target::Public, "get_balance", |this, _| this.private().get("balance"))
//!     })
//!     .build()?;
//!
//! let a = account.construct(&[Value::from(10)])?;
//! assert_eq!(a.call("get_balance", &[])?, Value::from(10));
//! assert!(a.get("balance").is_err());
//! # Ok::<(), privy::ScopeError>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod class;
pub mod constructor;
pub mod error;
pub mod members;
pub mod namespace;
pub mod object;
pub mod options;
pub mod registry;
pub mod scope;
pub mod snapshot;
pub mod special;
pub mod value;

pub use class::{Class, ClassBuilder, ClassRef};
pub use constructor::Constructor;
pub use error::{ScopeError, ScopeResult};
pub use members::{is_reserved, is_special, Members, Visibility, RESERVED_NAMES};
pub use namespace::{Namespace, SetupFn, Target};
pub use object::{Object, ObjectRef};
pub use options::ClassOptions;
pub use registry::ClassRegistry;
pub use scope::{Scope, ScopeProxy};
pub use snapshot::Snapshot;
pub use special::{Special, SpecialHooks};
pub use value::{Args, Method, Value};
