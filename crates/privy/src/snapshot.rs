//! State capture and restore
//!
//! A [`Snapshot`] records the data members of an object's instance
//! containers, or whatever its `GetState` hook returns. Restoring builds a
//! new object from the class template without running the constructor.

use crate::class::Class;
use crate::error::{ScopeError, ScopeResult};
use crate::members::{validate_member_name, Visibility};
use crate::object::{Object, ObjectRef};
use crate::special::Special;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Serializable state of one object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Class the state was captured from
    pub class: String,
    /// Public data members
    #[serde(default)]
    pub public: BTreeMap<String, serde_json::Value>,
    /// Private data members
    #[serde(default)]
    pub private: BTreeMap<String, serde_json::Value>,
    /// Value returned by the `GetState` hook, when the class declares one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<serde_json::Value>,
}

impl Snapshot {
    /// Encode as a JSON string
    pub fn to_json(&self) -> ScopeResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from a JSON string
    pub fn from_json(json: &str) -> ScopeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn capture(object: &Object, visibility: Visibility) -> ScopeResult<BTreeMap<String, serde_json::Value>> {
    let members = object.containers().side(visibility).read();
    let mut out = BTreeMap::new();
    for (name, value) in members.data() {
        out.insert(name.to_string(), value.to_json()?);
    }
    Ok(out)
}

impl Object {
    /// Capture this object's state
    pub fn snapshot(&self) -> ScopeResult<Snapshot> {
        let class = self.class().name().to_string();
        if self.class().hooks().has(Special::GetState) {
            let state = self.run_hook(Special::GetState, &[])?.to_json()?;
            return Ok(Snapshot {
                class,
                public: BTreeMap::new(),
                private: BTreeMap::new(),
                state: Some(state),
            });
        }
        Ok(Snapshot {
            class,
            public: capture(self, Visibility::Public)?,
            private: capture(self, Visibility::Private)?,
            state: None,
        })
    }
}

impl Class {
    /// Apply the checks an external write of `name` would face
    fn check_restorable(&self, visibility: Visibility, name: &str) -> ScopeResult<()> {
        validate_member_name(self.name(), name)?;
        if visibility == Visibility::Public && self.static_visibility(name).is_some() {
            return Err(ScopeError::access(
                self.name(),
                name,
                "is a static member and cannot be restored into an instance",
            ));
        }
        if !self.options().allow_dynamic_members && !self.template().side(visibility).contains(name) {
            return Err(ScopeError::access(self.name(), name, "is not a declared member"));
        }
        Ok(())
    }

    /// Rebuild an object from a snapshot
    pub fn restore(self: &Arc<Self>, snapshot: &Snapshot) -> ScopeResult<ObjectRef> {
        if snapshot.class != self.name() {
            return Err(ScopeError::Snapshot(format!(
                "snapshot of {} cannot restore into {}",
                snapshot.class,
                self.name()
            )));
        }
        let object = Object::instantiate(self);

        match &snapshot.state {
            Some(state) => {
                object.run_hook(Special::SetState, &[Value::from_json(state)?])?;
            }
            None => {
                for (visibility, members) in [
                    (Visibility::Public, &snapshot.public),
                    (Visibility::Private, &snapshot.private),
                ] {
                    for (name, json) in members {
                        self.check_restorable(visibility, name)?;
                        object.containers().bind(visibility, name, Value::from_json(json)?);
                    }
                }
            }
        }

        object.seal();
        tracing::debug!(class = self.name(), id = object.id(), "object restored");
        Ok(object)
    }
}
