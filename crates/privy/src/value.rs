//! Dynamic value representation
//!
//! Every scoped member is stored as a [`Value`]. Data and behavior share one
//! table: a method is just a value holding a [`Method`], which is why member
//! lookup never needs to know in advance what kind of member it will find.

use crate::error::{ScopeError, ScopeResult};
use crate::object::ObjectRef;
use crate::scope::Scope;
use std::fmt;
use std::sync::Arc;

/// Signature of every method, constructor and special hook body
pub type MethodFn = dyn Fn(&Scope<'_>, Args<'_>) -> ScopeResult<Value> + Send + Sync;

/// A named, shareable method body
#[derive(Clone)]
pub struct Method {
    name: Arc<str>,
    func: Arc<MethodFn>,
}

impl Method {
    /// Wrap a closure as a method
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Scope<'_>, Args<'_>) -> ScopeResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            func: Arc::new(func),
        }
    }

    /// Declared name of the method
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the method body against `scope`
    pub fn invoke(&self, scope: &Scope<'_>, args: &[Value]) -> ScopeResult<Value> {
        (self.func)(scope, Args::new(&self.name, args))
    }

    /// Whether both handles share one body
    pub fn ptr_eq(&self, other: &Method) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<method {}>", self.name)
    }
}

/// Positional arguments handed to a method body
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    method: &'a str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    /// View `values` as the arguments of `method`
    pub fn new(method: &'a str, values: &'a [Value]) -> Self {
        Self { method, values }
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no arguments were passed
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All arguments
    pub fn as_slice(&self) -> &'a [Value] {
        self.values
    }

    /// Fail unless exactly `count` arguments were passed
    pub fn expect(&self, count: usize) -> ScopeResult<()> {
        if self.values.len() == count {
            Ok(())
        } else {
            Err(self.error(format!(
                "expected {} argument(s), got {}",
                count,
                self.values.len()
            )))
        }
    }

    /// Argument at `index`
    pub fn get(&self, index: usize) -> ScopeResult<&'a Value> {
        self.values
            .get(index)
            .ok_or_else(|| self.error(format!("missing argument {}", index)))
    }

    /// Argument at `index`, cloned
    pub fn value(&self, index: usize) -> ScopeResult<Value> {
        self.get(index).cloned()
    }

    /// Integer argument
    pub fn int(&self, index: usize) -> ScopeResult<i64> {
        let value = self.get(index)?;
        value.as_int().ok_or_else(|| self.mismatch(index, "int", value))
    }

    /// Numeric argument (integers widen)
    pub fn float(&self, index: usize) -> ScopeResult<f64> {
        let value = self.get(index)?;
        value
            .as_float()
            .ok_or_else(|| self.mismatch(index, "float", value))
    }

    /// Boolean argument
    pub fn bool(&self, index: usize) -> ScopeResult<bool> {
        let value = self.get(index)?;
        value.as_bool().ok_or_else(|| self.mismatch(index, "bool", value))
    }

    /// String argument
    pub fn str(&self, index: usize) -> ScopeResult<&'a str> {
        let value = self.get(index)?;
        value.as_str().ok_or_else(|| self.mismatch(index, "str", value))
    }

    /// Object argument
    pub fn object(&self, index: usize) -> ScopeResult<ObjectRef> {
        let value = self.get(index)?;
        value
            .as_object()
            .cloned()
            .ok_or_else(|| self.mismatch(index, "object", value))
    }

    fn mismatch(&self, index: usize, expected: &str, actual: &Value) -> ScopeError {
        self.error(format!(
            "argument {} must be {}, got {}",
            index,
            expected,
            actual.type_name()
        ))
    }

    fn error(&self, reason: String) -> ScopeError {
        ScopeError::Argument {
            method: self.method.to_string(),
            reason,
        }
    }
}

/// A member value
#[derive(Clone, Default)]
pub enum Value {
    /// Absence of a value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// UTF-8 string
    Str(String),
    /// Ordered list of values
    List(Vec<Value>),
    /// Method body
    Method(Method),
    /// Strong reference to a scoped object
    ///
    /// An object holding a reference to itself, directly or through other
    /// objects, forms a reference cycle and is never freed. Rebind the
    /// member (for example to `Null`) to break the cycle.
    Object(ObjectRef),
}

impl Value {
    /// Name of the dynamic type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Method(_) => "method",
            Value::Object(_) => "object",
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is a method
    pub fn is_method(&self) -> bool {
        matches!(self, Value::Method(_))
    }

    /// Extract boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract integer value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract numeric value, widening integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Extract string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Extract list elements
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Extract method
    pub fn as_method(&self) -> Option<&Method> {
        match self {
            Value::Method(m) => Some(m),
            _ => None,
        }
    }

    /// Extract object reference
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Extract integer value or fail with a type error
    pub fn expect_int(&self) -> ScopeResult<i64> {
        self.as_int().ok_or_else(|| self.type_error("int"))
    }

    /// Extract string slice or fail with a type error
    pub fn expect_str(&self) -> ScopeResult<&str> {
        self.as_str().ok_or_else(|| self.type_error("str"))
    }

    fn type_error(&self, expected: &str) -> ScopeError {
        ScopeError::Type {
            expected: expected.to_string(),
            actual: self.type_name().to_string(),
        }
    }

    /// Convert a data value to JSON
    ///
    /// Methods and objects have no JSON form and are rejected.
    pub fn to_json(&self) -> ScopeResult<serde_json::Value> {
        Ok(match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .ok_or_else(|| ScopeError::Snapshot(format!("float {} has no JSON form", f)))?,
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<ScopeResult<Vec<_>>>()?,
            ),
            Value::Method(_) | Value::Object(_) => {
                return Err(ScopeError::Snapshot(format!(
                    "{} values cannot be serialized",
                    self.type_name()
                )))
            }
        })
    }

    /// Convert JSON back into a data value
    pub fn from_json(json: &serde_json::Value) -> ScopeResult<Value> {
        Ok(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().ok_or_else(|| {
                    ScopeError::Snapshot(format!("number {} is out of range", n))
                })?),
            },
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => Value::List(
                items
                    .iter()
                    .map(Value::from_json)
                    .collect::<ScopeResult<Vec<_>>>()?,
            ),
            serde_json::Value::Object(_) => {
                return Err(ScopeError::Snapshot(
                    "JSON objects have no value counterpart".to_string(),
                ))
            }
        })
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Method(a), Value::Method(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Int(i) => write!(f, "Int({})", i),
            Value::Float(x) => write!(f, "Float({})", x),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Method(m) => write!(f, "Method({})", m.name()),
            Value::Object(o) => write!(f, "Object({}#{})", o.class().name(), o.id()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Method(m) => write!(f, "<method {}>", m.name()),
            // Display of a value never runs author hooks.
            Value::Object(o) => write!(f, "{}", o.default_repr()),
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Method> for Value {
    fn from(m: Method) -> Self {
        Value::Method(m)
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::from(7).as_int(), Some(7));
        assert_eq!(Value::from(7).as_float(), Some(7.0));
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert!(Value::default().is_null());
        assert_eq!(Value::from("hi").as_int(), None);
    }

    #[test]
    fn test_expect_type_error() {
        let err = Value::from("x").expect_int().unwrap_err();
        assert_eq!(
            err,
            ScopeError::Type {
                expected: "int".to_string(),
                actual: "str".to_string(),
            }
        );
    }

    #[test]
    fn test_args_arity_and_types() {
        let values = vec![Value::from(3), Value::from("name")];
        let args = Args::new("rename", &values);

        assert!(args.expect(2).is_ok());
        assert!(matches!(args.expect(1), Err(ScopeError::Argument { .. })));
        assert_eq!(args.int(0).unwrap(), 3);
        assert_eq!(args.str(1).unwrap(), "name");
        assert!(matches!(args.str(0), Err(ScopeError::Argument { .. })));
        assert!(matches!(args.get(5), Err(ScopeError::Argument { .. })));
    }

    #[test]
    fn test_method_identity() {
        let m = Method::new("noop", |_, _| Ok(Value::Null));
        let same = m.clone();
        let other = Method::new("noop", |_, _| Ok(Value::Null));

        assert_eq!(Value::from(m.clone()), Value::from(same));
        assert_ne!(Value::from(m), Value::from(other));
    }

    #[test]
    fn test_json_conversion() {
        let value = Value::List(vec![Value::from(1), Value::from(2.5), Value::from("a")]);
        let json = value.to_json().unwrap();
        assert_eq!(json, serde_json::json!([1, 2.5, "a"]));
        assert_eq!(Value::from_json(&json).unwrap(), value);

        let method = Value::from(Method::new("f", |_, _| Ok(Value::Null)));
        assert!(matches!(method.to_json(), Err(ScopeError::Snapshot(_))));
        assert!(Value::from_json(&serde_json::json!({"a": 1})).is_err());
    }

    #[test]
    fn test_display() {
        let list = Value::List(vec![Value::from(1), Value::from("x"), Value::Null]);
        assert_eq!(list.to_string(), "[1, x, null]");
    }
}
