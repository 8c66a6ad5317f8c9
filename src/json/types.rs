//! JSON value types.
//!
//! A parsed document is a tree of [`Value`]s. Containers own their children
//! outright, so a tree has no shared or back references and is dropped like
//! any other nested `Vec`/map. Trees are read through the type-checked
//! accessors (`get_*`, [`Value::contains`]), which fail with
//! [`Error::TypeMismatch`] instead of guessing.

use std::fmt;

use indexmap::IndexMap;

use crate::error::{Error, JsonResult};

/// Ordered key → value mapping of a JSON object. Iterates in document order.
pub type Map = IndexMap<String, Value>;

/// A JSON value.
///
/// All JSON numbers, integral or not, are stored as `f64`.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// JSON null literal
    #[default]
    Null,
    /// JSON boolean (true/false)
    Bool(bool),
    /// JSON number
    Number(f64),
    /// JSON string, escapes already decoded
    String(String),
    /// JSON array of values
    Array(Vec<Value>),
    /// JSON object, keys in document order
    Object(Map),
}

/// The six kinds a [`Value`] can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `null`
    Null,
    /// `true` / `false`
    Bool,
    /// Any number
    Number,
    /// A string
    String,
    /// An array
    Array,
    /// An object
    Object,
}

impl Kind {
    /// Returns the kind name as a string for error messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// The kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    fn mismatch(&self, expected: Kind) -> Error {
        Error::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }

    /// The members of an object, in document order.
    ///
    /// Fails with a Type-Mismatch error unless this is an object.
    pub fn get_map(&self) -> JsonResult<&Map> {
        match self {
            Value::Object(map) => Ok(map),
            other => Err(other.mismatch(Kind::Object)),
        }
    }

    /// The elements of an array, in document order.
    ///
    /// Fails with a Type-Mismatch error unless this is an array.
    pub fn get_array(&self) -> JsonResult<&[Value]> {
        match self {
            Value::Array(items) => Ok(items),
            other => Err(other.mismatch(Kind::Array)),
        }
    }

    /// The number held by this value.
    ///
    /// Fails with a Type-Mismatch error unless this is a number.
    pub fn get_double(&self) -> JsonResult<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            other => Err(other.mismatch(Kind::Number)),
        }
    }

    /// A borrowed view of the decoded string.
    ///
    /// Fails with a Type-Mismatch error unless this is a string.
    pub fn get_str(&self) -> JsonResult<&str> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(other.mismatch(Kind::String)),
        }
    }

    /// The boolean held by this value.
    ///
    /// Fails with a Type-Mismatch error unless this is a boolean.
    pub fn get_bool(&self) -> JsonResult<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(other.mismatch(Kind::Bool)),
        }
    }

    /// Whether an object has a member named `key`.
    ///
    /// Only objects can be asked; every other kind fails with a
    /// Type-Mismatch error rather than answering `false`.
    pub fn contains(&self, key: &str) -> JsonResult<bool> {
        self.get_map().map(|map| map.contains_key(key))
    }

    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this is a boolean value.
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns true if this is a number value.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns true if this is a string value.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns true if this is an array value.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns true if this is an object value.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns the boolean value if this is a Bool, None otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        self.get_bool().ok()
    }

    /// Returns the number if this is a Number, None otherwise.
    pub fn as_f64(&self) -> Option<f64> {
        self.get_double().ok()
    }

    /// Returns a reference to the string if this is a String, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        self.get_str().ok()
    }

    /// Returns the elements if this is an Array, None otherwise.
    pub fn as_array(&self) -> Option<&[Value]> {
        self.get_array().ok()
    }

    /// Returns the members if this is an Object, None otherwise.
    pub fn as_object(&self) -> Option<&Map> {
        self.get_map().ok()
    }

    /// Get a value from an object by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Get a value from an array by index.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_array().and_then(|items| items.get(index))
    }
}

/// Logical equality: same kinds, equal scalars, and children equal in order.
///
/// Object key order is significant, unlike `IndexMap`'s own equality.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .zip(b.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
            }
            _ => false,
        }
    }
}
