//! The `Auditable` projection contract and its ready-made adapters.
//!
//! Every domain object that ends up in a record's event data passes through
//! [`Auditable::auditable_object`] first. That call is the single redaction
//! boundary of this crate: whatever the implementer leaves out of the
//! projection can never reach an audit sink.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which [`AuditableStringArray`] nests its elements.
pub const ARRAY_KEY: &str = "array";

/// A type that can produce a safe, redacted mapping view of itself.
///
/// The projection is always a mapping. Arrays and scalars must be wrapped
/// under a key so that every projection serializes as a JSON object.
///
/// # Example
///
/// ```
/// use audit_record::{Auditable, Secret};
/// use serde_json::{Map, Value};
///
/// struct User {
///     id: String,
///     password: Secret<String>,
/// }
///
/// impl Auditable for User {
///     fn auditable_object(&self) -> Map<String, Value> {
///         let mut obj = Map::new();
///         obj.insert("id".into(), Value::from(self.id.clone()));
///         obj.insert("password".into(), Value::from(&self.password));
///         obj
///     }
/// }
///
/// let user = User { id: "u1".into(), password: Secret::new("hunter2".into()) };
/// let projected = user.auditable_object();
/// assert_eq!(projected["password"], "[REDACTED]");
/// ```
pub trait Auditable {
    /// Returns the redacted mapping representation of `self`.
    ///
    /// Must be a pure function of the receiver's current state and must not
    /// panic.
    fn auditable_object(&self) -> Map<String, Value>;
}

impl<T: Auditable + ?Sized> Auditable for &T {
    fn auditable_object(&self) -> Map<String, Value> {
        (**self).auditable_object()
    }
}

impl<T: Auditable + ?Sized> Auditable for Box<T> {
    fn auditable_object(&self) -> Map<String, Value> {
        (**self).auditable_object()
    }
}

/// A mapping the caller has already redacted.
///
/// The projection is the identity. Wrapping a map in `AuditableMap` is the
/// explicit, reviewable statement that its contents are safe to log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditableMap(pub Map<String, Value>);

impl AuditableMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Inserts a key/value pair, returning the map for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Consumes the wrapper and returns the inner mapping.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl Auditable for AuditableMap {
    fn auditable_object(&self) -> Map<String, Value> {
        self.0.clone()
    }
}

impl From<Map<String, Value>> for AuditableMap {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// An ordered list of strings, projected as `{"array": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditableStringArray(pub Vec<String>);

impl Auditable for AuditableStringArray {
    fn auditable_object(&self) -> Map<String, Value> {
        let items = self.0.iter().cloned().map(Value::String).collect();
        let mut obj = Map::new();
        obj.insert(ARRAY_KEY.to_string(), Value::Array(items));
        obj
    }
}

impl From<Vec<String>> for AuditableStringArray {
    fn from(items: Vec<String>) -> Self {
        Self(items)
    }
}

impl<'a> From<&'a [&'a str]> for AuditableStringArray {
    fn from(items: &'a [&'a str]) -> Self {
        Self(items.iter().map(|s| s.to_string()).collect())
    }
}

/// A string-to-string mapping, projected with its values promoted to JSON strings.
///
/// Keys are preserved exactly and values are never transformed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditableStringMap(pub BTreeMap<String, String>);

impl Auditable for AuditableStringMap {
    fn auditable_object(&self) -> Map<String, Value> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect()
    }
}

impl From<BTreeMap<String, String>> for AuditableStringMap {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl From<HashMap<String, String>> for AuditableStringMap {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map.into_iter().collect())
    }
}
