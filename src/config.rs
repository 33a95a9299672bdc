use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire schema a record is primarily emitted in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schema {
    /// Flat shape with top-level `api_path`, `user_id`, and friends
    Legacy,
    /// Nested shape with `event`, `actor`, and `error` objects
    #[default]
    Nested,
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Legacy => write!(f, "legacy"),
            Schema::Nested => write!(f, "nested"),
        }
    }
}

/// Settings applied when a [`Record`](crate::Record) is created.
///
/// Host services usually embed this in their own configuration file; every
/// field has a default so an empty table is valid.
///
/// # Example
///
/// ```
/// use audit_record::{RecordConfig, Schema};
///
/// let config: RecordConfig = serde_json::from_str(r#"{"schema": "legacy"}"#).unwrap();
/// assert_eq!(config.schema, Schema::Legacy);
///
/// let config = RecordConfig::new().with_schema(Schema::Nested);
/// assert_eq!(config.schema, Schema::Nested);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordConfig {
    /// Selects the wire shape and whether meta type converters are live
    pub schema: Schema,
}

impl RecordConfig {
    /// Creates the default configuration (nested schema).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the wire schema.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }
}
