//! Meta value normalization for the legacy wire schema.
//!
//! A [`ConverterRegistry`] holds an ordered chain of converters. When the
//! legacy view of a record is produced, each meta value is offered to the
//! converters in registration order and the first one that applies supplies
//! the replacement. The nested schema never consults the chain, which is why
//! a record carries a [`MetaConversion`] hook that is either backed by a live
//! registry or explicitly inert.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::Schema;

/// A meta value converter.
///
/// Returns `Some(replacement)` when it applies to the value and `None`
/// otherwise.
pub type MetaTypeConverter = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// Ordered, first-match-wins chain of [`MetaTypeConverter`]s.
///
/// # Example
///
/// ```
/// use audit_record::ConverterRegistry;
/// use serde_json::{json, Value};
///
/// let mut registry = ConverterRegistry::new();
/// registry.register(|v: &Value| v.as_bool().map(|b| Value::from(if b { "yes" } else { "no" })));
///
/// assert_eq!(registry.convert(&json!(true)), json!("yes"));
/// assert_eq!(registry.convert(&json!(7)), json!(7));
/// ```
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: Vec<MetaTypeConverter>,
}

impl ConverterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a converter to the end of the chain.
    pub fn register<F>(&mut self, f: F)
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.converters.push(Arc::new(f));
    }

    /// Appends an already shared converter.
    pub fn register_shared(&mut self, f: MetaTypeConverter) {
        self.converters.push(f);
    }

    /// Converts a single value.
    ///
    /// Returns the output of the first converter that applies, or a copy of
    /// the input when none does.
    pub fn convert(&self, value: &Value) -> Value {
        self.converters
            .iter()
            .find_map(|f| f(value))
            .unwrap_or_else(|| value.clone())
    }

    /// Converts every value of a mapping, keeping its keys.
    pub fn convert_map(&self, map: &Map<String, Value>) -> Map<String, Value> {
        map.iter()
            .map(|(k, v)| (k.clone(), self.convert(v)))
            .collect()
    }

    /// Returns the number of registered converters.
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Returns true if no converter has been registered.
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("converters", &self.converters.len())
            .finish()
    }
}

/// Converter hook carried by every record.
///
/// Records configured for the legacy schema get an active registry. Records on
/// the nested schema get the inert hook, which accepts registrations from
/// older call sites and drops them.
#[derive(Debug, Clone, Default)]
pub enum MetaConversion {
    /// Registrations are kept and applied to legacy meta values
    Active(ConverterRegistry),
    /// Registrations are ignored
    #[default]
    Inert,
}

impl MetaConversion {
    /// Selects the hook matching a wire schema.
    pub fn for_schema(schema: Schema) -> Self {
        match schema {
            Schema::Legacy => MetaConversion::Active(ConverterRegistry::new()),
            Schema::Nested => MetaConversion::Inert,
        }
    }

    /// Registers a converter. Returns false when the hook is inert.
    pub fn register(&mut self, f: MetaTypeConverter) -> bool {
        match self {
            MetaConversion::Active(registry) => {
                registry.register_shared(f);
                true
            }
            MetaConversion::Inert => {
                tracing::debug!(
                    target: "audit_record",
                    "meta type converter ignored: record does not use the legacy schema"
                );
                false
            }
        }
    }

    /// Returns true when registrations take effect.
    pub fn is_active(&self) -> bool {
        matches!(self, MetaConversion::Active(_))
    }

    /// Converts a meta mapping. The inert hook returns it unchanged.
    pub fn apply(&self, map: &Map<String, Value>) -> Map<String, Value> {
        match self {
            MetaConversion::Active(registry) => registry.convert_map(map),
            MetaConversion::Inert => map.clone(),
        }
    }
}
