//! Substructures of an audit record.
//!
//! [`EventData`] carries the action-specific payload and can only be written
//! from [`Auditable`] projections, [`EventActor`] identifies who acted, and
//! [`EventError`] describes a failed action.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auditable::{Auditable, AuditableMap};

/// Free-form key/value extras attached to a record.
pub type Meta = Map<String, Value>;

/// The action-specific payload of a record.
///
/// Each mapping is `None` when it does not apply to the event. The fields are
/// private: the only way to populate them is through a
/// [`Record`](crate::Record) accretion method, which accepts either an
/// [`Auditable`] projection or an [`AuditableMap`] the caller has marked safe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    #[serde(default)]
    parameters: Option<Map<String, Value>>,
    #[serde(default)]
    prior_state: Option<Map<String, Value>>,
    #[serde(default)]
    resulting_state: Option<Map<String, Value>>,
    #[serde(default)]
    object_type: String,
}

impl EventData {
    /// Parameters of the action, outside the actual payload.
    pub fn parameters(&self) -> Option<&Map<String, Value>> {
        self.parameters.as_ref()
    }

    /// State of the object before the action, if it existed.
    pub fn prior_state(&self) -> Option<&Map<String, Value>> {
        self.prior_state.as_ref()
    }

    /// State of the object after the action.
    pub fn resulting_state(&self) -> Option<&Map<String, Value>> {
        self.resulting_state.as_ref()
    }

    /// Short label of the affected object type, e.g. `"post"`.
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    pub(crate) fn set_object_type(&mut self, object_type: impl Into<String>) {
        self.object_type = object_type.into();
    }

    pub(crate) fn set_parameters(&mut self, source: &dyn Auditable) {
        self.parameters = Some(source.auditable_object());
    }

    pub(crate) fn set_parameters_map(&mut self, map: AuditableMap) {
        self.parameters = Some(map.into_inner());
    }

    pub(crate) fn set_prior_state(&mut self, source: &dyn Auditable) {
        self.prior_state = Some(source.auditable_object());
    }

    pub(crate) fn set_resulting_state(&mut self, source: &dyn Auditable) {
        self.resulting_state = Some(source.auditable_object());
    }

    /// Inserts a single parameter, creating the mapping if needed.
    pub(crate) fn insert_parameter(&mut self, key: impl Into<String>, value: Value) {
        self.parameters
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
    }
}

/// Who performed the action and through which channel.
///
/// Every field is optional; an empty string means "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventActor {
    /// Identifier of the acting user
    #[serde(default)]
    pub user_id: String,
    /// Session the action was performed in
    #[serde(default)]
    pub session_id: String,
    /// Client or user agent
    #[serde(default)]
    pub client: String,
    /// Remote address of the caller
    #[serde(default)]
    pub ip_address: String,
}

impl EventActor {
    /// Creates an actor with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the user identifier.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Sets the session identifier.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Sets the client description.
    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = client.into();
        self
    }

    /// Sets the remote address.
    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = ip_address.into();
        self
    }
}

/// Details of a failed action.
///
/// This is a passive payload about the audited domain failure. Setting it does
/// not change the record's status; callers pair it with
/// [`Record::fail`](crate::Record::fail).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventError {
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Numeric status code, e.g. an HTTP status
    #[serde(default, rename = "status_code")]
    pub code: i32,
    /// Individual error messages, in order
    #[serde(default)]
    pub error_list: Vec<String>,
}

impl EventError {
    /// Creates an error with a description and code.
    pub fn new(description: impl Into<String>, code: i32) -> Self {
        Self {
            description: description.into(),
            code,
            error_list: Vec::new(),
        }
    }

    /// Returns true when no field carries information.
    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.code == 0 && self.error_list.is_empty()
    }
}
