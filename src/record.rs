//! The audit record aggregate and its accretion API.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auditable::{Auditable, AuditableMap};
use crate::config::{RecordConfig, Schema};
use crate::convert::MetaConversion;
use crate::error::Error;
use crate::event::{EventActor, EventData, EventError, Meta};
use crate::status::Status;

/// Meta key the flat schema's `api_path` is stored under.
pub const API_PATH_KEY: &str = "api_path";

/// One audited action: who did what, to what, with what result.
///
/// A record is created per action, annotated along the action's call path,
/// finalized with [`success`](Self::success) or [`fail`](Self::fail), and then
/// handed to a sink. None of the annotation methods can fail; an absent
/// projection is a no-op for its field.
///
/// # Example
///
/// ```
/// use audit_record::{AuditableStringArray, EventActor, Record, Status};
///
/// let mut rec = Record::new("updateChannelMembers");
/// rec.set_actor(EventActor::new().with_user_id("u1").with_ip_address("10.0.0.7"));
/// rec.add_event_parameter("channel_id", "c42");
///
/// let added = AuditableStringArray(vec!["u2".into(), "u3".into()]);
/// rec.add_metadata(None, None, Some(&added), "channel_members");
/// rec.success();
///
/// assert_eq!(rec.status(), Status::Success);
/// assert_eq!(rec.event().object_type(), "channel_members");
///
/// let json = rec.to_json().unwrap();
/// assert!(json.contains("\"event_name\":\"updateChannelMembers\""));
/// ```
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    event_name: String,
    #[serde(default)]
    status: Status,
    #[serde(default)]
    event: EventData,
    #[serde(default)]
    actor: EventActor,
    #[serde(default)]
    meta: Meta,
    #[serde(default, skip_serializing_if = "EventError::is_empty")]
    error: EventError,
    #[serde(skip)]
    schema: Schema,
    #[serde(skip)]
    conversion: MetaConversion,
    /// Set when `meta["api_path"]` came from stored legacy meta rather than
    /// from the top-level path, so the legacy view leaves it in meta.
    #[serde(skip)]
    api_path_in_meta_only: bool,
}

impl Record {
    /// Creates a record for the nested schema.
    pub fn new(event_name: impl Into<String>) -> Self {
        Self::with_config(event_name, &RecordConfig::default())
    }

    /// Creates a record using the given configuration.
    ///
    /// The configured schema decides whether meta type converters are live
    /// and which shape [`to_wire_json`](Self::to_wire_json) emits.
    pub fn with_config(event_name: impl Into<String>, config: &RecordConfig) -> Self {
        Self {
            event_name: event_name.into(),
            schema: config.schema,
            conversion: MetaConversion::for_schema(config.schema),
            ..Default::default()
        }
    }

    /// Returns the event name.
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Returns the current status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns the event data.
    pub fn event(&self) -> &EventData {
        &self.event
    }

    /// Returns the actor.
    pub fn actor(&self) -> &EventActor {
        &self.actor
    }

    /// Returns the flat meta mapping.
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Returns the error payload. Empty unless an error was added.
    pub fn error(&self) -> &EventError {
        &self.error
    }

    /// Returns the schema this record was configured for.
    pub fn schema(&self) -> Schema {
        self.schema
    }

    /// Returns the meta type converter hook.
    pub fn conversion(&self) -> &MetaConversion {
        &self.conversion
    }

    /// Marks the action as successful. Overwrites any earlier status.
    pub fn success(&mut self) {
        self.set_status(Status::Success);
    }

    /// Marks the action as failed. Overwrites any earlier status.
    ///
    /// Does not inspect [`error`](Self::error); callers pair the two.
    pub fn fail(&mut self) {
        self.set_status(Status::Fail);
    }

    fn set_status(&mut self, status: Status) {
        if self.status.is_set() && self.status != status {
            tracing::debug!(
                target: "audit_record",
                event_name = %self.event_name,
                from = %self.status,
                to = %status,
                "audit record status overwritten"
            );
        }
        self.status = status;
    }

    /// Replaces the actor.
    pub fn set_actor(&mut self, actor: EventActor) {
        self.actor = actor;
    }

    /// Returns the actor for in-place updates.
    pub fn actor_mut(&mut self) -> &mut EventActor {
        &mut self.actor
    }

    /// Records the API path of the action.
    ///
    /// The nested schema has no dedicated field, so the path lives in
    /// `meta["api_path"]`; the legacy view lifts it back to the top level.
    pub fn set_api_path(&mut self, api_path: impl Into<String>) {
        self.meta
            .insert(API_PATH_KEY.to_string(), Value::String(api_path.into()));
        self.api_path_in_meta_only = false;
    }

    /// Keeps a meta-supplied `api_path` entry in meta when deriving the
    /// legacy view. Cleared by [`set_api_path`](Self::set_api_path).
    pub(crate) fn keep_api_path_in_meta(&mut self) {
        self.api_path_in_meta_only = true;
    }

    pub(crate) fn lifts_api_path(&self) -> bool {
        !self.api_path_in_meta_only
    }

    /// Returns the API path, if one was recorded.
    pub fn api_path(&self) -> Option<&str> {
        self.meta.get(API_PATH_KEY).and_then(Value::as_str)
    }

    /// Adds a single parameter to the event data.
    ///
    /// Writes into `event.parameters`, not into the flat meta mapping. Use
    /// [`add_event_meta`](Self::add_event_meta) for the latter.
    pub fn add_meta(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.event.insert_parameter(key, value.into());
    }

    /// Sets the parameters from a projection and sets the object type.
    pub fn add_event_parameters_auditable(
        &mut self,
        object_type: impl Into<String>,
        auditable: &dyn Auditable,
    ) {
        self.event.set_parameters(auditable);
        self.event.set_object_type(object_type);
    }

    /// Sets the parameters from a mapping the caller has already redacted.
    ///
    /// The object type is left untouched.
    pub fn add_event_parameters_map(&mut self, map: AuditableMap) {
        self.event.set_parameters_map(map);
    }

    /// Adds a parameter and uses its key as the object type.
    ///
    /// Both effects always happen together: after
    /// `add_event_parameter("user_id", "u1")` the parameters contain
    /// `user_id` and the object type is `"user_id"`.
    pub fn add_event_parameter(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        self.event.insert_parameter(key.clone(), value.into());
        self.event.set_object_type(key);
    }

    /// Adds a key/value pair to the flat meta mapping.
    pub fn add_event_meta(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.meta.insert(key.into(), value.into());
    }

    /// Populates the event data in one call.
    ///
    /// The object type is always replaced. Each projection that is `Some`
    /// replaces its field; `None` leaves the field as it was.
    pub fn add_metadata(
        &mut self,
        parameters: Option<&dyn Auditable>,
        prior_state: Option<&dyn Auditable>,
        resulting_state: Option<&dyn Auditable>,
        result_object_type: impl Into<String>,
    ) {
        self.event.set_object_type(result_object_type);

        if let Some(p) = parameters {
            self.event.set_parameters(p);
        }
        if let Some(p) = prior_state {
            self.event.set_prior_state(p);
        }
        if let Some(r) = resulting_state {
            self.event.set_resulting_state(r);
        }
    }

    /// Replaces the error payload.
    pub fn add_error(&mut self, error: EventError) {
        self.error = error;
    }

    /// Replaces only the error list, keeping description and code.
    pub fn add_error_list(&mut self, error_list: Vec<String>) {
        self.error.error_list = error_list;
    }

    /// Registers a meta type converter.
    ///
    /// Only records configured for [`Schema::Legacy`] keep the converter; on
    /// the nested schema the call is accepted and ignored. Returns whether the
    /// converter was kept.
    pub fn add_meta_type_converter<F>(&mut self, f: F) -> bool
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.conversion.register(Arc::new(f))
    }

    /// Encodes the record as a nested-schema JSON value.
    pub fn to_value(&self) -> Result<Value, Error> {
        serde_json::to_value(self).map_err(Error::Serialize)
    }

    /// Encodes the record as nested-schema JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(Error::Serialize)
    }

    /// Encodes the record as indented nested-schema JSON.
    pub fn to_json_pretty(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(Error::Serialize)
    }

    /// Decodes a nested-schema record.
    ///
    /// The result uses the default configuration.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(Error::Deserialize)
    }

    /// Encodes the record in the shape selected by its configured schema.
    pub fn to_wire_json(&self) -> Result<String, Error> {
        match self.schema {
            Schema::Nested => self.to_json(),
            Schema::Legacy => self.to_legacy_json(),
        }
    }
}

impl PartialEq for Record {
    /// Compares serialized fields only; schema and converters are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.event_name == other.event_name
            && self.status == other.status
            && self.event == other.event
            && self.actor == other.actor
            && self.meta == other.meta
            && self.error == other.error
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("event_name", &self.event_name)
            .field("status", &self.status)
            .field("event", &self.event)
            .field("actor", &self.actor)
            .field("meta", &self.meta)
            .field("error", &self.error)
            .field("schema", &self.schema)
            .finish()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.status.is_set() {
            self.status.as_str()
        } else {
            "<unset>"
        };
        write!(f, "AuditRecord[event={}, status={}", self.event_name, status)?;

        if !self.actor.user_id.is_empty() {
            write!(f, ", user_id={}", self.actor.user_id)?;
        }
        if !self.event.object_type().is_empty() {
            write!(f, ", object_type={}", self.event.object_type())?;
        }
        if self.error.code != 0 {
            write!(f, ", code={}", self.error.code)?;
        }

        write!(f, "]")
    }
}
