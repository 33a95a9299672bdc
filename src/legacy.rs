//! Flat legacy wire view of a record.
//!
//! The canonical in-memory model is always the nested [`Record`]. The legacy
//! shape is derived from it on demand and can be read back into it, so there
//! is never a second copy of mutable state.
//!
//! Field mapping:
//!
//! | legacy | record |
//! |---|---|
//! | `api_path` | `meta["api_path"]` |
//! | `event_data.parameters`, `event_data.new_data` | `event.parameters` |
//! | `event_data.prior_state` / `resulting_state` | same fields of `event` |
//! | `event_data.result_object_type` | `event.object_type` |
//! | `error` | `error.description`, or the error list joined with `"; "` |
//! | `user_id`, `session_id`, `client`, `ip_address` | `actor` |
//! | `meta` | `meta` without `api_path`, after meta type conversion |
//!
//! A stored legacy record with an empty top-level `api_path` and an
//! `api_path` entry in its meta keeps that entry in meta when derived again,
//! until [`Record::set_api_path`] is called. A non-empty top-level path
//! replaces any meta entry of the same name.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auditable::{Auditable, AuditableMap};
use crate::config::{RecordConfig, Schema};
use crate::error::Error;
use crate::event::{EventActor, EventError, Meta};
use crate::record::{Record, API_PATH_KEY};
use crate::status::Status;

/// Separator used when a legacy error string is built from the error list.
pub const ERROR_LIST_SEPARATOR: &str = "; ";

/// The legacy `event_data` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyEventData {
    /// Parameters of the action
    #[serde(default)]
    pub parameters: Option<Map<String, Value>>,
    /// Payload being processed; mirrors `parameters` when derived from a record
    #[serde(default)]
    pub new_data: Option<Map<String, Value>>,
    /// State before the action
    #[serde(default)]
    pub prior_state: Option<Map<String, Value>>,
    /// State after the action
    #[serde(default)]
    pub resulting_state: Option<Map<String, Value>>,
    /// Label of the affected object type
    #[serde(default)]
    pub result_object_type: String,
}

/// A record in the flat legacy shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyRecord {
    /// API path of the action
    pub api_path: String,
    /// Event name
    pub event_name: String,
    /// Event payload
    pub event_data: LegacyEventData,
    /// Error text, empty on success
    pub error: String,
    /// Status marker
    pub status: String,
    /// Acting user
    pub user_id: String,
    /// Session of the acting user
    pub session_id: String,
    /// Client or user agent
    pub client: String,
    /// Remote address
    pub ip_address: String,
    /// Free-form extras
    pub meta: Meta,
}

impl LegacyRecord {
    /// Converts a stored legacy record into the canonical model.
    ///
    /// Event data mappings read from storage are treated as already redacted.
    /// `parameters` takes precedence over `new_data`. The error string becomes
    /// the error description. Unknown status markers become unset. The result
    /// is configured for the legacy schema.
    pub fn into_record(self) -> Record {
        let config = RecordConfig::new().with_schema(Schema::Legacy);
        let mut rec = Record::with_config(self.event_name, &config);

        let meta_has_api_path = self.meta.contains_key(API_PATH_KEY);
        for (key, value) in self.meta {
            rec.add_event_meta(key, value);
        }
        if !self.api_path.is_empty() {
            rec.set_api_path(self.api_path);
        } else if meta_has_api_path {
            rec.keep_api_path_in_meta();
        }

        rec.set_actor(EventActor {
            user_id: self.user_id,
            session_id: self.session_id,
            client: self.client,
            ip_address: self.ip_address,
        });

        let data = self.event_data;
        let parameters = data.parameters.or(data.new_data).map(AuditableMap);
        let prior_state = data.prior_state.map(AuditableMap);
        let resulting_state = data.resulting_state.map(AuditableMap);
        rec.add_metadata(
            parameters.as_ref().map(|m| m as &dyn Auditable),
            prior_state.as_ref().map(|m| m as &dyn Auditable),
            resulting_state.as_ref().map(|m| m as &dyn Auditable),
            data.result_object_type,
        );

        if !self.error.is_empty() {
            rec.add_error(EventError::new(self.error, 0));
        }

        match Status::from_wire(&self.status) {
            Status::Success => rec.success(),
            Status::Fail => rec.fail(),
            Status::Unset => {}
        }

        rec
    }
}

fn legacy_error_text(error: &EventError) -> String {
    if !error.description.is_empty() {
        error.description.clone()
    } else {
        error.error_list.join(ERROR_LIST_SEPARATOR)
    }
}

impl Record {
    /// Derives the flat legacy view of this record.
    ///
    /// Meta values pass through the record's converter hook, so converters
    /// registered on a legacy-configured record are applied here in
    /// registration order.
    pub fn to_legacy(&self) -> LegacyRecord {
        let mut meta = self.meta().clone();
        let lifted = match meta.get(API_PATH_KEY).and_then(Value::as_str) {
            Some(path) if self.lifts_api_path() => Some(path.to_string()),
            _ => None,
        };
        let api_path = match lifted {
            Some(path) => {
                meta.remove(API_PATH_KEY);
                path
            }
            None => String::new(),
        };

        let event = self.event();
        let actor = self.actor();

        LegacyRecord {
            api_path,
            event_name: self.event_name().to_string(),
            event_data: LegacyEventData {
                parameters: event.parameters().cloned(),
                new_data: event.parameters().cloned(),
                prior_state: event.prior_state().cloned(),
                resulting_state: event.resulting_state().cloned(),
                result_object_type: event.object_type().to_string(),
            },
            error: legacy_error_text(self.error()),
            status: self.status().as_str().to_string(),
            user_id: actor.user_id.clone(),
            session_id: actor.session_id.clone(),
            client: actor.client.clone(),
            ip_address: actor.ip_address.clone(),
            meta: self.conversion().apply(&meta),
        }
    }

    /// Encodes the legacy view as JSON.
    pub fn to_legacy_json(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_legacy()).map_err(Error::Serialize)
    }

    /// Decodes a legacy-shaped record into the canonical model.
    pub fn from_legacy_json(json: &str) -> Result<Self, Error> {
        let legacy: LegacyRecord = serde_json::from_str(json).map_err(Error::Deserialize)?;
        Ok(legacy.into_record())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn legacy_config() -> RecordConfig {
        RecordConfig::new().with_schema(Schema::Legacy)
    }

    #[test]
    fn legacy_view_flattens_actor_and_lifts_api_path() {
        let mut rec = Record::new("getPost");
        rec.set_api_path("/api/v4/posts/p1");
        rec.add_event_meta("request_id", "r1");
        rec.set_actor(
            EventActor::new()
                .with_user_id("u1")
                .with_session_id("s1")
                .with_client("web")
                .with_ip_address("127.0.0.1"),
        );
        rec.success();

        let legacy = rec.to_legacy();
        assert_eq!(legacy.api_path, "/api/v4/posts/p1");
        assert_eq!(legacy.user_id, "u1");
        assert_eq!(legacy.session_id, "s1");
        assert_eq!(legacy.client, "web");
        assert_eq!(legacy.ip_address, "127.0.0.1");
        assert_eq!(legacy.status, "success");
        assert!(!legacy.meta.contains_key(API_PATH_KEY));
        assert_eq!(legacy.meta["request_id"], "r1");
    }

    #[test]
    fn legacy_view_mirrors_parameters_into_new_data() {
        let mut rec = Record::new("createPost");
        rec.add_event_parameter("channel_id", "c1");

        let legacy = rec.to_legacy();
        assert_eq!(legacy.event_data.parameters, legacy.event_data.new_data);
        assert_eq!(legacy.event_data.result_object_type, "channel_id");
    }

    #[test]
    fn legacy_error_prefers_description() {
        let mut rec = Record::new("x");
        rec.add_error(EventError::new("denied", 403));
        rec.add_error_list(vec!["a".into(), "b".into()]);
        assert_eq!(rec.to_legacy().error, "denied");

        rec.add_error(EventError::default());
        rec.add_error_list(vec!["a".into(), "b".into()]);
        assert_eq!(rec.to_legacy().error, "a; b");
    }

    #[test]
    fn non_string_api_path_stays_in_meta() {
        let mut rec = Record::new("x");
        rec.add_event_meta(API_PATH_KEY, 7);

        let legacy = rec.to_legacy();
        assert_eq!(legacy.api_path, "");
        assert_eq!(legacy.meta[API_PATH_KEY], 7);
    }

    #[test]
    fn legacy_view_applies_converters_in_order() {
        let mut rec = Record::with_config("x", &legacy_config());
        rec.add_meta_type_converter(|v| v.as_bool().map(|b| json!(b.to_string())));
        rec.add_meta_type_converter(|_| Some(json!("fallback")));
        rec.add_event_meta("flag", true);
        rec.add_event_meta("count", 3);

        let legacy = rec.to_legacy();
        assert_eq!(legacy.meta["flag"], "true");
        assert_eq!(legacy.meta["count"], "fallback");
    }

    #[test]
    fn nested_record_legacy_view_skips_converters() {
        let mut rec = Record::new("x");
        rec.add_meta_type_converter(|_| Some(json!("converted")));
        rec.add_event_meta("count", 3);

        assert_eq!(rec.to_legacy().meta["count"], 3);
    }

    #[test]
    fn legacy_json_has_flat_keys() {
        let mut rec = Record::new("login");
        rec.fail();
        let value: Value = serde_json::from_str(&rec.to_legacy_json().unwrap()).unwrap();
        let obj = value.as_object().unwrap();

        for key in [
            "api_path",
            "event_name",
            "event_data",
            "error",
            "status",
            "user_id",
            "session_id",
            "client",
            "ip_address",
            "meta",
        ] {
            assert!(obj.contains_key(key), "missing legacy key {}", key);
        }
        assert_eq!(obj.len(), 10);
        assert_eq!(value["status"], "fail");
    }

    #[test]
    fn into_record_prefers_parameters_over_new_data() {
        let legacy = LegacyRecord {
            event_name: "x".into(),
            event_data: LegacyEventData {
                parameters: None,
                new_data: Some(json!({"id": "n1"}).as_object().unwrap().clone()),
                ..Default::default()
            },
            ..Default::default()
        };
        let rec = legacy.into_record();
        assert_eq!(rec.event().parameters().unwrap()["id"], "n1");

        let legacy = LegacyRecord {
            event_data: LegacyEventData {
                parameters: Some(json!({"id": "p1"}).as_object().unwrap().clone()),
                new_data: Some(json!({"id": "n1"}).as_object().unwrap().clone()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(legacy.into_record().event().parameters().unwrap()["id"], "p1");
    }

    #[test]
    fn into_record_tolerates_unknown_status() {
        let legacy = LegacyRecord {
            status: "attempt".into(),
            ..Default::default()
        };
        assert_eq!(legacy.into_record().status(), Status::Unset);
    }

    #[test]
    fn legacy_round_trip_preserves_flat_fields() {
        let json = r#"{
            "api_path": "/api/v4/channels",
            "event_name": "createChannel",
            "event_data": {
                "parameters": {"name": "town-square"},
                "new_data": {"name": "town-square"},
                "prior_state": null,
                "resulting_state": {"id": "c1"},
                "result_object_type": "channel"
            },
            "error": "",
            "status": "success",
            "user_id": "u1",
            "session_id": "s1",
            "client": "desktop",
            "ip_address": "10.1.1.1",
            "meta": {"team_id": "t1"}
        }"#;

        let original: LegacyRecord = serde_json::from_str(json).unwrap();
        let rec = Record::from_legacy_json(json).unwrap();
        assert_eq!(rec.schema(), Schema::Legacy);
        assert_eq!(rec.api_path(), Some("/api/v4/channels"));
        assert_eq!(rec.to_legacy(), original);
    }

    #[test]
    fn meta_api_path_without_top_level_path_stays_in_meta() {
        let json = r#"{
            "api_path": "",
            "event_name": "createChannel",
            "status": "success",
            "meta": {"api_path": "/from/meta", "team_id": "t1"}
        }"#;

        let original: LegacyRecord = serde_json::from_str(json).unwrap();
        let mut rec = Record::from_legacy_json(json).unwrap();
        let legacy = rec.to_legacy();
        assert_eq!(legacy.api_path, "");
        assert_eq!(legacy.meta["api_path"], "/from/meta");
        assert_eq!(legacy, original);

        rec.set_api_path("/api/v4/channels");
        let legacy = rec.to_legacy();
        assert_eq!(legacy.api_path, "/api/v4/channels");
        assert!(!legacy.meta.contains_key("api_path"));
    }

    #[test]
    fn wire_json_follows_configured_schema() {
        let rec = Record::with_config("x", &legacy_config());
        let value: Value = serde_json::from_str(&rec.to_wire_json().unwrap()).unwrap();
        assert!(value.get("event_data").is_some());

        let rec = Record::new("x");
        let value: Value = serde_json::from_str(&rec.to_wire_json().unwrap()).unwrap();
        assert!(value.get("event").is_some());
        assert!(value.get("event_data").is_none());
    }

    #[test]
    fn from_legacy_json_rejects_garbage() {
        assert!(matches!(
            Record::from_legacy_json("not json"),
            Err(Error::Deserialize(_))
        ));
    }
}
