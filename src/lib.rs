//! Audit record data model with a redaction-enforcing projection boundary.
//!
//! This crate describes one security-relevant action as a serializable value:
//! - **Auditable**: the only way a domain object reaches a record's event data
//!   is through its redacted [`Auditable`] projection
//! - **Record**: event name, status, actor, event data, meta, and error, built
//!   up through non-failing accretion methods
//! - **Dual schema**: records serialize in the nested shape and can derive or
//!   be rebuilt from the flat legacy shape
//!
//! # Core Types
//!
//! - [`Record`]: the aggregate and its accretion API
//! - [`Auditable`], [`AuditableMap`], [`AuditableStringArray`], [`AuditableStringMap`]
//! - [`EventData`], [`EventActor`], [`EventError`]
//! - [`ConverterRegistry`]: ordered meta value converters for the legacy schema
//! - [`Secret<T>`]: wrapper that always projects as `[REDACTED]`
//! - [`RecordSink`]: seam for whatever persists finished records
//!
//! # Examples
//!
//! ```
//! use audit_record::{Auditable, EventActor, EventError, Record, Secret, Status};
//! use serde_json::{Map, Value};
//!
//! struct Webhook {
//!     id: String,
//!     url: String,
//!     token: Secret<String>,
//! }
//!
//! impl Auditable for Webhook {
//!     fn auditable_object(&self) -> Map<String, Value> {
//!         let mut obj = Map::new();
//!         obj.insert("id".into(), self.id.clone().into());
//!         obj.insert("url".into(), self.url.clone().into());
//!         obj.insert("token".into(), Value::from(&self.token));
//!         obj
//!     }
//! }
//!
//! let hook = Webhook {
//!     id: "wh1".into(),
//!     url: "https://example.com/hook".into(),
//!     token: Secret::new("tok-123".into()),
//! };
//!
//! let mut rec = Record::new("createIncomingHook");
//! rec.set_actor(EventActor::new().with_user_id("u1"));
//! rec.add_metadata(None, None, Some(&hook), "incoming_hook");
//! rec.add_error(EventError::new("rate limited", 429));
//! rec.fail();
//!
//! assert_eq!(rec.status(), Status::Fail);
//! let json = rec.to_json().unwrap();
//! assert!(!json.contains("tok-123"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod auditable;
mod config;
mod convert;
mod error;
mod event;
mod legacy;
mod record;
mod secret;
mod sink;
mod status;

pub use auditable::{Auditable, AuditableMap, AuditableStringArray, AuditableStringMap, ARRAY_KEY};
pub use config::{RecordConfig, Schema};
pub use convert::{ConverterRegistry, MetaConversion, MetaTypeConverter};
pub use error::Error;
pub use event::{EventActor, EventData, EventError, Meta};
pub use legacy::{LegacyEventData, LegacyRecord, ERROR_LIST_SEPARATOR};
pub use record::{Record, API_PATH_KEY};
pub use secret::{Secret, REDACTED};
pub use sink::{MemorySink, RecordSink, SinkError, TracingSink};
pub use status::Status;
