//! Audit record demonstration.
//!
//! This example walks one action through its audit record:
//! 1. Project a domain object through `Auditable`
//! 2. Annotate the record as the action progresses
//! 3. Finalize it and hand it to sinks
//! 4. Print both wire shapes
//!
//! Run with: `cargo run --example audit_record`

use audit_record::{
    Auditable, AuditableStringArray, EventActor, EventError, MemorySink, Record, RecordConfig,
    RecordSink, Schema, Secret, TracingSink,
};
use serde_json::{Map, Value};

struct Channel {
    id: String,
    name: String,
    purpose: String,
    invite_secret: Secret<String>,
}

impl Auditable for Channel {
    fn auditable_object(&self) -> Map<String, Value> {
        let mut obj = Map::new();
        obj.insert("id".into(), Value::from(self.id.clone()));
        obj.insert("name".into(), Value::from(self.name.clone()));
        obj.insert("purpose_len".into(), Value::from(self.purpose.len()));
        obj.insert("invite_secret".into(), Value::from(&self.invite_secret));
        obj
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Audit Record Example ===\n");

    let sink = MemorySink::new();

    // Scenario 1: successful channel rename
    println!("--- Scenario 1: Channel rename ---");

    let before = Channel {
        id: "c1".into(),
        name: "town-square".into(),
        purpose: "General chatter".into(),
        invite_secret: Secret::new("inv-8f2a".into()),
    };
    let after = Channel {
        name: "lobby".into(),
        ..before_clone(&before)
    };

    let mut rec = Record::new("patchChannel");
    rec.set_api_path("/api/v4/channels/c1/patch");
    rec.set_actor(
        EventActor::new()
            .with_user_id("u-admin")
            .with_session_id("s-42")
            .with_client("webapp")
            .with_ip_address("10.0.0.12"),
    );
    rec.add_event_parameter("channel_id", "c1");
    rec.add_metadata(None, Some(&before), Some(&after), "channel");
    rec.success();

    TracingSink::new().write(&rec).expect("tracing sink accepts records");
    sink.write(&rec).expect("memory sink accepts records");

    match rec.to_json_pretty() {
        Ok(json) => println!("{}\n", json),
        Err(e) => println!("encode failed: {}\n", e),
    }

    // Scenario 2: failed bulk invite on a legacy-configured service
    println!("--- Scenario 2: Failed bulk invite (legacy schema) ---");

    let config = RecordConfig::new().with_schema(Schema::Legacy);
    let mut rec = Record::with_config("addChannelMembers", &config);
    rec.set_api_path("/api/v4/channels/c1/members");
    rec.set_actor(EventActor::new().with_user_id("u-admin"));
    rec.add_metadata(
        Some(&AuditableStringArray(vec!["u1".into(), "u2".into()])),
        None,
        None,
        "channel_members",
    );
    rec.add_event_meta("dry_run", false);
    rec.add_meta_type_converter(|v| v.as_bool().map(|b| Value::from(if b { "yes" } else { "no" })));
    rec.add_error(EventError::new("some members could not be added", 207));
    rec.add_error_list(vec!["u2: deactivated".into()]);
    rec.fail();

    TracingSink::new().write(&rec).expect("tracing sink accepts records");
    sink.write(&rec).expect("memory sink accepts records");

    match rec.to_wire_json() {
        Ok(json) => println!("{}\n", json),
        Err(e) => println!("encode failed: {}\n", e),
    }

    println!("--- Summary ---");
    for record in sink.records() {
        println!("{}", record);
    }
}

fn before_clone(channel: &Channel) -> Channel {
    Channel {
        id: channel.id.clone(),
        name: channel.name.clone(),
        purpose: channel.purpose.clone(),
        invite_secret: Secret::new(channel.invite_secret.expose_secret().clone()),
    }
}
