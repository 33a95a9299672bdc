//! Hand-off point between finished records and whatever persists them.
//!
//! Transports live outside this crate. [`RecordSink`] is the seam they
//! implement; [`MemorySink`] and [`TracingSink`] are the two in-process
//! implementations shipped here.

use std::cell::RefCell;
use std::fmt;

use crate::record::Record;

/// Error returned when a sink cannot accept a record.
#[derive(Debug)]
pub enum SinkError {
    /// The record could not be encoded into its wire shape.
    Encode(crate::Error),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::Encode(e) => write!(f, "failed to hand off audit record: {}", e),
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SinkError::Encode(e) => Some(e),
        }
    }
}

impl From<crate::Error> for SinkError {
    fn from(err: crate::Error) -> Self {
        SinkError::Encode(err)
    }
}

/// Destination for finished records.
///
/// Producers hand a record over once it has been finalized and treat it as
/// read-only afterwards. Delivery guarantees are the implementation's
/// business.
pub trait RecordSink {
    /// Accepts one finished record.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` if the record cannot be encoded.
    fn write(&self, record: &Record) -> Result<(), SinkError>;
}

/// In-memory recorder for tests and demos.
///
/// Records are kept in the order they were written.
///
/// # Example
///
/// ```
/// use audit_record::{MemorySink, Record, RecordSink};
///
/// let sink = MemorySink::new();
/// let mut rec = Record::new("login");
/// rec.success();
///
/// sink.write(&rec).unwrap();
///
/// assert_eq!(sink.len(), 1);
/// assert_eq!(sink.records()[0].event_name(), "login");
/// ```
pub struct MemorySink {
    records: RefCell<Vec<Record>>,
}

impl MemorySink {
    /// Creates a new empty sink.
    pub fn new() -> Self {
        Self {
            records: RefCell::new(Vec::new()),
        }
    }

    /// Returns a snapshot of all written records.
    pub fn records(&self) -> Vec<Record> {
        self.records.borrow().clone()
    }

    /// Returns the number of written records.
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Drops all written records.
    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordSink for MemorySink {
    fn write(&self, record: &Record) -> Result<(), SinkError> {
        self.records.borrow_mut().push(record.clone());
        Ok(())
    }
}

/// Emits records as structured `tracing` events.
///
/// Each record becomes one info-level event on target `audit_record` whose
/// `record` field holds the wire JSON in the record's configured schema.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TracingSink {
    /// Creates a new tracing sink.
    pub fn new() -> Self {
        Self
    }
}

impl RecordSink for TracingSink {
    fn write(&self, record: &Record) -> Result<(), SinkError> {
        let json = record.to_wire_json()?;
        tracing::info!(
            target: "audit_record",
            event_name = %record.event_name(),
            status = %record.status(),
            user_id = %record.actor().user_id,
            schema = %record.schema(),
            record = %json,
            "audit record"
        );
        Ok(())
    }
}
