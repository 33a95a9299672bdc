use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Marker written in place of every secret value.
pub const REDACTED: &str = "[REDACTED]";

/// A wrapper that keeps sensitive values out of audit records.
///
/// `Secret<T>` is meant for fields of domain objects that implement
/// [`Auditable`](crate::Auditable). Formatting, serializing, or converting it
/// into a JSON value always yields `[REDACTED]`, so a projection that
/// forwards a secret field still cannot leak it. The wrapped value is only
/// reachable through [`expose_secret`](Self::expose_secret).
///
/// # Examples
///
/// ```
/// use audit_record::Secret;
/// use serde_json::Value;
///
/// let token = Secret::new("sk-1234567890".to_string());
///
/// assert_eq!(format!("{:?}", token), "[REDACTED]");
/// assert_eq!(Value::from(&token), Value::from("[REDACTED]"));
/// assert_eq!(serde_json::to_string(&token).unwrap(), "\"[REDACTED]\"");
///
/// assert_eq!(token.expose_secret(), "sk-1234567890");
/// ```
// BREAKING CHANGE WARNING: Do NOT add Clone, Copy, Default, or Deserialize derives.
pub struct Secret<T> {
    // BREAKING CHANGE WARNING: This field MUST remain private.
    inner: T,
}

impl<T> Secret<T> {
    /// Wraps a sensitive value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Explicitly exposes the secret value.
    ///
    /// The name is verbose on purpose. Never pass the result into a record.
    pub fn expose_secret(&self) -> &T {
        &self.inner
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> Serialize for Secret<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

impl<T> From<&Secret<T>> for Value {
    fn from(_: &Secret<T>) -> Self {
        Value::String(REDACTED.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_redacts_debug() {
        let password = Secret::new("hunter2".to_string());
        let debug_output = format!("{:?}", password);

        assert_eq!(debug_output, REDACTED);
        assert!(!debug_output.contains("hunter2"));
        assert!(!debug_output.contains("String"));
    }

    #[test]
    fn secret_redacts_display() {
        let api_key = Secret::new("sk-1234567890");
        assert_eq!(format!("{}", api_key), REDACTED);
    }

    #[test]
    fn secret_redacts_serialization() {
        let pin = Secret::new(4321u32);
        let json = serde_json::to_string(&pin).unwrap();

        assert_eq!(json, "\"[REDACTED]\"");
        assert!(!json.contains("4321"));
    }

    #[test]
    fn secret_converts_to_redacted_value() {
        let secret = Secret::new(vec![1, 2, 3]);
        assert_eq!(Value::from(&secret), Value::String(REDACTED.to_string()));
    }

    #[test]
    fn secret_exposes_when_explicit() {
        let secret = Secret::new(42);
        assert_eq!(*secret.expose_secret(), 42);
    }
}
