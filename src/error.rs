use std::fmt;

/// Errors raised when a record crosses the wire boundary.
///
/// Building a record never fails; only encoding it to, or decoding it from,
/// one of the wire shapes can.
#[derive(Debug)]
pub enum Error {
    /// A record could not be encoded
    Serialize(serde_json::Error),
    /// Input was not a valid record in the expected shape
    Deserialize(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Serialize(e) => write!(f, "failed to encode audit record: {}", e),
            Error::Deserialize(e) => write!(f, "failed to decode audit record: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Serialize(e) | Error::Deserialize(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn deserialize_error_display_and_source() {
        let inner = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::Deserialize(inner);

        assert!(err.to_string().starts_with("failed to decode audit record"));
        assert!(err.source().is_some());
    }
}
