use std::fmt;

use serde::{Deserialize, Serialize};

/// Terminal outcome of an audited action.
///
/// A record starts out [`Status::Unset`] and is finalized by
/// [`Record::success`](crate::Record::success) or
/// [`Record::fail`](crate::Record::fail). On the wire the unset state is the
/// empty string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Outcome not yet known
    #[default]
    #[serde(rename = "")]
    Unset,
    /// The action succeeded
    #[serde(rename = "success")]
    Success,
    /// The action failed
    #[serde(rename = "fail")]
    Fail,
}

impl Status {
    /// Returns the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Unset => "",
            Status::Success => "success",
            Status::Fail => "fail",
        }
    }

    /// Parses a wire string. Unknown markers map to `Unset`.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "success" => Status::Success,
            "fail" => Status::Fail,
            _ => Status::Unset,
        }
    }

    /// Returns true once either terminal marker has been written.
    pub fn is_set(&self) -> bool {
        !matches!(self, Status::Unset)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display() {
        assert_eq!(Status::Unset.to_string(), "");
        assert_eq!(Status::Success.to_string(), "success");
        assert_eq!(Status::Fail.to_string(), "fail");
    }

    #[test]
    fn status_wire_strings() {
        assert_eq!(serde_json::to_string(&Status::Unset).unwrap(), "\"\"");
        assert_eq!(serde_json::to_string(&Status::Fail).unwrap(), "\"fail\"");
        let parsed: Status = serde_json::from_str("\"success\"").unwrap();
        assert_eq!(parsed, Status::Success);
    }

    #[test]
    fn from_wire_tolerates_unknown_markers() {
        assert_eq!(Status::from_wire("success"), Status::Success);
        assert_eq!(Status::from_wire("FAIL"), Status::Unset);
        assert!(!Status::from_wire("").is_set());
    }
}
