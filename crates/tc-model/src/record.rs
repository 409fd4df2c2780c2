//! Record identifiers and the customer-facing tracking record

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a persisted tracking code
///
/// Unique and stable per owner. Serialized as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl RecordId {
    /// Raw integer value
    #[inline]
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Identity acting on tracking codes (the account owner)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub i64);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One script snippet as delivered to customer-facing pages
///
/// `script_body` is the raw script text without enclosing `<script>` tags.
/// Page data produced by the settings backend names this field
/// `script_content`, which is accepted on input and emitted on output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingRecord {
    /// Record identifier
    pub id: RecordId,
    /// Display label
    pub name: String,
    /// Raw script text
    #[serde(rename = "script_content", alias = "scriptBody", alias = "script_body")]
    pub script_body: String,
}

impl TrackingRecord {
    /// Create a tracking record
    #[inline]
    #[must_use]
    pub fn new(id: RecordId, name: impl Into<String>, script_body: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            script_body: script_body.into(),
        }
    }

    /// Whether the script body contains anything besides whitespace
    #[inline]
    #[must_use]
    pub fn has_script(&self) -> bool {
        !self.script_body.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_parses_and_displays() {
        let id: RecordId = " 42 ".parse().unwrap();
        assert_eq!(id, RecordId(42));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<RecordId>().is_err());
    }

    #[test]
    fn tracking_record_accepts_page_data_field_names() {
        let from_backend: TrackingRecord =
            serde_json::from_str(r#"{"id":7,"name":"GA","script_content":"ga()"}"#).unwrap();
        let camel: TrackingRecord =
            serde_json::from_str(r#"{"id":7,"name":"GA","scriptBody":"ga()"}"#).unwrap();

        assert_eq!(from_backend, camel);
        assert_eq!(from_backend.id, RecordId(7));

        let out = serde_json::to_value(&from_backend).unwrap();
        assert_eq!(out["script_content"], "ga()");
    }

    #[test]
    fn has_script_ignores_whitespace() {
        assert!(TrackingRecord::new(RecordId(1), "a", " x ").has_script());
        assert!(!TrackingRecord::new(RecordId(1), "a", " \n\t ").has_script());
    }
}
