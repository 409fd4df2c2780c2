//! Persisted tracking codes and their view projections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tc_model::{OwnerId, RecordId, TrackingRecord};

/// Date format used by the list view (`Jan 5, 2026`)
pub const LIST_DATE_FORMAT: &str = "%b %-d, %Y";

/// A tracking code as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingCode {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub name: String,
    pub script_content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TrackingCode {
    /// Whether `owner` owns this record
    #[inline]
    #[must_use]
    pub fn is_owned_by(&self, owner: OwnerId) -> bool {
        self.owner_id == owner
    }

    /// Projection handed to customer pages
    #[must_use]
    pub fn to_record(&self) -> TrackingRecord {
        TrackingRecord::new(self.id, self.name.clone(), self.script_content.clone())
    }

    /// List-view row
    #[must_use]
    pub fn summary(&self) -> TrackingCodeSummary {
        TrackingCodeSummary {
            id: self.id,
            name: self.name.clone(),
            script_content: self.script_content.clone(),
            created_at: self.created_at.format(LIST_DATE_FORMAT).to_string(),
            updated_at: self.updated_at.format(LIST_DATE_FORMAT).to_string(),
        }
    }

    /// Edit-form payload
    #[must_use]
    pub fn form(&self) -> TrackingCodeForm {
        TrackingCodeForm {
            id: self.id,
            name: self.name.clone(),
            script_content: self.script_content.clone(),
        }
    }
}

/// Case-insensitive substring match on a name
#[must_use]
pub fn name_matches(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(&needle.to_lowercase())
}

/// One row of the settings list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingCodeSummary {
    pub id: RecordId,
    pub name: String,
    pub script_content: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields shown on the edit form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingCodeForm {
    pub id: RecordId,
    pub name: String,
    pub script_content: String,
}

/// Filters echoed back to the list view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexFilters {
    pub search: String,
}

/// List view payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingCodeIndex {
    pub tracking_codes: Vec<TrackingCodeSummary>,
    pub filters: IndexFilters,
}

/// Notification level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
}

/// One-shot notification shown after a redirect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    /// Success notification
    #[inline]
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }
}

/// Result of a successful create or update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    pub tracking_code: TrackingCode,
    pub flash: Flash,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn code() -> TrackingCode {
        TrackingCode {
            id: RecordId(3),
            owner_id: OwnerId(1),
            name: "Meta Pixel".to_string(),
            script_content: "fbq('init')".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 11, 20, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn summary_formats_dates_for_list() {
        let summary = code().summary();
        assert_eq!(summary.created_at, "Jan 5, 2026");
        assert_eq!(summary.updated_at, "Nov 20, 2026");
    }

    #[test]
    fn projections_keep_identity() {
        let code = code();
        assert_eq!(code.to_record(), TrackingRecord::new(RecordId(3), "Meta Pixel", "fbq('init')"));
        assert_eq!(code.form().id, RecordId(3));
        assert!(code.is_owned_by(OwnerId(1)));
        assert!(!code.is_owned_by(OwnerId(2)));
    }

    #[test]
    fn name_match_ignores_case() {
        assert!(name_matches("Google Analytics", "analy"));
        assert!(name_matches("Google Analytics", "GOOGLE"));
        assert!(!name_matches("Google Analytics", "pixel"));
    }

    #[test]
    fn index_uses_page_prop_names() {
        let index = TrackingCodeIndex {
            tracking_codes: vec![code().summary()],
            filters: IndexFilters::default(),
        };
        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(json["trackingCodes"][0]["name"], "Meta Pixel");
        assert_eq!(json["filters"]["search"], "");
    }
}
