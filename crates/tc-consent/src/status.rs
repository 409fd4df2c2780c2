//! Consent status and decision types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker value stored for an accepted decision
pub(crate) const ACCEPTED_MARKER: &str = "accepted";

/// Marker value stored for a rejected decision
pub(crate) const REJECTED_MARKER: &str = "rejected";

/// The visitor's cookie-consent state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentStatus {
    /// No valid decision on record; the prompt should be shown
    #[default]
    Unset,
    /// Tracking allowed until the durable expiry
    Accepted,
    /// Tracking refused for the current session
    Rejected,
}

impl ConsentStatus {
    /// Whether tracking scripts may run
    #[inline]
    #[must_use]
    pub fn tracking_allowed(self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Whether a decision has been made
    #[inline]
    #[must_use]
    pub fn is_decided(self) -> bool {
        !matches!(self, Self::Unset)
    }

    /// Lowercase label
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Accepted => ACCEPTED_MARKER,
            Self::Rejected => REJECTED_MARKER,
        }
    }
}

impl fmt::Display for ConsentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consent status together with its expiry
///
/// `expires_at` is only ever present for [`ConsentStatus::Accepted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsentDecision {
    pub status: ConsentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl ConsentDecision {
    /// No decision
    #[inline]
    #[must_use]
    pub fn unset() -> Self {
        Self::default()
    }

    /// Accepted until `expires_at`
    #[inline]
    #[must_use]
    pub fn accepted(expires_at: DateTime<Utc>) -> Self {
        Self {
            status: ConsentStatus::Accepted,
            expires_at: Some(expires_at),
        }
    }

    /// Rejected for this session
    #[inline]
    #[must_use]
    pub fn rejected() -> Self {
        Self {
            status: ConsentStatus::Rejected,
            expires_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_accepted_allows_tracking() {
        assert!(ConsentStatus::Accepted.tracking_allowed());
        assert!(!ConsentStatus::Rejected.tracking_allowed());
        assert!(!ConsentStatus::Unset.tracking_allowed());
    }

    #[test]
    fn status_labels() {
        assert_eq!(ConsentStatus::Unset.to_string(), "unset");
        assert_eq!(ConsentStatus::Accepted.to_string(), "accepted");
        assert_eq!(ConsentStatus::Rejected.to_string(), "rejected");
        assert!(!ConsentStatus::Unset.is_decided());
        assert!(ConsentStatus::Rejected.is_decided());
    }

    #[test]
    fn rejected_decision_has_no_expiry() {
        assert_eq!(ConsentDecision::rejected().expires_at, None);
        assert_eq!(ConsentDecision::unset().status, ConsentStatus::Unset);
    }
}
