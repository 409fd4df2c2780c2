//! Consent persistence settings

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Default key for the consent marker (durable and session storage)
pub const DEFAULT_STORAGE_KEY: &str = "cookie_consent";

/// Default durable key for the expiry timestamp
pub const DEFAULT_EXPIRY_KEY: &str = "cookie_consent_expiry";

/// Default lifetime of an accepted decision
pub const DEFAULT_TTL_DAYS: u32 = 30;

/// Longest accepted-decision lifetime a configuration may ask for
pub const MAX_TTL_DAYS: u32 = 36_500;

/// Storage keys and lifetime of an accepted decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsentSettings {
    /// Key holding the consent marker in both storages
    pub storage_key: String,
    /// Durable key holding the expiry as epoch milliseconds
    pub expiry_key: String,
    /// Days an accepted decision stays valid
    pub ttl_days: u32,
}

impl ConsentSettings {
    /// Default settings
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With lifetime in days
    #[inline]
    #[must_use]
    pub fn with_ttl_days(mut self, days: u32) -> Self {
        self.ttl_days = days;
        self
    }

    /// With storage keys
    #[inline]
    #[must_use]
    pub fn with_keys(mut self, storage_key: impl Into<String>, expiry_key: impl Into<String>) -> Self {
        self.storage_key = storage_key.into();
        self.expiry_key = expiry_key.into();
        self
    }

    /// Lifetime of an accepted decision
    #[inline]
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::days(i64::from(self.ttl_days))
    }
}

impl Default for ConsentSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            expiry_key: DEFAULT_EXPIRY_KEY.to_string(),
            ttl_days: DEFAULT_TTL_DAYS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_browser_keys() {
        let settings = ConsentSettings::default();
        assert_eq!(settings.storage_key, "cookie_consent");
        assert_eq!(settings.expiry_key, "cookie_consent_expiry");
        assert_eq!(settings.ttl(), Duration::days(30));
    }

    #[test]
    fn builder_overrides() {
        let settings = ConsentSettings::new()
            .with_ttl_days(7)
            .with_keys("consent", "consent_until");
        assert_eq!(settings.ttl(), Duration::days(7));
        assert_eq!(settings.storage_key, "consent");
        assert_eq!(settings.expiry_key, "consent_until");
    }
}
