//! Runtime configuration
//!
//! Every section is optional in the TOML file; missing sections and fields
//! fall back to their defaults.
//!
//! ```toml
//! [consent]
//! ttl_days = 30
//!
//! [injector]
//! id_attribute = "data-tracking-code-id"
//!
//! [records]
//! max_name_length = 255
//!
//! [logging]
//! filter = "info"
//! json = false
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tc_consent::settings::MAX_TTL_DAYS;
use tc_consent::ConsentSettings;
use tc_injector::InjectorSettings;
use tc_records::RecordSettings;
use tracing_subscriber::EnvFilter;

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// Full configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub consent: ConsentSettings,
    pub injector: InjectorSettings,
    pub records: RecordSettings,
    pub logging: LoggingConfig,
}

impl TrackingConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With consent settings
    #[inline]
    #[must_use]
    pub fn with_consent(mut self, consent: ConsentSettings) -> Self {
        self.consent = consent;
        self
    }

    /// With injector settings
    #[inline]
    #[must_use]
    pub fn with_injector(mut self, injector: InjectorSettings) -> Self {
        self.injector = injector;
        self
    }

    /// With record validation settings
    #[inline]
    #[must_use]
    pub fn with_records(mut self, records: RecordSettings) -> Self {
        self.records = records;
        self
    }

    /// With logging settings
    #[inline]
    #[must_use]
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// [`ConfigError::Parse`] or [`ConfigError::Invalid`]
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`Self::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Check values that parse but cannot work
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] naming the first offending field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.consent.ttl_days == 0 {
            return Err(invalid("consent.ttl_days must be at least 1"));
        }
        if self.consent.ttl_days > MAX_TTL_DAYS {
            return Err(ConfigError::Invalid(format!(
                "consent.ttl_days must be at most {MAX_TTL_DAYS}"
            )));
        }
        if self.consent.storage_key.trim().is_empty() {
            return Err(invalid("consent.storage_key must not be empty"));
        }
        if self.consent.expiry_key.trim().is_empty() {
            return Err(invalid("consent.expiry_key must not be empty"));
        }
        if self.consent.storage_key == self.consent.expiry_key {
            return Err(invalid("consent.storage_key and consent.expiry_key must differ"));
        }
        if self.injector.id_attribute.trim().is_empty() {
            return Err(invalid("injector.id_attribute must not be empty"));
        }
        if self.injector.name_attribute.trim().is_empty() {
            return Err(invalid("injector.name_attribute must not be empty"));
        }
        if self.injector.name_attribute == self.injector.id_attribute {
            return Err(invalid("injector.id_attribute and injector.name_attribute must differ"));
        }
        if self.records.max_name_length == 0 {
            return Err(invalid("records.max_name_length must be at least 1"));
        }
        if let Err(err) = EnvFilter::try_new(&self.logging.filter) {
            return Err(ConfigError::Invalid(format!("logging.filter: {err}")));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Invalid(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_is_all_defaults() {
        let config = TrackingConfig::from_toml_str("").unwrap();
        assert_eq!(config, TrackingConfig::default());
        assert_eq!(config.consent.ttl_days, 30);
        assert_eq!(config.records.max_name_length, 255);
        assert_eq!(config.injector.id_attribute, "data-tracking-code-id");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = TrackingConfig::from_toml_str(
            r#"
            [consent]
            ttl_days = 7

            [logging]
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.consent.ttl_days, 7);
        assert_eq!(config.consent.storage_key, "cookie_consent");
        assert!(config.logging.json);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn zero_ttl_is_invalid() {
        let err = TrackingConfig::from_toml_str("[consent]\nttl_days = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("ttl_days")));
    }

    #[test]
    fn ttl_beyond_a_century_is_invalid() {
        let err = TrackingConfig::from_toml_str("[consent]\nttl_days = 4000000000").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("at most 36500")));

        assert!(TrackingConfig::from_toml_str("[consent]\nttl_days = 36500").is_ok());
    }

    #[test]
    fn empty_name_attribute_is_invalid() {
        let err = TrackingConfig::from_toml_str("[injector]\nname_attribute = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("name_attribute")));
    }

    #[test]
    fn name_attribute_must_not_reuse_id_attribute() {
        let err = TrackingConfig::from_toml_str(
            "[injector]\nid_attribute = \"data-tc\"\nname_attribute = \"data-tc\"",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("must differ")));
    }

    #[test]
    fn shared_storage_keys_are_invalid() {
        let config = TrackingConfig::new()
            .with_consent(ConsentSettings::new().with_keys("consent", "consent"));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_name_length_is_invalid() {
        let config = TrackingConfig::new().with_records(RecordSettings { max_name_length: 0 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = TrackingConfig::from_toml_str("[consent\nttl_days = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn wrong_type_is_a_parse_error() {
        let err = TrackingConfig::from_toml_str("[consent]\nttl_days = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
