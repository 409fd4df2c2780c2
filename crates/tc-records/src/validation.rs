//! Create/update input validation
//!
//! Rules for both create and update:
//! - `name`: required, at most `max_name_length` characters (255 by default)
//! - `script_content`: required
//!
//! Inputs are trimmed before checking, so whitespace-only values count as
//! missing. Errors are collected per field, in field order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default maximum length of a tracking code name, in characters
pub const DEFAULT_MAX_NAME_LENGTH: usize = 255;

/// Record validation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordSettings {
    /// Maximum name length in characters
    pub max_name_length: usize,
}

impl Default for RecordSettings {
    fn default() -> Self {
        Self {
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

/// Input field subject to validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    ScriptContent,
}

impl Field {
    /// Wire name of the field
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::ScriptContent => "script_content",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-scoped validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: IndexMap<Field, Vec<String>>,
}

impl ValidationErrors {
    /// Empty error set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.errors.entry(field).or_default().push(message.into());
    }

    /// Whether a field has any error
    #[inline]
    #[must_use]
    pub fn has(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    /// Messages for a field
    #[must_use]
    pub fn get(&self, field: Field) -> &[String] {
        self.errors.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Fields with errors, in the order they were reported
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.errors.keys().copied()
    }

    /// Whether nothing was reported
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields with errors
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.errors {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw create/update payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingCodeInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub script_content: Option<String>,
}

impl TrackingCodeInput {
    /// Payload with both fields present
    #[must_use]
    pub fn new(name: impl Into<String>, script_content: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            script_content: Some(script_content.into()),
        }
    }

    /// Check the payload
    ///
    /// # Errors
    /// Returns every failing field with its message
    pub fn validate(&self, settings: &RecordSettings) -> Result<ValidTrackingCode, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = trimmed(self.name.as_deref());
        match name {
            None => errors.add(Field::Name, "The tracking code name is required."),
            Some(name) if name.chars().count() > settings.max_name_length => errors.add(
                Field::Name,
                format!(
                    "The tracking code name may not be greater than {} characters.",
                    settings.max_name_length
                ),
            ),
            Some(_) => {}
        }

        let script_content = trimmed(self.script_content.as_deref());
        if script_content.is_none() {
            errors.add(Field::ScriptContent, "The script content is required.");
        }

        match (name, script_content) {
            (Some(name), Some(script_content)) if errors.is_empty() => Ok(ValidTrackingCode {
                name: name.to_string(),
                script_content: script_content.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

/// Payload that passed validation
///
/// Only obtainable from [`TrackingCodeInput::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTrackingCode {
    name: String,
    script_content: String,
}

impl ValidTrackingCode {
    /// Validated name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validated script body
    #[inline]
    #[must_use]
    pub fn script_content(&self) -> &str {
        &self.script_content
    }
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
