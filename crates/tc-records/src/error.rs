//! Error types for tracking code records

use crate::validation::ValidationErrors;
use tc_model::RecordId;

/// Record operation failures
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Record missing, or owned by someone else
    #[error("tracking code {0} not found")]
    NotFound(RecordId),

    /// Input rejected; nothing was persisted
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Storage backend failure
    #[error("repository error: {0}")]
    Repository(String),
}

impl RecordError {
    /// Check if this is a not-found outcome
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a validation failure
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Field errors, when this is a validation failure
    #[inline]
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
