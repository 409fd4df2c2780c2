//! Ownership predicate
//!
//! Applied before every edit, update and delete. A record owned by someone
//! else produces the same [`RecordError::NotFound`] as a missing record, so
//! callers cannot probe for other owners' ids.

use crate::error::RecordError;
use crate::model::TrackingCode;
use tc_model::{OwnerId, RecordId};

/// Resolve a looked-up record for `actor`
///
/// # Errors
/// [`RecordError::NotFound`] when the record is absent or not owned by `actor`
pub fn authorize(
    actor: OwnerId,
    id: RecordId,
    found: Option<TrackingCode>,
) -> Result<TrackingCode, RecordError> {
    match found {
        Some(record) if record.is_owned_by(actor) => Ok(record),
        Some(_) => {
            tracing::debug!(%actor, %id, "tracking code owned by another identity");
            Err(RecordError::NotFound(id))
        }
        None => Err(RecordError::NotFound(id)),
    }
}
