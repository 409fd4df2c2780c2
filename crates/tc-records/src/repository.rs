//! Tracking code persistence
//!
//! [`TrackingCodeRepository`] is the seam to the relational table. The
//! in-memory implementation keeps rows in a [`DashMap`] and assigns ids from
//! an atomic sequence, like an auto-increment column.

use crate::error::RecordError;
use crate::model::{name_matches, TrackingCode};
use crate::validation::ValidTrackingCode;
use async_trait::async_trait;
use dashmap::DashMap;
use std::cmp::Reverse;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tc_model::{Clock, OwnerId, RecordId, SystemClock};

/// Storage for tracking codes
#[async_trait]
pub trait TrackingCodeRepository: Send + Sync {
    /// Records owned by `owner`, newest first, optionally filtered by a
    /// case-insensitive substring of the name
    async fn list_for_owner(
        &self,
        owner: OwnerId,
        name_filter: Option<&str>,
    ) -> Result<Vec<TrackingCode>, RecordError>;

    /// Look up a record regardless of owner
    async fn find(&self, id: RecordId) -> Result<Option<TrackingCode>, RecordError>;

    /// Persist a new record for `owner`
    async fn insert(
        &self,
        owner: OwnerId,
        fields: ValidTrackingCode,
    ) -> Result<TrackingCode, RecordError>;

    /// Replace name and script of an existing record
    async fn update(
        &self,
        id: RecordId,
        fields: ValidTrackingCode,
    ) -> Result<TrackingCode, RecordError>;

    /// Delete a record; returns whether it existed
    async fn delete(&self, id: RecordId) -> Result<bool, RecordError>;
}

/// In-memory repository
#[derive(Debug)]
pub struct InMemoryTrackingCodeRepository {
    rows: DashMap<RecordId, TrackingCode>,
    next_id: AtomicI64,
    clock: Arc<dyn Clock>,
}

impl InMemoryTrackingCodeRepository {
    /// Empty repository on the wall clock
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Empty repository stamping rows from `clock`
    #[inline]
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicI64::new(1),
            clock,
        }
    }

    /// Total number of rows across all owners
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows exist
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for InMemoryTrackingCodeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TrackingCodeRepository for InMemoryTrackingCodeRepository {
    async fn list_for_owner(
        &self,
        owner: OwnerId,
        name_filter: Option<&str>,
    ) -> Result<Vec<TrackingCode>, RecordError> {
        let mut rows: Vec<TrackingCode> = self
            .rows
            .iter()
            .filter(|row| row.owner_id == owner)
            .filter(|row| name_filter.map_or(true, |needle| name_matches(&row.name, needle)))
            .map(|row| row.value().clone())
            .collect();

        rows.sort_by_key(|row| Reverse((row.created_at, row.id)));
        Ok(rows)
    }

    async fn find(&self, id: RecordId) -> Result<Option<TrackingCode>, RecordError> {
        Ok(self.rows.get(&id).map(|row| row.value().clone()))
    }

    async fn insert(
        &self,
        owner: OwnerId,
        fields: ValidTrackingCode,
    ) -> Result<TrackingCode, RecordError> {
        let id = RecordId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let now = self.clock.now();
        let row = TrackingCode {
            id,
            owner_id: owner,
            name: fields.name().to_string(),
            script_content: fields.script_content().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        id: RecordId,
        fields: ValidTrackingCode,
    ) -> Result<TrackingCode, RecordError> {
        let mut row = self.rows.get_mut(&id).ok_or(RecordError::NotFound(id))?;
        row.name = fields.name().to_string();
        row.script_content = fields.script_content().to_string();
        row.updated_at = self.clock.now();
        Ok(row.value().clone())
    }

    async fn delete(&self, id: RecordId) -> Result<bool, RecordError> {
        Ok(self.rows.remove(&id).is_some())
    }
}
