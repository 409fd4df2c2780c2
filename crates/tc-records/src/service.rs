//! Settings-page operations on tracking codes
//!
//! Every mutation on an existing record goes through [`authorize`] before
//! the payload is even validated, so a foreign record always looks missing.

use crate::authorization::authorize;
use crate::error::RecordError;
use crate::model::{Flash, IndexFilters, Saved, TrackingCodeForm, TrackingCodeIndex};
use crate::repository::TrackingCodeRepository;
use crate::validation::{RecordSettings, TrackingCodeInput};
use tc_model::{OwnerId, RecordId, TrackingRecord};

/// Tracking code CRUD for the acting owner
#[derive(Debug)]
pub struct TrackingCodeService<R> {
    repository: R,
    settings: RecordSettings,
}

impl<R: TrackingCodeRepository> TrackingCodeService<R> {
    /// Service over `repository` with default settings
    #[inline]
    #[must_use]
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            settings: RecordSettings::default(),
        }
    }

    /// With validation settings
    #[inline]
    #[must_use]
    pub fn with_settings(mut self, settings: RecordSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Underlying repository
    #[inline]
    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// List the owner's tracking codes, newest first
    ///
    /// A blank `search` means no filter; the raw value is echoed back in
    /// the filters.
    ///
    /// # Errors
    /// Repository failures
    pub async fn index(
        &self,
        owner: OwnerId,
        search: Option<&str>,
    ) -> Result<TrackingCodeIndex, RecordError> {
        let needle = search.map(str::trim).filter(|s| !s.is_empty());
        let rows = self.repository.list_for_owner(owner, needle).await?;

        Ok(TrackingCodeIndex {
            tracking_codes: rows.iter().map(|row| row.summary()).collect(),
            filters: IndexFilters {
                search: search.unwrap_or_default().to_string(),
            },
        })
    }

    /// Create a tracking code owned by `owner`
    ///
    /// # Errors
    /// [`RecordError::Validation`] without persisting anything, or
    /// repository failures
    pub async fn store(
        &self,
        owner: OwnerId,
        input: &TrackingCodeInput,
    ) -> Result<Saved, RecordError> {
        let fields = input.validate(&self.settings)?;
        let tracking_code = self.repository.insert(owner, fields).await?;
        tracing::info!(%owner, id = %tracking_code.id, "tracking code created");

        Ok(Saved {
            tracking_code,
            flash: Flash::success("Tracking code created successfully."),
        })
    }

    /// Load the edit form for one of the owner's tracking codes
    ///
    /// # Errors
    /// [`RecordError::NotFound`] when missing or not owned by `owner`
    pub async fn edit(&self, owner: OwnerId, id: RecordId) -> Result<TrackingCodeForm, RecordError> {
        let found = self.repository.find(id).await?;
        Ok(authorize(owner, id, found)?.form())
    }

    /// Replace name and script of one of the owner's tracking codes
    ///
    /// # Errors
    /// [`RecordError::NotFound`] when missing or foreign,
    /// [`RecordError::Validation`] for bad input
    pub async fn update(
        &self,
        owner: OwnerId,
        id: RecordId,
        input: &TrackingCodeInput,
    ) -> Result<Saved, RecordError> {
        let found = self.repository.find(id).await?;
        authorize(owner, id, found)?;

        let fields = input.validate(&self.settings)?;
        let tracking_code = self.repository.update(id, fields).await?;
        tracing::info!(%owner, %id, "tracking code updated");

        Ok(Saved {
            tracking_code,
            flash: Flash::success("Tracking code updated successfully."),
        })
    }

    /// Delete one of the owner's tracking codes
    ///
    /// # Errors
    /// [`RecordError::NotFound`] when missing or foreign
    pub async fn destroy(&self, owner: OwnerId, id: RecordId) -> Result<Flash, RecordError> {
        let found = self.repository.find(id).await?;
        authorize(owner, id, found)?;

        if !self.repository.delete(id).await? {
            return Err(RecordError::NotFound(id));
        }
        tracing::info!(%owner, %id, "tracking code deleted");

        Ok(Flash::success("Tracking code deleted successfully."))
    }

    /// Records shared with customer-facing pages
    ///
    /// # Errors
    /// Repository failures
    pub async fn page_records(&self, owner: OwnerId) -> Result<Vec<TrackingRecord>, RecordError> {
        let rows = self.repository.list_for_owner(owner, None).await?;
        Ok(rows.iter().map(|row| row.to_record()).collect())
    }
}
