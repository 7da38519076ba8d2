// Copyright (c) 2025 - Cowboy AI, Inc.
//! Building Write Orchestrator
//!
//! Sequences the independently failing collaborators of every write:
//!
//! ```text
//! create: Resolver → Uploader? → Store.insert → Publisher
//! update: Store.get → Uploader? → Store.update → Publisher
//! remove: Store.delete → Publisher
//! reads:  Store
//! ```
//!
//! # Failure Semantics
//!
//! - Resolver, uploader and store failures abort the operation and reach
//!   the caller.
//! - The publish step cannot fail: [`EventPublisher`] has no error type.
//! - Nothing is retried here. An image uploaded before a failed insert is
//!   left behind in the upload service.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use crate::domain::{
    total_pages, Building, BuildingChanges, BuildingDraft, BuildingId, BuildingPatch,
    Coordinates, FindAllQuery, NewBuilding, Page, PageMeta, QueryError, StoredImage,
};
use crate::events::BuildingEvent;
use crate::geocoding::{GeocodeError, GeocodeRequest, GeocodeResolver};
use crate::publisher::EventPublisher;
use crate::store::{BuildingStore, StoreError};
use crate::upload::{AssetUploader, ImageAsset, UploadError};

/// Service layer result type
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service layer errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The address could not be geocoded
    #[error("Geocoding failed for address '{address}'")]
    UnresolvableAddress {
        address: String,
        #[source]
        source: Option<GeocodeError>,
    },

    /// Building does not exist
    #[error("Building not found: {0}")]
    NotFound(BuildingId),

    /// Image upload failed
    #[error("Failed to upload image: {0}")]
    Upload(#[from] UploadError),

    /// Record store failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<QueryError> for ServiceError {
    fn from(err: QueryError) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}

/// Caller-facing classification of a [`ServiceError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected request, never worth retrying as-is
    InvalidInput,
    /// Missing identifier
    NotFound,
    /// A dependency failed
    Dependency,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidInput(_) | ServiceError::UnresolvableAddress { .. } => {
                ErrorKind::InvalidInput
            }
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Upload(_) | ServiceError::Store(_) => ErrorKind::Dependency,
        }
    }
}

/// Confirmation returned by `remove`
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DeleteConfirmation {
    pub id: BuildingId,
    pub message: String,
}

/// Building service trait
#[async_trait]
pub trait BuildingService: Send + Sync {
    /// Geocode, optionally upload, persist and announce a new building
    async fn create(&self, input: NewBuilding, asset: Option<ImageAsset>) -> ServiceResult<Building>;

    /// Patch an existing building; the address is not re-geocoded
    async fn update(
        &self,
        id: BuildingId,
        patch: BuildingPatch,
        asset: Option<ImageAsset>,
    ) -> ServiceResult<Building>;

    /// Physically delete a building
    async fn remove(&self, id: BuildingId) -> ServiceResult<DeleteConfirmation>;

    /// Search, sort and paginate
    async fn find_all(&self, query: FindAllQuery) -> ServiceResult<Page<Building>>;

    /// Load one building
    async fn find_one(&self, id: BuildingId) -> ServiceResult<Building>;
}

/// Orchestrator implementation of [`BuildingService`]
#[derive(Clone)]
pub struct BuildingOrchestrator {
    geocoder: Arc<dyn GeocodeResolver>,
    uploader: Arc<dyn AssetUploader>,
    store: Arc<dyn BuildingStore>,
    publisher: Arc<dyn EventPublisher>,
}

impl BuildingOrchestrator {
    pub fn new(
        geocoder: Arc<dyn GeocodeResolver>,
        uploader: Arc<dyn AssetUploader>,
        store: Arc<dyn BuildingStore>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            geocoder,
            uploader,
            store,
            publisher,
        }
    }

    /// Resolve an address or fail the operation as invalid input
    async fn geocode(&self, address: &str) -> ServiceResult<Coordinates> {
        match self.geocoder.resolve(&GeocodeRequest::new(address)).await {
            Ok(Some(result)) => {
                debug!(
                    address = %address,
                    latitude = result.latitude,
                    longitude = result.longitude,
                    "Address resolved"
                );
                Ok(Coordinates::from_degrees(result.latitude, result.longitude))
            }
            Ok(None) => Err(ServiceError::UnresolvableAddress {
                address: address.to_string(),
                source: None,
            }),
            Err(e) => Err(ServiceError::UnresolvableAddress {
                address: address.to_string(),
                source: Some(e),
            }),
        }
    }

    async fn upload(&self, asset: &ImageAsset) -> ServiceResult<StoredImage> {
        let uploaded = self.uploader.upload(asset).await.map_err(|e| {
            error!(file_name = %asset.file_name, error = %e, "Image upload failed");
            ServiceError::from(e)
        })?;

        Ok(StoredImage {
            image_url: uploaded.url,
            image_storage_key: uploaded.storage_key,
        })
    }
}

#[async_trait]
impl BuildingService for BuildingOrchestrator {
    #[instrument(skip_all, fields(name = %input.name))]
    async fn create(&self, input: NewBuilding, asset: Option<ImageAsset>) -> ServiceResult<Building> {
        if input.address.trim().is_empty() {
            return Err(ServiceError::InvalidInput("address must not be empty".to_string()));
        }

        let coordinates = self.geocode(&input.address).await?;

        let image = match &asset {
            Some(asset) => Some(self.upload(asset).await?),
            None => None,
        };

        let building = self
            .store
            .insert(BuildingDraft {
                input,
                coordinates,
                image,
            })
            .await
            .inspect_err(|e| error!(error = %e, "Failed to persist building"))?;

        self.publisher.emit(&BuildingEvent::created(building.clone())).await;

        info!(building_id = %building.id, "Building created");
        Ok(building)
    }

    #[instrument(skip(self, patch, asset))]
    async fn update(
        &self,
        id: BuildingId,
        patch: BuildingPatch,
        asset: Option<ImageAsset>,
    ) -> ServiceResult<Building> {
        let existing = self
            .store
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        let image = match &asset {
            Some(asset) => Some(self.upload(asset).await?),
            None => existing.image,
        };

        let building = self
            .store
            .update_by_id(id, BuildingChanges { patch, image })
            .await
            .inspect_err(|e| error!(error = %e, "Failed to persist building update"))?
            .ok_or(ServiceError::NotFound(id))?;

        self.publisher.emit(&BuildingEvent::updated(building.clone())).await;

        info!(building_id = %id, "Building updated");
        Ok(building)
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: BuildingId) -> ServiceResult<DeleteConfirmation> {
        self.store
            .delete_by_id(id)
            .await?
            .ok_or(StoreError::RecordNotFound(id))?;

        self.publisher.emit(&BuildingEvent::deleted(id)).await;

        info!(building_id = %id, "Building deleted");
        Ok(DeleteConfirmation {
            id,
            message: "Building deleted successfully".to_string(),
        })
    }

    async fn find_all(&self, query: FindAllQuery) -> ServiceResult<Page<Building>> {
        let plan = query.plan()?;

        let (data, total) = self
            .store
            .query(&plan.filter, plan.sort, plan.skip, plan.take)
            .await?;

        Ok(Page {
            data,
            meta: PageMeta {
                total,
                page: query.page,
                limit: query.limit,
                total_pages: total_pages(total, query.limit),
            },
        })
    }

    async fn find_one(&self, id: BuildingId) -> ServiceResult<Building> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }
}
