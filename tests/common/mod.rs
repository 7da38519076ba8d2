// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test doubles for the orchestrator's collaborators
//!
//! Every double records its calls so tests can assert on what the
//! orchestrator did (and did not) touch.

#![allow(dead_code)]

pub mod fake_nats;

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use building_service::domain::{
    Building, BuildingChanges, BuildingDraft, BuildingFilter, BuildingId, SortSpec,
};
use building_service::geocoding::{GeocodeError, GeocodeRequest, GeocodeResolver, GeocodeResult};
use building_service::publisher::EventPublisher;
use building_service::store::{BuildingStore, InMemoryBuildingStore, StoreError, StoreResult};
use building_service::upload::{AssetUploader, ImageAsset, UploadError, UploadedAsset};
use building_service::BuildingOrchestrator;

pub const LATITUDE: f64 = 21.028511;
pub const LONGITUDE: f64 = 105.804817;

/// What the fake geocoder answers
#[derive(Clone, Copy, Debug)]
pub enum GeocodeBehavior {
    Resolve,
    NoResult,
    ProviderError,
}

pub struct FakeGeocoder {
    behavior: GeocodeBehavior,
    calls: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn new(behavior: GeocodeBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn resolving() -> Self {
        Self::new(GeocodeBehavior::Resolve)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GeocodeResolver for FakeGeocoder {
    async fn resolve(&self, request: &GeocodeRequest) -> Result<Option<GeocodeResult>, GeocodeError> {
        self.calls.lock().unwrap().push(request.address.clone());
        match self.behavior {
            GeocodeBehavior::Resolve => Ok(Some(GeocodeResult {
                formatted_address: format!("{}, Hanoi, Vietnam", request.address),
                latitude: LATITUDE,
                longitude: LONGITUDE,
                place_id: Some("place-1".to_string()),
                types: vec!["street_address".to_string()],
            })),
            GeocodeBehavior::NoResult => Ok(None),
            GeocodeBehavior::ProviderError => Err(GeocodeError::Provider {
                status: "OVER_QUERY_LIMIT".to_string(),
                message: "quota exceeded".to_string(),
            }),
        }
    }

    async fn reverse(
        &self,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<Option<GeocodeResult>, GeocodeError> {
        Ok(None)
    }
}

pub struct FakeUploader {
    fail: bool,
    uploads: AtomicUsize,
}

impl FakeUploader {
    pub fn working() -> Self {
        Self {
            fail: false,
            uploads: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            uploads: AtomicUsize::new(0),
        }
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetUploader for FakeUploader {
    async fn upload(&self, asset: &ImageAsset) -> Result<UploadedAsset, UploadError> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail {
            return Err(UploadError::Configuration("upload service unreachable".to_string()));
        }
        Ok(UploadedAsset {
            url: format!("https://cdn.example.com/{}/{}", n, asset.file_name),
            storage_key: format!("buildings/{}", n),
        })
    }
}

/// Publisher that records every message it is handed
#[derive(Default)]
pub struct RecordingPublisher {
    messages: Mutex<Vec<(String, Bytes)>>,
}

impl RecordingPublisher {
    pub fn messages(&self) -> Vec<(String, serde_json::Value)> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|(topic, payload)| {
                (
                    topic.clone(),
                    serde_json::from_slice(payload).expect("payload must be JSON"),
                )
            })
            .collect()
    }

    pub fn topics(&self) -> Vec<String> {
        self.messages().into_iter().map(|(topic, _)| topic).collect()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, topic: &str, payload: Bytes) {
        self.messages.lock().unwrap().push((topic.to_string(), payload));
    }
}

/// Store wrapper that counts calls and can be switched to fail writes
pub struct InstrumentedStore {
    inner: InMemoryBuildingStore,
    fail_writes: bool,
    calls: AtomicUsize,
}

impl InstrumentedStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryBuildingStore::new(),
            fail_writes: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.inner.len().await
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn write_guard(&self) -> StoreResult<()> {
        if self.fail_writes {
            Err(StoreError::Backend("connection reset by peer".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BuildingStore for InstrumentedStore {
    async fn insert(&self, draft: BuildingDraft) -> StoreResult<Building> {
        self.touch();
        self.write_guard()?;
        self.inner.insert(draft).await
    }

    async fn get_by_id(&self, id: BuildingId) -> StoreResult<Option<Building>> {
        self.touch();
        self.inner.get_by_id(id).await
    }

    async fn update_by_id(
        &self,
        id: BuildingId,
        changes: BuildingChanges,
    ) -> StoreResult<Option<Building>> {
        self.touch();
        self.write_guard()?;
        self.inner.update_by_id(id, changes).await
    }

    async fn delete_by_id(&self, id: BuildingId) -> StoreResult<Option<Building>> {
        self.touch();
        self.write_guard()?;
        self.inner.delete_by_id(id).await
    }

    async fn query(
        &self,
        filter: &BuildingFilter,
        sort: SortSpec,
        skip: u64,
        take: u64,
    ) -> StoreResult<(Vec<Building>, u64)> {
        self.touch();
        self.inner.query(filter, sort, skip, take).await
    }
}

/// Orchestrator wired to test doubles, with handles to inspect them
pub struct Harness {
    pub geocoder: Arc<FakeGeocoder>,
    pub uploader: Arc<FakeUploader>,
    pub store: Arc<InstrumentedStore>,
    pub publisher: Arc<RecordingPublisher>,
    pub service: BuildingOrchestrator,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(
            FakeGeocoder::resolving(),
            FakeUploader::working(),
            InstrumentedStore::new(),
        )
    }

    pub fn with(geocoder: FakeGeocoder, uploader: FakeUploader, store: InstrumentedStore) -> Self {
        let geocoder = Arc::new(geocoder);
        let uploader = Arc::new(uploader);
        let store = Arc::new(store);
        let publisher = Arc::new(RecordingPublisher::default());

        let service = BuildingOrchestrator::new(
            geocoder.clone(),
            uploader.clone(),
            store.clone(),
            publisher.clone(),
        );

        Self {
            geocoder,
            uploader,
            store,
            publisher,
            service,
        }
    }
}

pub fn png(name: &str) -> ImageAsset {
    ImageAsset::new(name, Bytes::from_static(b"\x89PNG\r\n")).with_content_type("image/png")
}
