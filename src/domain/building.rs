// Copyright (c) 2025 - Cowboy AI, Inc.
//! Building entity and its write-side inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Store-assigned building identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildingId(Uuid);

impl BuildingId {
    /// Allocate a fresh time-ordered identifier
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BuildingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BuildingId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Geocoded position, stored as decimal strings
///
/// Latitude and longitude only ever exist together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: String,
    pub longitude: String,
}

impl Coordinates {
    /// Render resolver degrees without loss (`f64` display round-trips)
    pub fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
        }
    }
}

/// Uploaded image reference
///
/// The storage key is kept for a later delete in the upload service; it is
/// never read back by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    pub image_url: String,
    pub image_storage_key: String,
}

/// The authoritative building record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    pub id: BuildingId,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    #[serde(flatten)]
    pub coordinates: Option<Coordinates>,
    #[serde(flatten)]
    pub image: Option<StoredImage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Building {
    /// Materialize a draft as a stored record
    pub fn from_draft(id: BuildingId, draft: BuildingDraft, now: DateTime<Utc>) -> Self {
        let BuildingDraft {
            input,
            coordinates,
            image,
        } = draft;

        Self {
            id,
            name: input.name,
            address: input.address,
            city: input.city,
            country: input.country,
            description: input.description,
            coordinates: Some(coordinates),
            image,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update in place
    ///
    /// Coordinates are never touched here.
    pub fn apply(&mut self, changes: BuildingChanges, now: DateTime<Utc>) {
        let BuildingChanges { patch, image } = changes;

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(city) = patch.city {
            self.city = Some(city);
        }
        if let Some(country) = patch.country {
            self.country = Some(country);
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        self.image = image;
        self.updated_at = now;
    }
}

/// Client input for `create`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewBuilding {
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
}

impl NewBuilding {
    /// Minimal input with the two required fields
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            ..Self::default()
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Client input for `update`: every field is optional
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildingPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
}

impl BuildingPatch {
    /// True when the patch would not change any client field
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.country.is_none()
            && self.description.is_none()
    }
}

/// Everything the store needs to insert a new record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingDraft {
    pub input: NewBuilding,
    pub coordinates: Coordinates,
    pub image: Option<StoredImage>,
}

/// Everything the store needs to update an existing record
///
/// `image` is the full replacement value: the orchestrator carries the
/// existing image forward when no new asset was uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildingChanges {
    pub patch: BuildingPatch,
    pub image: Option<StoredImage>,
}
