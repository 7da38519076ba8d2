// Copyright (c) 2025 - Cowboy AI, Inc.
//! Building domain events
//!
//! An event announces a completed mutation. The payload published to the
//! broker is the JSON body of the event: the full building for created and
//! updated, `{"id": ...}` for deleted. Delivery is best-effort and
//! at-most-once; the broker timestamps messages on receipt.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{Building, BuildingId};
use crate::subjects::Operation;

/// Kind of completed mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildingEventKind {
    Created,
    Updated,
    Deleted,
}

impl BuildingEventKind {
    /// Fixed subject for this kind
    pub fn subject(self) -> &'static str {
        self.operation().subject()
    }

    fn operation(self) -> Operation {
        match self {
            BuildingEventKind::Created => Operation::Created,
            BuildingEventKind::Updated => Operation::Updated,
            BuildingEventKind::Deleted => Operation::Deleted,
        }
    }
}

impl fmt::Display for BuildingEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildingEventKind::Created => write!(f, "CREATED"),
            BuildingEventKind::Updated => write!(f, "UPDATED"),
            BuildingEventKind::Deleted => write!(f, "DELETED"),
        }
    }
}

/// Identifying payload for deletions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedBuilding {
    pub id: BuildingId,
}

/// Event body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BuildingEventPayload {
    Building(Box<Building>),
    Deleted(DeletedBuilding),
}

/// A building domain event
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingEvent {
    pub kind: BuildingEventKind,
    pub payload: BuildingEventPayload,
}

impl BuildingEvent {
    pub fn created(building: Building) -> Self {
        Self {
            kind: BuildingEventKind::Created,
            payload: BuildingEventPayload::Building(Box::new(building)),
        }
    }

    pub fn updated(building: Building) -> Self {
        Self {
            kind: BuildingEventKind::Updated,
            payload: BuildingEventPayload::Building(Box::new(building)),
        }
    }

    pub fn deleted(id: BuildingId) -> Self {
        Self {
            kind: BuildingEventKind::Deleted,
            payload: BuildingEventPayload::Deleted(DeletedBuilding { id }),
        }
    }

    /// Identifier of the affected building
    pub fn building_id(&self) -> BuildingId {
        match &self.payload {
            BuildingEventPayload::Building(building) => building.id,
            BuildingEventPayload::Deleted(deleted) => deleted.id,
        }
    }

    pub fn subject(&self) -> &'static str {
        self.kind.subject()
    }

    /// Serialize the payload as the broker message body
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.payload)
    }
}
