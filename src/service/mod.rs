// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Layer for Building Management
//!
//! The application service that orchestrates the external collaborators of
//! every building write.
//!
//! # Architecture
//!
//! ```text
//! Client Request
//!     ↓
//! Service Layer (this module)
//!     ↓
//! Geocode Resolver → Asset Uploader → Record Store
//!     ↓
//! Event Publisher (best-effort, never fails the request)
//!     ↓
//! NATS subscribers
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use building_service::service::{BuildingOrchestrator, BuildingService};
//!
//! let service = BuildingOrchestrator::new(geocoder, uploader, store, publisher);
//!
//! let building = service
//!     .create(NewBuilding::new("Acme Tower", "1 Main St"), None)
//!     .await?;
//! let same = service.find_one(building.id).await?;
//! ```

pub mod building;

pub use building::{
    BuildingOrchestrator, BuildingService, DeleteConfirmation, ErrorKind, ServiceError,
    ServiceResult,
};
