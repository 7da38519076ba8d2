//! Building record service
//!
//! Create, read, update, delete and search physical building records. Every
//! write geocodes through an external provider, optionally uploads an image,
//! persists the authoritative record and then announces the change on NATS.
//! The announcement is best-effort: a missing or failing broker never fails a
//! write.

pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod geocoding;
pub mod nats;
pub mod publisher;
pub mod retry;
pub mod service;
pub mod state_machine;
pub mod store;
pub mod subjects;
pub mod upload;

// Re-export commonly used types
pub use config::ServiceConfig;
pub use domain::{Building, BuildingId, BuildingPatch, FindAllQuery, NewBuilding, Page};
pub use errors::{InfrastructureError, InfrastructureResult};
pub use events::{BuildingEvent, BuildingEventKind};
pub use geocoding::{GeocodeResolver, GoogleGeocoder};
pub use nats::{BrokerConnection, NatsConfig};
pub use publisher::{EventPublisher, NatsEventPublisher};
pub use service::{BuildingOrchestrator, BuildingService, ServiceError, ServiceResult};
pub use store::{BuildingStore, InMemoryBuildingStore};
pub use upload::{AssetUploader, HttpAssetUploader, ImageAsset};
