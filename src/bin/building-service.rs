// Copyright (c) 2025 - Cowboy AI, Inc.
//! Building Service
//!
//! Boots the building write orchestrator and keeps it alive until Ctrl-C.
//!
//! Boot sequence:
//! 1. Load configuration from the environment
//! 2. Make the single NATS connection attempt (the service still starts if
//!    the broker is down; events are then skipped for the process lifetime)
//! 3. Build the geocoder, uploader, record store and orchestrator
//!
//! No request transport (HTTP, RPC) is mounted here. The orchestrator is
//! held for the lifetime of the process so one can be attached to it.
//!
//! Run with: cargo run --bin building-service
//!
//! Prerequisites:
//! 1. GOOGLE_MAPS_API_KEY set
//! 2. Optional: NATS server running (default: localhost:4222)

use std::sync::Arc;

use anyhow::{Context, Result};
use building_service::{
    BrokerConnection, BuildingOrchestrator, BuildingService, GoogleGeocoder, HttpAssetUploader,
    InMemoryBuildingStore, NatsEventPublisher, ServiceConfig,
};
use building_service::state_machine::ConnectionState;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("🚀 Starting Building Service");

    // Load configuration
    let config = ServiceConfig::from_env().context("Failed to load configuration")?;
    info!("📋 Configuration loaded:");
    info!("  - NATS servers: {:?}", config.nats.servers);
    info!("  - NATS client: {}", config.nats.name);
    info!("  - Geocoding: {}", config.geocoding.base_url);
    info!("  - Upload service: {}", config.upload.base_url);

    // Single connection attempt; never fatal
    let connection = Arc::new(BrokerConnection::establish(&config.nats).await);
    let publisher = Arc::new(NatsEventPublisher::new(connection));
    if publisher.state() != ConnectionState::Connected {
        warn!("⚠️ Building service will continue without NATS events");
    }

    let geocoder =
        GoogleGeocoder::new(config.geocoding.clone()).context("Failed to create geocoder")?;
    let uploader =
        HttpAssetUploader::new(config.upload.clone()).context("Failed to create uploader")?;

    let service: Arc<dyn BuildingService> = Arc::new(BuildingOrchestrator::new(
        Arc::new(geocoder),
        Arc::new(uploader),
        Arc::new(InMemoryBuildingStore::new()),
        publisher.clone(),
    ));

    info!(nats_state = %publisher.state(), "✅ Building service ready");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("🔌 Shutting down");
    drop(service);
    publisher.shutdown().await;
    info!("✅ Building service stopped");

    Ok(())
}
