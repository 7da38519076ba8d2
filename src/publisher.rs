// Copyright (c) 2025 - Cowboy AI, Inc.
//! Degrade-safe event publisher
//!
//! `publish` has no error type: whatever happens on the broker side, the
//! caller continues. Failures are visible only in the logs.
//!
//! ```text
//! Orchestrator ──emit(event)──> EventPublisher ──publish(subject, bytes)──> NATS
//!                                     │
//!                          not connected: return, no I/O
//!                          send failed:   warn!, return
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::events::BuildingEvent;
use crate::nats::BrokerConnection;
use crate::state_machine::ConnectionState;

/// Topic-addressed, never-failing publish primitive
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Send an opaque payload to a topic. Never fails.
    async fn publish(&self, topic: &str, payload: Bytes);

    /// Serialize a building event and publish it on its fixed subject
    async fn emit(&self, event: &BuildingEvent) {
        match event.to_json() {
            Ok(payload) => self.publish(event.subject(), Bytes::from(payload)).await,
            Err(e) => warn!(
                kind = %event.kind,
                building_id = %event.building_id(),
                error = %e,
                "Failed to serialize building event"
            ),
        }
    }
}

/// NATS-backed publisher sharing the process-wide broker connection
#[derive(Debug, Clone)]
pub struct NatsEventPublisher {
    connection: Arc<BrokerConnection>,
}

impl NatsEventPublisher {
    pub fn new(connection: Arc<BrokerConnection>) -> Self {
        Self { connection }
    }

    /// Current lifecycle state of the underlying connection
    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Tear down the shared connection
    pub async fn shutdown(&self) {
        self.connection.close().await;
    }
}

#[async_trait]
impl EventPublisher for NatsEventPublisher {
    async fn publish(&self, topic: &str, payload: Bytes) {
        match self.connection.send(topic, payload).await {
            Ok(true) => debug!(subject = %topic, "Building event published"),
            Ok(false) => warn!(subject = %topic, "NATS not connected, skipping building event"),
            Err(e) => warn!(subject = %topic, error = %e, "Failed to publish building event"),
        }
    }
}
