//! NATS connection ownership for the event publisher
//!
//! A [`BrokerConnection`] is built exactly once at process start. Building it
//! runs the single connection attempt (with bounded retries) and leaves the
//! connection either `Connected` or latched `Disconnected` for the rest of the
//! process lifetime. Nothing in this module reconnects afterwards.

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use async_nats::{Client, ConnectOptions};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{InfrastructureError, InfrastructureResult};
use crate::retry::RetryPolicy;
use crate::state_machine::{ConnectionEvent, ConnectionState, StateMachine};

/// Configuration for NATS connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatsConfig {
    /// NATS server URLs
    pub servers: Vec<String>,
    /// Client name
    pub name: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Request timeout
    pub request_timeout: Duration,
    /// Upper bound on a single publish or the teardown flush. A publish that
    /// cannot be handed to the client in time is dropped.
    pub publish_timeout: Duration,
    /// Retry policy for the boot-time attempt
    pub retry: RetryPolicy,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            servers: vec!["nats://localhost:4222".to_string()],
            name: "building-service".to_string(),
            connect_timeout: Duration::from_secs(3),
            request_timeout: Duration::from_secs(30),
            publish_timeout: Duration::from_secs(1),
            retry: RetryPolicy::default(),
        }
    }
}

/// Lock-free holder of the connection lifecycle state
#[derive(Debug)]
struct LifecycleCell(AtomicU8);

impl LifecycleCell {
    fn new(state: ConnectionState) -> Self {
        Self(AtomicU8::new(state.as_u8()))
    }

    fn load(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Apply a lifecycle input, committing the new state only if the
    /// transition is valid from the state observed at commit time.
    fn apply(&self, input: ConnectionEvent) -> InfrastructureResult<ConnectionState> {
        let mut current = self.load();
        loop {
            let (next, ()) = current.transition(&input)?;
            match self.0.compare_exchange(
                current.as_u8(),
                next.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(next),
                Err(observed) => current = ConnectionState::from_u8(observed),
            }
        }
    }
}

/// Process-wide broker connection
///
/// Shared read-mostly by every request task; `send` may be called
/// concurrently from any number of tasks.
#[derive(Debug)]
pub struct BrokerConnection {
    client: Option<Client>,
    state: LifecycleCell,
    publish_timeout: Duration,
}

impl BrokerConnection {
    /// Run the single boot-time connection attempt.
    ///
    /// Never fails: if every try is exhausted the returned connection is
    /// latched in the `Disconnected` state.
    pub async fn establish(config: &NatsConfig) -> Self {
        let state = LifecycleCell::new(ConnectionState::Disconnected);
        // Fresh cell, always valid.
        let _ = state.apply(ConnectionEvent::BeginConnect);

        info!(
            servers = ?config.servers,
            client_name = %config.name,
            "Connecting to NATS"
        );

        match connect_with_retry(config).await {
            Ok(client) => {
                let _ = state.apply(ConnectionEvent::Established);
                info!(servers = ?config.servers, "Connected to NATS");
                Self {
                    client: Some(client),
                    state,
                    publish_timeout: config.publish_timeout,
                }
            }
            Err(e) => {
                let _ = state.apply(ConnectionEvent::AttemptFailed);
                warn!(
                    error = %e,
                    "NATS not available, building events will not be published"
                );
                Self {
                    client: None,
                    state,
                    publish_timeout: config.publish_timeout,
                }
            }
        }
    }

    /// A connection that never attempted to connect
    pub fn disconnected() -> Self {
        Self {
            client: None,
            state: LifecycleCell::new(ConnectionState::Disconnected),
            publish_timeout: NatsConfig::default().publish_timeout,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> ConnectionState {
        self.state.load()
    }

    /// Whether publishes will touch the network
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Send an opaque payload to a subject.
    ///
    /// Returns `Ok(false)` without any I/O when not connected. Waits at most
    /// `publish_timeout`: while the client is reconnecting its outbound
    /// buffer fills up and a publish would otherwise wait indefinitely. A
    /// send failure does not change the lifecycle state.
    pub async fn send(&self, subject: &str, payload: Bytes) -> InfrastructureResult<bool> {
        let client = match (&self.client, self.state()) {
            (Some(client), ConnectionState::Connected) => client,
            _ => return Ok(false),
        };

        tokio::time::timeout(
            self.publish_timeout,
            client.publish(subject.to_string(), payload),
        )
        .await
        .map_err(|_| {
            InfrastructureError::NatsPublish(format!(
                "timed out after {}ms",
                self.publish_timeout.as_millis()
            ))
        })??;
        debug!(subject = %subject, "Published message to subject");
        Ok(true)
    }

    /// Graceful teardown: flush pending messages and mark disconnected.
    ///
    /// Failures are logged; the state ends `Disconnected` either way.
    pub async fn close(&self) {
        let was_connected = self.is_connected();
        if let Err(e) = self.state.apply(ConnectionEvent::Teardown) {
            warn!(error = %e, "Unexpected NATS lifecycle state at teardown");
            return;
        }
        if !was_connected {
            return;
        }

        if let Some(client) = &self.client {
            info!("Disconnecting from NATS");
            match tokio::time::timeout(self.publish_timeout, client.flush()).await {
                Ok(Ok(())) => info!("NATS connection closed"),
                Ok(Err(e)) => warn!(error = %e, "Error flushing NATS connection during teardown"),
                Err(_) => warn!(
                    timeout_ms = self.publish_timeout.as_millis() as u64,
                    "Timed out flushing NATS connection during teardown"
                ),
            }
        }
    }
}

async fn connect_with_retry(config: &NatsConfig) -> InfrastructureResult<Client> {
    if config.servers.is_empty() {
        return Err(InfrastructureError::Configuration(
            "no NATS servers configured".to_string(),
        ));
    }

    let attempts = config.retry.total_attempts();
    let mut last_error = None;

    for attempt in 1..=attempts {
        if attempt > 1 {
            let delay = config.retry.delay_for(attempt - 1);
            debug!(attempt, delay_ms = delay.as_millis() as u64, "Retrying NATS connection");
            tokio::time::sleep(delay).await;
        }

        let options = ConnectOptions::new()
            .name(&config.name)
            .connection_timeout(config.connect_timeout)
            .request_timeout(Some(config.request_timeout));

        match async_nats::connect_with_options(config.servers.join(","), options).await {
            Ok(client) => return Ok(client),
            Err(e) => {
                debug!(attempt, attempts, error = %e, "NATS connection attempt failed");
                last_error = Some(InfrastructureError::from(e));
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        InfrastructureError::NatsConnection("no connection attempt was made".to_string())
    }))
}
