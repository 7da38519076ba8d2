// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service configuration loaded from environment variables
//!
//! | Variable                  | Default                       |
//! |---------------------------|-------------------------------|
//! | `NATS_URL`                | `nats://localhost:4222`       |
//! | `NATS_CLIENT_NAME`        | `building-service`            |
//! | `NATS_CONNECT_TIMEOUT_MS` | `3000`                        |
//! | `NATS_REQUEST_TIMEOUT_MS` | `30000`                       |
//! | `NATS_PUBLISH_TIMEOUT_MS` | `1000`                        |
//! | `NATS_CONNECT_RETRIES`    | `3` (at most 10)              |
//! | `GOOGLE_MAPS_API_KEY`     | required                      |
//! | `GEOCODING_BASE_URL`      | `https://maps.googleapis.com` |
//! | `GEOCODING_REGION`        | unset                         |
//! | `GEOCODING_LANGUAGE`      | unset                         |
//! | `GEOCODING_TIMEOUT_SECS`  | `10`                          |
//! | `UPLOAD_SERVICE_URL`      | `http://upload-service:3000`  |
//! | `UPLOAD_TIMEOUT_SECS`     | `30`                          |
//!
//! `NATS_URL` may list several servers separated by commas.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::errors::{InfrastructureError, InfrastructureResult};
use crate::geocoding::GeocodingConfig;
use crate::nats::NatsConfig;
use crate::retry::MAX_CONNECT_RETRIES;
use crate::upload::UploadConfig;

/// Complete service configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub nats: NatsConfig,
    pub geocoding: GeocodingConfig,
    pub upload: UploadConfig,
}

impl ServiceConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> InfrastructureResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> InfrastructureResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let servers = match var("NATS_URL") {
            Some(urls) => urls
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.nats.servers,
        };

        let mut retry = defaults.nats.retry;
        if let Some(retries) = parse_var(&var, "NATS_CONNECT_RETRIES")? {
            if retries > MAX_CONNECT_RETRIES {
                return Err(InfrastructureError::Configuration(format!(
                    "NATS_CONNECT_RETRIES must be at most {}, got {}",
                    MAX_CONNECT_RETRIES, retries
                )));
            }
            retry.max_retries = retries;
        }

        let nats = NatsConfig {
            servers,
            name: var("NATS_CLIENT_NAME").unwrap_or(defaults.nats.name),
            connect_timeout: parse_var(&var, "NATS_CONNECT_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.nats.connect_timeout),
            request_timeout: parse_var(&var, "NATS_REQUEST_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.nats.request_timeout),
            publish_timeout: parse_var(&var, "NATS_PUBLISH_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.nats.publish_timeout),
            retry,
        };

        let geocoding = GeocodingConfig {
            base_url: var("GEOCODING_BASE_URL").unwrap_or(defaults.geocoding.base_url),
            api_key: var("GOOGLE_MAPS_API_KEY").ok_or_else(|| {
                InfrastructureError::Configuration("Missing GOOGLE_MAPS_API_KEY".to_string())
            })?,
            region: var("GEOCODING_REGION"),
            language: var("GEOCODING_LANGUAGE"),
            timeout_secs: parse_var(&var, "GEOCODING_TIMEOUT_SECS")?
                .unwrap_or(defaults.geocoding.timeout_secs),
        };

        let upload = UploadConfig {
            base_url: var("UPLOAD_SERVICE_URL").unwrap_or(defaults.upload.base_url),
            timeout_secs: parse_var(&var, "UPLOAD_TIMEOUT_SECS")?
                .unwrap_or(defaults.upload.timeout_secs),
        };

        Ok(Self {
            nats,
            geocoding,
            upload,
        })
    }
}

fn parse_var<T, F>(var: &F, key: &str) -> InfrastructureResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| {
                InfrastructureError::Configuration(format!("{} has invalid value '{}': {}", key, raw, e))
            })
        })
        .transpose()
}
