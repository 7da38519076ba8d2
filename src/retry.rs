// Copyright (c) 2025 - Cowboy AI, Inc.
//! Bounded exponential backoff for the boot-time broker connection attempt.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Retry policy for the single startup connection attempt.
///
/// The attempt makes `1 + max_retries` tries. The delay before retry `n`
/// (1-indexed) is `initial_delay * multiplier^(n - 1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first try
    pub max_retries: u32,

    /// Delay before the first retry
    pub initial_delay: Duration,

    /// Backoff multiplier
    pub multiplier: f64,

    /// Upper bound for any single delay
    pub max_delay: Duration,
}

/// Most retries the boot attempt will ever make
pub const MAX_CONNECT_RETRIES: u32 = 10;

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            multiplier: 2.0,
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Policy that tries exactly once
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Total number of tries, including the first one.
    ///
    /// Retries beyond [`MAX_CONNECT_RETRIES`] are ignored.
    pub fn total_attempts(&self) -> u32 {
        self.max_retries.min(MAX_CONNECT_RETRIES) + 1
    }

    /// Delay to wait before retry number `retry` (1-indexed), capped at
    /// `max_delay`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(MAX_CONNECT_RETRIES) as i32;
        let secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        Duration::try_from_secs_f64(secs)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Sum of every delay the boot attempt can sleep
    pub fn worst_case_backoff(&self) -> Duration {
        (1..self.total_attempts()).map(|retry| self.delay_for(retry)).sum()
    }
}
