// Copyright (c) 2025 - Cowboy AI, Inc.
//! Broker Connection Lifecycle State Machine
//!
//! # States
//!
//! - Disconnected: initial state, and the latched state after a failed boot
//!   attempt or a teardown
//! - Connecting: the single boot-time connection attempt is in flight
//! - Connected: the shared connection is usable for publishing
//!
//! # Inputs
//!
//! - BeginConnect: Disconnected → Connecting
//! - Established: Connecting → Connected
//! - AttemptFailed: Connecting → Disconnected
//! - Teardown: Connected → Disconnected (no-op when already Disconnected)
//!
//! There is no input leading from a latched Disconnected back to Connecting
//! other than BeginConnect, and the connection owner only feeds BeginConnect
//! once, while it is being constructed.

use std::fmt;

use super::{StateMachine, TransitionError, TransitionResult};

/// Logical state of the broker connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// No usable connection
    Disconnected,
    /// Boot-time connection attempt in progress
    Connecting,
    /// Connected and publishing
    Connected,
}

impl ConnectionState {
    /// Encode for storage in an atomic cell
    pub(crate) fn as_u8(self) -> u8 {
        match self {
            ConnectionState::Disconnected => 0,
            ConnectionState::Connecting => 1,
            ConnectionState::Connected => 2,
        }
    }

    /// Decode from an atomic cell; unknown values read as Disconnected
    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Connected,
            _ => ConnectionState::Disconnected,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
        }
    }
}

/// Lifecycle input (FSM input)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Start the boot-time connection attempt
    BeginConnect,
    /// The broker accepted the connection
    Established,
    /// Every try of the boot-time attempt failed
    AttemptFailed,
    /// Process shutdown
    Teardown,
}

impl fmt::Display for ConnectionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionEvent::BeginConnect => write!(f, "begin_connect"),
            ConnectionEvent::Established => write!(f, "established"),
            ConnectionEvent::AttemptFailed => write!(f, "attempt_failed"),
            ConnectionEvent::Teardown => write!(f, "teardown"),
        }
    }
}

impl StateMachine for ConnectionState {
    type Input = ConnectionEvent;
    type Output = ();

    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
        use ConnectionEvent::*;
        use ConnectionState::*;

        match (self, input) {
            (Disconnected, BeginConnect) => Ok((Connecting, ())),
            (Connecting, Established) => Ok((Connected, ())),
            (Connecting, AttemptFailed) => Ok((Disconnected, ())),
            (Connected, Teardown) => Ok((Disconnected, ())),
            (Disconnected, Teardown) => Ok((Disconnected, ())),
            (from, input) => Err(TransitionError::InvalidTransition {
                from: from.to_string(),
                input: input.to_string(),
            }),
        }
    }

    fn valid_inputs(&self) -> Vec<Self::Input> {
        use ConnectionEvent::*;
        use ConnectionState::*;

        match self {
            Disconnected => vec![BeginConnect, Teardown],
            Connecting => vec![Established, AttemptFailed],
            Connected => vec![Teardown],
        }
    }
}
