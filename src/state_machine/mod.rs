// Copyright (c) 2025 - Cowboy AI, Inc.
//! Finite State Machine Abstractions
//!
//! Transitions are pure functions over strongly typed state enums:
//!
//! ```text
//! (State, Input) → (State, Output)
//! ```
//!
//! The caller owns where the state lives (a field, an atomic cell) and only
//! commits the new state once the transition has been accepted.
//!
//! # Example
//!
//! ```rust
//! use building_service::state_machine::{
//!     ConnectionEvent, ConnectionState, StateMachine,
//! };
//!
//! let (state, _) = ConnectionState::Disconnected
//!     .transition(&ConnectionEvent::BeginConnect)
//!     .unwrap();
//! assert_eq!(state, ConnectionState::Connecting);
//! ```

pub mod connection_lifecycle;

pub use connection_lifecycle::{ConnectionEvent, ConnectionState};

/// Outcome of a transition attempt
pub type TransitionResult<S> = Result<S, TransitionError>;

/// Rejected transition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The input is not accepted in the current state
    #[error("Invalid transition from {from} via {input}")]
    InvalidTransition { from: String, input: String },
}

/// Typed state with a pure transition function
pub trait StateMachine: Sized + Clone {
    type Input;

    /// Produced alongside the new state; `()` when there is nothing to report
    type Output;

    /// Compute the next state without committing it
    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)>;

    fn can_transition(&self, input: &Self::Input) -> bool {
        self.transition(input).is_ok()
    }

    /// Inputs accepted in this state. Empty unless the machine enumerates them.
    fn valid_inputs(&self) -> Vec<Self::Input>
    where
        Self::Input: Clone,
    {
        Vec::new()
    }
}
