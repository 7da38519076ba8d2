// Copyright (c) 2025 - Cowboy AI, Inc.

//! NATS subject hierarchy for building events
//!
//! Every building event is published on a fixed, well-known subject:
//!
//! ```text
//! building.{operation}
//! ```
//!
//! Consumers subscribe to one operation (`building.created`) or to the
//! whole family (`building.>`).
//!
//! # Examples
//!
//! ```rust
//! use building_service::subjects::{SubjectBuilder, Operation};
//!
//! let subject = SubjectBuilder::new()
//!     .operation(Operation::Created)
//!     .build();
//! assert_eq!(subject, "building.created");
//!
//! assert_eq!(SubjectBuilder::build_all(), "building.>");
//! ```

use std::fmt;

/// Root namespace for all building subjects
pub const BUILDING_ROOT: &str = "building";

/// Subject for `CREATED` events
pub const BUILDING_CREATED: &str = "building.created";

/// Subject for `UPDATED` events
pub const BUILDING_UPDATED: &str = "building.updated";

/// Subject for `DELETED` events
pub const BUILDING_DELETED: &str = "building.deleted";

/// Write operations that produce an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// A building was created
    Created,
    /// A building was updated
    Updated,
    /// A building was deleted
    Deleted,
}

impl Operation {
    /// The fixed subject this operation is published on
    pub const fn subject(self) -> &'static str {
        match self {
            Operation::Created => BUILDING_CREATED,
            Operation::Updated => BUILDING_UPDATED,
            Operation::Deleted => BUILDING_DELETED,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Created => write!(f, "created"),
            Operation::Updated => write!(f, "updated"),
            Operation::Deleted => write!(f, "deleted"),
        }
    }
}

/// Composes subjects and subscription filters from [`Operation`]s
#[derive(Debug, Clone, Default)]
pub struct SubjectBuilder {
    operation: Option<Operation>,
}

impl SubjectBuilder {
    pub fn new() -> Self {
        Self { operation: None }
    }

    /// Narrow to a single operation
    pub fn operation(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Without an operation this is the wildcard for every building event.
    pub fn build(self) -> String {
        match self.operation {
            Some(operation) => format!("{}.{}", BUILDING_ROOT, operation),
            None => Self::build_all(),
        }
    }

    /// Subscription filter matching every building event
    pub fn build_all() -> String {
        format!("{}.>", BUILDING_ROOT)
    }
}
