// Copyright (c) 2025 - Cowboy AI, Inc.
//! Record Store Abstraction
//!
//! The authoritative persistence boundary for buildings. Implementations
//! must be safe for concurrent use and make each call atomic; concurrent
//! updates of the same record are last-write-wins.
//!
//! ```text
//! Orchestrator ──insert/update/delete──> BuildingStore
//! Readers      ──get/query─────────────> BuildingStore
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    Building, BuildingChanges, BuildingDraft, BuildingFilter, BuildingId, SortSpec,
};

pub mod memory;

pub use memory::InMemoryBuildingStore;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Delete targeted a record that does not exist
    #[error("Record to delete does not exist: {0}")]
    RecordNotFound(BuildingId),

    /// Backend failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Building persistence trait
#[async_trait]
pub trait BuildingStore: Send + Sync {
    /// Insert a new record, assigning its id and timestamps
    async fn insert(&self, draft: BuildingDraft) -> StoreResult<Building>;

    /// Load a record by id
    async fn get_by_id(&self, id: BuildingId) -> StoreResult<Option<Building>>;

    /// Apply changes to a record; `None` if it does not exist
    async fn update_by_id(
        &self,
        id: BuildingId,
        changes: BuildingChanges,
    ) -> StoreResult<Option<Building>>;

    /// Physically delete a record; `None` if it did not exist
    async fn delete_by_id(&self, id: BuildingId) -> StoreResult<Option<Building>>;

    /// Filter, sort and page the records
    ///
    /// Returns the requested page and the total number of matches.
    async fn query(
        &self,
        filter: &BuildingFilter,
        sort: SortSpec,
        skip: u64,
        take: u64,
    ) -> StoreResult<(Vec<Building>, u64)>;
}
