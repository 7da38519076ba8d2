// Copyright (c) 2025 - Cowboy AI, Inc.
//! Building domain model
//!
//! - [`building`]: the authoritative record and its write inputs
//! - [`query`]: search, sort and pagination

pub mod building;
pub mod query;

pub use building::{
    Building, BuildingChanges, BuildingDraft, BuildingId, BuildingPatch, Coordinates, NewBuilding,
    StoredImage,
};
pub use query::{
    normalize_search_term, total_pages, BuildingFilter, FindAllQuery, Page, PageMeta, QueryError,
    QueryPlan, SortField, SortOrder, SortSpec,
};
