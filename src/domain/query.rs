// Copyright (c) 2025 - Cowboy AI, Inc.
//! Paginated search over buildings
//!
//! The search term is normalized by upper-casing its first character only,
//! then matched as a case-sensitive substring of name OR address. A stored
//! "ACME TOWER" is therefore not found by "acme" (normalized to "Acme").

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::building::Building;

/// Query parsing errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Page and limit must be greater than 0")]
    InvalidPagination,

    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),

    #[error("Unknown sort order: {0}")]
    UnknownSortOrder(String),
}

/// Field a result set can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Address,
    City,
    Country,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Compare two buildings by this field, ascending.
    ///
    /// Missing optional values sort after present ones, so they come last
    /// ascending and first descending.
    pub fn compare(self, a: &Building, b: &Building) -> Ordering {
        match self {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Address => a.address.cmp(&b.address),
            SortField::City => nulls_last(&a.city, &b.city),
            SortField::Country => nulls_last(&a.country, &b.country),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

fn nulls_last(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortField::Name => "name",
            SortField::Address => "address",
            SortField::City => "city",
            SortField::Country => "country",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        };
        f.write_str(name)
    }
}

impl FromStr for SortField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortField::Name),
            "address" => Ok(SortField::Address),
            "city" => Ok(SortField::City),
            "country" => Ok(SortField::Country),
            "createdAt" => Ok(SortField::CreatedAt),
            "updatedAt" => Ok(SortField::UpdatedAt),
            other => Err(QueryError::UnknownSortField(other.to_string())),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(QueryError::UnknownSortOrder(other.to_string())),
        }
    }
}

/// Ordering requested from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn compare(&self, a: &Building, b: &Building) -> Ordering {
        let ordering = self.field.compare(a, b);
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// `find_all` parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FindAllQuery {
    pub page: u64,
    pub limit: u64,
    pub search: String,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for FindAllQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: String::new(),
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl FindAllQuery {
    pub fn page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = field;
        self.sort_order = order;
        self
    }

    /// Check pagination and derive the store-level request
    pub fn plan(&self) -> Result<QueryPlan, QueryError> {
        if self.page < 1 || self.limit < 1 {
            return Err(QueryError::InvalidPagination);
        }

        Ok(QueryPlan {
            filter: BuildingFilter::from_search(&self.search),
            sort: SortSpec {
                field: self.sort_by,
                order: self.sort_order,
            },
            skip: (self.page - 1).saturating_mul(self.limit),
            take: self.limit,
        })
    }
}

/// Validated store request derived from a [`FindAllQuery`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub filter: BuildingFilter,
    pub sort: SortSpec,
    pub skip: u64,
    pub take: u64,
}

/// Substring filter on name OR address
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildingFilter {
    /// Already-normalized term; `None` matches everything
    pub contains: Option<String>,
}

impl BuildingFilter {
    /// Build a filter from a raw search term
    pub fn from_search(search: &str) -> Self {
        if search.is_empty() {
            return Self::default();
        }
        Self {
            contains: Some(normalize_search_term(search)),
        }
    }

    pub fn matches(&self, building: &Building) -> bool {
        match &self.contains {
            None => true,
            Some(term) => building.name.contains(term.as_str()) || building.address.contains(term.as_str()),
        }
    }
}

/// Upper-case the first character, leave the rest unchanged
pub fn normalize_search_term(search: &str) -> String {
    let mut chars = search.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `ceil(total / limit)`
pub fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit)
}

/// Pagination metadata returned with a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}
