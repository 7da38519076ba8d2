// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-memory record store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{BuildingStore, StoreResult};
use crate::domain::{
    Building, BuildingChanges, BuildingDraft, BuildingFilter, BuildingId, SortSpec,
};

/// In-memory building store.
///
/// Every call holds the table lock for its whole duration, so each call is
/// atomic with respect to the others.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBuildingStore {
    records: Arc<RwLock<HashMap<BuildingId, Building>>>,
}

impl InMemoryBuildingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl BuildingStore for InMemoryBuildingStore {
    async fn insert(&self, draft: BuildingDraft) -> StoreResult<Building> {
        let building = Building::from_draft(BuildingId::generate(), draft, Utc::now());
        let mut records = self.records.write().await;
        records.insert(building.id, building.clone());
        debug!(building_id = %building.id, "Inserted building");
        Ok(building)
    }

    async fn get_by_id(&self, id: BuildingId) -> StoreResult<Option<Building>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn update_by_id(
        &self,
        id: BuildingId,
        changes: BuildingChanges,
    ) -> StoreResult<Option<Building>> {
        let mut records = self.records.write().await;
        let Some(building) = records.get_mut(&id) else {
            return Ok(None);
        };
        building.apply(changes, Utc::now());
        debug!(building_id = %id, "Updated building");
        Ok(Some(building.clone()))
    }

    async fn delete_by_id(&self, id: BuildingId) -> StoreResult<Option<Building>> {
        let removed = self.records.write().await.remove(&id);
        if removed.is_some() {
            debug!(building_id = %id, "Deleted building");
        }
        Ok(removed)
    }

    async fn query(
        &self,
        filter: &BuildingFilter,
        sort: SortSpec,
        skip: u64,
        take: u64,
    ) -> StoreResult<(Vec<Building>, u64)> {
        let records = self.records.read().await;

        let mut matches: Vec<&Building> = records.values().filter(|b| filter.matches(b)).collect();
        // Id as tie-breaker keeps pages stable for equal sort keys.
        matches.sort_by(|a, b| sort.compare(a, b).then_with(|| a.id.cmp(&b.id)));

        let total = matches.len() as u64;
        let page = matches
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(take).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok((page, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BuildingPatch, Coordinates, NewBuilding, SortField, SortOrder};
    use pretty_assertions::assert_eq;

    fn draft(name: &str, address: &str) -> BuildingDraft {
        BuildingDraft {
            input: NewBuilding::new(name, address),
            coordinates: Coordinates::from_degrees(1.0, 2.0),
            image: None,
        }
    }

    fn by_name(order: SortOrder) -> SortSpec {
        SortSpec {
            field: SortField::Name,
            order,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_distinct_ids() {
        let store = InMemoryBuildingStore::new();
        let a = store.insert(draft("A", "1 Main St")).await.unwrap();
        let b = store.insert(draft("A", "1 Main St")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let store = InMemoryBuildingStore::new();
        let result = store
            .update_by_id(BuildingId::generate(), BuildingChanges::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_applies_patch() {
        let store = InMemoryBuildingStore::new();
        let created = store.insert(draft("Old", "1 Main St")).await.unwrap();

        let updated = store
            .update_by_id(
                created.id,
                BuildingChanges {
                    patch: BuildingPatch {
                        name: Some("New".to_string()),
                        ..Default::default()
                    },
                    image: None,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "New");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let store = InMemoryBuildingStore::new();
        let created = store.insert(draft("A", "1 Main St")).await.unwrap();

        assert!(store.delete_by_id(created.id).await.unwrap().is_some());
        assert!(store.get_by_id(created.id).await.unwrap().is_none());
        assert!(store.delete_by_id(created.id).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_query_sorts_and_pages() {
        let store = InMemoryBuildingStore::new();
        for name in ["Charlie", "Alpha", "Echo", "Bravo", "Delta"] {
            store.insert(draft(name, "Somewhere")).await.unwrap();
        }

        let (page, total) = store
            .query(&BuildingFilter::default(), by_name(SortOrder::Asc), 2, 2)
            .await
            .unwrap();
        let names: Vec<_> = page.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(total, 5);
        assert_eq!(names, vec!["Charlie", "Delta"]);

        let (page, _) = store
            .query(&BuildingFilter::default(), by_name(SortOrder::Desc), 0, 1)
            .await
            .unwrap();
        assert_eq!(page[0].name, "Echo");
    }

    #[tokio::test]
    async fn test_query_filters_name_or_address() {
        let store = InMemoryBuildingStore::new();
        store.insert(draft("Acme Tower", "1 Main St")).await.unwrap();
        store.insert(draft("Plaza", "Acme Road 5")).await.unwrap();
        store.insert(draft("Other", "Elsewhere")).await.unwrap();

        let (page, total) = store
            .query(&BuildingFilter::from_search("acme"), by_name(SortOrder::Asc), 0, 10)
            .await
            .unwrap();

        assert_eq!(total, 2);
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn test_query_skip_past_end() {
        let store = InMemoryBuildingStore::new();
        store.insert(draft("A", "x")).await.unwrap();

        let (page, total) = store
            .query(&BuildingFilter::default(), SortSpec::default(), 10, 10)
            .await
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(total, 1);
    }
}
