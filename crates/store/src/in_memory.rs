//! In-memory collection for tests/dev.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::collection::{Collection, Document, Filter, Patch};
use crate::error::{StoreError, StoreResult};

/// In-memory document collection.
///
/// - No IO / no async
/// - Single `RwLock` over the map, so per-document atomicity (and then some)
///   holds trivially
/// - Lock poisoning surfaces as `StoreError::Backend`
#[derive(Debug)]
pub struct InMemoryCollection<D: Document> {
    inner: RwLock<HashMap<D::Id, D>>,
}

impl<D: Document> InMemoryCollection<D> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<D: Document> Default for InMemoryCollection<D> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

impl<D: Document> Collection<D> for InMemoryCollection<D> {
    fn create(&self, doc: D) -> StoreResult<()> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let id = doc.id();
        if map.contains_key(&id) {
            return Err(StoreError::DuplicateId(format!("{id:?}")));
        }
        map.insert(id, doc);
        Ok(())
    }

    fn find_by_id(&self, id: &D::Id) -> StoreResult<Option<D>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(id).cloned())
    }

    fn find_one(&self, filter: Filter<'_, D>) -> StoreResult<Option<D>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().find(|d| filter(d)).cloned())
    }

    fn find_many(&self, filter: Filter<'_, D>) -> StoreResult<Vec<D>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().filter(|d| filter(d)).cloned().collect())
    }

    fn update_by_id(&self, id: &D::Id, patch: Patch<'_, D>) -> StoreResult<Option<D>> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(map.get_mut(id).map(|doc| {
            patch(doc);
            doc.clone()
        }))
    }

    fn update_one(&self, filter: Filter<'_, D>, patch: Patch<'_, D>) -> StoreResult<Option<D>> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(map.values_mut().find(|d| filter(d)).map(|doc| {
            patch(doc);
            doc.clone()
        }))
    }

    fn update_many(&self, filter: Filter<'_, D>, patch: Patch<'_, D>) -> StoreResult<u64> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let mut modified = 0u64;
        for doc in map.values_mut() {
            if filter(doc) {
                patch(doc);
                modified += 1;
            }
        }
        Ok(modified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Doc {
        id: u32,
        status: &'static str,
    }

    impl Document for Doc {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }
    }

    #[test]
    fn create_rejects_duplicate_id() {
        let coll = InMemoryCollection::new();
        coll.create(Doc { id: 1, status: "a" }).unwrap();
        let err = coll.create(Doc { id: 1, status: "b" }).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(_)));
    }

    #[test]
    fn conditional_update_misses_on_stale_status() {
        let coll = InMemoryCollection::new();
        coll.create(Doc { id: 1, status: "pending" }).unwrap();

        // Expected-status mismatch: no write, None back.
        let out = coll
            .update_one(&|d: &Doc| d.id == 1 && d.status == "approved", &|d| {
                d.status = "revoked"
            })
            .unwrap();
        assert!(out.is_none());
        assert_eq!(coll.find_by_id(&1).unwrap().unwrap().status, "pending");

        let out = coll
            .update_one(&|d: &Doc| d.id == 1 && d.status == "pending", &|d| {
                d.status = "approved"
            })
            .unwrap();
        assert_eq!(out.unwrap().status, "approved");
    }

    #[test]
    fn update_many_reports_modified_count() {
        let coll = InMemoryCollection::new();
        for id in 0..5 {
            let status = if id % 2 == 0 { "open" } else { "closed" };
            coll.create(Doc { id, status }).unwrap();
        }

        let n = coll
            .update_many(&|d: &Doc| d.status == "open", &|d| d.status = "closed")
            .unwrap();
        assert_eq!(n, 3);
        assert_eq!(coll.find_many(&|d: &Doc| d.status == "closed").unwrap().len(), 5);
    }
}
