//! Document collection abstraction.

use std::sync::Arc;

use crate::error::StoreResult;

/// A persistable document with a stable, strongly-typed identity.
pub trait Document: Clone + Send + Sync + 'static {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + Send + Sync + 'static;

    fn id(&self) -> Self::Id;
}

/// Predicate over a document (the store's query language).
pub type Filter<'a, D> = &'a dyn Fn(&D) -> bool;

/// In-place mutation applied to a matched document.
pub type Patch<'a, D> = &'a dyn Fn(&mut D);

/// A typed document collection.
///
/// Guarantees required of implementations:
/// - every method is atomic at single-document granularity: a filter is
///   evaluated and its patch applied under the same per-document critical
///   section, so `update_one(|d| d.id == x && d.status == S, ...)` is a
///   conditional write (compare-and-set on status)
/// - `update_many` applies its patch to each matching document atomically
///   *per document*; the batch as a whole is not a transaction
/// - modified counts report documents actually patched
pub trait Collection<D: Document>: Send + Sync {
    /// Insert a new document. Duplicate id is a `StoreError::DuplicateId`.
    fn create(&self, doc: D) -> StoreResult<()>;

    fn find_by_id(&self, id: &D::Id) -> StoreResult<Option<D>>;

    fn find_one(&self, filter: Filter<'_, D>) -> StoreResult<Option<D>>;

    fn find_many(&self, filter: Filter<'_, D>) -> StoreResult<Vec<D>>;

    /// Patch the document with this id; returns the updated document.
    fn update_by_id(&self, id: &D::Id, patch: Patch<'_, D>) -> StoreResult<Option<D>>;

    /// Patch the first document matching `filter` (conditional write).
    ///
    /// Returns `None` when nothing matched — for a conditional update this is
    /// the "lost the race" signal, surfaced by callers as a conflict.
    fn update_one(&self, filter: Filter<'_, D>, patch: Patch<'_, D>) -> StoreResult<Option<D>>;

    /// Patch every matching document; returns the modified count.
    fn update_many(&self, filter: Filter<'_, D>, patch: Patch<'_, D>) -> StoreResult<u64>;
}

impl<D, C> Collection<D> for Arc<C>
where
    D: Document,
    C: Collection<D> + ?Sized,
{
    fn create(&self, doc: D) -> StoreResult<()> {
        (**self).create(doc)
    }

    fn find_by_id(&self, id: &D::Id) -> StoreResult<Option<D>> {
        (**self).find_by_id(id)
    }

    fn find_one(&self, filter: Filter<'_, D>) -> StoreResult<Option<D>> {
        (**self).find_one(filter)
    }

    fn find_many(&self, filter: Filter<'_, D>) -> StoreResult<Vec<D>> {
        (**self).find_many(filter)
    }

    fn update_by_id(&self, id: &D::Id, patch: Patch<'_, D>) -> StoreResult<Option<D>> {
        (**self).update_by_id(id, patch)
    }

    fn update_one(&self, filter: Filter<'_, D>, patch: Patch<'_, D>) -> StoreResult<Option<D>> {
        (**self).update_one(filter, patch)
    }

    fn update_many(&self, filter: Filter<'_, D>, patch: Patch<'_, D>) -> StoreResult<u64> {
        (**self).update_many(filter, patch)
    }
}
