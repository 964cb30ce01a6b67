//! In-memory collection backend.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{ResourceStore, StoreError, StoreResult};
use crate::domains::resources::{IdSequence, Payload, ResourceDefinition, max_numeric};

struct MemoryState<R> {
    items: Vec<R>,
    ids: IdSequence,
}

/// A collection held in a `Vec`, lost when the process exits.
pub struct MemoryStore<R: ResourceDefinition> {
    state: RwLock<MemoryState<R>>,
}

impl<R: ResourceDefinition> MemoryStore<R> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Create a store holding `items` as-is.
    ///
    /// New ids continue after the largest numeric id in `items`.
    pub fn with_items(items: Vec<R>) -> Self {
        let ids = IdSequence::starting_after(max_numeric(items.iter().map(|r| r.id())));

        Self {
            state: RwLock::new(MemoryState { items, ids }),
        }
    }
}

impl<R: ResourceDefinition> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: ResourceDefinition> ResourceStore<R> for MemoryStore<R> {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> StoreResult<Vec<R>> {
        Ok(self.state.read().await.items.clone())
    }

    async fn get(&self, id: &str) -> StoreResult<R> {
        self.state
            .read()
            .await
            .items
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }

    async fn create(&self, draft: R::Draft) -> StoreResult<R> {
        let mut state = self.state.write().await;
        let MemoryState { items, ids } = &mut *state;

        let id = ids.next(items.iter().map(|r| r.id()))?;
        let resource = R::from_draft(id, draft);
        items.push(resource.clone());

        debug!(collection = R::COLLECTION, id = resource.id(), "Created resource");
        Ok(resource)
    }

    async fn replace(&self, id: &str, patch: &Payload) -> StoreResult<R> {
        let mut state = self.state.write().await;

        let slot = state
            .items
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| StoreError::not_found(id))?;

        let replacement = slot.merged(patch)?;
        *slot = replacement.clone();

        debug!(collection = R::COLLECTION, id, "Replaced resource");
        Ok(replacement)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let before = state.items.len();
        state.items.retain(|r| r.id() != id);

        debug!(
            collection = R::COLLECTION,
            id,
            removed = before - state.items.len(),
            "Deleted resource"
        );
        Ok(())
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.state.read().await.items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::resources::{Note, NoteDraft};

    fn seeded() -> MemoryStore<Note> {
        MemoryStore::with_items(vec![Note::from_draft(
            "1".into(),
            NoteDraft::new("HTML is easy", true),
        )])
    }

    #[tokio::test]
    async fn test_create_assigns_next_id() {
        let store = seeded();
        let note = store.create(NoteDraft::new("Learn Go", false)).await.unwrap();
        assert_eq!(note.id, "2");

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "1");
        assert_eq!(all[1], note);
    }

    #[tokio::test]
    async fn test_get_unknown_id() {
        let store = seeded();
        assert!(matches!(
            store.get("42").await,
            Err(StoreError::NotFound(id)) if id == "42"
        ));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = seeded();
        store.delete("1").await.unwrap();
        store.delete("1").await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = seeded();
        let second = store.create(NoteDraft::new("a", false)).await.unwrap();
        store.delete(&second.id).await.unwrap();

        let third = store.create(NoteDraft::new("b", false)).await.unwrap();
        assert_ne!(third.id, second.id);
        assert_eq!(third.id, "3");
    }

    #[tokio::test]
    async fn test_replace_swaps_value() {
        let store = seeded();
        let patch = Payload::new().with("content", "HTML is hard");
        let updated = store.replace("1", &patch).await.unwrap();

        assert_eq!(updated.id, "1");
        assert_eq!(updated.content, "HTML is hard");
        assert!(updated.important);
        assert_eq!(store.get("1").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_replace_missing_and_invalid() {
        let store = seeded();
        let patch = Payload::new().with("content", "x");
        assert!(matches!(
            store.replace("9", &patch).await,
            Err(StoreError::NotFound(_))
        ));

        let blank = Payload::new().with("content", "");
        assert!(matches!(
            store.replace("1", &blank).await,
            Err(StoreError::Invalid(_))
        ));
        assert_eq!(store.get("1").await.unwrap().content, "HTML is easy");
    }

    #[tokio::test]
    async fn test_legacy_ids_do_not_break_creation() {
        let store = MemoryStore::with_items(vec![Note::from_draft(
            "5f1d7c".into(),
            NoteDraft::new("legacy", false),
        )]);
        let note = store.create(NoteDraft::new("new", false)).await.unwrap();
        assert_eq!(note.id, "1");
    }

    #[tokio::test]
    async fn test_create_fails_once_ids_run_out() {
        use crate::domains::resources::MAX_ID;

        let store = MemoryStore::with_items(vec![Note::from_draft(
            MAX_ID.to_string(),
            NoteDraft::new("last", false),
        )]);
        assert!(matches!(
            store.create(NoteDraft::new("one more", false)).await,
            Err(StoreError::Exhausted(_))
        ));
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
