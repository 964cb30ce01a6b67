//! Document-collection backend.
//!
//! [`DocumentCollection`] is the interface a document database client
//! exposes: schemaless JSON documents with a string `id`, looked up by id or
//! by an equality filter. [`DocumentStore`] adapts any such client into a
//! [`ResourceStore`].

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use super::{ResourceStore, StoreError, StoreResult};
use crate::domains::resources::{IdsExhausted, Payload, ResourceDefinition};

/// A stored document: a JSON object that carries its `id` field.
pub type Document = Map<String, Value>;

/// Result type for document collection operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors reported by a document collection client.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The backend could not be reached or refused the operation.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// A stored document could not be decoded.
    #[error("Corrupt document {id}: {source}")]
    Corrupt {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// The collection cannot issue another id.
    #[error("Id allocation failed: {0}")]
    Exhausted(#[from] IdsExhausted),

    /// An id counter does not fit the backend's integer type.
    #[error("Id counter out of range: {0}")]
    CounterOverflow(u64),

    /// A document passed to `save` or an update could not be encoded.
    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl DocumentError {
    /// Create an unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Top-level field equality filter. The empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Map<String, Value>);

impl Filter {
    /// Match every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an equality condition.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Whether `doc` satisfies every condition.
    pub fn matches(&self, doc: &Document) -> bool {
        self.0.iter().all(|(k, v)| doc.get(k) == Some(v))
    }
}

/// Client interface of a document database collection.
///
/// All calls may fail with [`DocumentError::Unavailable`] when the backend
/// cannot be reached. Nothing is retried.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Collection name.
    fn name(&self) -> &str;

    /// Documents matching `filter`, in insertion order.
    async fn find(&self, filter: &Filter) -> DocumentResult<Vec<Document>>;

    /// The document with this id, if any.
    async fn find_by_id(&self, id: &str) -> DocumentResult<Option<Document>>;

    /// Insert a new document. Any `id` field is ignored; the collection
    /// assigns one and returns the stored document.
    async fn save(&self, doc: Document) -> DocumentResult<Document>;

    /// Replace the body of the document with this id, keeping its id and
    /// position. Returns the updated document, or `None` if absent.
    async fn find_by_id_and_update(&self, id: &str, doc: Document)
    -> DocumentResult<Option<Document>>;

    /// Remove the document with this id, returning it if it existed.
    async fn find_by_id_and_delete(&self, id: &str) -> DocumentResult<Option<Document>>;
}

/// A [`ResourceStore`] over a document collection.
pub struct DocumentStore<R> {
    collection: Arc<dyn DocumentCollection>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: ResourceDefinition> DocumentStore<R> {
    /// Wrap a collection client.
    pub fn new(collection: Arc<dyn DocumentCollection>) -> Self {
        Self {
            collection,
            _resource: PhantomData,
        }
    }

    fn decode(doc: Document) -> StoreResult<R> {
        let id = doc
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        serde_json::from_value(Value::Object(doc))
            .map_err(|source| DocumentError::Corrupt { id, source }.into())
    }

    fn encode<T: serde::Serialize>(value: &T) -> StoreResult<Document> {
        match serde_json::to_value(value).map_err(DocumentError::from)? {
            Value::Object(mut map) => {
                map.remove("id");
                Ok(map)
            }
            _ => Err(DocumentError::Encode(serde::ser::Error::custom(
                "resource did not encode to an object",
            ))
            .into()),
        }
    }
}

#[async_trait]
impl<R: ResourceDefinition> ResourceStore<R> for DocumentStore<R> {
    fn backend(&self) -> &'static str {
        "document"
    }

    async fn list(&self) -> StoreResult<Vec<R>> {
        self.collection
            .find(&Filter::all())
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    async fn get(&self, id: &str) -> StoreResult<R> {
        match self.collection.find_by_id(id).await? {
            Some(doc) => Self::decode(doc),
            None => Err(StoreError::not_found(id)),
        }
    }

    async fn create(&self, draft: R::Draft) -> StoreResult<R> {
        let saved = self.collection.save(Self::encode(&draft)?).await?;
        let resource = Self::decode(saved)?;
        debug!(
            collection = self.collection.name(),
            id = resource.id(),
            "Saved document"
        );
        Ok(resource)
    }

    async fn replace(&self, id: &str, patch: &Payload) -> StoreResult<R> {
        let current = self.get(id).await?;
        let replacement = current.merged(patch)?;

        // The document may have been deleted while we were merging.
        match self
            .collection
            .find_by_id_and_update(id, Self::encode(&replacement)?)
            .await?
        {
            Some(doc) => Self::decode(doc),
            None => Err(StoreError::not_found(id)),
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let removed = self.collection.find_by_id_and_delete(id).await?;
        debug!(
            collection = self.collection.name(),
            id,
            existed = removed.is_some(),
            "Deleted document"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::resources::{Note, NoteDraft, next_id};
    use std::sync::Mutex;

    /// Collection kept in a Vec, with a switch to simulate an outage.
    #[derive(Default)]
    struct VecCollection {
        docs: Mutex<Vec<Document>>,
        offline: std::sync::atomic::AtomicBool,
    }

    impl VecCollection {
        fn check(&self) -> DocumentResult<()> {
            if self.offline.load(std::sync::atomic::Ordering::SeqCst) {
                Err(DocumentError::unavailable("connection refused"))
            } else {
                Ok(())
            }
        }
    }

    fn doc_id(doc: &Document) -> &str {
        doc.get("id").and_then(Value::as_str).unwrap_or_default()
    }

    #[async_trait]
    impl DocumentCollection for VecCollection {
        fn name(&self) -> &str {
            "notes"
        }

        async fn find(&self, filter: &Filter) -> DocumentResult<Vec<Document>> {
            self.check()?;
            let docs = self.docs.lock().unwrap();
            Ok(docs.iter().filter(|d| filter.matches(d)).cloned().collect())
        }

        async fn find_by_id(&self, id: &str) -> DocumentResult<Option<Document>> {
            self.check()?;
            let docs = self.docs.lock().unwrap();
            Ok(docs.iter().find(|d| doc_id(d) == id).cloned())
        }

        async fn save(&self, mut doc: Document) -> DocumentResult<Document> {
            self.check()?;
            let mut docs = self.docs.lock().unwrap();
            let id = next_id(docs.iter().map(doc_id))?;
            doc.insert("id".into(), Value::String(id));
            docs.push(doc.clone());
            Ok(doc)
        }

        async fn find_by_id_and_update(
            &self,
            id: &str,
            mut doc: Document,
        ) -> DocumentResult<Option<Document>> {
            self.check()?;
            let mut docs = self.docs.lock().unwrap();
            Ok(docs.iter_mut().find(|d| doc_id(d) == id).map(|slot| {
                doc.insert("id".into(), Value::String(id.to_owned()));
                *slot = doc.clone();
                doc
            }))
        }

        async fn find_by_id_and_delete(&self, id: &str) -> DocumentResult<Option<Document>> {
            self.check()?;
            let mut docs = self.docs.lock().unwrap();
            let pos = docs.iter().position(|d| doc_id(d) == id);
            Ok(pos.map(|i| docs.remove(i)))
        }
    }

    fn store() -> (Arc<VecCollection>, DocumentStore<Note>) {
        let collection = Arc::new(VecCollection::default());
        let store = DocumentStore::new(collection.clone());
        (collection, store)
    }

    #[test]
    fn test_filter_matches() {
        let mut doc = Document::new();
        doc.insert("important".into(), Value::Bool(true));
        assert!(Filter::all().matches(&doc));
        assert!(Filter::all().eq("important", true).matches(&doc));
        assert!(!Filter::all().eq("important", false).matches(&doc));
    }

    #[tokio::test]
    async fn test_create_and_get_roundtrip() {
        let (_, store) = store();
        let created = store.create(NoteDraft::new("Learn Go", false)).await.unwrap();
        assert_eq!(created.id, "1");
        assert_eq!(store.get("1").await.unwrap(), created);
        assert_eq!(store.list().await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn test_replace_absent_reports_not_found() {
        let (_, store) = store();
        let patch = Payload::new().with("content", "x");
        assert!(matches!(
            store.replace("3", &patch).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_absent_succeeds() {
        let (_, store) = store();
        store.delete("17").await.unwrap();
    }

    #[tokio::test]
    async fn test_outage_surfaces_as_backend_error() {
        let (collection, store) = store();
        collection
            .offline
            .store(true, std::sync::atomic::Ordering::SeqCst);
        assert!(matches!(
            store.list().await,
            Err(StoreError::Backend(DocumentError::Unavailable(_)))
        ));
    }

    #[tokio::test]
    async fn test_corrupt_document() {
        let (collection, store) = store();
        let mut doc = Document::new();
        doc.insert("id".into(), Value::String("1".into()));
        doc.insert("content".into(), Value::Bool(false));
        collection.docs.lock().unwrap().push(doc);

        assert!(matches!(
            store.get("1").await,
            Err(StoreError::Backend(DocumentError::Corrupt { .. }))
        ));
    }
}
