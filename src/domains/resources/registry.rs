//! Resource Registry - central registration of all collections.
//!
//! When adding a new resource:
//! 1. Create the definition file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Add a field to [`Collections`] and register it in the methods below

use axum::Router;
use axum::routing::get;

use super::definitions::{Note, Person, ResourceDefinition};
use super::handlers;
use super::service::{ResourceResult, ResourceService};
use crate::core::transport::middleware::unknown_endpoint;

/// Routes for one collection, with the service as router state.
///
/// Methods not listed here fall through to the unknown-endpoint handler
/// rather than producing a 405.
pub fn resource_routes<R: ResourceDefinition>(service: ResourceService<R>) -> Router {
    let base = R::base_path();
    let item = format!("{base}/{{id}}");

    Router::new()
        .route(
            &base,
            get(handlers::list::<R>)
                .post(handlers::create::<R>)
                .fallback(unknown_endpoint),
        )
        .route(
            &item,
            get(handlers::get_one::<R>)
                .put(handlers::replace::<R>)
                .delete(handlers::delete::<R>)
                .fallback(unknown_endpoint),
        )
        .with_state(service)
}

/// Every collection the server exposes.
#[derive(Clone)]
pub struct Collections {
    pub notes: ResourceService<Note>,
    pub persons: ResourceService<Person>,
}

impl Collections {
    /// Create the registry from one service per collection.
    pub fn new(notes: ResourceService<Note>, persons: ResourceService<Person>) -> Self {
        Self { notes, persons }
    }

    /// Routes of every collection, merged.
    pub fn routes(&self) -> Router {
        Router::new()
            .merge(resource_routes(self.notes.clone()))
            .merge(resource_routes(self.persons.clone()))
    }

    /// Base paths of every collection, for startup logs.
    pub fn base_paths() -> Vec<String> {
        vec![Note::base_path(), Person::base_path()]
    }

    /// One summary line per collection, for the info page.
    pub async fn summaries(&self) -> ResourceResult<Vec<String>> {
        let (persons, notes) = futures::try_join!(self.persons.count(), self.notes.count())?;
        Ok(vec![Person::summary(persons), Note::summary(notes)])
    }

    /// Seed every empty collection.
    pub async fn seed_if_empty(&self) -> ResourceResult<()> {
        self.notes.seed_if_empty().await?;
        self.persons.seed_if_empty().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::storage::MemoryStore;

    fn empty() -> Collections {
        Collections::new(
            ResourceService::from_store(MemoryStore::<Note>::new()),
            ResourceService::from_store(MemoryStore::<Person>::new()),
        )
    }

    #[test]
    fn test_base_paths() {
        assert_eq!(Collections::base_paths(), ["/api/notes", "/api/persons"]);
    }

    #[tokio::test]
    async fn test_summaries_after_seed() {
        let collections = empty();
        collections.seed_if_empty().await.unwrap();

        let lines = collections.summaries().await.unwrap();
        assert_eq!(
            lines,
            [
                "Phonebook has info for 4 people",
                "Notebook has info for 3 notes"
            ]
        );
    }
}
