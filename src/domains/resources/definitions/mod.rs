//! Resource definitions module.
//!
//! Each resource kind is defined in its own file with:
//! - Collection name and display strings
//! - Validation of incoming payloads into a typed draft
//! - Seed data
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export it here
//! 4. Register in `registry.rs`

mod note;
mod person;

pub use note::{Note, NoteDraft};
pub use person::{Person, PersonDraft};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ValidationError;
use super::payload::Payload;

/// Trait for resource definitions.
///
/// A definition ties together the stored value, its validated draft, and
/// where the collection is mounted. Stores and handlers are generic over it.
pub trait ResourceDefinition:
    Clone + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// A validated payload that has not been assigned an id yet.
    type Draft: Clone + std::fmt::Debug + Serialize + Send + Sync + 'static;

    /// Collection name, used in the URL and as the document collection name.
    const COLLECTION: &'static str;

    /// Title used on the info page (e.g. "Phonebook").
    const TITLE: &'static str;

    /// Plural noun used on the info page (e.g. "people").
    const PLURAL: &'static str;

    /// The stored id.
    fn id(&self) -> &str;

    /// Check a payload and build a draft from it.
    fn validate(payload: &Payload) -> Result<Self::Draft, ValidationError>;

    /// Attach an id to a draft.
    fn from_draft(id: String, draft: Self::Draft) -> Self;

    /// The resource's visible fields, including `id`.
    fn to_payload(&self) -> Payload;

    /// Data an empty collection is seeded with.
    fn samples() -> Vec<Self::Draft> {
        Vec::new()
    }

    /// Build the replacement value for a PUT: `patch` over the current fields.
    ///
    /// The id is kept. The merged fields go through [`validate`](Self::validate)
    /// again, so a patch cannot blank out a required field.
    fn merged(&self, patch: &Payload) -> Result<Self, ValidationError> {
        let mut fields = self.to_payload();
        fields.overlay(patch);
        let draft = Self::validate(&fields)?;
        Ok(Self::from_draft(self.id().to_owned(), draft))
    }

    /// Path the collection is served under.
    fn base_path() -> String {
        format!("/api/{}", Self::COLLECTION)
    }

    /// One-line summary for the info page.
    fn summary(count: usize) -> String {
        format!("{} has info for {} {}", Self::TITLE, count, Self::PLURAL)
    }
}
