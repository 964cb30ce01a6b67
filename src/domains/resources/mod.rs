//! Resources domain module.
//!
//! This module holds the collections the server exposes over HTTP: notes and
//! phonebook entries. Each collection is served with the same five routes.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual resource definitions (one file per resource)
//! - `payload.rs` - Untyped request bodies
//! - `validation.rs` - Field checks run before any store access
//! - `id.rs` - Identifier generation
//! - `service.rs` - Validation plus store access for one collection
//! - `handlers.rs` - Generic HTTP handlers
//! - `registry.rs` - Central collection registration
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file in `definitions/` (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export in `definitions/mod.rs`
//! 4. Register in `registry.rs`
//!
//! **No need to modify `handlers.rs` or `service.rs`!**

pub mod definitions;
mod error;
mod handlers;
mod id;
mod payload;
mod registry;
mod service;
pub mod validation;

pub use definitions::{Note, NoteDraft, Person, PersonDraft, ResourceDefinition};
pub use error::{ResourceError, ValidationError};
pub use id::{IdSequence, IdsExhausted, MAX_ID, max_numeric, next_id};
pub use payload::Payload;
pub use registry::{Collections, resource_routes};
pub use service::{ResourceResult, ResourceService};
