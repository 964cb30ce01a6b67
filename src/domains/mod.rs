//! Domains module containing business logic organized by bounded contexts.
//!
//! - **resources**: the collections served over HTTP and their validation
//! - **storage**: the backends those collections are kept in

pub mod resources;
pub mod storage;
