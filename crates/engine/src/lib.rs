//! Record store for slapdb
//!
//! This crate composes the core model and a storage engine into the
//! public record API:
//! - Store: handle bound to one schema namespace (open, ephemeral, builder)
//! - CRUD: create, create_many, read, update, delete
//! - Queries: where_ids, select, take
//! - IdGenerator: pluggable record identifier source
//!
//! Every public operation wraps its errors with the operation name, so a
//! failure reads like `update: record does not exist: Person 42`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
mod crud;
pub mod id;
mod query;
pub mod store;

pub use builder::StoreBuilder;
pub use id::{IdGenerator, TimeOrderedIds};
pub use store::Store;
