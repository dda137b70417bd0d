//! Core types for slapdb
//!
//! This crate defines everything that does not touch storage:
//! - Error: error taxonomy and operation context
//! - Value / FieldType / Scalar: the closed set of storable kinds
//! - codec: value ↔ bytes, driven by the declared field type
//! - schema: Record trait and the Schema derived from it
//! - key: key layout for records, fields and index entries
//! - record!: macro declaring a struct and its Record impl

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod key;
mod macros;
pub mod schema;
pub mod value;

pub use error::{Error, ErrorKind, Result, ResultExt};
pub use key::{KeyBuilder, TableEntry, INDEX_NAMESPACE, RESERVED_WORDS};
pub use schema::{FieldDef, FieldRole, FieldValue, Record, Schema};
pub use value::{FieldType, Scalar, Value};
