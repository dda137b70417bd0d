//! slapdb - schema-on-demand embedded record store
//!
//! slapdb persists plain Rust structs over an ordered, transactional
//! key-value engine without a schema declared up front. A record type
//! describes itself through the [`record!`] macro: one `#[primary]` string
//! id and any number of `#[index]` fields that can be queried by equality.
//!
//! # Quick Start
//!
//! ```
//! use slapdb::{record, Store};
//!
//! record! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct Person {
//!         #[primary]
//!         pub id: String,
//!         #[index]
//!         pub address: String,
//!         pub name: String,
//!         #[index]
//!         pub age: i64,
//!     }
//! }
//!
//! let store = Store::ephemeral("people")?;
//!
//! let id = store.create(&Person {
//!     address: "St Leonards".into(),
//!     name: "Jim".into(),
//!     age: 60,
//!     ..Default::default()
//! })?;
//!
//! let found: Vec<Person> = store.select(
//!     &Person { address: "St Leonards".into(), ..Default::default() },
//!     &[],
//! )?;
//! assert_eq!(found[0].id, id);
//! # Ok::<(), slapdb::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `slap-core`: values, codec, schema model, key layout
//! - `slap-storage`: engine trait, memory and redb engines, `slap.toml`
//! - `slap-engine`: the [`Store`] with CRUD and queries

pub use slap_core::{
    codec, record, Error, ErrorKind, FieldDef, FieldRole, FieldType, KeyBuilder, Record, Result,
    ResultExt, Scalar, Schema, Value, INDEX_NAMESPACE,
};
pub use slap_engine::{IdGenerator, Store, StoreBuilder, TimeOrderedIds};
pub use slap_storage::{
    DurabilityMode, KvEngine, KvEngineExt, MemoryEngine, ReadTxn, RedbEngine, ScanFlow,
    StoreConfig, WriteTxn, CONFIG_FILE_NAME, DATA_FILE_NAME,
};
