//! Storage layer for slapdb
//!
//! This crate provides the ordered, transactional key-value engines the
//! record store runs on:
//! - KvEngine / ReadTxn / WriteTxn: the engine seam
//! - MemoryEngine: BTreeMap with RwLock, nothing persisted
//! - RedbEngine: single-table redb database on disk
//! - StoreConfig: `slap.toml` settings for the on-disk engine

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod memory;
pub mod redb_store;
pub mod traits;

pub use config::{DurabilityMode, StoreConfig, CONFIG_FILE_NAME};
pub use memory::MemoryEngine;
pub use redb_store::{RedbEngine, DATA_FILE_NAME};
pub use traits::{KvEngine, KvEngineExt, ReadTxn, ScanFlow, WriteTxn};
