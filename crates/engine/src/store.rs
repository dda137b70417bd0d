//! Store handle
//!
//! A [`Store`] binds one schema namespace to one key-value engine. All
//! record operations (see `crud` and `query`) hang off it. The handle is
//! cheap to clone; clones share the engine and the identifier generator.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use slap_core::key::is_reserved;
use slap_core::{Error, KeyBuilder, Result, ResultExt};
use slap_storage::KvEngine;
use tracing::info;

use crate::builder::StoreBuilder;
use crate::id::IdGenerator;

/// Handle to a schema namespace inside a key-value engine
#[derive(Clone)]
pub struct Store {
    pub(crate) engine: Arc<dyn KvEngine>,
    pub(crate) schema: String,
    pub(crate) ids: Arc<dyn IdGenerator>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("schema", &self.schema)
            .field("engine", &self.engine.name())
            .finish()
    }
}

impl Store {
    /// Open (creating if needed) an on-disk store in the data directory `path`
    ///
    /// A default `slap.toml` is written on first open and read on every
    /// open. Records live in `records.redb` next to it.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] for an empty schema name,
    /// [`Error::ReservedWord`] for a reserved one, and I/O, config or
    /// storage errors from opening the directory.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use slap_engine::Store;
    ///
    /// let store = Store::open("/var/lib/app/records", "app")?;
    /// # Ok::<(), slap_core::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>, schema: &str) -> Result<Self> {
        Self::builder()
            .path(path.as_ref())
            .schema(schema)
            .open()
    }

    /// Store backed by a fresh in-memory engine; nothing is persisted
    pub fn ephemeral(schema: &str) -> Result<Self> {
        Self::builder().schema(schema).in_memory().open()
    }

    /// Builder for explicit engine, config and id generator choices
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    pub(crate) fn assemble(
        engine: Arc<dyn KvEngine>,
        schema: String,
        ids: Arc<dyn IdGenerator>,
    ) -> Result<Self> {
        check_schema_name(&schema)?;
        info!(
            target: "slap::store",
            schema = %schema,
            engine = engine.name(),
            "Store ready"
        );
        Ok(Self {
            engine,
            schema,
            ids,
        })
    }

    /// Schema namespace this handle reads and writes
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Name of the underlying engine (`"memory"` or `"redb"`)
    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Remove every key in the engine, all schemas included
    pub fn drop_all(&self) -> Result<()> {
        self.engine.clear().op("drop_all")?;
        info!(target: "slap::store", engine = self.engine.name(), "Dropped all data");
        Ok(())
    }

    pub(crate) fn keys<'a>(&'a self, table: &'a str) -> KeyBuilder<'a> {
        KeyBuilder::new(&self.schema, table)
    }
}

fn check_schema_name(schema: &str) -> Result<()> {
    if schema.is_empty() {
        return Err(Error::InvalidParameter("empty schema name".to_string()));
    }
    if is_reserved(schema) {
        return Err(Error::ReservedWord(format!("schema name {}", schema)));
    }
    Ok(())
}
