//! Store builder for explicit configuration
//!
//! ```ignore
//! use slap_engine::Store;
//!
//! // 1. On-disk store with defaults from slap.toml
//! let store = Store::open("/data/records", "app")?;
//!
//! // 2. Builder for an explicit config or id generator
//! let store = Store::builder()
//!     .path("/data/records")
//!     .schema("app")
//!     .config(StoreConfig { durability: "always".into(), ..Default::default() })
//!     .open()?;
//!
//! // 3. Ephemeral (no files, testing)
//! let store = Store::ephemeral("app")?;
//! ```

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use slap_core::{Error, Result, ResultExt};
use slap_storage::{
    KvEngine, MemoryEngine, RedbEngine, StoreConfig, CONFIG_FILE_NAME, DATA_FILE_NAME,
};
use tracing::info;

use crate::id::{IdGenerator, TimeOrderedIds};
use crate::store::Store;

/// Builder for [`Store`]
///
/// Either a data directory (`path`) or an explicit engine must be given.
#[derive(Default)]
pub struct StoreBuilder {
    path: Option<PathBuf>,
    schema: Option<String>,
    config: Option<StoreConfig>,
    engine: Option<Arc<dyn KvEngine>>,
    ids: Option<Arc<dyn IdGenerator>>,
}

impl StoreBuilder {
    /// Builder with nothing set
    pub fn new() -> Self {
        Self::default()
    }

    /// Data directory holding `slap.toml` and `records.redb`
    pub fn path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Schema namespace (required)
    pub fn schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.to_string());
        self
    }

    /// Use `config` instead of the directory's `slap.toml`
    ///
    /// The config is written to `slap.toml` so later plain opens pick it up.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Run on an explicit engine; `path` and `config` are then ignored
    pub fn engine<E: KvEngine + 'static>(mut self, engine: E) -> Self {
        self.engine = Some(Arc::new(engine));
        self
    }

    /// Share an engine with other stores (other schemas, usually)
    pub fn shared_engine(mut self, engine: Arc<dyn KvEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Run on a fresh [`MemoryEngine`]
    pub fn in_memory(self) -> Self {
        self.engine(MemoryEngine::new())
    }

    /// Replace the default [`TimeOrderedIds`] generator
    pub fn id_generator<G: IdGenerator + 'static>(mut self, ids: G) -> Self {
        self.ids = Some(Arc::new(ids));
        self
    }

    /// Open the store
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] if no schema, or neither a path nor an
    ///   engine, was configured
    /// - directory, config or engine errors when opening on disk
    pub fn open(self) -> Result<Store> {
        self.open_inner().op("open")
    }

    fn open_inner(self) -> Result<Store> {
        let schema = self.schema.ok_or_else(|| {
            Error::InvalidParameter("StoreBuilder::open() requires a schema".to_string())
        })?;
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(TimeOrderedIds) as Arc<dyn IdGenerator>);

        let engine = match (self.engine, self.path) {
            (Some(engine), _) => engine,
            (None, Some(path)) => Arc::new(open_redb(path, self.config)?) as Arc<dyn KvEngine>,
            (None, None) => {
                return Err(Error::InvalidParameter(
                    "StoreBuilder::open() requires a path. Use Store::ephemeral() for testing."
                        .to_string(),
                ))
            }
        };

        Store::assemble(engine, schema, ids)
    }
}

fn open_redb(dir: PathBuf, config: Option<StoreConfig>) -> Result<RedbEngine> {
    fs::create_dir_all(&dir)?;

    let config_path = dir.join(CONFIG_FILE_NAME);
    let config = match config {
        Some(config) => {
            config.durability_mode()?;
            config.write_to_file(&config_path)?;
            config
        }
        None => {
            StoreConfig::write_default_if_missing(&config_path)?;
            StoreConfig::from_file(&config_path)?
        }
    };

    info!(
        target: "slap::store",
        path = %dir.display(),
        durability = %config.durability,
        "Opening store directory"
    );
    RedbEngine::open(dir.join(DATA_FILE_NAME), &config)
}
