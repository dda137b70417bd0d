//! On-disk engine backed by redb
//!
//! All keys live in one redb table. redb provides the transaction semantics
//! directly: a write transaction is committed when the closure returns `Ok`
//! and aborted otherwise, and read transactions are MVCC snapshots, so
//! readers never block the single writer.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use redb::{Builder, Database, Durability, ReadOnlyTable, ReadableTable, Table, TableDefinition};
use slap_core::{Error, Result};
use tracing::{debug, info};

use crate::config::{DurabilityMode, StoreConfig};
use crate::traits::{KvEngine, ReadTxn, ScanFlow, WriteTxn};

/// File name of the redb database inside a data directory
pub const DATA_FILE_NAME: &str = "records.redb";

const RECORDS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("records");

/// Persistent [`KvEngine`] over a redb database file
pub struct RedbEngine {
    db: Database,
    durability: Durability,
    path: PathBuf,
}

impl std::fmt::Debug for RedbEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbEngine")
            .field("path", &self.path)
            .field("durability", &self.durability)
            .finish()
    }
}

impl RedbEngine {
    /// Open or create the database file at `path`
    ///
    /// # Errors
    ///
    /// [`Error::Config`] for an invalid durability mode, [`Error::Storage`]
    /// if redb cannot open the file.
    pub fn open(path: impl AsRef<Path>, config: &StoreConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let durability = match config.durability_mode()? {
            DurabilityMode::Standard => Durability::Immediate,
            DurabilityMode::Always => Durability::Paranoid,
        };

        let mut builder = Builder::new();
        if let Some(bytes) = config.cache_size_bytes() {
            builder.set_cache_size(bytes);
        }
        let db = builder.create(&path).map_err(storage_err)?;

        // Create the table up front so read transactions can always open it.
        let txn = db.begin_write().map_err(storage_err)?;
        txn.open_table(RECORDS).map_err(storage_err)?;
        txn.commit().map_err(storage_err)?;

        info!(
            target: "slap::storage",
            path = %path.display(),
            durability = ?durability,
            "Opened redb engine"
        );
        Ok(Self {
            db,
            durability,
            path,
        })
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KvEngine for RedbEngine {
    fn update(&self, f: &mut dyn FnMut(&mut dyn WriteTxn) -> Result<()>) -> Result<()> {
        let mut txn = self.db.begin_write().map_err(storage_err)?;
        txn.set_durability(self.durability);

        let outcome = {
            let table = txn.open_table(RECORDS).map_err(storage_err)?;
            let mut write = RedbWriteTxn { table };
            f(&mut write)
        };

        match outcome {
            Ok(()) => txn.commit().map_err(storage_err),
            Err(e) => {
                debug!(target: "slap::storage", error = %e, "Aborting redb transaction");
                txn.abort().map_err(storage_err)?;
                Err(e)
            }
        }
    }

    fn view(&self, f: &mut dyn FnMut(&dyn ReadTxn) -> Result<()>) -> Result<()> {
        let txn = self.db.begin_read().map_err(storage_err)?;
        let table = txn.open_table(RECORDS).map_err(storage_err)?;
        f(&RedbReadTxn { table })
    }

    fn clear(&self) -> Result<()> {
        let mut txn = self.db.begin_write().map_err(storage_err)?;
        txn.set_durability(self.durability);
        txn.delete_table(RECORDS).map_err(storage_err)?;
        txn.open_table(RECORDS).map_err(storage_err)?;
        txn.commit().map_err(storage_err)?;
        info!(target: "slap::storage", path = %self.path.display(), "Cleared redb engine");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redb"
    }
}

struct RedbReadTxn {
    table: ReadOnlyTable<&'static [u8], &'static [u8]>,
}

impl ReadTxn for RedbReadTxn {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        get_from(&self.table, key)
    }

    fn scan(
        &self,
        prefix: &[u8],
        start: Option<&[u8]>,
        visit: &mut dyn FnMut(&[u8], &[u8]) -> Result<ScanFlow>,
    ) -> Result<()> {
        scan_table(&self.table, prefix, start, visit)
    }
}

struct RedbWriteTxn<'txn> {
    table: Table<'txn, &'static [u8], &'static [u8]>,
}

impl ReadTxn for RedbWriteTxn<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        get_from(&self.table, key)
    }

    fn scan(
        &self,
        prefix: &[u8],
        start: Option<&[u8]>,
        visit: &mut dyn FnMut(&[u8], &[u8]) -> Result<ScanFlow>,
    ) -> Result<()> {
        scan_table(&self.table, prefix, start, visit)
    }
}

impl WriteTxn for RedbWriteTxn<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.table.insert(key, value).map_err(storage_err)?;
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.table.remove(key).map_err(storage_err)?;
        Ok(())
    }
}

fn get_from<T>(table: &T, key: &[u8]) -> Result<Option<Vec<u8>>>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    let guard = table.get(key).map_err(storage_err)?;
    Ok(guard.map(|value| value.value().to_vec()))
}

fn scan_table<T>(
    table: &T,
    prefix: &[u8],
    start: Option<&[u8]>,
    visit: &mut dyn FnMut(&[u8], &[u8]) -> Result<ScanFlow>,
) -> Result<()>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    let from = match start {
        Some(s) if s > prefix => s,
        _ => prefix,
    };
    for entry in table.range(from..).map_err(storage_err)? {
        let (key, value) = entry.map_err(storage_err)?;
        let key = key.value();
        if !key.starts_with(prefix) {
            break;
        }
        if visit(key, value.value())? == ScanFlow::Stop {
            break;
        }
    }
    Ok(())
}

fn storage_err(e: impl Display) -> Error {
    Error::Storage(e.to_string())
}
