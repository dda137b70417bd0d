//! In-memory engine: BTreeMap behind a RwLock
//!
//! Read transactions share the read lock; a write transaction holds the
//! write lock from start to commit, which serializes writers and gives
//! every transaction a stable view. Writes go straight into the map and are
//! recorded in an undo log that is replayed backwards unless the
//! transaction closure returns `Ok`, so a panicking closure is rolled back
//! too.
//!
//! Nothing is persisted. Used for ephemeral stores and tests.

use std::collections::BTreeMap;
use std::ops::Bound;

use parking_lot::RwLock;
use slap_core::Result;
use tracing::debug;

use crate::traits::{KvEngine, ReadTxn, ScanFlow, WriteTxn};

type Map = BTreeMap<Vec<u8>, Vec<u8>>;

/// Volatile [`KvEngine`]
#[derive(Debug, Default)]
pub struct MemoryEngine {
    data: RwLock<Map>,
}

impl MemoryEngine {
    /// Create an empty engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns true if no key is stored
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl KvEngine for MemoryEngine {
    fn update(&self, f: &mut dyn FnMut(&mut dyn WriteTxn) -> Result<()>) -> Result<()> {
        let mut data = self.data.write();
        let mut txn = MemoryWriteTxn {
            data: &mut data,
            undo: Vec::new(),
            committed: false,
        };
        let result = f(&mut txn);
        match &result {
            Ok(()) => txn.committed = true,
            Err(e) => debug!(
                target: "slap::storage",
                undone = txn.undo.len(),
                error = %e,
                "Rolling back memory transaction"
            ),
        }
        result
    }

    fn view(&self, f: &mut dyn FnMut(&dyn ReadTxn) -> Result<()>) -> Result<()> {
        let data = self.data.read();
        f(&MemoryReadTxn { data: &data })
    }

    fn clear(&self) -> Result<()> {
        self.data.write().clear();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

struct MemoryReadTxn<'a> {
    data: &'a Map,
}

impl ReadTxn for MemoryReadTxn<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.data.get(key).cloned())
    }

    fn scan(
        &self,
        prefix: &[u8],
        start: Option<&[u8]>,
        visit: &mut dyn FnMut(&[u8], &[u8]) -> Result<ScanFlow>,
    ) -> Result<()> {
        scan_map(self.data, prefix, start, visit)
    }
}

struct MemoryWriteTxn<'a> {
    data: &'a mut Map,
    /// Previous state of every key touched, oldest first
    undo: Vec<(Vec<u8>, Option<Vec<u8>>)>,
    committed: bool,
}

impl Drop for MemoryWriteTxn<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.rollback();
        }
    }
}

impl MemoryWriteTxn<'_> {
    fn rollback(&mut self) {
        while let Some((key, previous)) = self.undo.pop() {
            match previous {
                Some(value) => {
                    self.data.insert(key, value);
                }
                None => {
                    self.data.remove(&key);
                }
            }
        }
    }
}

impl ReadTxn for MemoryWriteTxn<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.data.get(key).cloned())
    }

    fn scan(
        &self,
        prefix: &[u8],
        start: Option<&[u8]>,
        visit: &mut dyn FnMut(&[u8], &[u8]) -> Result<ScanFlow>,
    ) -> Result<()> {
        scan_map(self.data, prefix, start, visit)
    }
}

impl WriteTxn for MemoryWriteTxn<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let previous = self.data.insert(key.to_vec(), value.to_vec());
        self.undo.push((key.to_vec(), previous));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        if let Some(previous) = self.data.remove(key) {
            self.undo.push((key.to_vec(), Some(previous)));
        }
        Ok(())
    }
}

fn scan_map(
    data: &Map,
    prefix: &[u8],
    start: Option<&[u8]>,
    visit: &mut dyn FnMut(&[u8], &[u8]) -> Result<ScanFlow>,
) -> Result<()> {
    let from = match start {
        Some(s) if s > prefix => s,
        _ => prefix,
    };
    let range = data.range::<[u8], _>((Bound::Included(from), Bound::Unbounded));
    for (key, value) in range {
        if !key.starts_with(prefix) {
            break;
        }
        if visit(key.as_slice(), value.as_slice())? == ScanFlow::Stop {
            break;
        }
    }
    Ok(())
}
