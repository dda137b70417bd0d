//! Engine abstraction
//!
//! The record store only needs four things from the key-value engine it runs
//! on: an atomic read-modify-write transaction, a read-only transaction,
//! ordered prefix iteration inside either, and a full clear. [`KvEngine`]
//! captures exactly that, so the in-memory and redb engines can be swapped
//! without touching the store.
//!
//! Thread safety: engines must be safe to share between threads
//! (`Send + Sync`). Isolation between concurrent transactions is whatever
//! the engine provides; nothing is layered on top.

use slap_core::{Error, Result};

/// Whether a scan should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanFlow {
    /// Visit the next key
    Continue,
    /// Stop the scan
    Stop,
}

/// Reads available in every transaction
pub trait ReadTxn {
    /// Value stored under `key`
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Visit every key starting with `prefix` in ascending byte order
    ///
    /// When `start` is given, keys below it are skipped. The visitor returns
    /// [`ScanFlow::Stop`] to end the scan early.
    fn scan(
        &self,
        prefix: &[u8],
        start: Option<&[u8]>,
        visit: &mut dyn FnMut(&[u8], &[u8]) -> Result<ScanFlow>,
    ) -> Result<()>;

    /// Returns true if `key` is present
    fn contains(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Every `(key, value)` pair under `prefix`
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut out = Vec::new();
        self.scan(prefix, None, &mut |key, value| {
            out.push((key.to_vec(), value.to_vec()));
            Ok(ScanFlow::Continue)
        })?;
        Ok(out)
    }
}

/// Writes available inside a read-modify-write transaction
pub trait WriteTxn: ReadTxn {
    /// Insert or overwrite `key`
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    fn delete(&mut self, key: &[u8]) -> Result<()>;
}

/// Ordered, transactional key-value engine
pub trait KvEngine: Send + Sync {
    /// Run `f` in a read-modify-write transaction
    ///
    /// Everything `f` wrote is committed atomically if it returns `Ok`;
    /// nothing is if it returns `Err`.
    fn update(&self, f: &mut dyn FnMut(&mut dyn WriteTxn) -> Result<()>) -> Result<()>;

    /// Run `f` against a consistent read-only view
    fn view(&self, f: &mut dyn FnMut(&dyn ReadTxn) -> Result<()>) -> Result<()>;

    /// Remove every key in the engine
    fn clear(&self) -> Result<()>;

    /// Short engine name for diagnostics
    fn name(&self) -> &'static str;
}

/// Closure-with-result helpers over [`KvEngine`]
///
/// The engine trait stays object safe; these wrappers carry a return value
/// out of the transaction.
pub trait KvEngineExt: KvEngine {
    /// [`KvEngine::update`] returning the closure's value
    fn write<T>(&self, f: impl FnOnce(&mut dyn WriteTxn) -> Result<T>) -> Result<T> {
        let mut f = Some(f);
        let mut out = None;
        self.update(&mut |txn| {
            let f = f.take().ok_or_else(reentered)?;
            out = Some(f(txn)?);
            Ok(())
        })?;
        out.ok_or_else(reentered)
    }

    /// [`KvEngine::view`] returning the closure's value
    fn read<T>(&self, f: impl FnOnce(&dyn ReadTxn) -> Result<T>) -> Result<T> {
        let mut f = Some(f);
        let mut out = None;
        self.view(&mut |txn| {
            let f = f.take().ok_or_else(reentered)?;
            out = Some(f(txn)?);
            Ok(())
        })?;
        out.ok_or_else(reentered)
    }
}

impl<E: KvEngine + ?Sized> KvEngineExt for E {}

fn reentered() -> Error {
    Error::Storage("transaction closure ran more than once or not at all".to_string())
}
