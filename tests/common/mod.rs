//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Once;

use chrono::{DateTime, Utc};
pub use slapdb::{record, ErrorKind, IdGenerator, Store, StoreConfig};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

pub const SCHEMA: &str = "sparkle";

record! {
    /// Every supported kind, three of them indexed
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Resident {
        #[primary]
        pub id: String,
        #[index]
        pub address: String,
        pub name: String,
        pub universe: i64,
        #[index]
        pub age: i32,
        pub life: bool,
        pub range: Vec<u8>,
        #[index]
        pub money: f64,
        pub when: DateTime<Utc>,
        pub nickname: Option<String>,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Counter {
        #[primary]
        pub id: String,
        pub name: String,
        pub age: u32,
        pub count: u64,
    }
}

/// The four residents used by the query scenarios
pub fn residents() -> Vec<Resident> {
    vec![
        Resident {
            address: "St Leonards".into(),
            name: "Jim".into(),
            universe: 424242,
            age: 60,
            life: true,
            range: b"some bytes".to_vec(),
            money: 32.42,
            when: Utc::now(),
            ..Default::default()
        },
        Resident {
            address: "St Leonards".into(),
            name: "Tom".into(),
            universe: 999,
            age: 46,
            life: true,
            range: b"some bytes".to_vec(),
            money: 36.06,
            ..Default::default()
        },
        Resident {
            address: "Jersey St".into(),
            universe: 1000,
            age: 25,
            range: b"more bytes".to_vec(),
            money: 0.42,
            ..Default::default()
        },
        Resident {
            address: "Romsey St".into(),
            universe: 1001,
            age: 46,
            life: true,
            range: b"if any bytes".to_vec(),
            money: 100.01,
            ..Default::default()
        },
    ]
}

static INIT_TRACING: Once = Once::new();

/// Route store logs to the test writer; filter with `RUST_LOG=slap=debug`
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A store plus whatever keeps its backing alive
pub struct TestStore {
    pub store: Store,
    pub dir: Option<TempDir>,
}

impl TestStore {
    /// In-memory store
    pub fn memory() -> Self {
        init_tracing();
        let store = Store::ephemeral(SCHEMA).expect("Failed to create ephemeral store");
        TestStore { store, dir: None }
    }

    /// redb store in a fresh temporary directory
    pub fn redb() -> Self {
        init_tracing();
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = Store::open(dir.path(), SCHEMA).expect("Failed to open store");
        TestStore {
            store,
            dir: Some(dir),
        }
    }

    /// Reopen the same directory (redb stores only)
    pub fn reopen(self) -> Self {
        let dir = self.dir.expect("only on-disk stores can be reopened");
        drop(self.store);
        let store = Store::open(dir.path(), SCHEMA).expect("Failed to reopen store");
        TestStore {
            store,
            dir: Some(dir),
        }
    }
}

/// Run `f` once against each engine
pub fn for_each_engine(f: impl Fn(&Store)) {
    for test_store in [TestStore::memory(), TestStore::redb()] {
        test_store.store.drop_all().expect("Failed to clear store");
        f(&test_store.store);
    }
}

/// Ids `00000001`, `00000002`, ... in creation order
#[derive(Debug, Default)]
pub struct SequentialIds(AtomicU64);

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        format!("{:08}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Borrow owned ids as the `&[&str]` the store takes
pub fn as_strs(ids: &[String]) -> Vec<&str> {
    ids.iter().map(String::as_str).collect()
}
