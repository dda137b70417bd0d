//! On-disk behavior: reopen, config file, drop_all

use crate::common::*;
use slapdb::{DurabilityMode, CONFIG_FILE_NAME};

#[test]
fn test_records_survive_reopen() {
    let test_store = TestStore::redb();
    let ids = test_store.store.create_many(&residents()).unwrap();

    let test_store = test_store.reopen();
    let got: Vec<Resident> = test_store.store.read(&[], &as_strs(&ids)).unwrap();
    assert_eq!(got.len(), 4);
    assert_eq!(got[0].name, "Jim");

    let filter = Resident {
        address: "St Leonards".into(),
        ..Default::default()
    };
    assert_eq!(test_store.store.where_ids(&filter).unwrap().len(), 2);
}

#[test]
fn test_default_config_file_is_created() {
    let test_store = TestStore::redb();
    let dir = test_store.dir.as_ref().unwrap();
    let config = StoreConfig::from_file(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
    assert_eq!(config.durability_mode().unwrap(), DurabilityMode::Standard);
}

#[test]
fn test_always_durability_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        durability: "always".into(),
        ..Default::default()
    };
    let store = Store::builder()
        .path(dir.path())
        .schema(SCHEMA)
        .config(config)
        .open()
        .unwrap();
    let id = store.create(&residents().remove(0)).unwrap();
    drop(store);

    let store = Store::open(dir.path(), SCHEMA).unwrap();
    let got: Vec<Resident> = store.read(&["name"], &[id.as_str()]).unwrap();
    assert_eq!(got[0].name, "Jim");
}

#[test]
fn test_drop_all_clears_every_schema() {
    for_each_engine(|store| {
        store.create_many(&residents()).unwrap();
        store.drop_all().unwrap();
        assert!(store.take::<Resident>(&[], None, 10).unwrap().is_empty());

        let id = store.create(&residents().remove(0)).unwrap();
        assert_eq!(store.read::<Resident>(&[], &[id.as_str()]).unwrap().len(), 1);
    });
}

#[test]
fn test_open_rejects_reserved_schema() {
    let dir = tempfile::tempdir().unwrap();
    let err = Store::open(dir.path(), "index.system").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReservedWord);
    assert!(err.to_string().starts_with("open: "));
}
