//! Create, read, update and delete against every engine

use crate::common::*;
use chrono::{TimeZone, Utc};

#[test]
fn test_create_and_read_every_field() {
    for_each_engine(|store| {
        let jim = residents().remove(0);
        let id = store.create(&jim).unwrap();

        let got: Vec<Resident> = store.read(&[], &[id.as_str()]).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0], Resident { id, ..jim });
    });
}

#[test]
fn test_create_rejects_record_with_id() {
    for_each_engine(|store| {
        let mut jim = residents().remove(0);
        jim.id = "already".to_string();
        let err = store.create(&jim).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert!(store.take::<Resident>(&[], None, 10).unwrap().is_empty());
    });
}

#[test]
fn test_create_many_then_read_batch() {
    for_each_engine(|store| {
        let all = residents();
        let ids = store.create_many(&all).unwrap();
        assert_eq!(ids.len(), 4);

        let got: Vec<Resident> = store.read(&["name", "age"], &as_strs(&ids)).unwrap();
        let names: Vec<&str> = got.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Jim", "Tom", "", ""]);
        assert_eq!(got[3].age, 46);
        assert_eq!(got[3].money, 0.0);
    });
}

#[test]
fn test_create_many_stops_at_first_bad_record() {
    for_each_engine(|store| {
        let mut batch = residents();
        batch[2].id = "preset".to_string();
        let err = store.create_many(&batch).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);

        let stored = store.take::<Resident>(&["name"], None, 10).unwrap();
        assert_eq!(stored.len(), 2);
    });
}

#[test]
fn test_read_missing_ids() {
    for_each_engine(|store| {
        let id = store.create(&residents().remove(1)).unwrap();

        let err = store.read::<Resident>(&[], &["missing"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoRecord);
        assert!(err.to_string().starts_with("read: "));

        let got: Vec<Resident> = store.read(&[], &["missing", id.as_str(), "gone"]).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].name, "Tom");

        assert!(store.read::<Resident>(&[], &[]).unwrap().is_empty());
    });
}

#[test]
fn test_zero_length_blob_and_absent_optional() {
    for_each_engine(|store| {
        let blank = Resident {
            address: "Nowhere".into(),
            ..Default::default()
        };
        let id = store.create(&blank).unwrap();

        let got: Vec<Resident> = store.read(&[], &[id.as_str()]).unwrap();
        assert!(got[0].range.is_empty());
        assert_eq!(got[0].nickname, None);
        assert_eq!(got[0].when, chrono::DateTime::<Utc>::default());
    });
}

#[test]
fn test_timestamp_keeps_nanoseconds() {
    for_each_engine(|store| {
        let when = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let id = store
            .create(&Resident {
                when,
                ..Default::default()
            })
            .unwrap();

        let got: Vec<Resident> = store.read(&["when"], &[id.as_str()]).unwrap();
        assert_eq!(got[0].when, when);
    });
}

#[test]
fn test_timestamp_before_epoch() {
    for_each_engine(|store| {
        let when = Utc.timestamp_opt(-86_400 * 365, 42).unwrap();
        let id = store
            .create(&Resident {
                when,
                ..Default::default()
            })
            .unwrap();

        let got: Vec<Resident> = store.read(&["when"], &[id.as_str()]).unwrap();
        assert_eq!(got[0].when, when);
    });
}

#[test]
fn test_update_changes_only_set_fields() {
    for_each_engine(|store| {
        let jim = residents().remove(0);
        let id = store.create(&jim).unwrap();

        let patch = Resident {
            name: "James".into(),
            age: 61,
            nickname: Some("Jimmy".into()),
            ..Default::default()
        };
        store.update(&patch, &id).unwrap();

        let got: Vec<Resident> = store.read(&[], &[id.as_str()]).unwrap();
        let expected = Resident {
            id: id.clone(),
            name: "James".into(),
            age: 61,
            nickname: Some("Jimmy".into()),
            ..jim
        };
        assert_eq!(got[0], expected);

        let by_address = Resident {
            address: "St Leonards".into(),
            ..Default::default()
        };
        assert_eq!(store.where_ids(&by_address).unwrap(), vec![id.clone()]);

        let by_money = Resident {
            money: 32.42,
            ..Default::default()
        };
        assert_eq!(store.where_ids(&by_money).unwrap(), vec![id.clone()]);

        let old_age = Resident {
            age: 60,
            ..Default::default()
        };
        assert!(store.where_ids(&old_age).unwrap().is_empty());

        let new_age = Resident {
            age: 61,
            ..Default::default()
        };
        assert_eq!(store.where_ids(&new_age).unwrap(), vec![id.clone()]);
    });
}

#[test]
fn test_update_moves_index() {
    for_each_engine(|store| {
        let ids = store.create_many(&residents()).unwrap();

        let patch = Resident {
            address: "Jersey St".into(),
            ..Default::default()
        };
        store.update(&patch, &ids[0]).unwrap();

        let st_leonards = Resident {
            address: "St Leonards".into(),
            ..Default::default()
        };
        assert_eq!(store.where_ids(&st_leonards).unwrap(), vec![ids[1].clone()]);

        let jersey = Resident {
            address: "Jersey St".into(),
            ..Default::default()
        };
        let mut expected = vec![ids[0].clone(), ids[2].clone()];
        expected.sort();
        assert_eq!(store.where_ids(&jersey).unwrap(), expected);
    });
}

#[test]
fn test_update_missing_record() {
    for_each_engine(|store| {
        let patch = Resident {
            name: "Ghost".into(),
            ..Default::default()
        };
        let err = store.update(&patch, "nobody").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoRecord);
        assert!(err.to_string().starts_with("update: "));
    });
}

#[test]
fn test_delete() {
    for_each_engine(|store| {
        let ids = store.create_many(&residents()).unwrap();
        store.delete::<Resident>(&ids[1]).unwrap();

        let err = store.read::<Resident>(&[], &[ids[1].as_str()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoRecord);

        let age_46 = Resident {
            age: 46,
            ..Default::default()
        };
        assert_eq!(store.where_ids(&age_46).unwrap(), vec![ids[3].clone()]);

        let left = store.take::<Resident>(&[], None, 10).unwrap();
        assert_eq!(left.len(), 3);

        store.delete::<Resident>(&ids[1]).unwrap();
    });
}
