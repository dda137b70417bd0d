//! Equality queries over indexed fields

use crate::common::*;

fn at(address: &str) -> Resident {
    Resident {
        address: address.into(),
        ..Default::default()
    }
}

#[test]
fn test_select_narrows_with_each_field() {
    for_each_engine(|store| {
        let ids = store.create_many(&residents()).unwrap();

        let found: Vec<Resident> = store.select(&at("St Leonards"), &[]).unwrap();
        assert_eq!(found.len(), 2);

        let filter = Resident {
            age: 46,
            ..at("St Leonards")
        };
        let found: Vec<Resident> = store.select(&filter, &[]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, ids[1]);
        assert_eq!(found[0].name, "Tom");
        assert_eq!(found[0].universe, 999);
    });
}

#[test]
fn test_select_with_field_subset() {
    for_each_engine(|store| {
        store.create_many(&residents()).unwrap();

        let found: Vec<Resident> = store.select(&at("Jersey St"), &["universe"]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].universe, 1000);
        assert_eq!(found[0].address, "");
        assert!(found[0].range.is_empty());
    });
}

#[test]
fn test_where_empty_filter() {
    for_each_engine(|store| {
        store.create_many(&residents()).unwrap();
        assert!(store.where_ids(&Resident::default()).unwrap().is_empty());
        assert!(store
            .select::<Resident>(&Resident::default(), &[])
            .unwrap()
            .is_empty());
    });
}

#[test]
fn test_where_on_float_index() {
    for_each_engine(|store| {
        let ids = store.create_many(&residents()).unwrap();
        let filter = Resident {
            money: 100.01,
            ..Default::default()
        };
        assert_eq!(store.where_ids(&filter).unwrap(), vec![ids[3].clone()]);
    });
}

#[test]
fn test_where_age_shared_across_addresses() {
    for_each_engine(|store| {
        let ids = store.create_many(&residents()).unwrap();
        let filter = Resident {
            age: 46,
            ..Default::default()
        };
        let mut expected = vec![ids[1].clone(), ids[3].clone()];
        expected.sort();
        assert_eq!(store.where_ids(&filter).unwrap(), expected);
    });
}

#[test]
fn test_where_without_matches() {
    for_each_engine(|store| {
        store.create_many(&residents()).unwrap();

        let filter = Resident {
            age: 25,
            ..at("St Leonards")
        };
        assert!(store.where_ids(&filter).unwrap().is_empty());
        assert!(store.where_ids(&at("St")).unwrap().is_empty());
        assert!(store.where_ids(&at("St Leonards Road")).unwrap().is_empty());
    });
}

#[test]
fn test_where_on_plain_field_matches_nothing() {
    for_each_engine(|store| {
        store.create_many(&residents()).unwrap();
        let filter = Resident {
            name: "Jim".into(),
            ..Default::default()
        };
        assert!(store.where_ids(&filter).unwrap().is_empty());
    });
}

#[test]
fn test_values_with_separator_do_not_collide() {
    for_each_engine(|store| {
        let a = store.create(&at("St")).unwrap();
        let b = store.create(&at("St:Leonards")).unwrap();

        assert_eq!(store.where_ids(&at("St")).unwrap(), vec![a]);
        assert_eq!(store.where_ids(&at("St:Leonards")).unwrap(), vec![b]);
    });
}

#[test]
fn test_select_unknown_field() {
    for_each_engine(|store| {
        store.create_many(&residents()).unwrap();
        let err = store
            .select::<Resident>(&at("Jersey St"), &["height"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    });
}
