//! Pagination in creation order

use crate::common::*;

fn counters(n: u64) -> Vec<Counter> {
    (1..=n)
        .map(|count| Counter {
            name: "Ruslan".into(),
            age: 46,
            count,
            ..Default::default()
        })
        .collect()
}

#[test]
fn test_take_first_n() {
    for_each_engine(|store| {
        store.create_many(&counters(5)).unwrap();

        for n in 1..=5 {
            let page: Vec<Counter> = store.take(&["name", "count"], None, n).unwrap();
            assert_eq!(page.len(), n);
            for (i, c) in page.iter().enumerate() {
                assert_eq!(c.name, "Ruslan");
                assert_eq!(c.count, i as u64 + 1);
                assert_eq!(c.age, 0);
            }
        }
    });
}

#[test]
fn test_take_resumes_after_id() {
    for_each_engine(|store| {
        store.create_many(&counters(5)).unwrap();

        let first: Vec<Counter> = store.take(&[], None, 3).unwrap();
        let after = first[2].id.clone();

        let next: Vec<Counter> = store.take(&[], Some(after.as_str()), 2).unwrap();
        let counts: Vec<u64> = next.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![4, 5]);
        assert!(next.iter().all(|c| c.age == 46));
    });
}

#[test]
fn test_take_walks_all_pages_without_gaps() {
    for_each_engine(|store| {
        store.create_many(&counters(11)).unwrap();

        let mut seen = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let page: Vec<Counter> = store.take(&["count"], after.as_deref(), 3).unwrap();
            if page.is_empty() {
                break;
            }
            after = page.last().map(|c| c.id.clone());
            seen.extend(page.into_iter().map(|c| c.count));
        }
        assert_eq!(seen, (1..=11).collect::<Vec<u64>>());
    });
}

#[test]
fn test_take_with_custom_generator() {
    let store = Store::builder()
        .schema(SCHEMA)
        .in_memory()
        .id_generator(SequentialIds::default())
        .open()
        .unwrap();
    let ids = store.create_many(&counters(3)).unwrap();
    assert_eq!(ids, vec!["00000001", "00000002", "00000003"]);

    let page: Vec<Counter> = store.take(&[], Some("00000001"), 5).unwrap();
    let page_ids: Vec<&str> = page.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(page_ids, vec!["00000002", "00000003"]);
}

#[test]
fn test_take_ignores_other_tables() {
    for_each_engine(|store| {
        store.create_many(&counters(2)).unwrap();
        store.create_many(&residents()).unwrap();

        assert_eq!(store.take::<Counter>(&[], None, 10).unwrap().len(), 2);
        assert_eq!(store.take::<Resident>(&[], None, 10).unwrap().len(), 4);
    });
}

#[test]
fn test_take_empty_store() {
    for_each_engine(|store| {
        assert!(store.take::<Counter>(&[], None, 10).unwrap().is_empty());
        assert!(store.take::<Counter>(&[], Some(""), 10).unwrap().is_empty());
    });
}
