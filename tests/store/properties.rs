//! Property tests: whatever goes in comes back out

use crate::common::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_create_read_round_trip(
        address in ".*",
        name in "[a-zA-Z :\\\\]{0,16}",
        universe in any::<i64>(),
        age in any::<i32>(),
        money in any::<f64>().prop_filter("NaN never compares equal", |m| !m.is_nan()),
        range in proptest::collection::vec(any::<u8>(), 0..32),
        nickname in proptest::option::of(".{0,8}"),
    ) {
        let test_store = TestStore::memory();
        let record = Resident {
            address,
            name,
            universe,
            age,
            range,
            money,
            nickname,
            ..Default::default()
        };
        let id = test_store.store.create(&record).unwrap();
        let got: Vec<Resident> = test_store.store.read(&[], &[id.as_str()]).unwrap();
        prop_assert_eq!(&got[0], &Resident { id: id.clone(), ..record.clone() });

        let filter = Resident {
            address: record.address.clone(),
            age: record.age,
            ..Default::default()
        };
        let matched = test_store.store.where_ids(&filter).unwrap();
        if record.address.is_empty() && record.age == 0 {
            prop_assert!(matched.is_empty());
        } else {
            prop_assert_eq!(matched, vec![id]);
        }
    }
}
