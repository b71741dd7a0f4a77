use chainmap::{ChainMap, ChainSet};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

// Set membership: add returns true exactly once per distinct value while it
// stays a member, and contains agrees with a std model throughout.
proptest! {
    #[test]
    fn prop_set_add_true_once(values in proptest::collection::vec(0u16..64, 0..200)) {
        let mut set = ChainSet::new();
        let mut model = HashSet::new();
        for v in values {
            prop_assert_eq!(set.add(v), model.insert(v));
            prop_assert!(set.contains(&v));
        }
        prop_assert_eq!(set.len(), model.len());
        prop_assert_eq!(set.iter().count(), model.len());
        for v in &set {
            prop_assert!(model.contains(v));
        }
    }
}

// put_all: for every key in both maps the argument's value wins; keys only
// in the receiver keep their values.
proptest! {
    #[test]
    fn prop_put_all_other_wins(
        left in proptest::collection::hash_map(0u8..32, any::<i32>(), 0..24),
        right in proptest::collection::hash_map(0u8..32, any::<i32>(), 0..24),
    ) {
        let mut receiver: ChainMap<u8, i32> = left.iter().map(|(k, v)| (*k, *v)).collect();
        let other: ChainMap<u8, i32> = right.iter().map(|(k, v)| (*k, *v)).collect();
        receiver.put_all(&other);

        let mut expected: HashMap<u8, i32> = left.clone();
        expected.extend(right.iter().map(|(k, v)| (*k, *v)));

        prop_assert_eq!(receiver.len(), expected.len());
        for (k, v) in &expected {
            prop_assert_eq!(receiver.get(k), Some(v));
        }
        for (k, v) in &right {
            prop_assert_eq!(receiver.get(k), other.get(k));
            prop_assert_eq!(receiver.get(k), Some(v));
        }
    }
}

// Put twice: the second put returns the first value and the map reads the
// second one back.
proptest! {
    #[test]
    fn prop_put_overwrite(k in any::<u32>(), v1 in any::<i64>(), v2 in any::<i64>()) {
        let mut map = ChainMap::new();
        prop_assert_eq!(map.put(k, v1), None);
        prop_assert_eq!(map.put(k, v2), Some(v1));
        prop_assert_eq!(map.get(&k), Some(&v2));
        prop_assert_eq!(map.len(), 1);
    }
}

// replace_if_eq succeeds once and fails when repeated with the old value.
proptest! {
    #[test]
    fn prop_replace_if_eq_once(k in any::<u8>(), old in any::<i32>(), new in any::<i32>()) {
        prop_assume!(old != new);
        let mut map = ChainMap::new();
        map.put(k, old);
        prop_assert!(map.replace_if_eq(&k, &old, new));
        prop_assert!(!map.replace_if_eq(&k, &old, new));
        prop_assert_eq!(map.get(&k), Some(&new));
    }
}
