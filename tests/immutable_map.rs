// ImmutableMap integration suite.
//
// Invariants exercised:
// - A singleton view reads back exactly its one pair.
// - Every mutator fails with UnsupportedMutation and changes nothing.
use chainmap::{AssocMap, ChainMap, CollectionError};

fn assert_unsupported<T: std::fmt::Debug>(r: Result<T, CollectionError>, op: &str) {
    match r {
        Err(CollectionError::UnsupportedMutation { op: got }) => assert_eq!(got, op),
        other => panic!("{op} should be rejected, got {:?}", other),
    }
}

#[test]
fn singleton_reads() {
    let map = ChainMap::singleton_immutable(1, "one");
    assert_eq!(map.get(&1), Some(&"one"));
    assert_eq!(map.get(&2), None);
    assert_eq!(*map.get_or_default(&2, &"none"), "none");
    assert!(map.contains_key(&1));
    assert_eq!(map.len(), 1);
    assert_eq!(map.iter().collect::<Vec<_>>(), vec![(&1, &"one")]);
}

#[test]
fn singleton_rejects_every_mutation() {
    let mut map = ChainMap::singleton_immutable(1, "one");
    let other: ChainMap<i32, &str> = [(2, "two")].into_iter().collect();

    assert_unsupported(map.put(1, "uno"), "put");
    assert_unsupported(map.put_if_absent(2, "two"), "put_if_absent");
    assert_unsupported(map.put_all(&other), "put_all");
    assert_unsupported(map.replace(&1, "uno"), "replace");
    assert_unsupported(map.replace_if_eq(&1, &"one", "uno"), "replace_if_eq");
    assert_unsupported(map.replace_all(|_, v| *v), "replace_all");
    assert_unsupported(map.compute(1, |_, _| None), "compute");
    assert_unsupported(map.compute_if_absent(2, |_| "two"), "compute_if_absent");
    assert_unsupported(map.remove(&1), "remove");
    assert_unsupported(map.clear(), "clear");

    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&1), Some(&"one"));
}

#[test]
fn frozen_map_through_trait() {
    let mut live: ChainMap<String, u32> = ChainMap::new();
    live.put("a".into(), 1);
    assert_eq!(live.try_put("b".into(), 2), Ok(None));

    let mut frozen = live.into_immutable();
    assert_unsupported(frozen.try_put("c".into(), 3), "put");
    assert_eq!(AssocMap::len(&frozen), 2);
    assert_eq!(frozen.as_map().get("b"), Some(&2));
}
