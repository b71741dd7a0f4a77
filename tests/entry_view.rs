// Entry view integration suite.
//
// Invariants exercised:
// - Handle writes go straight to the map slot and are seen by get.
// - Sorting a collected copy of the handles orders the copy only.
// - Handles fail with StaleHandle after structural changes and with
//   ForeignHandle on another map; value writes keep them valid.
// - Entry cursors report ConcurrentModification after structural changes.
use chainmap::{ChainMap, CollectionError, EntryHandle};
use std::collections::BTreeSet;

// Test: write-through from the first handle of the view.
#[test]
fn set_value_writes_through() {
    let mut map = ChainMap::new();
    map.put(1, "one");

    let first = map.entries().next().expect("one entry");
    assert_eq!(first.set_value(&mut map, "1"), Ok("one"));
    assert_eq!(map.get(&1), Some(&"1"));
}

// Test: sort a copy of the entry view by key.
// Verifies: the copy is ordered; the map's own enumeration is unaffected.
#[test]
fn sorting_a_copy_of_entries() {
    let mut map = ChainMap::new();
    map.put(2, "two");
    map.put(1, "one");
    map.put(3, "three");

    let before: Vec<i32> = map.keys().copied().collect();

    let mut list: Vec<EntryHandle> = map.entries().collect();
    list.sort_by_key(|h| *h.key(&map).expect("fresh handle"));

    let keys: Vec<i32> = list.iter().map(|h| *h.key(&map).unwrap()).collect();
    assert_eq!(keys, vec![1, 2, 3]);
    assert_eq!(*list[0].value(&map).unwrap(), "one");

    let after: Vec<i32> = map.keys().copied().collect();
    assert_eq!(before, after, "sorting the copy leaves the map alone");
}

// Test: every entry appears once in each view, whatever the order.
#[test]
fn views_agree_on_entry_set() {
    let map: ChainMap<u32, u32> = (0..64).map(|i| (i, i * i)).collect();
    let a: BTreeSet<u32> = map.entries().map(|h| *h.key(&map).unwrap()).collect();
    let b: BTreeSet<u32> = map.entries().map(|h| *h.key(&map).unwrap()).collect();
    assert_eq!(a.len(), 64);
    assert_eq!(a, b);
}

// Test: handle lifecycle across value writes, inserts and removals.
#[test]
fn handles_go_stale_on_structural_change() {
    let mut map: ChainMap<String, u32> = ChainMap::new();
    map.put("a".into(), 1);
    map.put("b".into(), 2);
    let handles: Vec<EntryHandle> = map.entries().collect();

    // Value-only writes, from a handle or from the map, keep handles valid.
    handles[0].set_value(&mut map, 10).unwrap();
    map.replace("b", 20);
    map.put("a".into(), 11);
    assert!(handles.iter().all(|h| h.is_valid(&map)));

    // A new key is structural.
    map.put("c".into(), 3);
    for h in &handles {
        assert_eq!(h.value(&map), Err(CollectionError::StaleHandle));
        assert_eq!(h.set_value(&mut map, 0), Err(CollectionError::StaleHandle));
    }

    // Fresh handles work; a removal invalidates them again.
    let fresh: Vec<EntryHandle> = map.entries().collect();
    assert!(fresh.iter().all(|h| h.value(&map).is_ok()));
    map.remove("c");
    assert!(fresh.iter().all(|h| h.key(&map) == Err(CollectionError::StaleHandle)));

    assert_eq!(map.get("a"), Some(&11));
    assert_eq!(map.get("b"), Some(&20));
}

#[test]
fn handle_from_clone_source_is_foreign() {
    let mut map: ChainMap<u32, u32> = ChainMap::new();
    map.put(1, 1);
    let copy = map.clone();
    let h = map.entries().next().unwrap();
    assert_eq!(h.value(&copy), Err(CollectionError::ForeignHandle));
    assert_eq!(copy, map);
}

// Test: entry cursor survives value writes and aborts on removal.
#[test]
fn entry_cursor_concurrent_modification() {
    let mut map: ChainMap<u32, u32> = (0..10).map(|i| (i, i)).collect();
    let mut cursor = map.entry_cursor();

    let h = cursor.next(&map).unwrap().unwrap();
    h.set_value(&mut map, 100).unwrap();
    assert!(cursor.next(&map).unwrap().is_ok());

    map.remove(&5);
    assert!(matches!(
        cursor.next(&map),
        Some(Err(CollectionError::ConcurrentModification { .. }))
    ));
    assert!(cursor.next(&map).is_none());
}
