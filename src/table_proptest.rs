#![cfg(test)]

// Property tests for ChainMap kept inside the crate so they can inspect
// the backing table (bucket count, version) directly.

use crate::entry::EntryHandle;
use crate::error::CollectionError;
use crate::hash_map::ChainMap;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations so shrinking converges on a few keys.
#[derive(Clone, Debug)]
enum Op {
    Put(usize, i32),
    Remove(usize),
    Get(usize),
    Replace(usize, i32),
    ReplaceIfEq(usize, i32, i32),
    PutIfAbsent(usize, i32),
    Compute(usize, Option<i32>),
    ComputeIfAbsent(usize, i32),
    ReplaceAll(i32),
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Put(i, v)),
            idx.clone().prop_map(Op::Remove),
            idx.clone().prop_map(Op::Get),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Replace(i, v)),
            (idx.clone(), -2i32..2, any::<i32>()).prop_map(|(i, e, v)| Op::ReplaceIfEq(i, e, v)),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::PutIfAbsent(i, v)),
            (idx.clone(), proptest::option::of(any::<i32>())).prop_map(|(i, v)| Op::Compute(i, v)),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::ComputeIfAbsent(i, v)),
            any::<i32>().prop_map(Op::ReplaceAll),
            Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_against_model<S: BuildHasher>(
    mut sut: ChainMap<Key, i32, S>,
    pool: Vec<String>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Key, i32> = HashMap::new();
    let mut handles: Vec<(EntryHandle, u64)> = Vec::new();

    for op in ops {
        let before = sut.table.version();
        match op {
            Op::Put(i, v) => {
                let k = key_from(&pool, i);
                prop_assert_eq!(sut.put(k.clone(), v), model.insert(k, v));
            }
            Op::Remove(i) => {
                let k = key_from(&pool, i);
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
            }
            Op::Get(i) => {
                let k = key_from(&pool, i);
                prop_assert_eq!(sut.get(k.0.as_str()), model.get(&k));
            }
            Op::Replace(i, v) => {
                let k = key_from(&pool, i);
                let expected = model.get_mut(&k).map(|slot| std::mem::replace(slot, v));
                prop_assert_eq!(sut.replace(&k, v), expected);
            }
            Op::ReplaceIfEq(i, e, v) => {
                let k = key_from(&pool, i);
                let hit = model.get(&k) == Some(&e);
                if hit {
                    model.insert(k.clone(), v);
                }
                prop_assert_eq!(sut.replace_if_eq(&k, &e, v), hit);
            }
            Op::PutIfAbsent(i, v) => {
                let k = key_from(&pool, i);
                let existing = model.get(&k).copied();
                model.entry(k.clone()).or_insert(v);
                prop_assert_eq!(sut.put_if_absent(k, v).copied(), existing);
            }
            Op::Compute(i, out) => {
                let k = key_from(&pool, i);
                let seen = model.get(&k).copied();
                let mut observed = None;
                let got = sut
                    .compute(k.clone(), |_, cur| {
                        observed = Some(cur.copied());
                        out
                    })
                    .copied();
                prop_assert_eq!(observed, Some(seen));
                match out {
                    Some(v) => {
                        model.insert(k, v);
                    }
                    None => {
                        model.remove(&k);
                    }
                }
                prop_assert_eq!(got, out);
            }
            Op::ComputeIfAbsent(i, v) => {
                let k = key_from(&pool, i);
                let present = model.contains_key(&k);
                let mut calls = 0;
                let got = *sut.compute_if_absent(k.clone(), |_| {
                    calls += 1;
                    v
                });
                prop_assert_eq!(calls, usize::from(!present));
                prop_assert_eq!(got, *model.entry(k).or_insert(v));
            }
            Op::ReplaceAll(d) => {
                sut.replace_all(|_, v| v.wrapping_add(d));
                for v in model.values_mut() {
                    *v = v.wrapping_add(d);
                }
                prop_assert_eq!(sut.table.version(), before, "replace_all is not structural");
            }
            Op::Iterate => {
                let s: BTreeSet<(Key, i32)> =
                    sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let m: BTreeSet<(Key, i32)> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s, m);
                prop_assert_eq!(sut.entries().count(), model.len());
                if let Some(h) = sut.entries().next() {
                    handles.push((h, sut.table.version()));
                }
            }
        }

        // Post-conditions after each op
        // 1) Size parity and the load-factor bound.
        prop_assert_eq!(sut.len(), model.len());
        prop_assert!(sut.table.load_factor() <= sut.table.config().max_load_factor());
        // 2) Handles resolve exactly while the version they captured holds.
        for (h, minted_at) in &handles {
            if *minted_at == sut.table.version() {
                let (k, v) = h.get(&sut).expect("handle from the current version");
                prop_assert_eq!(model.get(k), Some(v));
            } else {
                prop_assert_eq!(h.value(&sut).err(), Some(CollectionError::StaleHandle));
            }
        }
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - put/remove/replace/put_if_absent return the model's prior state.
// - compute sees the current value and stores/removes per its result.
// - compute_if_absent calls its closure exactly when the key is absent.
// - Iteration yields each live entry exactly once.
// - The load factor never exceeds the configured maximum.
// - Entry handles resolve until the next structural change, then go stale.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_against_model(ChainMap::new(), pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_against_model(ChainMap::with_hasher(ConstBuildHasher), pool, ops)?;
    }
}

// Growth variant: a tiny load factor forces frequent relinking.
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_under_growth(
        (pool, ops) in arb_scenario(),
        lf in 0.05f32..=1.0,
    ) {
        let config = crate::config::TableConfig::new(0, lf).unwrap();
        run_against_model(ChainMap::with_config(config), pool, ops)?;
    }
}
