#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can
// check structural invariants that the public API does not expose.

use crate::chained_hash_map::ChainedHashMap;
use crate::hash::{HashStrategy, KeyHasher};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Put(usize, i32),
    Get(usize),
    Contains(String),
    Remove(usize),
    Mutate(usize, i32),
    Resize(usize),
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,6}", 1..=10).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Put(i, v)),
            2 => idx.clone().prop_map(Op::Get),
            2 => prop_oneof![contains_pool, "[a-z]{0,6}"].prop_map(Op::Contains),
            2 => idx.clone().prop_map(Op::Remove),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => (1usize..=17).prop_map(Op::Resize),
            1 => Just(Op::Clear),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Drives `sut` and a BTreeMap model through `ops`, checking after every
// step that:
// - `len` equals the number of distinct live keys, and the load factor is
//   exactly `len / capacity`;
// - `put` returns the previous value iff the key was present;
// - `get`/`contains_key`/`remove` agree with the model;
// - `resize_table` preserves every pair and the size;
// - `clear` empties every bucket but keeps the capacity;
// - the structure is sound (every node reachable once, from the bucket its
//   hash selects, chain lengths in sync).
fn run<H>(
    mut sut: ChainedHashMap<String, i32, H>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError>
where
    H: KeyHasher<String> + KeyHasher<str>,
{
    let mut model: BTreeMap<String, i32> = BTreeMap::new();
    for op in ops {
        match op {
            Op::Put(i, v) => {
                let k = pool[i].clone();
                let prev = sut.put(k.clone(), v);
                prop_assert_eq!(prev, model.insert(k, v));
            }
            Op::Get(i) => {
                let k = pool[i].as_str();
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            Op::Contains(s) => {
                prop_assert_eq!(sut.contains_key(s.as_str()), model.contains_key(&s));
            }
            Op::Remove(i) => {
                let k = pool[i].as_str();
                prop_assert_eq!(sut.remove(k), model.remove(k));
                prop_assert!(!sut.contains_key(k));
            }
            Op::Mutate(i, d) => {
                let k = pool[i].as_str();
                match (sut.get_mut(k), model.get_mut(k)) {
                    (Some(sv), Some(mv)) => {
                        *sv = sv.wrapping_add(d);
                        *mv = mv.wrapping_add(d);
                    }
                    (None, None) => {}
                    _ => prop_assert!(false, "get_mut presence diverged for {:?}", k),
                }
            }
            Op::Resize(cap) => {
                let before = sut.len();
                sut.resize_table(cap).expect("non-zero capacity");
                prop_assert_eq!(sut.capacity(), cap);
                prop_assert_eq!(sut.len(), before);
                for (k, v) in &model {
                    prop_assert_eq!(sut.get(k.as_str()), Some(v));
                }
            }
            Op::Clear => {
                let cap = sut.capacity();
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), cap);
                prop_assert_eq!(sut.empty_buckets(), cap);
            }
            Op::Iterate => {
                let s: BTreeMap<String, i32> =
                    sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(&s, &model);
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        let expected_load = model.len() as f64 / sut.capacity() as f64;
        prop_assert!((sut.table_load() - expected_load).abs() < 1e-12);
        let chained: usize = (0..sut.capacity()).filter_map(|i| sut.bucket_len(i)).sum();
        prop_assert_eq!(chained, model.len());
        sut.assert_invariants();
    }

    let keys: BTreeSet<&String> = sut.keys().collect();
    let model_keys: BTreeSet<&String> = model.keys().collect();
    prop_assert_eq!(keys, model_keys);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_state_machine_char_sum((pool, ops) in arb_scenario(), cap in 1usize..=13) {
        let sut = ChainedHashMap::new(cap, HashStrategy::CharSum).unwrap();
        run(sut, &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_position_weighted((pool, ops) in arb_scenario(), cap in 1usize..=13) {
        let sut = ChainedHashMap::new(cap, HashStrategy::PositionWeighted).unwrap();
        run(sut, &pool, ops)?;
    }
}

// Every key hashes to the same bucket: all entries share one chain, which
// stresses equality scanning and mid-chain removal.
#[derive(Clone, Copy)]
struct ConstHash;
impl<Q: ?Sized> KeyHasher<Q> for ConstHash {
    fn hash_key(&self, _key: &Q) -> u64 {
        7
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario(), cap in 1usize..=13) {
        let sut = ChainedHashMap::new(cap, ConstHash).unwrap();
        run(sut, &pool, ops)?;
    }

    // Property: repeated puts of one key converge to the last value and
    // grow the map by at most one entry.
    #[test]
    fn prop_put_converges_to_last_value(key in "[a-z]{1,8}", values in proptest::collection::vec(any::<i32>(), 1..20)) {
        let mut m: ChainedHashMap<String, i32> = ChainedHashMap::with_capacity(3).unwrap();
        m.put("other".to_string(), 0);
        for &v in &values {
            m.put(key.clone(), v);
        }
        prop_assert_eq!(m.get(key.as_str()), values.last());
        let expected = if key == "other" { 1 } else { 2 };
        prop_assert_eq!(m.len(), expected);
    }
}
