#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can check the
// bucket-placement invariants on private state after every operation.

use crate::hash::BucketHasher;
use crate::table::tests::check_invariants;
use crate::table::{HashTable, MIN_CAPACITY};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
    CursorRemove(usize),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,6}", 1..=48).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![contains_pool, "[a-z]{0,6}"].prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Iterate),
            1 => idx.clone().prop_map(OpI::CursorRemove),
        ];
        proptest::collection::vec(op, 1..200).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_scenario<H: BucketHasher>(
    mut sut: HashTable<i32, H>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let prev = sut.insert(k, v).expect("allocation");
                prop_assert_eq!(prev, model.insert(k.clone(), v));
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let got = sut.remove(k).expect("allocation");
                prop_assert_eq!(got, model.remove(k));
                prop_assert!(!sut.contains(k));
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains(&s), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(v) = sut.get_mut(k) {
                    *v = v.saturating_add(d);
                }
                if let Some(v) = model.get_mut(k) {
                    *v = v.saturating_add(d);
                }
            }
            OpI::Iterate => {
                let walked: Vec<Vec<u8>> = sut.iter().map(|(k, _)| k.to_vec()).collect();
                let s_keys: BTreeSet<Vec<u8>> = walked.iter().cloned().collect();
                let m_keys: BTreeSet<Vec<u8>> =
                    model.keys().map(|k| k.as_bytes().to_vec()).collect();
                prop_assert_eq!(walked.len(), s_keys.len(), "a key was yielded twice");
                prop_assert_eq!(s_keys, m_keys);
            }
            OpI::CursorRemove(i) => {
                // Delete the pool key through a cursor walk instead of `remove`.
                let target = pool[i].as_bytes();
                let capacity = sut.capacity();
                let mut cursor = sut.cursor_mut();
                let mut taken = None;
                while !cursor.at_end() {
                    if cursor.current_key() == Some(target) {
                        taken = cursor.remove_current().map(|(_, v)| v);
                        break;
                    }
                    cursor.advance();
                }
                drop(cursor);
                prop_assert_eq!(taken, model.remove(&pool[i]));
                prop_assert_eq!(sut.capacity(), capacity);
            }
        }

        check_invariants(&sut);
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.capacity() >= MIN_CAPACITY);
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - insert returns the displaced value exactly when the key existed.
// - remove/get/contains agree with the model by key content.
// - iteration yields each live key exactly once.
// - every entry sits in the bucket its key hashes to, across resizes.
// - cursor removal deletes one entry and never resizes.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(HashTable::new(), &pool, ops)?;
    }
}

// Worst-case collisions: every key lands in one bucket.
struct ConstHasher;
impl BucketHasher for ConstHasher {
    fn hash_bytes(&self, _key: &[u8]) -> u32 {
        0
    }
}

// Property: Same state-machine invariants as above with one long chain,
// stressing content equality and cursor unlinking inside a single bucket.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(HashTable::with_hasher(ConstHasher), &pool, ops)?;
    }
}
