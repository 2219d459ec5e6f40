// Model-based checks of identity keys and container invariants.

use identity_collections::{key_of, HashSet, HashTable, LruBuffer};
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Clone, Debug)]
enum BufferOp {
    Add(u8),
    Update(u8),
    SetSize(usize),
}

fn buffer_ops_strategy() -> impl Strategy<Value = Vec<BufferOp>> {
    // a small key space keeps hits and refreshes frequent
    let key = 0u8..16;
    let op = prop_oneof![
        60 => key.clone().prop_map(BufferOp::Add),
        30 => key.prop_map(BufferOp::Update),
        10 => (1usize..8).prop_map(BufferOp::SetSize),
    ];
    prop::collection::vec(op, 0..=500)
}

#[derive(Clone, Debug)]
enum TableOp {
    Put(String, u32),
    Remove(String),
    Get(String),
}

fn table_ops_strategy() -> impl Strategy<Value = Vec<TableOp>> {
    let key = "[a-e]{1,2}";
    let op = prop_oneof![
        50 => (key, any::<u32>()).prop_map(|(k, v)| TableOp::Put(k, v)),
        25 => key.prop_map(TableOp::Remove),
        25 => key.prop_map(TableOp::Get),
    ];
    prop::collection::vec(op, 0..=300)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_identity_is_stable(a in any::<(i64, String, Vec<bool>)>()) {
        prop_assert_eq!(key_of(&a).unwrap(), key_of(&a.clone()).unwrap());
    }

    #[test]
    fn prop_identity_is_injective(
        a in any::<(i64, String, Vec<bool>)>(),
        b in any::<(i64, String, Vec<bool>)>(),
    ) {
        let same_key = key_of(&a).unwrap() == key_of(&b).unwrap();
        prop_assert_eq!(same_key, a == b);
    }

    #[test]
    fn prop_integer_identity_ignores_width(n in any::<i64>()) {
        prop_assert_eq!(key_of(&n).unwrap(), key_of(&(n as i128)).unwrap());
    }

    #[test]
    fn prop_buffer_matches_model(size in 1usize..8, ops in buffer_ops_strategy()) {
        let mut buffer = LruBuffer::new(size).unwrap();
        let mut model: VecDeque<u8> = VecDeque::new();
        let mut model_size = size;

        for op in ops {
            match op {
                BufferOp::Add(k) => {
                    model.retain(|&e| e != k);
                    model.push_back(k);
                    let expected = if model.len() > model_size {
                        model.pop_front()
                    } else {
                        None
                    };
                    prop_assert_eq!(buffer.add(k).unwrap(), expected);
                }
                BufferOp::Update(k) => {
                    model.retain(|&e| e != k);
                    model.push_back(k);
                    buffer.update(k).unwrap();
                }
                BufferOp::SetSize(n) => {
                    model_size = n;
                    buffer.set_size(n).unwrap();
                }
            }
            prop_assert_eq!(buffer.num_elements(), model.len());
        }

        let order: Vec<u8> = buffer.iter().copied().collect();
        prop_assert_eq!(order, model.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn prop_buffer_stays_within_size_under_adds(
        size in 1usize..16,
        keys in prop::collection::vec(any::<u16>(), 0..=400),
    ) {
        let mut buffer = LruBuffer::new(size).unwrap();
        for k in keys {
            buffer.add(k).unwrap();
            prop_assert!(buffer.num_elements() <= size);
        }
    }

    #[test]
    fn prop_table_matches_model(ops in table_ops_strategy()) {
        let mut table = HashTable::new();
        // insertion-ordered model
        let mut model: Vec<(String, u32)> = Vec::new();

        for op in ops {
            match op {
                TableOp::Put(k, v) => {
                    let old_m = match model.iter().position(|(mk, _)| *mk == k) {
                        Some(pos) => Some(std::mem::replace(&mut model[pos].1, v)),
                        None => {
                            model.push((k.clone(), v));
                            None
                        }
                    };
                    prop_assert_eq!(table.put(k, v).unwrap(), old_m);
                }
                TableOp::Remove(k) => {
                    let old_m = model
                        .iter()
                        .position(|(mk, _)| *mk == k)
                        .map(|pos| model.remove(pos).1);
                    prop_assert_eq!(table.remove(&k).unwrap(), old_m);
                }
                TableOp::Get(k) => {
                    let got_m = model.iter().find(|(mk, _)| *mk == k).map(|(_, v)| v);
                    prop_assert_eq!(table.get(&k).unwrap(), got_m);
                }
            }
        }

        let keys: Vec<&String> = model.iter().map(|(k, _)| k).collect();
        prop_assert_eq!(table.keys(), keys);
    }

    #[test]
    fn prop_set_add_is_idempotent(elements in prop::collection::vec(any::<i32>(), 0..=100)) {
        let mut once = HashSet::new();
        once.add_all(elements.clone()).unwrap();
        let mut twice = once.clone();
        let changed = twice.add_all(elements).unwrap();

        prop_assert!(!changed);
        prop_assert_eq!(once.len(), twice.len());
        prop_assert_eq!(once.hash_code(), twice.hash_code());
        prop_assert!(once == twice);
    }
}

#[test]
fn remove_then_reinsert_moves_to_end() {
    let mut table = HashTable::new();
    table.put("a", 1).unwrap();
    table.put("b", 2).unwrap();
    table.put("c", 3).unwrap();

    table.remove(&"a").unwrap();
    table.put("a", 4).unwrap();

    assert_eq!(table.keys(), vec![&"b", &"c", &"a"]);
}

#[test]
fn eviction_returns_the_least_recently_used() {
    let mut buffer = LruBuffer::new(3).unwrap();
    for item in ["A", "B", "C"] {
        assert_eq!(buffer.add(item).unwrap(), None);
    }
    buffer.update("A").unwrap();
    assert_eq!(buffer.add("D").unwrap(), Some("B"));
}
