use std::collections::BTreeMap;

use avl_map::{AvlMap, CursorError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 5_000;

fn key_strategy() -> impl Strategy<Value = i64> {
    // Narrower than TEST_SIZE so inserts collide and removes hit.
    -2_000i64..2_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

/// Worst-case AVL height for `n` entries, 1.45 * log2(n + 2).
fn height_bound(n: usize) -> f64 {
    1.45 * ((n + 2) as f64).log2()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Erase(i64),
    Remove(i64),
    Find(i64),
    Get(i64),
    ContainsKey(i64),
    FirstKeyValue,
    LastKeyValue,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        6 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        2 => key_strategy().prop_map(MapOp::Erase),
        2 => key_strategy().prop_map(MapOp::Remove),
        2 => key_strategy().prop_map(MapOp::Find),
        1 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::ContainsKey),
        1 => Just(MapOp::FirstKeyValue),
        1 => Just(MapOp::LastKeyValue),
    ]
}

// ─── Core operations ─────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both AvlMap and BTreeMap
    /// and asserts identical results at every step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut avl: AvlMap<i64, i64> = AvlMap::new();
        let mut bt: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Insert(k, v) => {
                    prop_assert_eq!(avl.insert(*k, *v), bt.insert(*k, *v), "insert({}, {})", k, v);
                }
                MapOp::Erase(k) => {
                    avl.erase(k);
                    bt.remove(k);
                    prop_assert!(avl.find(k).is_end(), "erase({}) left the key behind", k);
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(avl.remove(k), bt.remove(k), "remove({})", k);
                }
                MapOp::Find(k) => {
                    let cursor = avl.find(k);
                    prop_assert_eq!(cursor.get(), bt.get_key_value(k), "find({})", k);
                    prop_assert_eq!(cursor == avl.end(), !bt.contains_key(k), "find({}) == end()", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(avl.get(k), bt.get(k), "get({})", k);
                }
                MapOp::ContainsKey(k) => {
                    prop_assert_eq!(avl.contains_key(k), bt.contains_key(k), "contains_key({})", k);
                }
                MapOp::FirstKeyValue => {
                    prop_assert_eq!(avl.first_key_value(), bt.first_key_value(), "first_key_value");
                }
                MapOp::LastKeyValue => {
                    prop_assert_eq!(avl.last_key_value(), bt.last_key_value(), "last_key_value");
                }
            }
            prop_assert_eq!(avl.len(), bt.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(avl.is_empty(), bt.is_empty(), "is_empty mismatch after {:?}", op);
            prop_assert!((avl.height() as f64) <= height_bound(avl.len()), "too tall after {:?}", op);
        }
    }

    /// Iteration is strictly ascending and matches BTreeMap in both directions.
    #[test]
    fn iter_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let avl: AvlMap<i64, i64> = entries.iter().copied().collect();
        let bt: BTreeMap<i64, i64> = entries.iter().copied().collect();

        let avl_items: Vec<_> = avl.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&avl_items, &bt_items, "iter() mismatch");
        prop_assert!(avl_items.windows(2).all(|pair| pair[0].0 < pair[1].0), "keys not strictly ascending");

        let avl_rev: Vec<_> = avl.iter().rev().map(|(&k, &v)| (k, v)).collect();
        let bt_rev: Vec<_> = bt.iter().rev().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&avl_rev, &bt_rev, "iter().rev() mismatch");

        let avl_keys: Vec<_> = avl.keys().copied().collect();
        let bt_keys: Vec<_> = bt.keys().copied().collect();
        prop_assert_eq!(&avl_keys, &bt_keys, "keys() mismatch");

        let avl_vals: Vec<_> = avl.values().copied().collect();
        let bt_vals: Vec<_> = bt.values().copied().collect();
        prop_assert_eq!(&avl_vals, &bt_vals, "values() mismatch");

        prop_assert_eq!(avl.iter().len(), bt.len());

        let avl_into: Vec<_> = avl.clone().into_iter().collect();
        let bt_into: Vec<_> = bt.into_iter().collect();
        prop_assert_eq!(&avl_into, &bt_into, "into_iter() mismatch");
    }

    /// Every inserted key is found with the last value assigned to it, and
    /// erased keys are gone.
    #[test]
    fn find_round_trips(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE),
        erase_every in 2usize..5,
    ) {
        let mut avl = AvlMap::new();
        let mut last = BTreeMap::new();
        for &(k, v) in &entries {
            avl.insert(k, v);
            last.insert(k, v);
        }

        for (&k, v) in &last {
            let cursor = avl.find(&k);
            prop_assert_eq!(cursor.key(), &k);
            prop_assert_eq!(cursor.value(), v);
        }

        let erased: Vec<i64> = last.keys().copied().step_by(erase_every).collect();
        for k in &erased {
            avl.erase(k);
        }
        prop_assert_eq!(avl.len(), last.len() - erased.len());
        for k in &erased {
            prop_assert_eq!(avl.find(k), avl.end());
        }
    }

    /// Sorted input is the adversarial case for an unbalanced tree.
    #[test]
    fn sorted_inserts_stay_within_bound(len in 1usize..4_000, descending in any::<bool>()) {
        let mut avl = AvlMap::new();
        for i in 0..len {
            let key = if descending { len - i } else { i };
            avl.insert(key, key);
        }
        prop_assert_eq!(avl.len(), len);
        prop_assert!((avl.height() as f64) <= height_bound(len), "height {} for {} keys", avl.height(), len);
    }

    /// Clearing an arbitrary map empties it and leaves it reusable.
    #[test]
    fn clear_empties_map(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let mut avl: AvlMap<i64, i64> = entries.into_iter().collect();
        avl.clear();
        prop_assert!(avl.is_empty());
        prop_assert_eq!(avl.len(), 0);
        prop_assert_eq!(avl.height(), 0);
        prop_assert_eq!(avl.iter().next(), None);

        avl.insert(1, 1);
        prop_assert_eq!(avl.get(&1), Some(&1));
    }
}

// ─── Concrete scenarios ──────────────────────────────────────────────────────

fn names() -> [(i32, &'static str); 7] {
    [
        (50, "Fifty"),
        (25, "Twenty-Five"),
        (75, "Seventy-Five"),
        (10, "Ten"),
        (30, "Thirty"),
        (60, "Sixty"),
        (80, "Eighty"),
    ]
}

#[test]
fn three_ascending_keys_balance() {
    let mut tree = AvlMap::new();
    tree.insert(10, "Ten");
    tree.insert(20, "Twenty");
    tree.insert(30, "Thirty");

    assert_eq!(tree.len(), 3);
    assert_eq!(tree.height(), 2);
    assert_eq!(*tree.find(&10), "Ten");
    assert_eq!(*tree.find(&20), "Twenty");
    assert_eq!(*tree.find(&30), "Thirty");
}

#[test]
fn zig_zag_keys_balance() {
    for order in [[30, 10, 20], [10, 30, 20], [30, 20, 10]] {
        let tree: AvlMap<i32, ()> = order.iter().map(|&k| (k, ())).collect();
        assert_eq!(tree.height(), 2, "insert order {order:?}");
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), [10, 20, 30]);
    }
}

#[test]
fn erase_leaf_and_inner_node() {
    let mut tree = AvlMap::from(names());

    tree.erase(&10);
    tree.erase(&25);

    assert_eq!(tree.len(), 5);
    assert!(tree.find(&10).is_end());
    assert!(tree.find(&25).is_end());
    for key in [30, 50, 60, 75, 80] {
        assert_ne!(tree.find(&key), tree.end(), "{key} went missing");
    }
}

#[test]
fn erase_two_child_node_first() {
    let mut tree = AvlMap::from(names());
    assert_eq!(tree.remove(&25), Some("Twenty-Five"));
    assert_eq!(tree.len(), 6);
    assert_eq!(tree.keys().copied().collect::<Vec<_>>(), [10, 30, 50, 60, 75, 80]);
    assert_eq!(tree.get(&30), Some(&"Thirty"));
}

#[test]
fn erase_missing_key_is_a_no_op() {
    let mut tree = AvlMap::from(names());
    let before = tree.clone();
    tree.erase(&99);
    tree.erase(&-1);
    assert_eq!(tree, before);

    let mut empty: AvlMap<i32, i32> = AvlMap::new();
    empty.erase(&1);
    assert!(empty.is_empty());
}

#[test]
fn overwrite_keeps_size() {
    let mut tree = AvlMap::new();
    tree.insert(10, "A");
    tree.insert(10, "B");
    assert_eq!(tree.len(), 1);
    assert_eq!(*tree.find(&10), "B");
}

#[test]
fn ascending_thousand() {
    let mut tree = AvlMap::new();
    for i in 1..=1000 {
        tree.insert(i, i * 10);
    }
    assert_eq!(tree.len(), 1000);
    assert!(tree.height() <= 15, "height {}", tree.height());

    // Deterministic scatter over all keys.
    let mut key: u64 = 1;
    for _ in 0..1000 {
        key = (key * 7919) % 1009;
        if (1..=1000).contains(&key) {
            assert_eq!(tree.get(&key), Some(&(key * 10)));
        }
    }
    for i in 1..=1000 {
        assert_eq!(*tree.find(&i), i * 10);
    }
}

#[test]
fn size_counts_distinct_keys() {
    let mut tree = AvlMap::new();
    for k in [5, 3, 5, 8, 3, 1] {
        tree.insert(k, ());
    }
    assert_eq!(tree.len(), 4);
    tree.erase(&3);
    tree.erase(&3);
    assert_eq!(tree.len(), 3);
}

#[test]
fn drain_everything() {
    let mut tree: AvlMap<u32, u32> = (0..500).map(|k| (k, k)).collect();
    for k in (0..500).rev() {
        assert_eq!(tree.remove(&k), Some(k));
    }
    assert!(tree.is_empty());
    assert_eq!(tree.height(), 0);
}

// ─── Cursor ──────────────────────────────────────────────────────────────────

#[test]
fn cursor_accessors() {
    let tree = AvlMap::from([(1, "one"), (2, "two")]);

    let found = tree.find(&2);
    assert!(!found.is_end());
    assert_eq!(found.key(), &2);
    assert_eq!(found.value(), &"two");
    assert_eq!(found.try_key(), Ok(&2));
    assert_eq!(found.get(), Some((&2, &"two")));
    assert_eq!(format!("{found:?}"), r#"Cursor(2, "two")"#);

    let missing = tree.find(&3);
    assert!(missing.is_end());
    assert_eq!(missing, tree.end());
    assert_eq!(missing.get(), None);
    assert_eq!(missing.try_key(), Err(CursorError::NotFound));
    assert_eq!(missing.try_value(), Err(CursorError::NotFound));
    assert_eq!(format!("{missing:?}"), "Cursor(end)");
    assert_eq!(CursorError::NotFound.to_string(), "dereference of not-found cursor");
}

#[test]
#[should_panic(expected = "dereference of not-found cursor")]
fn deref_end_cursor_panics() {
    let tree: AvlMap<i32, i32> = AvlMap::new();
    let cursor = tree.find(&1);
    let _value: i32 = *cursor;
}

#[test]
#[should_panic(expected = "dereference of not-found cursor")]
fn key_of_end_cursor_panics() {
    let tree = AvlMap::from([(1, 1)]);
    let _ = tree.end().key();
}

// ─── Trait impls ─────────────────────────────────────────────────────────────

#[test]
fn debug_and_equality() {
    let a = AvlMap::from([(2, 'b'), (1, 'a')]);
    let b: AvlMap<i32, char> = [(1, 'a'), (2, 'b')].into_iter().collect();
    assert_eq!(a, b);
    assert_eq!(format!("{a:?}"), "{1: 'a', 2: 'b'}");
    assert_eq!(AvlMap::<i32, char>::default(), AvlMap::new());

    let mut c = a.clone();
    c.extend([(&3, &'c')]);
    assert!(a < c);
    assert_eq!(c[&3], 'c');
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_missing_key_panics() {
    let tree = AvlMap::from([(1, 1)]);
    let _value: i32 = tree[&2];
}

#[test]
fn get_mut_updates_in_place() {
    let mut tree = AvlMap::from([("a", 1), ("b", 2)]);
    *tree.get_mut("b").unwrap() += 40;
    assert_eq!(tree["b"], 42);
    assert_eq!(tree.get_mut("z"), None);
    assert_eq!(tree.remove_entry("a"), Some(("a", 1)));
}

#[test]
fn map_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AvlMap<String, Vec<u8>>>();
}
