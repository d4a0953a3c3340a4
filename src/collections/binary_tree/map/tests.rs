#![cfg(test)]

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use super::*;
use crate::collections::binary_tree::{
    InvalidPosition, LinkedBinaryTree, Position, PositionFault, Side,
};
use crate::util::alloc::DropCounter;

/// Inserts the keys 5, 3, 8, 1 and 4, each with its name as the value.
fn sample() -> TreeMap<u32, &'static str> {
    let mut map = TreeMap::new();
    for (key, value) in [(5, "five"), (3, "three"), (8, "eight"), (1, "one"), (4, "four")] {
        map.set(key, value);
    }
    map
}

/// Checks the parent links and the binary search tree order of the whole map, returning its keys
/// in order.
fn check_invariants<K: Ord + Clone, V, R>(map: &TreeMap<K, V, R>) -> Vec<K> {
    let tree = map.tree();
    for position in tree.preorder() {
        for child in tree.children(position).unwrap() {
            assert_eq!(tree.parent(child), Ok(Some(position)), "Parent links must point back.");
        }
    }

    let keys: Vec<K> = tree.inorder().map(|p| tree[p].key.clone()).collect();
    assert!(
        keys.windows(2).all(|w| w[0] < w[1]),
        "An in-order walk of the tree must produce strictly ascending keys."
    );
    assert_eq!(keys.len(), map.len());
    keys
}

/// Moves every accessed position to the root, by repeated rotation.
#[derive(Debug, Default)]
struct MoveToRoot {
    accesses: Vec<Position>,
}

impl<K, V> Rebalance<K, V> for MoveToRoot {
    fn on_access(&mut self, tree: &mut LinkedBinaryTree<Item<K, V>>, position: Position) {
        self.accesses.push(position);
        while tree.rotate(position).is_ok() {}
    }
}

#[test]
fn test_ordered_iteration() {
    let map = sample();
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 8]);
    assert_eq!(
        map.values().copied().collect::<Vec<_>>(),
        ["one", "three", "four", "five", "eight"]
    );
    assert_eq!(map.keys().rev().copied().collect::<Vec<_>>(), [8, 5, 4, 3, 1]);
    assert_eq!(map.iter().len(), 5);
    assert_eq!(check_invariants(&map), [1, 3, 4, 5, 8]);

    let mut iter = map.keys();
    assert_eq!(iter.next(), Some(&1));
    assert_eq!(iter.next_back(), Some(&8));
    assert_eq!(iter.next_back(), Some(&5));
    assert_eq!(iter.next(), Some(&3));
    assert_eq!(iter.next(), Some(&4));
    assert_eq!(iter.next(), None, "The ends of a double-ended iteration shouldn't cross.");
    assert_eq!(iter.next_back(), None);
}

#[test]
fn test_find_ge() {
    let mut map = sample();
    assert_eq!(map.find_ge(&6), Some((&8, &"eight")));
    assert_eq!(map.find_ge(&4), Some((&4, &"four")), "An exact match should be returned.");
    assert_eq!(map.find_ge(&0), Some((&1, &"one")));
    assert_eq!(map.find_ge(&9), None);
}

#[test]
fn test_find_neighbours() {
    let mut map = sample();
    assert_eq!(map.find_min(), Some((&1, &"one")));
    assert_eq!(map.find_max(), Some((&8, &"eight")));

    assert_eq!(map.find_gt(&4), Some((&5, &"five")));
    assert_eq!(map.find_gt(&8), None);
    assert_eq!(map.find_le(&4), Some((&4, &"four")));
    assert_eq!(map.find_le(&7), Some((&5, &"five")));
    assert_eq!(map.find_le(&0), None);
    assert_eq!(map.find_lt(&4), Some((&3, &"three")));
    assert_eq!(map.find_lt(&1), None);
    assert_eq!(map.find_lt(&100), Some((&8, &"eight")));

    let mut empty = TreeMap::<u32, ()>::new();
    assert_eq!(empty.find_min(), None);
    assert_eq!(empty.find_ge(&0), None);
    assert_eq!(empty.find_position(&0), None);
    assert_eq!(empty.first(), None);
}

#[test]
fn test_find_range() {
    let mut map = sample();
    assert_eq!(
        map.find_range(Some(&3), Some(&8)).collect::<Vec<_>>(),
        [(&3, &"three"), (&4, &"four"), (&5, &"five")]
    );

    let keys = |map: &mut TreeMap<u32, &'static str>, start: Option<u32>, stop: Option<u32>| {
        map.find_range(start.as_ref(), stop.as_ref())
            .map(|e| *e.0)
            .collect::<Vec<_>>()
    };
    assert_eq!(keys(&mut map, None, None), [1, 3, 4, 5, 8]);
    assert_eq!(keys(&mut map, Some(2), None), [3, 4, 5, 8]);
    assert_eq!(keys(&mut map, None, Some(4)), [1, 3], "The stop key is excluded.");
    assert_eq!(keys(&mut map, Some(4), Some(4)), Vec::<u32>::new(), "An empty range yields nothing.");
    assert_eq!(keys(&mut map, Some(6), Some(2)), Vec::<u32>::new());
    assert_eq!(keys(&mut map, Some(9), None), Vec::<u32>::new());

    let mut empty = TreeMap::<u32, &'static str>::new();
    assert_eq!(keys(&mut empty, None, None), Vec::<u32>::new());
    assert_eq!(keys(&mut empty, Some(1), Some(5)), Vec::<u32>::new());
}

#[test]
fn test_get() {
    let mut map = sample();
    assert_eq!(map.get(&4), Ok(&"four"));
    assert_eq!(map.get(&99), Err(KeyNotFound));
    assert_eq!(map.get(&2), Err(KeyNotFound));
    assert!(map.contains_key(&8));
    assert!(!map.contains_key(&7));

    *map.get_mut(&4).unwrap() = "FOUR";
    assert_eq!(map.get(&4), Ok(&"FOUR"));
    assert_eq!(map.get_mut(&6), Err(KeyNotFound));

    let mut empty = TreeMap::<u32, ()>::new();
    assert_eq!(empty.get(&1), Err(KeyNotFound), "Lookups in an empty map should fail too.");
}

#[test]
fn test_borrowed_keys() {
    let mut map = TreeMap::new();
    map.set(String::from("banana"), 2);
    map.set(String::from("apple"), 1);
    map.set(String::from("cherry"), 3);

    assert_eq!(map.get("apple"), Ok(&1));
    assert_eq!(map.find_ge("b"), Some((&String::from("banana"), &2)));
    assert_eq!(map.remove("cherry"), Some(3));
    assert_eq!(
        map.find_range(Some("a"), Some("b")).count(),
        1,
        "Ranges should accept borrowed bounds."
    );
}

#[test]
fn test_set() {
    let mut map = sample();
    assert_eq!(map.set(4, "quatre"), Some("four"), "Setting a key should return the old value.");
    assert_eq!(map.get(&4), Ok(&"quatre"));
    assert_eq!(map.set(4, "quatre"), Some("quatre"));
    assert_eq!(map.len(), 5, "Overwriting shouldn't change the number of entries.");

    let position = map.find_position(&4).unwrap();
    map.set(4, "vier");
    assert_eq!(
        map.value(position),
        Ok(&"vier"),
        "An overwrite should happen in place, keeping the position valid."
    );

    assert_eq!(map.set(2, "two"), None);
    assert_eq!(map.len(), 6);
    assert_eq!(check_invariants(&map), [1, 2, 3, 4, 5, 8]);
}

#[test]
fn test_positions() {
    let mut map = sample();
    let first = map.first().unwrap();
    let last = map.last().unwrap();
    assert_eq!(map.key(first), Ok(&1));
    assert_eq!(map.key(last), Ok(&8));
    assert_eq!(map.before(first), Ok(None));
    assert_eq!(map.after(last), Ok(None));

    let mut positions = vec![first];
    while let Some(next) = map.after(*positions.last().unwrap()).unwrap() {
        positions.push(next);
    }
    assert_eq!(
        positions.iter().map(|&p| *map.key(p).unwrap()).collect::<Vec<_>>(),
        [1, 3, 4, 5, 8]
    );
    for pair in positions.windows(2) {
        assert_eq!(map.after(pair[0]), Ok(Some(pair[1])));
        assert_eq!(map.before(pair[1]), Ok(Some(pair[0])), "Before should mirror after.");
    }

    let probe = map.find_position(&6).unwrap();
    assert!(
        [5, 8].contains(map.key(probe).unwrap()),
        "A missed probe should land on a neighbouring key."
    );

    *map.value_mut(first).unwrap() = "uno";
    assert_eq!(map.get(&1), Ok(&"uno"));

    let other = sample();
    assert_eq!(
        other.key(first),
        Err(InvalidPosition {
            fault: PositionFault::ForeignTree
        })
    );
}

#[test]
fn test_delete_leaf() {
    let mut map = sample();
    let four = map.find_position(&4).unwrap();
    assert_eq!(map.tree().num_children(four), Ok(0));

    assert_eq!(map.delete(four), Ok((4, "four")));
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 3, 5, 8]);
    assert_eq!(map.len(), 4);

    let deleted = InvalidPosition {
        fault: PositionFault::Deleted,
    };
    assert_eq!(map.key(four), Err(deleted));
    assert_eq!(map.after(four), Err(deleted));
    assert_eq!(map.delete(four), Err(deleted));
}

#[test]
fn test_delete_two_children() {
    let mut map: TreeMap<u32, u32> = [50, 30, 70, 20, 40, 60, 80, 35, 45]
        .into_iter()
        .map(|k| (k, k))
        .collect();
    let positions: Vec<(u32, Position)> = map
        .keys()
        .copied()
        .collect::<Vec<_>>()
        .into_iter()
        .map(|k| (k, map.find_position(&k).unwrap()))
        .collect();

    let root = map.tree().root().unwrap();
    assert_eq!(map.key(root), Ok(&50));
    assert_eq!(map.delete(root), Ok((50, 50)));
    assert_eq!(check_invariants(&map), [20, 30, 35, 40, 45, 60, 70, 80]);

    let thirty = map.find_position(&30).unwrap();
    assert_eq!(map.tree().num_children(thirty), Ok(2));
    assert_eq!(map.delete(thirty), Ok((30, 30)));
    assert_eq!(check_invariants(&map), [20, 35, 40, 45, 60, 70, 80]);

    for (key, position) in positions {
        match key {
            30 | 50 => assert!(map.key(position).is_err(), "Deleted positions should be fenced."),
            _ => assert_eq!(
                map.key(position),
                Ok(&key),
                "Other positions should survive the restructuring."
            ),
        }
    }
}

#[test]
fn test_remove() {
    let mut map = sample();
    assert_eq!(map.remove(&5), Some("five"), "Removing the root should work.");
    assert_eq!(map.remove(&5), None);
    assert_eq!(map.remove_entry(&1), Some((1, "one")));
    assert_eq!(map.remove(&7), None);
    assert_eq!(check_invariants(&map), [3, 4, 8]);

    for key in [3, 4, 8] {
        map.remove(&key);
    }
    assert!(map.is_empty());
    assert_eq!(map.first(), None);
    assert_eq!(map.remove(&3), None);

    map.set(10, "ten");
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [10]);
}

#[test]
fn test_rebalance_hook() {
    let mut map = TreeMap::with_rebalance(MoveToRoot::default());
    for key in [5, 3, 8, 1, 4] {
        map.set(key, key * 10);
        assert_eq!(
            map.key(map.tree().root().unwrap()),
            Ok(&key),
            "The hook should run on every inserted position."
        );
        check_invariants(&map);
    }
    assert_eq!(map.rebalance.accesses.len(), 5);

    let three = map.first().and_then(|p| map.after(p).unwrap()).unwrap();
    assert_eq!(map.get(&3), Ok(&30));
    assert_eq!(map.tree().root(), Some(three));
    assert_eq!(map.rebalance.accesses.last(), Some(&three));

    assert_eq!(map.get(&6), Err(KeyNotFound));
    assert_eq!(map.rebalance.accesses.len(), 7, "Failed lookups should still be reported.");
    assert_eq!(check_invariants(&map), [1, 3, 4, 5, 8]);

    map.set(3, 33);
    assert_eq!(map.rebalance.accesses.last(), Some(&three), "Updates report the updated position.");

    assert_eq!(map.find_ge(&2), Some((&3, &33)));
    assert_eq!(map.find_range(Some(&4), None).count(), 3);
    assert_eq!(map.remove(&8), Some(80));
    assert_eq!(check_invariants(&map), [1, 3, 4, 5]);
    assert_eq!(map.key(three), Ok(&3), "Rotations should never invalidate a position.");
}

#[test]
fn test_against_btree_map() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x7265_6d61_7073);
    let mut map = TreeMap::new();
    let mut expected = BTreeMap::new();

    for step in 0..2000 {
        let key = rng.gen_range(0..200_u32);
        match rng.gen_range(0..10) {
            0..=5 => assert_eq!(map.set(key, step), expected.insert(key, step)),
            6..=8 => assert_eq!(map.remove(&key), expected.remove(&key)),
            _ => assert_eq!(map.get(&key).ok(), expected.get(&key)),
        }

        let probe = rng.gen_range(0..200_u32);
        assert_eq!(map.find_ge(&probe), expected.range(probe..).next());
        assert_eq!(map.find_lt(&probe), expected.range(..probe).next_back());
    }

    assert_eq!(check_invariants(&map), expected.keys().copied().collect::<Vec<_>>());
    assert!(map.iter().eq(expected.iter()));
    assert!(map.iter().rev().eq(expected.iter().rev()));

    for _ in 0..50 {
        let start = rng.gen_range(0..220_u32);
        let stop = rng.gen_range(0..220_u32);
        let range = map.find_range(Some(&start), Some(&stop)).collect::<Vec<_>>();
        let expected_range = if start < stop {
            expected.range(start..stop).collect::<Vec<_>>()
        } else {
            Vec::new()
        };
        assert_eq!(range, expected_range);
    }
}

#[test]
fn test_degenerate_chain() {
    // Sorted insertion produces a linked list of right children, deep enough that a recursive
    // search would be a problem on small stacks.
    let mut map: TreeMap<u32, ()> = (0..5_000).map(|k| (k, ())).collect();
    let root = map.tree().root().unwrap();
    assert_eq!(map.tree().height(root), Ok(4_999));

    assert_eq!(map.get(&4_999), Ok(&()));
    assert_eq!(map.find_ge(&1_234).map(|e| *e.0), Some(1_234));
    assert_eq!(map.iter().count(), 5_000);
    assert_eq!(map.tree().inorder().count(), 5_000);
}

#[test]
fn test_into_iter() {
    let counter = DropCounter::new();
    let map: TreeMap<u32, _> = [3, 1, 2, 5, 4]
        .into_iter()
        .map(|k| (k, counter.track(k)))
        .collect();

    let mut iter = map.into_iter();
    assert_eq!(iter.len(), 5);
    assert_eq!(iter.next().map(|e| e.0), Some(1));
    assert_eq!(iter.next_back().map(|e| e.0), Some(5));
    assert_eq!(counter.dropped(), 2);
    assert_eq!(iter.map(|(k, v)| (k, v.value)).collect::<Vec<_>>(), [(2, 2), (3, 3), (4, 4)]);
    assert_eq!(counter.dropped(), 5, "Every value should be dropped exactly once.");
}

#[test]
fn test_clear() {
    let mut map = sample();
    let first = map.first().unwrap();
    map.clear();
    assert!(map.is_empty());
    assert!(map.key(first).is_err());
    assert_eq!(map.get(&1), Err(KeyNotFound));
}

#[test]
fn test_item_ordering() {
    assert_eq!(Item::new(1, "a"), Item::new(1, "b"), "Items compare by key only.");
    assert!(Item::new(1, "z") < Item::new(2, "a"));
    assert_eq!(Item::new(3, 'c').into_tuple(), (3, 'c'));
}

#[test]
fn test_formatting() {
    let map = sample();
    assert_eq!(
        format!("{}", map),
        r#"{1: "one", 3: "three", 4: "four", 5: "five", 8: "eight"}"#
    );
    assert!(format!("{:?}", map).contains("(5: \"five\")"));
    assert_eq!(format!("{}", KeyNotFound), "Key not found in map!");
    assert_eq!(format!("{}", Side::Left), "left");
}
