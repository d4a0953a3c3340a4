use super::Item;
use crate::collections::binary_tree::{LinkedBinaryTree, Position};

/// A strategy for restructuring a [`TreeMap`](super::TreeMap)'s tree after it has been accessed.
///
/// The map invokes [`on_access`](Rebalance::on_access) after every probe (lookups and the
/// `find_*` family) and after every insertion or update, once any structural change of its own has
/// completed. `position` is the node that was found, probed or inserted.
///
/// Implementations may restructure the tree freely, typically with
/// [`LinkedBinaryTree::rotate`], provided that:
/// - the binary search tree order of keys is preserved, and
/// - `position` itself stays valid and keeps referring to the same item. Other positions must
///   either stay valid and refer to the same item or be invalidated.
///
/// A strategy that invalidates `position` breaks the map, which panics when it next reads it.
pub trait Rebalance<K, V> {
    fn on_access(&mut self, tree: &mut LinkedBinaryTree<Item<K, V>>, position: Position);
}

/// The default strategy, which leaves the tree as it is.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoRebalance;

impl<K, V> Rebalance<K, V> for NoRebalance {
    fn on_access(&mut self, _tree: &mut LinkedBinaryTree<Item<K, V>>, _position: Position) {}
}
