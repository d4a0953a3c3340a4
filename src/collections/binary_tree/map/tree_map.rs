use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter};
use std::mem;

use tracing::trace;

use super::{Item, Iter, KeyNotFound, Keys, NoRebalance, Range, Rebalance, Values};
use crate::collections::binary_tree::{InvalidPosition, LinkedBinaryTree, Position, Side};
use crate::util::result::ResultExtension;

/// A sorted map, implemented as an unbalanced binary search tree over a [`LinkedBinaryTree`].
///
/// For every node, all keys in its left subtree are less than its key and all keys in its right
/// subtree are greater. Keys are unique: setting an existing key overwrites its value in place.
///
/// The map never touches nodes directly, it goes through the tree's structural operations and
/// hands out the tree's [`Position`]s, which can be used to step through the map in key order with
/// [`before`](TreeMap::before) and [`after`](TreeMap::after).
///
/// # Rebalancing
/// The `R` parameter is a [`Rebalance`] strategy, invoked after every probe, insertion and update.
/// The default, [`NoRebalance`], does nothing, so the shape of the tree depends entirely on the
/// order of insertion. Lookups cost `O(h)`, which is `O(log n)` for random insertion orders but
/// `O(n)` when keys are inserted in sorted order.
///
/// # Borrowing
/// Methods that probe the map take `&mut self`, because the strategy may restructure the tree.
/// Iterators borrow the map, so it can't be mutated part way through a traversal.
pub struct TreeMap<K: Ord, V, R = NoRebalance> {
    pub(crate) tree: LinkedBinaryTree<Item<K, V>>,
    pub(crate) rebalance: R,
}

impl<K: Ord, V> TreeMap<K, V> {
    /// Creates a new, empty TreeMap that never rebalances.
    pub fn new() -> TreeMap<K, V> {
        TreeMap::with_rebalance(NoRebalance)
    }
}

impl<K: Ord, V, R> TreeMap<K, V, R> {
    /// Creates a new, empty TreeMap which invokes `rebalance` after every access.
    pub fn with_rebalance(rebalance: R) -> TreeMap<K, V, R> {
        TreeMap {
            tree: LinkedBinaryTree::new(),
            rebalance,
        }
    }

    /// Returns the number of entries in the map.
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns true if the map contains no entries.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the underlying tree, for inspecting its structure.
    pub const fn tree(&self) -> &LinkedBinaryTree<Item<K, V>> {
        &self.tree
    }

    /// Returns the key stored at `position`.
    pub fn key(&self, position: Position) -> Result<&K, InvalidPosition> {
        Ok(&self.tree.element(position)?.key)
    }

    /// Returns the value stored at `position`.
    pub fn value(&self, position: Position) -> Result<&V, InvalidPosition> {
        Ok(&self.tree.element(position)?.value)
    }

    /// Returns a mutable reference to the value stored at `position`. Keys can't be mutated in
    /// place, as that could break the ordering of the map.
    pub fn value_mut(&mut self, position: Position) -> Result<&mut V, InvalidPosition> {
        Ok(&mut self.tree.element_mut(position)?.value)
    }

    /// Returns the entry at a position that was obtained from the tree during the current borrow.
    pub(crate) fn entry(&self, position: Position) -> (&K, &V) {
        self.tree.element(position).unreachable().tuple()
    }

    /// Returns the position in `position`'s subtree holding `key`, or the last position probed on
    /// the way down if there is no such key. The latter is where `key` would be inserted.
    fn subtree_search<Q>(&self, position: Position, key: &Q) -> Result<Position, InvalidPosition>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut walk = position;
        loop {
            let next = match key.cmp(self.key(walk)?.borrow()) {
                Ordering::Equal => return Ok(walk),
                Ordering::Less => self.tree.left(walk)?,
                Ordering::Greater => self.tree.right(walk)?,
            };

            match next {
                Some(child) => walk = child,
                None => return Ok(walk),
            }
        }
    }

    /// Follows `side` links from `position` for as long as possible.
    fn subtree_extreme(&self, position: Position, side: Side) -> Result<Position, InvalidPosition> {
        let mut walk = position;
        while let Some(child) = self.tree.child(walk, side)? {
            walk = child;
        }
        Ok(walk)
    }

    /// Returns the position of the smallest key, or None if the map is empty.
    pub fn first(&self) -> Option<Position> {
        let root = self.tree.root()?;
        Some(self.subtree_extreme(root, Side::Left).unreachable())
    }

    /// Returns the position of the largest key, or None if the map is empty.
    pub fn last(&self) -> Option<Position> {
        let root = self.tree.root()?;
        Some(self.subtree_extreme(root, Side::Right).unreachable())
    }

    /// Returns the position just before `position` in key order, or None if it is the first.
    pub fn before(&self, position: Position) -> Result<Option<Position>, InvalidPosition> {
        self.neighbour(position, Side::Left)
    }

    /// Returns the position just after `position` in key order, or None if it is the last.
    pub fn after(&self, position: Position) -> Result<Option<Position>, InvalidPosition> {
        self.neighbour(position, Side::Right)
    }

    /// The in-order neighbour of `position` towards `side`. That's the nearest node of the subtree
    /// on `side` if there is one, otherwise the first ancestor reached by climbing a link from the
    /// opposite side.
    fn neighbour(&self, position: Position, side: Side) -> Result<Option<Position>, InvalidPosition> {
        if let Some(child) = self.tree.child(position, side)? {
            return Ok(Some(self.subtree_extreme(child, side.opposite())?));
        }

        let mut walk = position;
        let mut above = self.tree.parent(walk)?;
        while let Some(parent) = above {
            if self.tree.child(parent, side)? != Some(walk) {
                break;
            }
            walk = parent;
            above = self.tree.parent(walk)?;
        }
        Ok(above)
    }

    /// Returns the entry with the smallest key, or None if the map is empty.
    pub fn find_min(&self) -> Option<(&K, &V)> {
        self.first().map(|p| self.entry(p))
    }

    /// Returns the entry with the largest key, or None if the map is empty.
    pub fn find_max(&self) -> Option<(&K, &V)> {
        self.last().map(|p| self.entry(p))
    }

    /// Removes the entry at `position` and returns it. `position` is invalid afterwards, all
    /// other positions stay valid.
    ///
    /// A node with two children is first rotated down, by lifting its left child above it until it
    /// has no left child, so that the tree's one-child deletion applies.
    pub fn delete(&mut self, position: Position) -> Result<(K, V), InvalidPosition> {
        while self.tree.num_children(position)? == 2 {
            if let Some(left) = self.tree.left(position)? {
                self.tree.rotate(left).unreachable();
            }
        }

        let item = self.tree.delete(position).unreachable();
        trace!(index = position.index, len = self.len(), "deleted entry");
        Ok(item.into_tuple())
    }

    /// Removes all entries, invalidating every position.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns an iterator over the keys of the map, in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V, R> {
        Keys(self.iter())
    }

    /// Returns an iterator over the values of the map, in ascending order of their keys.
    pub fn values(&self) -> Values<'_, K, V, R> {
        Values(self.iter())
    }

    /// Returns an iterator over the entries of the map, in ascending order of keys.
    pub fn iter(&self) -> Iter<'_, K, V, R> {
        self.into_iter()
    }
}

impl<K: Ord, V, R: Rebalance<K, V>> TreeMap<K, V, R> {
    /// Returns the position holding `key`, or else the position of a neighbouring key, which is
    /// where `key` would be inserted. Returns None only if the map is empty.
    pub fn find_position<Q>(&mut self, key: &Q) -> Option<Position>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let root = self.tree.root()?;
        let position = self.subtree_search(root, key).unreachable();
        self.rebalance.on_access(&mut self.tree, position);
        Some(position)
    }

    /// Finds the position for `key` and, unless `keep` accepts how its key compares to `key`,
    /// steps from it towards `side`.
    fn find_relative<Q>(
        &mut self,
        key: &Q,
        keep: impl FnOnce(Ordering) -> bool,
        side: Side,
    ) -> Option<Position>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let position = self.find_position(key)?;
        if keep(key.cmp(self.entry(position).0.borrow()).reverse()) {
            Some(position)
        } else {
            self.neighbour(position, side).unreachable()
        }
    }

    fn position_ge<Q>(&mut self, key: &Q) -> Option<Position>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_relative(key, Ordering::is_ge, Side::Right)
    }

    /// Returns the entry with the smallest key that is greater than or equal to `key`.
    pub fn find_ge<Q>(&mut self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let position = self.position_ge(key)?;
        Some(self.entry(position))
    }

    /// Returns the entry with the smallest key that is strictly greater than `key`.
    pub fn find_gt<Q>(&mut self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let position = self.find_relative(key, Ordering::is_gt, Side::Right)?;
        Some(self.entry(position))
    }

    /// Returns the entry with the largest key that is less than or equal to `key`.
    pub fn find_le<Q>(&mut self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let position = self.find_relative(key, Ordering::is_le, Side::Left)?;
        Some(self.entry(position))
    }

    /// Returns the entry with the largest key that is strictly less than `key`.
    pub fn find_lt<Q>(&mut self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let position = self.find_relative(key, Ordering::is_lt, Side::Left)?;
        Some(self.entry(position))
    }

    /// Returns an iterator over the entries with `start <= key < stop`, in ascending order. A
    /// missing `start` begins at the smallest key and a missing `stop` continues through the
    /// largest.
    pub fn find_range<'a, Q>(
        &'a mut self,
        start: Option<&Q>,
        stop: Option<&'a Q>,
    ) -> Range<'a, K, V, R, Q>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let next = match start {
            Some(start) => self.position_ge(start),
            None => self.first(),
        };
        Range::new(self, next, stop)
    }

    /// Probes for `key`, invoking the rebalancing hook on the probed position whether or not the
    /// key was found.
    fn probe<Q>(&mut self, key: &Q) -> Result<Position, KeyNotFound>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let position = self.find_position(key).ok_or(KeyNotFound)?;
        if key.cmp(self.entry(position).0.borrow()).is_eq() {
            trace!(index = position.index, "key found");
            Ok(position)
        } else {
            trace!(probed = position.index, "key not found");
            Err(KeyNotFound)
        }
    }

    /// Returns a reference to the value for `key`.
    pub fn get<Q>(&mut self, key: &Q) -> Result<&V, KeyNotFound>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let position = self.probe(key)?;
        Ok(self.entry(position).1)
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V, KeyNotFound>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let position = self.probe(key)?;
        Ok(self.value_mut(position).unreachable())
    }

    /// Returns true if the map contains `key`.
    pub fn contains_key<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.probe(key).is_ok()
    }

    /// Sets the value for `key`, returning the previous value if the key was already present. An
    /// existing key keeps its node, a new key is added as a leaf.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let Some(root) = self.tree.root() else {
            let leaf = self.tree.add_root(Item::new(key, value)).unreachable();
            trace!(index = leaf.index, "inserted entry at root");
            self.rebalance.on_access(&mut self.tree, leaf);
            return None;
        };

        let probed = self.subtree_search(root, &key).unreachable();
        let item = self.tree.element_mut(probed).unreachable();
        let (accessed, previous) = match key.cmp(&item.key) {
            Ordering::Equal => {
                trace!(index = probed.index, "updated entry");
                (probed, Some(mem::replace(&mut item.value, value)))
            },
            ordering => {
                let side = if ordering.is_lt() { Side::Left } else { Side::Right };
                let leaf = self
                    .tree
                    .add_child(probed, side, Item::new(key, value))
                    .unreachable();
                trace!(
                    index = leaf.index,
                    parent = probed.index,
                    %side,
                    len = self.len(),
                    "inserted entry"
                );
                (leaf, None)
            },
        };

        self.rebalance.on_access(&mut self.tree, accessed);
        previous
    }

    /// Removes `key` from the map, returning its entry if it was present.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let position = self.probe(key).ok()?;
        Some(self.delete(position).unreachable())
    }

    /// Removes `key` from the map, returning its value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|e| e.1)
    }
}

impl<K: Ord, V, R: Default> Default for TreeMap<K, V, R> {
    fn default() -> Self {
        Self::with_rebalance(R::default())
    }
}

impl<K: Ord, V, R: Rebalance<K, V>> Extend<(K, V)> for TreeMap<K, V, R> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K: Ord, V, R: Rebalance<K, V> + Default> FromIterator<(K, V)> for TreeMap<K, V, R> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K: Ord + Debug, V: Debug, R> Debug for TreeMap<K, V, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeMap")
            .field("tree", &self.tree)
            .field("len", &self.len())
            .finish()
    }
}

impl<K: Ord + Debug, V: Debug, R> Display for TreeMap<K, V, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
