use std::fmt::{self, Debug, Formatter};
use std::mem;
use std::ops::{Index, IndexMut};

use tracing::trace;

use super::{
    Arena, BreadthFirst, Inorder, InvalidPosition, Link, Node, Position, PositionFault, Postorder,
    Preorder, Side, StructuralError, TreeError, TreeId,
};
use crate::util::fmt::DebugRaw;
use crate::util::result::ResultExtension;

/// The number of branch segments drawn in front of a line of the `Debug` rendering.
const DEBUG_INDENT: usize = 16;

/// A binary tree of linked nodes, addressed through [`Position`]s.
///
/// The tree has no notion of ordering or keys. It provides the structural primitives (adding a
/// root or a child, replacing an element, deleting a node with at most one child, grafting other
/// trees onto a leaf, rotating a node above its parent) that an ordered structure such as
/// [`TreeMap`](super::map::TreeMap) is built from.
///
/// # Positions
/// Every operation that takes a [`Position`] validates it first: the position must have been
/// issued by this very tree instance and its node must not have been deleted. A violation is
/// reported as an [`InvalidPosition`] error, never ignored.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of elements in the tree.
/// - `h`: The height of the tree.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `root/parent/left/right` | `O(1)` |
/// | `add_root/add_left/add_right` | `O(1)` |
/// | `replace/delete/rotate` | `O(1)` |
/// | `depth` | `O(h)` |
/// | `height` | `O(n)` |
/// | `attach` | `O(n)` of the attached trees |
pub struct LinkedBinaryTree<T> {
    pub(crate) arena: Arena<T>,
    pub(crate) root: Link,
    pub(crate) id: TreeId,
}

impl<T> LinkedBinaryTree<T> {
    /// Creates a new tree with no elements.
    pub fn new() -> LinkedBinaryTree<T> {
        LinkedBinaryTree {
            arena: Arena::new(),
            root: None,
            id: TreeId::next(),
        }
    }

    /// Returns the number of elements in the tree.
    pub const fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns true if the tree contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn position(&self, index: usize) -> Position {
        Position {
            tree: self.id,
            index,
            generation: self.arena.generation(index),
        }
    }

    fn position_of(&self, link: Link) -> Option<Position> {
        link.map(|index| self.position(index))
    }

    /// Checks that `position` is live in this tree, returning the index of its node.
    pub(crate) fn validate(&self, position: Position) -> Result<usize, InvalidPosition> {
        if position.tree != self.id {
            return Err(InvalidPosition {
                fault: PositionFault::ForeignTree,
            });
        }

        match self.arena.get(position.index, position.generation) {
            Some(_) => Ok(position.index),
            None => Err(InvalidPosition {
                fault: PositionFault::Deleted,
            }),
        }
    }

    fn node(&self, position: Position) -> Result<&Node<T>, InvalidPosition> {
        let index = self.validate(position)?;
        Ok(&self.arena[index])
    }

    /// Returns the position of the root, or None if the tree is empty.
    pub fn root(&self) -> Option<Position> {
        self.position_of(self.root)
    }

    /// Returns the position of `position`'s parent, or None if it is the root.
    pub fn parent(&self, position: Position) -> Result<Option<Position>, InvalidPosition> {
        Ok(self.position_of(self.node(position)?.parent))
    }

    /// Returns the position of `position`'s child on the given `side`, if there is one.
    pub fn child(&self, position: Position, side: Side) -> Result<Option<Position>, InvalidPosition> {
        Ok(self.position_of(self.node(position)?.child(side)))
    }

    /// Returns the position of `position`'s left child, if there is one.
    pub fn left(&self, position: Position) -> Result<Option<Position>, InvalidPosition> {
        self.child(position, Side::Left)
    }

    /// Returns the position of `position`'s right child, if there is one.
    pub fn right(&self, position: Position) -> Result<Option<Position>, InvalidPosition> {
        self.child(position, Side::Right)
    }

    /// Returns the position of the other child of `position`'s parent, if there is one.
    pub fn sibling(&self, position: Position) -> Result<Option<Position>, InvalidPosition> {
        let index = self.validate(position)?;
        Ok(match self.arena[index].parent {
            Some(parent) => {
                let parent = &self.arena[parent];
                if parent.left == Some(index) {
                    self.position_of(parent.right)
                } else {
                    self.position_of(parent.left)
                }
            },
            None => None,
        })
    }

    /// Returns an iterator over the children of `position`, left before right.
    pub fn children(
        &self,
        position: Position,
    ) -> Result<impl Iterator<Item = Position> + '_, InvalidPosition> {
        let node = self.node(position)?;
        Ok([node.left, node.right]
            .into_iter()
            .flatten()
            .map(move |index| self.position(index)))
    }

    /// Returns the number of children of `position`, between 0 and 2.
    pub fn num_children(&self, position: Position) -> Result<usize, InvalidPosition> {
        Ok(self.node(position)?.num_children())
    }

    pub fn is_root(&self, position: Position) -> Result<bool, InvalidPosition> {
        Ok(self.node(position)?.parent.is_none())
    }

    pub fn is_leaf(&self, position: Position) -> Result<bool, InvalidPosition> {
        Ok(self.num_children(position)? == 0)
    }

    /// Returns the number of edges between `position` and the root.
    pub fn depth(&self, position: Position) -> Result<usize, InvalidPosition> {
        let mut walk = self.node(position)?.parent;
        let mut depth = 0;
        while let Some(index) = walk {
            depth += 1;
            walk = self.arena[index].parent;
        }
        Ok(depth)
    }

    /// Returns the number of edges on the longest downward path from `position` to a leaf.
    pub fn height(&self, position: Position) -> Result<usize, InvalidPosition> {
        let mut stack = vec![(self.validate(position)?, 0)];
        let mut height = 0;
        while let Some((index, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.arena[index];
            stack.extend([node.left, node.right].into_iter().flatten().map(|c| (c, depth + 1)));
        }
        Ok(height)
    }

    /// Returns a reference to the element stored at `position`.
    pub fn element(&self, position: Position) -> Result<&T, InvalidPosition> {
        Ok(&self.node(position)?.element)
    }

    /// Returns a mutable reference to the element stored at `position`.
    pub fn element_mut(&mut self, position: Position) -> Result<&mut T, InvalidPosition> {
        let index = self.validate(position)?;
        Ok(&mut self.arena[index].element)
    }

    /// Places `element` at the root of an empty tree and returns its position.
    pub fn add_root(&mut self, element: T) -> Result<Position, TreeError> {
        if self.root.is_some() {
            Err(StructuralError::RootExists)?
        }

        let index = self.arena.insert(Node::leaf(element, None));
        self.root = Some(index);
        trace!(index, "added root");
        Ok(self.position(index))
    }

    /// Creates a new child of `position` on the given `side`, storing `element`, and returns its
    /// position.
    pub fn add_child(
        &mut self,
        position: Position,
        side: Side,
        element: T,
    ) -> Result<Position, TreeError> {
        let parent = self.validate(position)?;
        if self.arena[parent].child(side).is_some() {
            Err(StructuralError::ChildExists(side))?
        }

        let index = self.arena.insert(Node::leaf(element, Some(parent)));
        *self.arena[parent].child_mut(side) = Some(index);
        trace!(index, parent, %side, len = self.len(), "added child");
        Ok(self.position(index))
    }

    pub fn add_left(&mut self, position: Position, element: T) -> Result<Position, TreeError> {
        self.add_child(position, Side::Left, element)
    }

    pub fn add_right(&mut self, position: Position, element: T) -> Result<Position, TreeError> {
        self.add_child(position, Side::Right, element)
    }

    /// Replaces the element at `position`, returning the old one. The structure is unchanged.
    pub fn replace(&mut self, position: Position, element: T) -> Result<T, InvalidPosition> {
        Ok(mem::replace(self.element_mut(position)?, element))
    }

    /// Deletes the node at `position`, returning its element. If the node had a child, that child
    /// takes its place under the node's former parent (or becomes the root).
    ///
    /// Nodes with two children can't be deleted here, choosing which node takes their place is up
    /// to the caller. Once deleted, `position` and every copy of it are permanently invalid.
    pub fn delete(&mut self, position: Position) -> Result<T, TreeError> {
        let index = self.validate(position)?;
        let node = &self.arena[index];
        if node.num_children() == 2 {
            Err(StructuralError::TwoChildren)?
        }

        let child = node.left.or(node.right);
        let parent = node.parent;
        if let Some(child) = child {
            self.arena[child].parent = parent;
        }
        self.replace_link(parent, index, child);

        let node = self.arena.remove(index).ok_or(InvalidPosition {
            fault: PositionFault::Deleted,
        })?;
        trace!(index, len = self.len(), "deleted node");
        Ok(node.element)
    }

    /// Grafts `left` and `right` onto the leaf at `position` as its left and right subtrees.
    ///
    /// The nodes of both trees are moved into this one, leaving them empty. Positions previously
    /// issued by `left` or `right` are invalidated, including for any elements later added to them.
    pub fn attach(
        &mut self,
        position: Position,
        left: &mut LinkedBinaryTree<T>,
        right: &mut LinkedBinaryTree<T>,
    ) -> Result<(), TreeError> {
        let index = self.validate(position)?;
        if self.arena[index].num_children() != 0 {
            Err(StructuralError::NotLeaf)?
        }

        self.graft(index, Side::Left, left);
        self.graft(index, Side::Right, right);
        trace!(index, len = self.len(), "attached subtrees");
        Ok(())
    }

    fn graft(&mut self, parent: usize, side: Side, donor: &mut LinkedBinaryTree<T>) {
        let mut stack = Vec::from_iter(donor.root.take().map(|root| (root, parent, side)));

        while let Some((old, parent, side)) = stack.pop() {
            let Some(Node {
                element, left, right, ..
            }) = donor.arena.remove(old)
            else {
                continue;
            };

            let index = self.arena.insert(Node::leaf(element, Some(parent)));
            *self.arena[parent].child_mut(side) = Some(index);

            stack.extend(left.map(|l| (l, index, Side::Left)));
            stack.extend(right.map(|r| (r, index, Side::Right)));
        }

        donor.clear();
    }

    /// Rotates `position` above its parent, which becomes its child on the opposite side. The
    /// in-order sequence of nodes is preserved and every position stays valid, referring to the
    /// same element as before.
    pub fn rotate(&mut self, position: Position) -> Result<(), TreeError> {
        let x = self.validate(position)?;
        let y = self.arena[x].parent.ok_or(StructuralError::NoParent)?;
        let z = self.arena[y].parent;

        self.replace_link(z, y, Some(x));
        self.arena[x].parent = z;

        let side = if self.arena[y].left == Some(x) {
            Side::Left
        } else {
            Side::Right
        };
        let inner = self.arena[x].child(side.opposite());
        *self.arena[y].child_mut(side) = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(y);
        }
        *self.arena[x].child_mut(side.opposite()) = Some(y);
        self.arena[y].parent = Some(x);

        trace!(index = x, former_parent = y, "rotated node");
        Ok(())
    }

    /// Points whichever link of `parent` referred to `old` (or the root, if `parent` is None) at
    /// `new` instead. `new`'s own parent link is left to the caller.
    fn replace_link(&mut self, parent: Link, old: usize, new: Link) {
        match parent {
            Some(parent) => {
                let parent = &mut self.arena[parent];
                if parent.left == Some(old) {
                    parent.left = new;
                } else {
                    parent.right = new;
                }
            },
            None => self.root = new,
        }
    }

    /// Removes all elements, invalidating every position issued so far.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.id = TreeId::next();
    }

    /// Returns an iterator over all positions, visiting each node before its children.
    pub fn preorder(&self) -> Preorder<'_, T> {
        Preorder::new(self)
    }

    /// Returns an iterator over all positions, visiting each node after its children.
    pub fn postorder(&self) -> Postorder<'_, T> {
        Postorder::new(self)
    }

    /// Returns an iterator over all positions, visiting each node between its left and right
    /// subtrees.
    pub fn inorder(&self) -> Inorder<'_, T> {
        Inorder::new(self)
    }

    /// Returns an iterator over all positions, level by level from the root.
    pub fn breadth_first(&self) -> BreadthFirst<'_, T> {
        BreadthFirst::new(self)
    }

    /// Renders the shape of the tree, one line per node and per empty child slot, in order. Each
    /// line is prefixed with one branch segment per edge from the root. Only the deepest
    /// [`DEBUG_INDENT`] segments are drawn, any above them are summarised as a count.
    fn debug_render(&self) -> String
    where
        T: Debug,
    {
        enum Step {
            Expand(Link),
            Line(usize),
        }

        let mut lines: Vec<String> = Vec::new();
        // Sides taken from the root to reach the frame being processed.
        let mut path: Vec<Side> = Vec::new();
        let mut stack = vec![(Step::Expand(self.root), 0usize, None)];

        while let Some((step, depth, side)) = stack.pop() {
            path.truncate(depth.saturating_sub(1));
            path.extend(side);

            let content = match step {
                Step::Expand(Some(index)) => {
                    let node = &self.arena[index];
                    stack.push((Step::Expand(node.right), depth + 1, Some(Side::Right)));
                    stack.push((Step::Line(index), depth, side));
                    stack.push((Step::Expand(node.left), depth + 1, Some(Side::Left)));
                    continue;
                },
                Step::Expand(None) => String::from("-"),
                Step::Line(index) => format!("({:?})", self.arena[index].element),
            };

            let hidden = path.len().saturating_sub(DEBUG_INDENT);
            let mut line = if hidden > 0 {
                format!("[+{hidden}] ")
            } else {
                String::new()
            };
            for side in &path[hidden..] {
                line.push_str(match side {
                    Side::Left => "┌    ",
                    Side::Right => "└    ",
                });
            }
            line.push_str(&content);
            lines.push(line);
        }
        lines.join("\n")
    }
}

impl<T> Default for LinkedBinaryTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Position> for LinkedBinaryTree<T> {
    type Output = T;

    /// Returns a reference to the element at `position`, panicking on a failure.
    ///
    /// # Panics
    /// Panics if `position` is invalid for this tree.
    fn index(&self, position: Position) -> &Self::Output {
        self.element(position).throw()
    }
}

impl<T> IndexMut<Position> for LinkedBinaryTree<T> {
    /// Returns a mutable reference to the element at `position`, panicking on a failure.
    ///
    /// # Panics
    /// Panics if `position` is invalid for this tree.
    fn index_mut(&mut self, position: Position) -> &mut Self::Output {
        self.element_mut(position).throw()
    }
}

impl<T: Debug> Debug for LinkedBinaryTree<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedBinaryTree")
            .field(
                "nodes",
                &DebugRaw(format!("\n{}\n", self.debug_render())),
            )
            .field("len", &self.len())
            .finish()
    }
}
