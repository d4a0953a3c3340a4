use std::collections::VecDeque;
use std::iter::FusedIterator;

use super::{LinkedBinaryTree, Link, Position};

pub struct Preorder<'a, T> {
    pub(crate) tree: &'a LinkedBinaryTree<T>,
    pub(crate) stack: Vec<usize>,
}

impl<'a, T> Preorder<'a, T> {
    pub(crate) fn new(tree: &'a LinkedBinaryTree<T>) -> Preorder<'a, T> {
        Preorder {
            tree,
            stack: Vec::from_iter(tree.root),
        }
    }
}

impl<'a, T> Iterator for Preorder<'a, T> {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let node = &self.tree.arena[index];
        // Right first, so that the left subtree is popped next.
        self.stack.extend(node.right);
        self.stack.extend(node.left);
        Some(self.tree.position(index))
    }
}

impl<'a, T> FusedIterator for Preorder<'a, T> {}

pub struct Postorder<'a, T> {
    pub(crate) tree: &'a LinkedBinaryTree<T>,
    /// Pairs of a node and whether its children have already been pushed.
    pub(crate) stack: Vec<(usize, bool)>,
}

impl<'a, T> Postorder<'a, T> {
    pub(crate) fn new(tree: &'a LinkedBinaryTree<T>) -> Postorder<'a, T> {
        Postorder {
            tree,
            stack: Vec::from_iter(tree.root.map(|root| (root, false))),
        }
    }
}

impl<'a, T> Iterator for Postorder<'a, T> {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (index, expanded) = self.stack.pop()?;
            if expanded {
                return Some(self.tree.position(index));
            }

            let node = &self.tree.arena[index];
            self.stack.push((index, true));
            self.stack.extend(node.right.map(|r| (r, false)));
            self.stack.extend(node.left.map(|l| (l, false)));
        }
    }
}

impl<'a, T> FusedIterator for Postorder<'a, T> {}

pub struct Inorder<'a, T> {
    pub(crate) tree: &'a LinkedBinaryTree<T>,
    pub(crate) stack: Vec<usize>,
    pub(crate) current: Link,
}

impl<'a, T> Inorder<'a, T> {
    pub(crate) fn new(tree: &'a LinkedBinaryTree<T>) -> Inorder<'a, T> {
        Inorder {
            tree,
            stack: Vec::new(),
            current: tree.root,
        }
    }
}

impl<'a, T> Iterator for Inorder<'a, T> {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(index) = self.current {
            self.stack.push(index);
            self.current = self.tree.arena[index].left;
        }

        let index = self.stack.pop()?;
        self.current = self.tree.arena[index].right;
        Some(self.tree.position(index))
    }
}

impl<'a, T> FusedIterator for Inorder<'a, T> {}

pub struct BreadthFirst<'a, T> {
    pub(crate) tree: &'a LinkedBinaryTree<T>,
    pub(crate) queue: VecDeque<usize>,
}

impl<'a, T> BreadthFirst<'a, T> {
    pub(crate) fn new(tree: &'a LinkedBinaryTree<T>) -> BreadthFirst<'a, T> {
        BreadthFirst {
            tree,
            queue: VecDeque::from_iter(tree.root),
        }
    }
}

impl<'a, T> Iterator for BreadthFirst<'a, T> {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.queue.pop_front()?;
        let node = &self.tree.arena[index];
        self.queue.extend(node.left);
        self.queue.extend(node.right);
        Some(self.tree.position(index))
    }
}

impl<'a, T> FusedIterator for BreadthFirst<'a, T> {}
