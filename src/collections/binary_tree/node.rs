use std::mem;
use std::ops::{Index, IndexMut};

use super::Side;

pub(crate) type Link = Option<usize>;

pub(crate) struct Node<T> {
    pub element: T,
    pub parent: Link,
    pub left: Link,
    pub right: Link,
}

impl<T> Node<T> {
    pub const fn leaf(element: T, parent: Link) -> Node<T> {
        Node {
            element,
            parent,
            left: None,
            right: None,
        }
    }

    pub const fn child(&self, side: Side) -> Link {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub const fn child_mut(&mut self, side: Side) -> &mut Link {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub const fn num_children(&self) -> usize {
        self.left.is_some() as usize + self.right.is_some() as usize
    }
}

enum Entry<T> {
    Occupied(Node<T>),
    Vacant { next_free: Link },
}

struct Slot<T> {
    generation: u32,
    entry: Entry<T>,
}

/// Index-addressed storage for the nodes of a single tree.
///
/// Removing a node bumps the generation of its slot and threads the slot onto a free list, so
/// the index can be reused without an old `(index, generation)` pair ever matching again. A slot
/// whose generation is exhausted is retired instead, staying vacant for the life of the arena.
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Link,
    len: usize,
}

impl<T> Arena<T> {
    pub const fn new() -> Arena<T> {
        Arena {
            slots: Vec::new(),
            free: None,
            len: 0,
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    /// Stores `node`, returning its index.
    pub fn insert(&mut self, node: Node<T>) -> usize {
        self.len += 1;
        match self.free {
            Some(index) => {
                let slot = &mut self.slots[index];
                self.free = match slot.entry {
                    Entry::Vacant { next_free } => next_free,
                    Entry::Occupied(_) => unreachable!("free list points at an occupied slot"),
                };
                slot.entry = Entry::Occupied(node);
                index
            },
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    entry: Entry::Occupied(node),
                });
                self.slots.len() - 1
            },
        }
    }

    /// Takes the node at `index` out of the arena, or returns None if the slot is already vacant.
    pub fn remove(&mut self, index: usize) -> Option<Node<T>> {
        let slot = self.slots.get_mut(index)?;
        if let Entry::Vacant { .. } = slot.entry {
            return None;
        }

        self.len -= 1;
        let entry = match slot.generation.checked_add(1) {
            Some(generation) => {
                slot.generation = generation;
                let entry = mem::replace(&mut slot.entry, Entry::Vacant { next_free: self.free });
                self.free = Some(index);
                entry
            },
            None => mem::replace(&mut slot.entry, Entry::Vacant { next_free: None }),
        };

        match entry {
            Entry::Occupied(node) => Some(node),
            Entry::Vacant { .. } => None,
        }
    }

    /// Returns the live node at `index` if its slot is still on `generation`.
    pub fn get(&self, index: usize, generation: u32) -> Option<&Node<T>> {
        match self.slots.get(index)? {
            Slot {
                generation: current,
                entry: Entry::Occupied(node),
            } if *current == generation => Some(node),
            _ => None,
        }
    }

    pub fn generation(&self, index: usize) -> u32 {
        self.slots[index].generation
    }

    #[cfg(test)]
    pub fn set_generation(&mut self, index: usize, generation: u32) {
        self.slots[index].generation = generation;
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free = None;
        self.len = 0;
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Indexing is reserved for links followed from live nodes, which always point at occupied slots.
impl<T> Index<usize> for Arena<T> {
    type Output = Node<T>;

    fn index(&self, index: usize) -> &Self::Output {
        match &self.slots[index].entry {
            Entry::Occupied(node) => node,
            Entry::Vacant { .. } => unreachable!("link to vacant arena slot {index}"),
        }
    }
}

impl<T> IndexMut<usize> for Arena<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match &mut self.slots[index].entry {
            Entry::Occupied(node) => node,
            Entry::Vacant { .. } => unreachable!("link to vacant arena slot {index}"),
        }
    }
}
