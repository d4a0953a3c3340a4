use std::fmt::{self, Debug, Formatter};
use std::num::NonZero;
use std::sync::atomic::{AtomicU64, Ordering};

use derive_more::{Display, IsVariant};

/// One of the two child slots of a node.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, IsVariant)]
pub enum Side {
    #[display("left")]
    Left,
    #[display("right")]
    Right,
}

impl Side {
    pub const fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// An identity token distinguishing tree instances. Every tree draws a new one when created and
/// whenever it is emptied wholesale, so that positions issued before then are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TreeId(NonZero<u64>);

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

impl TreeId {
    pub fn next() -> TreeId {
        let raw = NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed);
        // Starts at 1 and would need 2^64 trees to wrap.
        TreeId(NonZero::new(raw).unwrap_or(NonZero::<u64>::MIN))
    }
}

/// A handle to a single node within a specific [`LinkedBinaryTree`](super::LinkedBinaryTree).
///
/// Positions are plain `Copy` values and don't borrow the tree, so they can be held across
/// mutations. Every operation that accepts one checks that it was issued by the same tree instance
/// and that its node hasn't been deleted since, failing with an
/// [`InvalidPosition`](super::InvalidPosition) otherwise. Deletion is terminal: once a position
/// has been invalidated there is no way to make it valid again.
///
/// Two positions are equal if they name the same node in the same tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) tree: TreeId,
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

impl Debug for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Position({}v{} @ tree {})", self.index, self.generation, self.tree.0)
    }
}
