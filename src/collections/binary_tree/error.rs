use std::error::Error;
use std::fmt::{self, Display, Formatter};

use derive_more::{Display, Error, From, IsVariant};

use super::Side;

/// The reason a [`Position`](super::Position) was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum PositionFault {
    /// The position was issued by a different tree instance (or by this tree before it was
    /// emptied by [`clear`](super::LinkedBinaryTree::clear) or
    /// [`attach`](super::LinkedBinaryTree::attach)).
    ForeignTree,
    /// The node the position referred to has been deleted.
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPosition {
    pub fault: PositionFault,
}

impl Display for InvalidPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.fault {
            PositionFault::ForeignTree => write!(f, "Position does not belong to this tree!"),
            PositionFault::Deleted => write!(f, "Position refers to a deleted node!"),
        }
    }
}

impl Error for InvalidPosition {}

/// A structural precondition of a tree operation was not met.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum StructuralError {
    #[display("Tree already has a root!")]
    RootExists,
    #[display("Node already has a {_0} child!")]
    ChildExists(#[error(not(source))] Side),
    #[display("Node has two children!")]
    TwoChildren,
    #[display("Node is not a leaf!")]
    NotLeaf,
    #[display("Node has no parent to rotate above!")]
    NoParent,
}

#[derive(Debug, Display, Error, From, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum TreeError {
    InvalidPosition(InvalidPosition),
    Structural(StructuralError),
}
