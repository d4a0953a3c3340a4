//! A module containing [`LinkedBinaryTree`] and associated types.
//!
//! The tree hands out [`Position`]s, validity-checked handles to its nodes, and reports misuse of
//! them with [`InvalidPosition`]. Structural preconditions that aren't met are reported with
//! [`StructuralError`]. The iterators here walk the positions of a tree in the four classic
//! orders.
//!
//! The ordered [`TreeMap`](map::TreeMap) built on top of the tree lives in [`map`].

mod error;
mod iter;
mod linked_binary_tree;
mod node;
mod position;

#[cfg(feature = "tree_map")]
pub mod map;

#[cfg(feature = "tree_map")]
#[doc(inline)]
pub use map::TreeMap;

pub use error::*;
pub use iter::*;
pub use linked_binary_tree::*;
pub(crate) use node::*;
pub use position::*;
