//! A module containing [`TreeMap`] and associated types.
//!
//! [`TreeMap`] stores [`Item`]s in a [`LinkedBinaryTree`](super::LinkedBinaryTree), keeping them in
//! binary search tree order. The other types here provide borrowed iteration over keys, values or
//! entries (including over a range of keys), owned iteration, the [`Rebalance`] hook that
//! self-balancing variants plug into, and the [`KeyNotFound`] error returned by failed lookups.

mod error;
mod item;
mod iter;
mod rebalance;
mod tests;
mod tree_map;

pub use error::*;
pub use item::*;
pub use iter::*;
pub use rebalance::*;
pub use tree_map::*;
