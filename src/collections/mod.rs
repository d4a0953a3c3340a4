//! Various general-purpose collection types.
//!
//! # Purpose
//! At the moment this is just the binary tree family: a structural [`LinkedBinaryTree`] and the
//! ordered [`TreeMap`] built over it.
//!
//! [`LinkedBinaryTree`]: binary_tree::LinkedBinaryTree
//! [`TreeMap`]: binary_tree::map::TreeMap

#[cfg(feature = "binary_tree")]
pub mod binary_tree;
