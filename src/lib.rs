//! This crate is a small collections library built around a linked binary tree and the ordered
//! map layered on top of it.
//!
//! # Purpose
//! The two layers are written to be read independently. [`LinkedBinaryTree`] knows nothing about
//! keys or ordering, it just owns a graph of nodes and hands out [`Position`]s to them.
//! [`TreeMap`] interprets the elements of such a tree as key/value pairs and keeps them in binary
//! search tree order, only ever touching the structure through the tree's public operations.
//!
//! # Method
//! Nodes live in an index-addressed arena rather than behind raw pointers. A [`Position`] is an
//! arena index paired with a generation and the identity of the tree that issued it, so using a
//! position after its node was deleted (or with the wrong tree) is detected and reported as an
//! [`InvalidPosition`] instead of touching freed memory.
//!
//! # Error Handling
//! Errors are strongly typed. Leaf errors are small structs (often ZSTs) implementing
//! [`Error`](std::error::Error), and the enums that union them are derived with `derive_more` so
//! that `?` does the conversion. Failing a lookup with [`KeyNotFound`] is an expected outcome,
//! everything else indicates a broken contract on the caller's side.
//!
//! # Logging
//! Structural mutations and map probes emit `tracing` events at the trace level. The crate never
//! installs a subscriber.
//!
//! [`LinkedBinaryTree`]: collections::binary_tree::LinkedBinaryTree
//! [`Position`]: collections::binary_tree::Position
//! [`InvalidPosition`]: collections::binary_tree::InvalidPosition
//! [`TreeMap`]: collections::binary_tree::map::TreeMap
//! [`KeyNotFound`]: collections::binary_tree::map::KeyNotFound

// #![warn(missing_docs)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod collections;

pub(crate) mod util;
