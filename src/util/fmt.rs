//! Formatting helpers.

use std::fmt::{self, Debug, Formatter};

/// Pre-rendered text that should be printed as-is inside a `Debug` implementation, rather than
/// quoted and escaped like a [`String`].
pub struct DebugRaw(pub String);

impl Debug for DebugRaw {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
