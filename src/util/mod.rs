#![warn(missing_docs)]

#[cfg(test)]
pub mod alloc;
pub mod fmt;
pub mod panic;
pub mod result;
