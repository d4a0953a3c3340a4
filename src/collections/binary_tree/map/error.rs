use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// The key looked up isn't present in the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyNotFound;

impl Display for KeyNotFound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Key not found in map!")
    }
}

impl Error for KeyNotFound {}
