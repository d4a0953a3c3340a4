//! Extensions for [`Result`].

use std::error::Error;

pub(crate) trait ResultExtension<T, E: Error> {
    /// A method similar to [`Result::unwrap`], except that it applies only to types which implement
    /// [`Error`] and panics with the message of the error itself.
    ///
    /// # Panics
    /// Panics if the [`Result`] is an [`Err`].
    fn throw(self) -> T;

    /// Acts similarly to [`ResultExtension::throw`], but marks the error branch as an internal
    /// invariant violation rather than a misuse by the caller. Use it only where an [`Err`] is
    /// impossible, such as stepping between positions of a tree that is immutably borrowed.
    fn unreachable(self) -> T;
}

impl<T, E: Error> ResultExtension<T, E> for Result<T, E> {
    fn throw(self) -> T {
        match self {
            Ok(val) => val,
            Err(error) => panic!("{}", error),
        }
    }

    fn unreachable(self) -> T {
        match self {
            Ok(val) => val,
            Err(error) => unreachable!("{}", error),
        }
    }
}
