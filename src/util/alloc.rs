//! Allocation and drop bookkeeping for tests.

use std::cell::Cell;
use std::rc::Rc;

/// A shared tally of how many [`Tracked`] values handed out by it have been dropped.
#[derive(Debug, Default, Clone)]
pub struct DropCounter(Rc<Cell<usize>>);

impl DropCounter {
    /// Creates a counter with no drops recorded.
    pub fn new() -> DropCounter {
        DropCounter::default()
    }

    /// Wraps `value` so that dropping it is recorded by this counter.
    pub fn track<T>(&self, value: T) -> Tracked<T> {
        Tracked {
            value,
            counter: Rc::clone(&self.0),
        }
    }

    /// Returns the number of tracked values dropped so far.
    pub fn dropped(&self) -> usize {
        self.0.get()
    }
}

/// A value whose drop is recorded by the [`DropCounter`] that created it.
#[derive(Debug)]
pub struct Tracked<T> {
    /// The wrapped value.
    pub value: T,
    counter: Rc<Cell<usize>>,
}

impl<T> Drop for Tracked<T> {
    fn drop(&mut self) {
        self.counter.set(self.counter.get() + 1);
    }
}
