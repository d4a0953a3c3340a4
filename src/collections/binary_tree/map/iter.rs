use std::borrow::Borrow;
use std::iter::FusedIterator;

use super::TreeMap;
use crate::collections::binary_tree::Position;
use crate::util::result::ResultExtension;

impl<K: Ord, V, R> IntoIterator for TreeMap<K, V, R> {
    type Item = (K, V);

    type IntoIter = IntoIter<K, V, R>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}

pub struct IntoIter<K: Ord, V, R>(TreeMap<K, V, R>);

impl<K: Ord, V, R> Iterator for IntoIter<K, V, R> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        // Each step walks down from the root again, but the extreme node never has two children
        // so removing it doesn't need any restructuring.
        let first = self.0.first()?;
        Some(self.0.delete(first).unreachable())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len(), Some(self.0.len()))
    }
}

impl<K: Ord, V, R> DoubleEndedIterator for IntoIter<K, V, R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let last = self.0.last()?;
        Some(self.0.delete(last).unreachable())
    }
}

impl<K: Ord, V, R> ExactSizeIterator for IntoIter<K, V, R> {}

impl<K: Ord, V, R> FusedIterator for IntoIter<K, V, R> {}

impl<'a, K: Ord, V, R> IntoIterator for &'a TreeMap<K, V, R> {
    type Item = (&'a K, &'a V);

    type IntoIter = Iter<'a, K, V, R>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            map: self,
            front: self.first(),
            back: self.last(),
            len: self.len(),
        }
    }
}

/// A borrowed iterator over the entries of a [`TreeMap`], in ascending order of keys.
pub struct Iter<'a, K: Ord, V, R> {
    pub(crate) map: &'a TreeMap<K, V, R>,
    pub(crate) front: Option<Position>,
    pub(crate) back: Option<Position>,
    // The ends meet when this reaches zero.
    pub(crate) len: usize,
}

impl<'a, K: Ord, V, R> Iterator for Iter<'a, K, V, R> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let map = self.map;
        let position = self.front?;
        self.front = map.after(position).unreachable();
        self.len -= 1;
        Some(map.entry(position))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K: Ord, V, R> DoubleEndedIterator for Iter<'a, K, V, R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let map = self.map;
        let position = self.back?;
        self.back = map.before(position).unreachable();
        self.len -= 1;
        Some(map.entry(position))
    }
}

impl<'a, K: Ord, V, R> ExactSizeIterator for Iter<'a, K, V, R> {}

impl<'a, K: Ord, V, R> FusedIterator for Iter<'a, K, V, R> {}

pub struct Keys<'a, K: Ord, V, R>(pub(crate) Iter<'a, K, V, R>);

impl<'a, K: Ord, V, R> Iterator for Keys<'a, K, V, R> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|e| e.0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K: Ord, V, R> DoubleEndedIterator for Keys<'a, K, V, R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|e| e.0)
    }
}

impl<'a, K: Ord, V, R> ExactSizeIterator for Keys<'a, K, V, R> {}

impl<'a, K: Ord, V, R> FusedIterator for Keys<'a, K, V, R> {}

pub struct Values<'a, K: Ord, V, R>(pub(crate) Iter<'a, K, V, R>);

impl<'a, K: Ord, V, R> Iterator for Values<'a, K, V, R> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|e| e.1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K: Ord, V, R> DoubleEndedIterator for Values<'a, K, V, R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|e| e.1)
    }
}

impl<'a, K: Ord, V, R> ExactSizeIterator for Values<'a, K, V, R> {}

impl<'a, K: Ord, V, R> FusedIterator for Values<'a, K, V, R> {}

/// An iterator over the entries of a [`TreeMap`] whose keys fall in a half-open range, created by
/// [`TreeMap::find_range`].
pub struct Range<'a, K: Ord, V, R, Q: ?Sized> {
    pub(crate) map: &'a TreeMap<K, V, R>,
    pub(crate) next: Option<Position>,
    pub(crate) stop: Option<&'a Q>,
}

impl<'a, K: Ord, V, R, Q: ?Sized> Range<'a, K, V, R, Q> {
    pub(crate) const fn new(
        map: &'a TreeMap<K, V, R>,
        next: Option<Position>,
        stop: Option<&'a Q>,
    ) -> Range<'a, K, V, R, Q> {
        Range { map, next, stop }
    }
}

impl<'a, K, V, R, Q> Iterator for Range<'a, K, V, R, Q>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let map = self.map;
        let position = self.next?;
        let (key, value) = map.entry(position);

        if self.stop.is_some_and(|stop| stop.cmp(key.borrow()).is_le()) {
            self.next = None;
            return None;
        }

        self.next = map.after(position).unreachable();
        Some((key, value))
    }
}

impl<'a, K, V, R, Q> FusedIterator for Range<'a, K, V, R, Q>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
}
