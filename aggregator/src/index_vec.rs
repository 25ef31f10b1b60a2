/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! A `Vec` addressed by a newtyped index, used as an arena so that entries
//! can refer to each other by index instead of by reference.

use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::{slice, vec};

/// Represents some newtyped `u32` wrapper.
pub trait Idx: Copy + Eq + 'static {
    fn new(idx: usize) -> Self;
    fn index(self) -> usize;
}

/// Declares a `u32` index type usable with `IndexVec`.
macro_rules! define_index {
    ($(#[$meta:meta])* $name: ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        #[cfg_attr(feature = "capture", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(u32);

        impl $crate::index_vec::Idx for $name {
            #[inline]
            fn new(idx: usize) -> Self {
                debug_assert!(idx < u32::max_value() as usize);
                $name(idx as u32)
            }

            #[inline]
            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

#[derive(Clone, Debug, PartialEq)]
pub struct IndexVec<I: Idx, T> {
    raw: Vec<T>,
    _marker: PhantomData<I>,
}

impl<I: Idx, T> IndexVec<I, T> {
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        IndexVec { raw: Vec::with_capacity(capacity), _marker: PhantomData }
    }

    #[inline]
    pub fn push(&mut self, d: T) -> I {
        let idx = I::new(self.raw.len());
        self.raw.push(d);
        idx
    }

    #[inline]
    pub fn clear(&mut self) {
        self.raw.clear()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.raw.last()
    }

    #[inline]
    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.raw.last_mut()
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<T> {
        self.raw.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> slice::IterMut<T> {
        self.raw.iter_mut()
    }

    #[inline]
    pub fn iter_enumerated<'a>(&'a self) -> impl Iterator<Item = (I, &'a T)> + 'a {
        self.raw.iter().enumerate().map(|(i, e)| (I::new(i), e))
    }

    #[inline]
    pub fn iter_enumerated_mut<'a>(&'a mut self) -> impl Iterator<Item = (I, &'a mut T)> + 'a {
        self.raw.iter_mut().enumerate().map(|(i, e)| (I::new(i), e))
    }

    #[inline]
    pub fn get(&self, index: I) -> Option<&T> {
        self.raw.get(index.index())
    }

    #[inline]
    pub fn get_mut(&mut self, index: I) -> Option<&mut T> {
        self.raw.get_mut(index.index())
    }
}

impl<I: Idx, T> Default for IndexVec<I, T> {
    #[inline]
    fn default() -> Self {
        IndexVec { raw: Vec::new(), _marker: PhantomData }
    }
}

impl<I: Idx, T> Index<I> for IndexVec<I, T> {
    type Output = T;

    #[inline]
    fn index(&self, index: I) -> &T {
        &self.raw[index.index()]
    }
}

impl<I: Idx, T> IndexMut<I> for IndexVec<I, T> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut T {
        &mut self.raw[index.index()]
    }
}

impl<I: Idx, T> IntoIterator for IndexVec<I, T> {
    type Item = T;
    type IntoIter = vec::IntoIter<T>;

    #[inline]
    fn into_iter(self) -> vec::IntoIter<T> {
        self.raw.into_iter()
    }
}

impl<'a, I: Idx, T> IntoIterator for &'a IndexVec<I, T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> slice::Iter<'a, T> {
        self.raw.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    define_index!(TestIndex);

    #[test]
    fn push_returns_sequential_indices() {
        let mut v: IndexVec<TestIndex, &str> = IndexVec::default();
        let a = v.push("a");
        let b = v.push("b");
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(v[b], "b");
        v[a] = "z";
        let collected: Vec<_> = v.iter_enumerated().map(|(i, s)| (i.index(), *s)).collect();
        assert_eq!(collected, vec![(0, "z"), (1, "b")]);
        assert!(v.get(TestIndex::new(2)).is_none());
    }
}
