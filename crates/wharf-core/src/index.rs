// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.


//! # Strongly Typed Indices
//!
//! The scheduler juggles several index spaces at once: docks, the cranes of a
//! dock, ships in creation order and workers of the authentication pool. All
//! of them are plain positions into a `Vec`, which makes it far too easy to
//! hand a crane position to something that expects a dock.
//!
//! `TypedIndex<T>` is a `#[repr(transparent)]` wrapper around `usize` carrying
//! a tag type `T: TypedIndexTag`. The tag only exists at the type level and
//! names the index space for `Debug`/`Display`.
//!
//! ```rust
//! use wharf_core::index::{TypedIndex, TypedIndexTag};
//!
//! #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
//! struct MooringTag;
//! impl TypedIndexTag for MooringTag { const NAME: &'static str = "MooringIndex"; }
//!
//! type MooringIndex = TypedIndex<MooringTag>;
//! let b = MooringIndex::new(3);
//! assert_eq!(b.get(), 3);
//! assert_eq!(b.to_string(), "MooringIndex(3)");
//! ```

use std::marker::PhantomData;

/// Names an index space for debugging and display purposes.
pub trait TypedIndexTag: Clone {
    const NAME: &'static str;
}

/// A `usize` position tagged with the index space it belongs to.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedIndex<T> {
    index: usize,
    _marker: PhantomData<T>,
}

impl<T> TypedIndex<T> {
    /// Creates a new index from its raw position.
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// Returns the raw position.
    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.index
    }

    /// Returns the index directly following this one.
    #[inline(always)]
    pub const fn next(&self) -> Self {
        Self::new(self.index + 1)
    }

    /// Iterates `TypedIndex::new(0)..TypedIndex::new(len)`.
    ///
    /// ```rust
    /// # use wharf_core::index::{TypedIndex, TypedIndexTag};
    /// # #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    /// # struct Tag;
    /// # impl TypedIndexTag for Tag { const NAME: &'static str = "Idx"; }
    /// let all: Vec<_> = TypedIndex::<Tag>::range(3).map(|i| i.get()).collect();
    /// assert_eq!(all, vec![0, 1, 2]);
    /// ```
    #[inline]
    pub fn range(len: usize) -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..len).map(Self::new)
    }
}

impl<T> std::fmt::Debug for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> std::fmt::Display for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> From<usize> for TypedIndex<T> {
    #[inline]
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl<T> From<TypedIndex<T>> for usize {
    #[inline]
    fn from(typed_index: TypedIndex<T>) -> Self {
        typed_index.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    struct TestTag;

    impl TypedIndexTag for TestTag {
        const NAME: &'static str = "TestIdx";
    }

    type TestIndex = TypedIndex<TestTag>;

    #[test]
    fn test_round_trips_through_usize() {
        let idx: TestIndex = 42.into();
        assert_eq!(idx.get(), 42);
        let raw: usize = idx.into();
        assert_eq!(raw, 42);
    }

    #[test]
    fn test_display_uses_tag_name() {
        let idx = TestIndex::new(7);
        assert_eq!(format!("{}", idx), "TestIdx(7)");
        assert_eq!(format!("{:?}", idx), "TestIdx(7)");
    }

    #[test]
    fn test_next_and_range() {
        assert_eq!(TestIndex::new(4).next(), TestIndex::new(5));

        let collected: Vec<TestIndex> = TestIndex::range(3).collect();
        assert_eq!(
            collected,
            vec![TestIndex::new(0), TestIndex::new(1), TestIndex::new(2)]
        );
        assert_eq!(TestIndex::range(0).len(), 0);
    }

    #[test]
    fn test_ordering_follows_position() {
        assert!(TestIndex::new(1) < TestIndex::new(2));
    }
}
