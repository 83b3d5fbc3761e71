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


use num_traits::{PrimInt, Signed};

/// A timestep that may be absent.
///
/// Ships start out without a docked timestep or a last cargo event. Rather
/// than carrying an `Option<T>` discriminant next to every such field, the
/// absence is encoded with a sentinel: timesteps are non-negative, so any
/// negative value means "none".
///
/// The raw sentinel is observable through [`MaybeTimestep::raw`]. The release
/// rule relies on it: a ship that never had a cargo event reports a raw last
/// cargo timestep of `-1`.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaybeTimestep<T>(T);

impl<T> MaybeTimestep<T>
where
    T: PrimInt + Signed,
{
    /// Creates an absent timestep.
    ///
    /// ```rust
    /// # use wharf_model::time::MaybeTimestep;
    /// let none: MaybeTimestep<i64> = MaybeTimestep::none();
    /// assert!(none.is_none());
    /// assert_eq!(none.raw(), -1);
    /// ```
    #[inline]
    pub fn none() -> Self {
        MaybeTimestep(T::zero() - T::one())
    }

    /// The first timestep of a run.
    #[inline]
    pub fn zero() -> Self {
        MaybeTimestep(T::zero())
    }

    /// Creates a present timestep.
    ///
    /// # Panics
    ///
    /// Panics if `value` is negative.
    #[inline]
    pub fn some(value: T) -> Self
    where
        T: std::fmt::Display,
    {
        assert!(
            value >= T::zero(),
            "called `MaybeTimestep::some` with a negative timestep: {}",
            value
        );
        MaybeTimestep(value)
    }

    /// Returns `true` if no timestep is recorded.
    #[inline]
    pub fn is_none(&self) -> bool {
        self.0 < T::zero()
    }

    /// Returns `true` if a timestep is recorded.
    #[inline]
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Returns the raw value, including the sentinel when absent.
    #[inline]
    pub fn raw(&self) -> T {
        self.0
    }

    /// Returns `true` if a timestep is recorded and equals `t`.
    #[inline]
    pub fn is(&self, t: T) -> bool {
        self.is_some() && self.0 == t
    }

    /// Converts into an `Option<T>`.
    #[inline]
    pub fn into_option(self) -> Option<T> {
        if self.is_none() { None } else { Some(self.0) }
    }
}

impl<T> Default for MaybeTimestep<T>
where
    T: PrimInt + Signed,
{
    #[inline]
    fn default() -> Self {
        Self::none()
    }
}

impl<T> From<Option<T>> for MaybeTimestep<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    #[inline]
    fn from(value: Option<T>) -> Self {
        match value {
            Some(t) => Self::some(t),
            None => Self::none(),
        }
    }
}

impl<T> From<MaybeTimestep<T>> for Option<T>
where
    T: PrimInt + Signed,
{
    #[inline]
    fn from(value: MaybeTimestep<T>) -> Self {
        value.into_option()
    }
}

impl<T> std::fmt::Debug for MaybeTimestep<T>
where
    T: PrimInt + Signed + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "MaybeTimestep(None)")
        } else {
            write!(f, "MaybeTimestep({:?})", self.0)
        }
    }
}

impl<T> std::fmt::Display for MaybeTimestep<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "-")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MaybeTimestep;

    type IntegerType = i64;

    #[test]
    fn test_default_is_none_with_minus_one_sentinel() {
        let t = MaybeTimestep::<IntegerType>::default();
        assert!(t.is_none());
        assert!(!t.is_some());
        assert_eq!(t.raw(), -1);
        assert_eq!(t.into_option(), None);
    }

    #[test]
    fn test_zero_is_a_valid_timestep() {
        let t = MaybeTimestep::<IntegerType>::some(0);
        assert!(t.is_some());
        assert!(t.is(0));
        assert!(!t.is(1));
        assert_eq!(Option::<IntegerType>::from(t), Some(0));
        assert_eq!(MaybeTimestep::<IntegerType>::zero(), t);
    }

    #[test]
    fn test_none_never_matches_a_timestep() {
        let t = MaybeTimestep::<IntegerType>::none();
        assert!(!t.is(-1));
        assert!(!t.is(0));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(MaybeTimestep::<IntegerType>::from(Some(9)).raw(), 9);
        assert!(MaybeTimestep::<IntegerType>::from(None).is_none());
    }

    #[test]
    #[should_panic(expected = "negative timestep")]
    fn test_some_rejects_negative_values() {
        let _ = MaybeTimestep::<IntegerType>::some(-3);
    }

    #[test]
    fn test_display() {
        assert_eq!(MaybeTimestep::<IntegerType>::some(4).to_string(), "4");
        assert_eq!(MaybeTimestep::<IntegerType>::none().to_string(), "-");
    }
}
