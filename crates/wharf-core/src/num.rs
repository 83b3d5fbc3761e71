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


//! # Timestep Numerics
//!
//! The model and the scheduler are generic over the signed integer type used
//! for timesteps. The `PortNumeric` alias gathers every bound the model and the scheduler rely on
//! so signatures only have to name one trait.
//!
//! Timesteps are never negative in a well-formed run; negative values are
//! reserved as the "absent" sentinel by `wharf_model::time::MaybeTimestep`.

use num_traits::{FromPrimitive, PrimInt, Signed, ToPrimitive};
use std::hash::Hash;

/// A trait alias for integer types a timestep can be expressed in.
/// In practice these are `i16`, `i32`, `i64` and `isize`.
pub trait PortNumeric:
    PrimInt
    + Signed
    + FromPrimitive
    + ToPrimitive
    + std::fmt::Debug
    + std::fmt::Display
    + Hash
    + Send
    + Sync
    + 'static
{
}

impl<T> PortNumeric for T where
    T: PrimInt
        + Signed
        + FromPrimitive
        + ToPrimitive
        + std::fmt::Debug
        + std::fmt::Display
        + Hash
        + Send
        + Sync
        + 'static
{
}

#[cfg(test)]
mod tests {
    use super::PortNumeric;

    fn elapsed<T: PortNumeric>(from: T, to: T) -> T {
        to - from
    }

    #[test]
    fn test_common_signed_types_qualify() {
        assert_eq!(elapsed(5i16, 7i16), 2);
        assert_eq!(elapsed(5i32, 7i32), 2);
        assert_eq!(elapsed(5i64, 7i64), 2);
        assert_eq!(elapsed(5isize, 7isize), 2);
    }
}
