//! Total random access to N-dimensional samples.
//!
//! Decomposition reads samples through [`RandomAccess`], which must return a value for
//! every integer location. Stored arrays are made total by pairing them with an
//! [`Extension`] policy in an [`Extended`] view; unbounded analytic sources can be
//! plain closures over the location.
//!
//! ```rust
//! use bspline_nd::{Extended, Extension, Interval, RandomAccess};
//!
//! let vals = [1.0_f64, 2.0, 3.0];
//! let itvl = Interval::from_dims([3]);
//!
//! let mirror = Extended::new(itvl, &vals, Extension::MirrorSingle).unwrap();
//! assert_eq!(mirror.get([-1]), 2.0);
//! assert_eq!(mirror.get([3]), 2.0);
//!
//! let border = Extended::new(itvl, &vals, Extension::Border).unwrap();
//! assert_eq!(border.get([10]), 3.0);
//!
//! // Any closure over the location is a source as well
//! let ramp = |loc: [isize; 1]| loc[0] as f64;
//! assert_eq!(ramp.get([-7]), -7.0);
//! ```
use num_traits::Zero;

use crate::{Error, Interval, Result};

/// Rule for the value of samples outside the stored range.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Extension<T> {
    /// Zero fill.
    Zero,
    /// Fill with a fixed value.
    Constant(T),
    /// Mirror without repeating the boundary sample: `... c b | a b c | b a ...`
    #[default]
    MirrorSingle,
    /// Mirror repeating the boundary sample: `... b a | a b c | c b ...`
    MirrorDouble,
    /// Repeat the nearest boundary sample: `... a a | a b c | c c ...`
    Border,
}

impl<T> Extension<T> {
    /// Map index `i` of an axis with `n` stored samples onto `0..n`.
    ///
    /// Returns `None` where the value comes from the fill instead of the stored
    /// samples: outside the range for `Zero` and `Constant`, and anywhere on an
    /// empty axis.
    #[inline]
    pub fn resolve(&self, i: isize, n: usize) -> Option<usize> {
        if n == 0 {
            return None;
        }
        let len = n as isize;
        if (0..len).contains(&i) {
            return Some(i as usize);
        }

        match self {
            Self::Zero | Self::Constant(_) => None,
            Self::MirrorSingle => {
                if n == 1 {
                    return Some(0);
                }
                let period = 2 * len - 2;
                let m = i.rem_euclid(period);
                Some(if m < len { m } else { period - m } as usize)
            }
            Self::MirrorDouble => {
                let period = 2 * len;
                let m = i.rem_euclid(period);
                Some(if m < len { m } else { period - 1 - m } as usize)
            }
            Self::Border => Some(i.clamp(0, len - 1) as usize),
        }
    }

    /// Convert the fill value to another type.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Extension<U> {
        match self {
            Self::Zero => Extension::Zero,
            Self::Constant(v) => Extension::Constant(f(v)),
            Self::MirrorSingle => Extension::MirrorSingle,
            Self::MirrorDouble => Extension::MirrorDouble,
            Self::Border => Extension::Border,
        }
    }
}

impl<T: Copy + Zero> Extension<T> {
    /// Value used where [`Extension::resolve`] finds no stored sample.
    #[inline]
    pub fn fill(&self) -> T {
        match self {
            Self::Constant(v) => *v,
            _ => T::zero(),
        }
    }
}

/// Read access to samples at any integer location.
pub trait RandomAccess<T, const N: usize> {
    /// Sample value at `loc`. Must be defined for every location.
    fn get(&self, loc: [isize; N]) -> T;
}

impl<T, F, const N: usize> RandomAccess<T, N> for F
where
    F: Fn([isize; N]) -> T,
{
    #[inline]
    fn get(&self, loc: [isize; N]) -> T {
        self(loc)
    }
}

/// A flat C-ordered array over an [`Interval`], extended to every location by a policy.
#[derive(Clone, Copy, Debug)]
pub struct Extended<'a, T, const N: usize> {
    interval: Interval<N>,
    vals: &'a [T],
    extension: Extension<T>,
    dimprod: [usize; N],
}

impl<'a, T: Copy + Zero, const N: usize> Extended<'a, T, N> {
    /// Pair stored values with an extension policy.
    ///
    /// # Errors
    /// * If `vals` does not hold exactly one value per location of `interval`
    pub fn new(interval: Interval<N>, vals: &'a [T], extension: Extension<T>) -> Result<Self> {
        if vals.len() != interval.len() {
            return Err(Error::ShapeMismatch {
                expected: interval.len(),
                actual: vals.len(),
            });
        }
        Ok(Self::from_parts(interval, vals, extension))
    }

    /// Caller guarantees `vals.len() == interval.len()`.
    pub(crate) fn from_parts(interval: Interval<N>, vals: &'a [T], extension: Extension<T>) -> Self {
        Self {
            interval,
            vals,
            extension,
            dimprod: interval.dimprod(),
        }
    }

    pub fn interval(&self) -> Interval<N> {
        self.interval
    }

    pub fn extension(&self) -> Extension<T> {
        self.extension
    }

    pub fn vals(&self) -> &'a [T] {
        self.vals
    }
}

impl<T: Copy + Zero, const N: usize> RandomAccess<T, N> for Extended<'_, T, N> {
    #[inline]
    fn get(&self, loc: [isize; N]) -> T {
        let min = self.interval.min();
        let dims = self.interval.dims();

        let mut i = 0;
        for d in 0..N {
            match self.extension.resolve(loc[d] - min[d], dims[d]) {
                Some(j) => i += j * self.dimprod[d],
                None => return self.extension.fill(),
            }
        }

        self.vals[i]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_resolve_mirror_single() {
        let ext = Extension::<f64>::MirrorSingle;
        // ... c b | a b c | b a b c ...
        let expected = [(-4, 0), (-3, 1), (-2, 2), (-1, 1), (0, 0), (2, 2), (3, 1), (4, 0), (5, 1), (6, 2)];
        for (i, j) in expected {
            assert_eq!(ext.resolve(i, 3), Some(j), "index {i}");
        }
        assert_eq!(ext.resolve(-5, 1), Some(0));
    }

    #[test]
    fn test_resolve_mirror_double() {
        let ext = Extension::<f64>::MirrorDouble;
        // ... b a | a b c | c b a | a ...
        let expected = [(-4, 2), (-3, 2), (-2, 1), (-1, 0), (3, 2), (4, 1), (5, 0), (6, 0), (7, 1)];
        for (i, j) in expected {
            assert_eq!(ext.resolve(i, 3), Some(j), "index {i}");
        }
    }

    #[test]
    fn test_resolve_fill_and_border() {
        assert_eq!(Extension::<f64>::Zero.resolve(-1, 3), None);
        assert_eq!(Extension::Constant(5.0).resolve(3, 3), None);
        assert_eq!(Extension::Constant(5.0).resolve(1, 3), Some(1));
        assert_eq!(Extension::<f64>::Border.resolve(-10, 3), Some(0));
        assert_eq!(Extension::<f64>::Border.resolve(10, 3), Some(2));
        assert_eq!(Extension::<f64>::Border.resolve(0, 0), None);
    }

    #[test]
    fn test_extended_2d() {
        // 2x3 array
        let vals = [0.0, 1.0, 2.0, 10.0, 11.0, 12.0];
        let itvl = Interval::new([5, -1], [2, 3]);

        let zero = Extended::new(itvl, &vals, Extension::Zero).unwrap();
        assert_eq!(zero.get([5, -1]), 0.0);
        assert_eq!(zero.get([6, 1]), 12.0);
        assert_eq!(zero.get([7, 0]), 0.0);

        let constant = Extended::new(itvl, &vals, Extension::Constant(-1.0)).unwrap();
        assert_eq!(constant.get([4, 0]), -1.0);
        assert_eq!(constant.get([5, 0]), 1.0);

        let mirror = Extended::new(itvl, &vals, Extension::MirrorSingle).unwrap();
        assert_eq!(mirror.get([7, -2]), 1.0);

        let border = Extended::new(itvl, &vals, Extension::Border).unwrap();
        assert_eq!(border.get([100, -100]), 10.0);
    }

    #[test]
    fn test_extended_shape_mismatch() {
        let vals = [0.0_f32; 5];
        let err = Extended::new(Interval::from_dims([2, 3]), &vals, Extension::Zero).unwrap_err();
        assert_eq!(
            err,
            Error::ShapeMismatch {
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn test_map_fill() {
        let ext = Extension::Constant(3_u8).map(f64::from);
        assert_eq!(ext, Extension::Constant(3.0));
        assert_eq!(ext.fill(), 3.0);
        assert_eq!(Extension::<u8>::Border.map(f64::from).fill(), 0.0);
    }
}
