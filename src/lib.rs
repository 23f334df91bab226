//! N-dimensional B-spline interpolation of orders 0 through 5: recursive coefficient
//! decomposition of sampled data, and kernel evaluation of the resulting spline.
//!
//! Interpolating with a B-spline of degree `p` is a two-step process. First, the
//! samples are turned into spline coefficients by a separable all-pole prefilter, run
//! as a causal / anti-causal recursion along each axis (Unser 1999). Then the spline is
//! evaluated anywhere as a weighted sum of the coefficients in a `(p + 1)^ndims` window.
//!
//! Decomposition works on regions of an unbounded sample source, padding each region so
//! that large arrays can be decomposed block by block without seams.
//!
//! | Method                                   | RAM                   | Cost                          |
//! |------------------------------------------|-----------------------|-------------------------------|
//! | BSplineDecomposition::decompose          | O(padded region)      | O(ndims * npoles * region)    |
//! | BSplineDecomposition::decompose_blocks   | O(region)             | O(ndims * npoles * region)    |
//! | BSplineInterpolator::interp_one          | O(ndims)              | O((p + 1)^ndims)              |
//! | interpolate::interpn                     | O(region)             | decomposition + evaluation    |
//!
//! # Example: Decompose and Evaluate
//! ```rust
//! use bspline_nd::{BSplineDecomposition, BSplineInterpolator, Coefficients, Extension};
//!
//! // Values at grid points 0..4 x 0..5, C-ordered
//! let dims = [4, 5];
//! let z: Vec<f64> = (0..20).map(|i| (i % 5) as f64).collect();
//!
//! // Quintic coefficients, with samples mirrored past the edges of the grid
//! let extension = Extension::MirrorSingle;
//! let decomposition = BSplineDecomposition::<2>::new(5).unwrap();
//! let coefs: Coefficients<f64, 2> = decomposition.decompose_array(dims, &z, extension).unwrap();
//!
//! // Observation points to interpolate / extrapolate
//! let xobs = [0.0_f64, 1.5, 3.0];
//! let yobs = [0.0, 2.0, 4.0];
//! let obs = [&xobs[..], &yobs[..]];
//! let mut out = [0.0; 3];
//!
//! // Evaluate with the coefficients continued by the same policy
//! let extended = coefs.extend(extension);
//! let interpolator = BSplineInterpolator::new(5, &extended).unwrap();
//! interpolator.interp(&obs, &mut out).unwrap();
//! assert!((out[1] - 2.0).abs() < 1e-3);
//! ```
//!
//! # Example: One-Shot Interpolation
//! ```rust
//! use bspline_nd::{interpolate, Extension};
//!
//! let dims = [6];
//! let z = [0.0_f64, 1.0, 4.0, 9.0, 16.0, 25.0];
//! let xobs = [2.0_f64, 2.5];
//! let mut out = [0.0; 2];
//!
//! interpolate::interpn(3, &dims, &z, Extension::MirrorSingle, &[&xobs[..]], &mut out).unwrap();
//! assert!((out[0] - 4.0).abs() < 1e-4);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
// These "needless" range loops are a significant speedup
#![allow(clippy::needless_range_loop)]

extern crate alloc;

pub mod error;
pub use error::{Error, Result};

pub mod interval;
pub use interval::{Interval, IntervalIter};

pub mod extend;
pub use extend::{Extended, Extension, RandomAccess};

pub mod kernel;
pub use kernel::{Poles, SplineOrder};

pub mod decompose;
pub use decompose::{
    BSplineDecomposition, Coefficients, DEFAULT_HORIZON, DEFAULT_PADDING_WIDTH, DEFAULT_TOLERANCE,
    Horizon,
};

pub mod interpolate;
pub use interpolate::BSplineInterpolator;

#[cfg(feature = "std")]
pub mod utils;

#[cfg(all(test, feature = "std"))]
pub(crate) mod testing;
