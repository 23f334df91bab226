//! Evaluation of an N-dimensional B-spline from its coefficients.
//!
//! The value at a real-valued location `x` is the separable sum
//! `sum_k c[k] prod_d beta_p(x[d] - k[d])` over the `(p + 1)^N` grid points whose
//! basis functions cover `x`. Coefficients are read through [`RandomAccess`], so the
//! caller decides how the coefficient array continues past its edges.
//!
//! ```rust
//! use bspline_nd::{BSplineDecomposition, BSplineInterpolator, Coefficients, Extension};
//!
//! // Samples on an 8x8 grid
//! let dims = [8, 8];
//! let z: Vec<f64> = (0..64).map(|i| (i / 8) as f64).collect();
//!
//! // Decompose, then evaluate with the same extension policy
//! let extension = Extension::MirrorSingle;
//! let decomposition = BSplineDecomposition::<2>::cubic();
//! let coefs: Coefficients<f64, 2> = decomposition.decompose_array(dims, &z, extension).unwrap();
//! let extended = coefs.extend(extension);
//! let interpolator = BSplineInterpolator::new(3, &extended).unwrap();
//!
//! // Between grid points
//! let v = interpolator.interp_one([3.5, 2.25]).unwrap();
//! assert!((v - 3.5).abs() < 1e-6);
//!
//! // Far outside the grid, the mirrored samples are used
//! let v = interpolator.interp_one([-2.0, -2.0]).unwrap();
//! assert!((v - 2.0).abs() < 1e-4);
//! ```
use core::marker::PhantomData;

use num_traits::{AsPrimitive, Bounded, Float, NumCast};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::kernel::{MAX_SUPPORT, SplineOrder};
use crate::{BSplineDecomposition, Coefficients, Error, Extension, RandomAccess, Result};

/// Decompose samples on a grid and evaluate the resulting spline, in up to 8 dimensions.
///
/// Grid points sit at the integer locations `0..dims[d]` on each axis, observation
/// coordinates are in the same units, and `vals` is C-ordered
/// (z(x0, y0), z(x0, y1), ..., z(x0, yn), z(x1, y0), ...).
/// `extension` continues both the samples and the coefficients past the grid.
///
/// Decomposition uses the default settings, with horizons chosen per pole for
/// [`crate::DEFAULT_TOLERANCE`].
/// For repeated evaluation on the same samples, keep the coefficients and use
/// [`BSplineInterpolator`] directly instead.
///
/// # Errors
/// * If `order` is greater than 5
/// * If there are no dimensions, or more than 8
/// * If the number of values does not match the grid
/// * If the observation coordinates do not match the number of dimensions or the output size
/// * If an observation coordinate is not finite
pub fn interpn<T>(
    order: usize,
    dims: &[usize],
    vals: &[T],
    extension: Extension<T>,
    obs: &[&[T]],
    out: &mut [T],
) -> Result<()>
where
    T: Float + AsPrimitive<f64> + Send + Sync,
    f64: AsPrimitive<T>,
{
    // Expanding out and using the specialized version for each size
    macro_rules! dispatch {
        ($n:literal) => {{
            let dims: [usize; $n] = dims.try_into().map_err(|_| Error::DimensionMismatch)?;
            interpn_fixed::<T, $n>(order, dims, vals, extension, obs, out)
        }};
    }

    match dims.len() {
        0 => Err(Error::DimensionMismatch),
        1 => dispatch!(1),
        2 => dispatch!(2),
        3 => dispatch!(3),
        4 => dispatch!(4),
        5 => dispatch!(5),
        6 => dispatch!(6),
        7 => dispatch!(7),
        8 => dispatch!(8),
        n => Err(Error::TooManyDimensions(n)),
    }
}

/// Evaluate interpolant, allocating a new Vec for the output.
///
/// For best results, use the `interpn` function with preallocated output;
/// allocation has a significant performance cost, and should be used sparingly.
#[cfg(feature = "std")]
pub fn interpn_alloc<T>(
    order: usize,
    dims: &[usize],
    vals: &[T],
    extension: Extension<T>,
    obs: &[&[T]],
) -> Result<Vec<T>>
where
    T: Float + AsPrimitive<f64> + Send + Sync,
    f64: AsPrimitive<T>,
{
    let mut out = vec![T::zero(); obs.first().map_or(0, |x| x.len())];
    interpn(order, dims, vals, extension, obs, &mut out)?;
    Ok(out)
}

fn interpn_fixed<T, const N: usize>(
    order: usize,
    dims: [usize; N],
    vals: &[T],
    extension: Extension<T>,
    obs: &[&[T]],
    out: &mut [T],
) -> Result<()>
where
    T: Float + AsPrimitive<f64> + Send + Sync,
    f64: AsPrimitive<T>,
{
    let coefs: Coefficients<T, N> =
        BSplineDecomposition::<N>::new(order)?.decompose_array(dims, vals, extension)?;
    let extended = coefs.extend(extension);
    BSplineInterpolator::new(order, &extended)?.interp(obs, out)
}

/// An N-dimensional B-spline evaluator over a coefficient source.
///
/// Evaluation is O((p + 1)^N) per point and reads each coefficient in the
/// window once. Weights are computed per call on the stack, and the recursion over
/// dimensions has constant depth N, so evaluation does not allocate.
///
/// The spline order must be the one the coefficients were decomposed with.
pub struct BSplineInterpolator<'a, S, A, const N: usize> {
    order: SplineOrder,

    /// Coefficients, defined at every integer location
    coefs: &'a A,

    /// Whether to saturate at the destination type's bounds in `interp_as`
    clipping: bool,

    _coef: PhantomData<S>,
}

impl<'a, S, A, const N: usize> BSplineInterpolator<'a, S, A, N>
where
    S: Float + AsPrimitive<f64>,
    f64: AsPrimitive<S>,
    A: RandomAccess<S, N>,
{
    /// Build an evaluator for splines of degree `order`.
    ///
    /// # Errors
    /// * If `order` is greater than 5
    pub fn new(order: usize, coefs: &'a A) -> Result<Self> {
        Ok(Self::from_order(SplineOrder::try_from(order)?, coefs))
    }

    pub fn from_order(order: SplineOrder, coefs: &'a A) -> Self {
        Self {
            order,
            coefs,
            clipping: true,
            _coef: PhantomData,
        }
    }

    /// Enable or disable saturation at the destination type's bounds in
    /// [`Self::interp_as`]. Enabled by default.
    pub fn with_clipping(mut self, clipping: bool) -> Self {
        self.clipping = clipping;
        self
    }

    pub fn order(&self) -> SplineOrder {
        self.order
    }

    pub fn clipping(&self) -> bool {
        self.clipping
    }

    /// Evaluate at a contiguous list of observation points.
    ///
    /// # Errors
    ///   * If the number of coordinate slices is not N
    ///   * If the coordinate slices and the output differ in length
    ///   * If any coordinate is not finite
    pub fn interp<T: Float>(&self, x: &[&[T]], out: &mut [S]) -> Result<()> {
        check_obs(x, out.len(), N)?;
        let p = &mut [T::zero(); N];
        for i in 0..out.len() {
            (0..N).for_each(|j| p[j] = x[j][i]);
            out[i] = self.interp_one(*p)?;
        }
        Ok(())
    }

    /// Evaluate the spline at a point.
    ///
    /// # Errors
    /// * If any coordinate is not finite, or too large for a grid index
    pub fn interp_one<T: Float>(&self, x: [T; N]) -> Result<S> {
        Ok(self.eval(x)?.as_())
    }

    /// Evaluate at a contiguous list of observation points, converting each value to `U`.
    ///
    /// With clipping enabled, values beyond `U`'s range saturate at its bounds.
    /// Fractional values truncate toward zero for integer destinations.
    ///
    /// # Errors
    ///   * If the observation sizes do not match, as in [`Self::interp`]
    ///   * If a value cannot be represented in `U` (out of range without clipping, or NaN
    ///     for integer destinations)
    pub fn interp_as<T: Float, U: Bounded + NumCast>(&self, x: &[&[T]], out: &mut [U]) -> Result<()> {
        check_obs(x, out.len(), N)?;
        let p = &mut [T::zero(); N];
        for i in 0..out.len() {
            (0..N).for_each(|j| p[j] = x[j][i]);
            out[i] = self.cast(self.eval(*p)?)?;
        }
        Ok(())
    }

    /// Evaluate at a contiguous list of observation points in parallel.
    ///
    /// Produces exactly the same values as [`Self::interp`].
    ///
    /// # Errors
    /// * As in [`Self::interp`]
    #[cfg(feature = "parallel")]
    pub fn interp_par<T: Float + Sync>(&self, x: &[&[T]], out: &mut [S]) -> Result<()>
    where
        S: Send + Sync,
        A: Sync,
    {
        check_obs(x, out.len(), N)?;
        out.par_iter_mut().enumerate().try_for_each(|(i, o)| {
            let mut p = [T::zero(); N];
            (0..N).for_each(|j| p[j] = x[j][i]);
            *o = self.interp_one(p)?;
            Ok(())
        })
    }

    /// Spline value at `x` in f64.
    #[inline]
    fn eval<T: Float>(&self, x: [T; N]) -> Result<f64> {
        let order = self.order;

        // Window start and kernel weights on each axis
        let mut start = [0_isize; N];
        let mut weights = [[0.0_f64; MAX_SUPPORT]; N];
        for d in 0..N {
            let xd = x[d].to_f64().ok_or(Error::UnrepresentableCoordinate)?;
            start[d] = order.window_start(xd)?;
            for k in 0..order.support() {
                weights[d][k] = order.basis(xd - (start[d] + k as isize) as f64);
            }
        }

        let mut loc = start;
        Ok(self.populate(N, &start, &mut loc, &weights))
    }

    /// Recursive evaluation of the weighted sum on each dimension
    #[inline]
    fn populate(
        &self,
        dim: usize,
        start: &[isize; N],
        loc: &mut [isize; N],
        weights: &[[f64; MAX_SUPPORT]; N],
    ) -> f64 {
        match dim {
            // If we have arrived at a leaf, read the coefficient
            0 => self.coefs.get(*loc).as_(),

            // Otherwise, continue recursion
            _ => {
                let next_dim = dim - 1;
                let mut acc = 0.0;
                for i in 0..self.order.support() {
                    loc[next_dim] = start[next_dim] + i as isize;
                    acc += weights[next_dim][i] * self.populate(next_dim, start, loc, weights);
                }
                loc[next_dim] = start[next_dim]; // Reset for next usage
                acc
            }
        }
    }

    /// Convert a value for output, saturating if clipping is enabled.
    #[inline]
    fn cast<U: Bounded + NumCast>(&self, v: f64) -> Result<U> {
        if self.clipping && !v.is_nan() {
            let lo = U::min_value();
            if v <= lo.to_f64().unwrap_or(f64::NEG_INFINITY) {
                return Ok(lo);
            }
            let hi = U::max_value();
            if v >= hi.to_f64().unwrap_or(f64::INFINITY) {
                return Ok(hi);
            }
        }
        <U as NumCast>::from(v).ok_or(Error::UnrepresentableValue)
    }
}

/// Check that there is one coordinate slice per dimension, each matching the output size.
fn check_obs<T>(x: &[&[T]], n: usize, ndims: usize) -> Result<()> {
    if x.len() != ndims || x.iter().any(|xx| xx.len() != n) {
        return Err(Error::DimensionMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::{randn, rng_fixed_seed};
    use crate::utils::{linspace, meshgrid};
    use crate::{Extended, Interval};

    #[test]
    fn test_constant_cubic() {
        let vals = [1.0; 32];
        let coefs: Coefficients<f64, 1> = BSplineDecomposition::<1>::cubic()
            .decompose_array([32], &vals, Extension::MirrorSingle)
            .unwrap();
        let extended = coefs.extend(Extension::MirrorSingle);
        let interpolator = BSplineInterpolator::new(3, &extended).unwrap();
        assert!((interpolator.interp_one([15.5]).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_linear_1d() {
        let vals: Vec<f64> = (0..32).map(|i| 1.0 + i as f64).collect();
        for p in 2..=3 {
            let coefs: Coefficients<f64, 1> = BSplineDecomposition::<1>::new(p)
                .unwrap()
                .decompose_array([32], &vals, Extension::MirrorSingle)
                .unwrap();
            let extended = coefs.extend(Extension::MirrorSingle);
            let interpolator = BSplineInterpolator::new(p, &extended).unwrap();
            let v = interpolator.interp_one([15.5]).unwrap();
            assert!((v - 16.5).abs() < 0.1, "order {p}: {v}");
        }
    }

    /// Each order reproduces the samples at the grid points
    #[test]
    fn test_interpolates_samples() {
        let rng = &mut rng_fixed_seed();
        let dims = [9, 11];
        let z = randn::<f64>(rng, dims[0] * dims[1]);
        let itvl = Interval::from_dims(dims);

        for p in 0..=5 {
            let decomposition = BSplineDecomposition::<2>::new(p)
                .unwrap()
                .with_tolerance(1e-12)
                .unwrap();
            let coefs: Coefficients<f64, 2> = decomposition
                .decompose_array(dims, &z, Extension::MirrorSingle)
                .unwrap();
            let extended = coefs.extend(Extension::MirrorSingle);
            let interpolator = BSplineInterpolator::new(p, &extended).unwrap();

            for (i, loc) in itvl.iter().enumerate() {
                let v = interpolator
                    .interp_one([loc[0] as f64, loc[1] as f64])
                    .unwrap();
                assert!((v - z[i]).abs() < 1e-8, "order {p} at {loc:?}: {v} vs {}", z[i]);
            }
        }
    }

    /// Evaluation far outside the coefficients follows the coefficient extension
    #[test]
    fn test_out_of_bounds() {
        // Ramp along the first axis
        let dims = [8, 8];
        let z: Vec<f64> = (0..64).map(|i| (i / 8) as f64).collect();
        let coefs: Coefficients<f64, 2> = BSplineDecomposition::<2>::cubic()
            .decompose_array(dims, &z, Extension::MirrorSingle)
            .unwrap();
        let x = [-2.0, -2.0];

        let constant = coefs.extend(Extension::Constant(7.0));
        let v = BSplineInterpolator::new(3, &constant).unwrap().interp_one(x).unwrap();
        assert!((v - 7.0).abs() < 1e-12);

        let zero = coefs.extend(Extension::Zero);
        let v = BSplineInterpolator::new(3, &zero).unwrap().interp_one(x).unwrap();
        assert!(v.abs() < 1e-12);

        // Mirrored about the first sample: -2 -> 2
        let single = coefs.extend(Extension::MirrorSingle);
        let v = BSplineInterpolator::new(3, &single).unwrap().interp_one(x).unwrap();
        assert!((v - 2.0).abs() < 1e-4);

        // Mirrored about -0.5: -2 -> 1
        let double = coefs.extend(Extension::MirrorDouble);
        let v = BSplineInterpolator::new(3, &double).unwrap().interp_one(x).unwrap();
        assert!((v - 1.0).abs() < 1e-4);

        // Far away in every direction, without error
        let v = BSplineInterpolator::new(3, &single)
            .unwrap()
            .interp_one([1e6, -1e6])
            .unwrap();
        assert!(v.is_finite());
    }

    /// Repeated evaluation gives bit-identical results
    #[test]
    fn test_deterministic() {
        let rng = &mut rng_fixed_seed();
        let z = randn::<f64>(rng, 6 * 7 * 8);
        let coefs: Coefficients<f64, 3> = BSplineDecomposition::<3>::new(4)
            .unwrap()
            .decompose_array([6, 7, 8], &z, Extension::Border)
            .unwrap();
        let extended = coefs.extend(Extension::Border);
        let interpolator = BSplineInterpolator::new(4, &extended).unwrap();

        let x = [2.3, -0.7, 5.5];
        let a = interpolator.interp_one(x).unwrap();
        let b = interpolator.interp_one(x).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_interp_as_clipping() {
        let high = [300.0_f64; 16];
        let low = [-5.0_f64; 16];
        let x = [1.5, 7.25];
        let obs = [&x[..]];
        let mut out = [0_u8; 2];

        let coefs: Coefficients<f64, 1> = BSplineDecomposition::<1>::cubic()
            .decompose_array([16], &high, Extension::Border)
            .unwrap();
        let extended = coefs.extend(Extension::Border);
        let interpolator = BSplineInterpolator::new(3, &extended).unwrap();
        assert!(interpolator.clipping());
        interpolator.interp_as(&obs, &mut out).unwrap();
        assert_eq!(out, [255, 255]);

        let unclipped = BSplineInterpolator::new(3, &extended)
            .unwrap()
            .with_clipping(false);
        assert_eq!(
            unclipped.interp_as(&obs, &mut out),
            Err(Error::UnrepresentableValue)
        );

        // In range, float destinations keep the value
        let mut out_f32 = [0.0_f32; 2];
        unclipped.interp_as(&obs, &mut out_f32).unwrap();
        out_f32.iter().for_each(|&v| assert!((v - 300.0).abs() < 1e-3));

        let coefs: Coefficients<f64, 1> = BSplineDecomposition::<1>::cubic()
            .decompose_array([16], &low, Extension::Border)
            .unwrap();
        let extended = coefs.extend(Extension::Border);
        let interpolator = BSplineInterpolator::new(3, &extended).unwrap();
        interpolator.interp_as(&obs, &mut out).unwrap();
        assert_eq!(out, [0, 0]);
    }

    #[test]
    fn test_errors() {
        let coefs = |_: [isize; 2]| 1.0_f64;
        assert_eq!(
            BSplineInterpolator::<f64, _, 2>::new(6, &coefs).err(),
            Some(Error::UnsupportedOrder(6))
        );

        let interpolator = BSplineInterpolator::<f64, _, 2>::new(3, &coefs).unwrap();
        let x = [0.0, 1.0];
        let y = [0.0];
        let mut out = [0.0; 2];
        assert_eq!(
            interpolator.interp(&[&x[..]], &mut out),
            Err(Error::DimensionMismatch)
        );
        assert_eq!(
            interpolator.interp(&[&x[..], &y[..]], &mut out),
            Err(Error::DimensionMismatch)
        );
        assert_eq!(
            interpolator.interp_one([f64::NAN, 0.0]),
            Err(Error::UnrepresentableCoordinate)
        );

        // Unbounded coefficient sources are fine
        let v = interpolator.interp_one([-3.7, 1e5]).unwrap();
        assert!((v - 1.0).abs() < 1e-12);
    }

    /// Any reader of the coefficients can be used, including a plain array view
    #[test]
    fn test_extended_view() {
        let c = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
        let view = Extended::new(Interval::new([-3], [7]), &c[..], Extension::Zero).unwrap();
        for p in 0..=5 {
            let interpolator = BSplineInterpolator::new(p, &view).unwrap();
            let order = SplineOrder::try_from(p).unwrap();
            // A single unit coefficient at the origin traces out the basis function
            for k in 0..9 {
                let x = -2.0 + 0.5 * k as f64;
                let v = interpolator.interp_one([x]).unwrap();
                assert!((v - order.basis(x)).abs() < 1e-12, "order {p} at {x}");
            }
        }
    }

    /// Iterate from 1 to 4 dimensions, checking reproduction of the samples
    /// at every grid point, including the edges
    #[test]
    fn test_interpn_1d_to_4d() {
        let rng = &mut rng_fixed_seed();
        for ndims in 1..=4 {
            println!("Testing in {ndims} dims");
            let dims: Vec<usize> = vec![10; ndims];
            let xs: Vec<Vec<f64>> = (0..ndims)
                .map(|i| linspace(0.0, (dims[i] - 1) as f64, dims[i]))
                .collect();
            let grid = meshgrid((0..ndims).map(|i| &xs[i]).collect());
            let u = randn::<f64>(rng, grid.len());

            let grid_t: Vec<Vec<f64>> = (0..ndims)
                .map(|i| grid.iter().map(|x| x[i]).collect())
                .collect(); // transpose
            let xobsslice: Vec<&[f64]> = grid_t.iter().map(|x| &x[..]).collect();
            let mut out = vec![0.0; u.len()];

            interpn(3, &dims, &u, Extension::MirrorSingle, &xobsslice, &mut out).unwrap();
            (0..u.len()).for_each(|i| assert!((out[i] - u[i]).abs() < 1e-4));

            let out_alloc = interpn_alloc(3, &dims, &u, Extension::MirrorSingle, &xobsslice).unwrap();
            assert_eq!(out, out_alloc);
        }
    }

    #[test]
    fn test_interpn_errors() {
        let z = [0.0_f64; 4];
        let x = [0.5];
        let obs = [&x[..]];
        let mut out = [0.0];
        assert_eq!(
            interpn(3, &[], &z, Extension::Zero, &obs, &mut out),
            Err(Error::DimensionMismatch)
        );
        assert_eq!(
            interpn(3, &[1; 9], &z, Extension::Zero, &obs, &mut out),
            Err(Error::TooManyDimensions(9))
        );
        assert_eq!(
            interpn(3, &[5], &z, Extension::Zero, &obs, &mut out),
            Err(Error::ShapeMismatch {
                expected: 5,
                actual: 4
            })
        );
        assert_eq!(
            interpn(7, &[4], &z, Extension::Zero, &obs, &mut out),
            Err(Error::UnsupportedOrder(7))
        );
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_interp_par() {
        let rng = &mut rng_fixed_seed();
        let z = randn::<f32>(rng, 20 * 30);
        let coefs: Coefficients<f32, 2> = BSplineDecomposition::<2>::new(5)
            .unwrap()
            .decompose_array([20, 30], &z, Extension::MirrorSingle)
            .unwrap();
        let extended = coefs.extend(Extension::MirrorSingle);
        let interpolator = BSplineInterpolator::new(5, &extended).unwrap();

        let x = randn::<f32>(rng, 500).iter().map(|v| 10.0 * v + 10.0).collect::<Vec<_>>();
        let y = randn::<f32>(rng, 500).iter().map(|v| 15.0 * v + 15.0).collect::<Vec<_>>();
        let obs = [&x[..], &y[..]];

        let mut seq = vec![0.0_f32; 500];
        let mut par = vec![0.0_f32; 500];
        interpolator.interp(&obs, &mut seq).unwrap();
        interpolator.interp_par(&obs, &mut par).unwrap();
        (0..500).for_each(|i| assert_eq!(seq[i].to_bits(), par[i].to_bits()));
    }
}
