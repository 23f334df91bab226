//! N-dimensional B-spline coefficient decomposition.
//!
//! The separable prefilter runs the 1-D [`recursion`] along every axis in turn.
//! A region is decomposed on a padded working region so that the result does not
//! depend on where the region's edges fall, which lets large arrays be decomposed
//! block by block.
//!
//! ```rust
//! use bspline_nd::{BSplineDecomposition, Coefficients, Interval};
//!
//! // Any closure over integer locations can act as the sample source
//! let source = |loc: [isize; 2]| (loc[0] + 2 * loc[1]) as f64;
//! let region = Interval::new([-4, 10], [16, 8]);
//!
//! let decomposition = BSplineDecomposition::<2>::cubic();
//! let coefs: Coefficients<f64, 2> = decomposition.decompose(&source, region).unwrap();
//!
//! // Coefficients of a linear function are the function itself
//! let c = coefs.get([3, 12]).unwrap();
//! assert!((c - 27.0).abs() < 1e-6);
//! ```
use alloc::{vec, vec::Vec};

use num_traits::{AsPrimitive, Float};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod recursion;

pub use recursion::{DEFAULT_HORIZON, DEFAULT_TOLERANCE, Horizon};

use crate::kernel::{Poles, SplineOrder};
use crate::{Error, Extended, Extension, Interval, RandomAccess, Result};
use recursion::filter_line;

/// Default number of grid points by which a region is expanded before filtering.
pub const DEFAULT_PADDING_WIDTH: usize = 4;

/// B-spline coefficients over an interval, stored flat in C order.
#[derive(Clone, Debug, PartialEq)]
pub struct Coefficients<S, const N: usize> {
    interval: Interval<N>,
    vals: Vec<S>,
}

impl<S, const N: usize> Coefficients<S, N> {
    /// Wrap precomputed coefficients.
    ///
    /// # Errors
    /// * If `vals` does not hold exactly one value per location of `interval`
    pub fn new(interval: Interval<N>, vals: Vec<S>) -> Result<Self> {
        if vals.len() != interval.len() {
            return Err(Error::ShapeMismatch {
                expected: interval.len(),
                actual: vals.len(),
            });
        }
        Ok(Self { interval, vals })
    }

    pub fn interval(&self) -> Interval<N> {
        self.interval
    }

    pub fn vals(&self) -> &[S] {
        &self.vals
    }

    pub fn into_vec(self) -> Vec<S> {
        self.vals
    }

    /// Coefficient at `loc`, or `None` outside the interval.
    pub fn get(&self, loc: [isize; N]) -> Option<S>
    where
        S: Copy,
    {
        if !self.interval.contains(&loc) {
            return None;
        }
        let i = self.interval.flat_index(&loc, &self.interval.dimprod());
        Some(self.vals[i])
    }

    /// View the coefficients as a total function of location for evaluation.
    ///
    /// The extension should match the one the samples were decomposed with.
    pub fn extend(&self, extension: Extension<S>) -> Extended<'_, S, N>
    where
        S: Copy + num_traits::Zero,
    {
        Extended::from_parts(self.interval, &self.vals, extension)
    }
}

/// Configuration of the B-spline prefilter for N-dimensional samples.
///
/// Holds only the spline order and the accuracy settings; every call to a
/// `decompose*` method is independent, so one instance can be shared across threads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BSplineDecomposition<const N: usize> {
    order: SplineOrder,
    poles: Poles,
    horizon: Horizon,
    padding_width: usize,
}

impl<const N: usize> Default for BSplineDecomposition<N> {
    fn default() -> Self {
        Self::cubic()
    }
}

impl<const N: usize> BSplineDecomposition<N> {
    /// Decomposition for splines of degree `order`.
    ///
    /// # Errors
    /// * If `order` is greater than 5
    pub fn new(order: usize) -> Result<Self> {
        Ok(Self::from_order(SplineOrder::try_from(order)?))
    }

    pub fn from_order(order: SplineOrder) -> Self {
        Self {
            order,
            poles: order.poles(),
            horizon: Horizon::default(),
            padding_width: DEFAULT_PADDING_WIDTH,
        }
    }

    /// Cubic decomposition with default settings.
    pub fn cubic() -> Self {
        Self::from_order(SplineOrder::Three)
    }

    /// Set the number of terms used for the causal initialization.
    pub fn with_horizon(mut self, horizon: Horizon) -> Self {
        self.horizon = horizon;
        self
    }

    /// Choose the causal initialization horizon per pole from an accuracy target.
    ///
    /// # Errors
    /// * If `tolerance` is not strictly between 0 and 1
    pub fn with_tolerance(self, tolerance: f64) -> Result<Self> {
        Ok(self.with_horizon(Horizon::tolerance(tolerance)?))
    }

    /// Set the minimum number of grid points added on each side of a region
    /// before filtering. Values below the filter horizon are widened to it.
    pub fn with_padding_width(mut self, padding_width: usize) -> Self {
        self.padding_width = padding_width;
        self
    }

    pub fn order(&self) -> SplineOrder {
        self.order
    }

    pub fn poles(&self) -> &Poles {
        &self.poles
    }

    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    pub fn padding_width(&self) -> usize {
        self.padding_width
    }

    /// Effective horizon of the dominant pole (see [`Horizon::effective_terms`]), which is
    /// also the number of extra source samples read past each end of the lines along axis 0.
    pub fn context(&self) -> usize {
        self.horizon.effective_terms(&self.poles)
    }

    /// Expansion actually applied to each side of a region: the padding width,
    /// widened to the effective horizon of the dominant pole. Zero for orders without poles.
    pub fn margin(&self) -> usize {
        if self.poles.is_empty() {
            0
        } else {
            self.padding_width.max(self.context())
        }
    }

    /// Decompose the samples of `source` over `region` into B-spline coefficients.
    ///
    /// Samples outside `region` are read from `source` as boundary context, so
    /// adjacent regions decomposed separately agree with a decomposition of their union.
    ///
    /// # Errors
    /// Decomposition of a valid configuration does not fail; the `Result` is kept for
    /// symmetry with the other entry points.
    pub fn decompose<T, S, A>(&self, source: &A, region: Interval<N>) -> Result<Coefficients<S, N>>
    where
        T: AsPrimitive<f64>,
        S: Float + 'static,
        f64: AsPrimitive<S>,
        A: RandomAccess<T, N> + Sync,
    {
        let work = self.decompose_region(source, &region, self.margin());
        let vals = work.into_iter().map(|v| v.as_()).collect();
        Ok(Coefficients { interval: region, vals })
    }

    /// Decompose into caller-provided storage, C-ordered over `region`.
    ///
    /// # Errors
    /// * If `out` does not have one entry per location of `region`
    pub fn decompose_into<T, S, A>(&self, source: &A, region: Interval<N>, out: &mut [S]) -> Result<()>
    where
        T: AsPrimitive<f64>,
        S: Float + 'static,
        f64: AsPrimitive<S>,
        A: RandomAccess<T, N> + Sync,
    {
        if out.len() != region.len() {
            return Err(Error::ShapeMismatch {
                expected: region.len(),
                actual: out.len(),
            });
        }
        let work = self.decompose_region(source, &region, self.margin());
        out.iter_mut().zip(work).for_each(|(o, v)| *o = v.as_());
        Ok(())
    }

    /// Decompose without padding the region.
    ///
    /// Only the lines along axis 0 read extra context from `source`; all other axes
    /// are mirrored at the region's edges. Cheaper, but blocks decomposed this way
    /// show seams along every axis but the first.
    ///
    /// # Errors
    /// Decomposition of a valid configuration does not fail.
    pub fn decompose_unpadded<T, S, A>(&self, source: &A, region: Interval<N>) -> Result<Coefficients<S, N>>
    where
        T: AsPrimitive<f64>,
        S: Float + 'static,
        f64: AsPrimitive<S>,
        A: RandomAccess<T, N> + Sync,
    {
        let work = self.decompose_region(source, &region, 0);
        let vals = work.into_iter().map(|v| v.as_()).collect();
        Ok(Coefficients { interval: region, vals })
    }

    /// Decompose a C-ordered array with its lower corner at the origin,
    /// extended past its edges by `extension`.
    ///
    /// # Errors
    /// * If `vals` does not have one entry per grid point of `dims`
    pub fn decompose_array<T, S>(
        &self,
        dims: [usize; N],
        vals: &[T],
        extension: Extension<T>,
    ) -> Result<Coefficients<S, N>>
    where
        T: AsPrimitive<f64> + num_traits::Zero + Sync,
        S: Float + 'static,
        f64: AsPrimitive<S>,
    {
        let interval = Interval::from_dims(dims);
        let source = Extended::new(interval, vals, extension)?;
        self.decompose(&source, interval)
    }

    /// Decompose `region` as independent blocks of at most `block` grid points per axis
    /// and assemble the result.
    ///
    /// Each block is padded as in [`Self::decompose`], so the result agrees with a
    /// single decomposition of the whole region up to the horizon accuracy.
    ///
    /// # Errors
    /// * If any block dimension is zero
    pub fn decompose_blocks<T, S, A>(
        &self,
        source: &A,
        region: Interval<N>,
        block: [usize; N],
    ) -> Result<Coefficients<S, N>>
    where
        T: AsPrimitive<f64>,
        S: Float + 'static,
        f64: AsPrimitive<S>,
        A: RandomAccess<T, N> + Sync,
    {
        if block.iter().any(|&b| b == 0) {
            return Err(Error::InvalidBlockSize);
        }

        // Tile the region, clipping the last block on each axis
        let rmin = region.min();
        let rdims = region.dims();
        let mut counts = [0_usize; N];
        for d in 0..N {
            counts[d] = rdims[d].div_ceil(block[d]);
        }
        let blocks: Vec<Interval<N>> = Interval::from_dims(counts)
            .iter()
            .map(|b| {
                let mut min = rmin;
                for d in 0..N {
                    min[d] += b[d] * block[d] as isize;
                }
                Interval::new(min, block).intersect(&region)
            })
            .collect();
        log::debug!(
            "Decomposing {:?} as {} blocks of up to {:?}",
            region,
            blocks.len(),
            block
        );

        let margin = self.margin();
        #[cfg(feature = "parallel")]
        let parts: Vec<Vec<f64>> = blocks
            .par_iter()
            .map(|b| self.decompose_region(source, b, margin))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let parts: Vec<Vec<f64>> = blocks
            .iter()
            .map(|b| self.decompose_region(source, b, margin))
            .collect();

        let dimprod = region.dimprod();
        let mut vals = vec![S::zero(); region.len()];
        for (b, part) in blocks.iter().zip(parts) {
            for (loc, v) in b.iter().zip(part) {
                vals[region.flat_index(&loc, &dimprod)] = v.as_();
            }
        }

        Ok(Coefficients { interval: region, vals })
    }

    /// Coefficients over `region` in `f64`, C-ordered.
    fn decompose_region<T, A>(&self, source: &A, region: &Interval<N>, margin: usize) -> Vec<f64>
    where
        T: AsPrimitive<f64>,
        A: RandomAccess<T, N> + Sync,
    {
        if region.is_empty() {
            return Vec::new();
        }
        // Orders 0 and 1 interpolate the samples directly
        if self.poles.is_empty() || N == 0 {
            return region.iter().map(|loc| source.get(loc).as_()).collect();
        }

        let context = self.context();
        if margin > 0 && self.padding_width < context {
            log::debug!(
                "Widening padding from {} to the filter horizon {}",
                self.padding_width,
                context
            );
        }
        log::debug!(
            "Decomposing {:?} at order {}, margin {}, horizon {:?}",
            region,
            self.order.degree(),
            margin,
            self.horizon
        );

        let working = region.expand(margin);
        let wmin = working.min();
        let wdims = working.dims();
        let dimprod = working.dimprod();
        let mut work = vec![0.0_f64; working.len()];

        for axis in 0..N {
            let origins: Vec<[isize; N]> = line_set(region, &working, axis).iter().collect();
            log::trace!(
                "Filtering {} lines of length {} along axis {}",
                origins.len(),
                wdims[axis],
                axis
            );

            let len = wdims[axis];
            let stride = dimprod[axis];
            let filtered = if axis == 0 {
                // Real samples past both ends of the working region
                let first = wmin[0] - context as isize;
                self.filter_lines(&origins, len, context, |origin, buf| {
                    let mut loc = *origin;
                    for (j, b) in buf.iter_mut().enumerate() {
                        loc[0] = first + j as isize;
                        *b = source.get(loc).as_();
                    }
                })
            } else {
                let work = &work;
                self.filter_lines(&origins, len, 0, |origin, buf| {
                    let start = working.flat_index(origin, &dimprod);
                    for (j, b) in buf.iter_mut().enumerate() {
                        *b = work[start + j * stride];
                    }
                })
            };

            for (line, origin) in filtered.chunks(len).zip(&origins) {
                let start = working.flat_index(origin, &dimprod);
                for (j, &v) in line.iter().enumerate() {
                    work[start + j * stride] = v;
                }
            }
        }

        // Crop to the requested region
        region
            .iter()
            .map(|loc| work[working.flat_index(&loc, &dimprod)])
            .collect()
    }

    /// Load and filter each line, returning the central `len` entries of every
    /// filtered line, concatenated in the order of `origins`.
    ///
    /// Each line buffer holds `len + 2 * context` entries and is mirrored at its ends.
    fn filter_lines<F>(&self, origins: &[[isize; N]], len: usize, context: usize, load: F) -> Vec<f64>
    where
        F: Fn(&[isize; N], &mut [f64]) + Sync,
    {
        let buffer_len = len + 2 * context;
        let extension = Extension::MirrorSingle;
        let run = |buf: &mut [f64], line: &mut [f64], origin: &[isize; N]| {
            load(origin, buf);
            filter_line(buf, &self.poles, &self.horizon, &extension);
            line.copy_from_slice(&buf[context..context + len]);
        };

        let mut out = vec![0.0; origins.len() * len];

        #[cfg(feature = "parallel")]
        out.par_chunks_mut(len).zip(origins.par_iter()).for_each_init(
            || vec![0.0; buffer_len],
            |buf, (line, origin)| run(&mut buf[..], line, origin),
        );

        #[cfg(not(feature = "parallel"))]
        {
            let mut buf = vec![0.0; buffer_len];
            out.chunks_mut(len)
                .zip(origins)
                .for_each(|(line, origin)| run(&mut buf[..], line, origin));
        }

        out
    }
}

/// Starting points of the lines along `axis` that can affect the coefficients in `region`.
///
/// Earlier axes have already been filtered, so only their in-region coordinates
/// matter; later axes still need the whole working extent as context.
fn line_set<const N: usize>(region: &Interval<N>, working: &Interval<N>, axis: usize) -> Interval<N> {
    let mut min = working.min();
    let mut dims = working.dims();
    for d in 0..axis {
        min[d] = region.min()[d];
        dims[d] = region.dims()[d];
    }
    dims[axis] = 1;
    Interval::new(min, dims)
}
