//! Convenience methods for constructing grids and sample arrays in a way that echoes,
//! but does not exactly match, methods common in scripting languages.
use itertools::Itertools;
use num_traits::Float;

use crate::{Interval, RandomAccess};

/// Generates evenly spaced values from start to stop,
/// including the endpoint.
pub fn linspace<T>(start: T, stop: T, n: usize) -> Vec<T>
where
    T: Float,
{
    let intervals = T::from(n.saturating_sub(1).max(1)).unwrap_or_else(T::one);
    let dx: T = (stop - start) / intervals;
    (0..n)
        .map(|i| start + T::from(i).unwrap_or_else(T::nan) * dx)
        .collect()
}

/// Generates a meshgrid in C ordering (x0, y0, z0, x0, y0, z1, ..., x0, yn, zn)
pub fn meshgrid<T>(x: Vec<&Vec<T>>) -> Vec<Vec<T>>
where
    T: Float,
{
    x.into_iter()
        .multi_cartesian_product()
        .map(|xx| xx.iter().map(|y| **y).collect())
        .collect()
}

/// Read every sample of `source` over `region` into a C-ordered Vec.
pub fn sample<T, A, const N: usize>(source: &A, region: &Interval<N>) -> Vec<T>
where
    A: RandomAccess<T, N>,
{
    region.iter().map(|loc| source.get(loc)).collect()
}
