//! Axis-aligned integer boxes and C-ordered indexing into them.
//!
//! Values over an [`Interval`] are stored flat in C order,
//! (z(x0, y0), z(x0, y1), ..., z(x0, yn), z(x1, y0), ...), the same layout
//! used for grid values throughout the crate.

/// An axis-aligned box of integer coordinates, `min[d] .. min[d] + dims[d]` on each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval<const N: usize> {
    min: [isize; N],
    dims: [usize; N],
}

impl<const N: usize> Interval<N> {
    /// Box with lower corner `min` and extent `dims`.
    pub fn new(min: [isize; N], dims: [usize; N]) -> Self {
        Self { min, dims }
    }

    /// Box with lower corner at the origin.
    pub fn from_dims(dims: [usize; N]) -> Self {
        Self { min: [0; N], dims }
    }

    pub fn min(&self) -> [isize; N] {
        self.min
    }

    pub fn dims(&self) -> [usize; N] {
        self.dims
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&n| n == 0)
    }

    /// Grow by `margin` on both sides of every axis.
    pub fn expand(&self, margin: usize) -> Self {
        let mut min = self.min;
        let mut dims = self.dims;
        for d in 0..N {
            min[d] -= margin as isize;
            dims[d] += 2 * margin;
        }
        Self { min, dims }
    }

    pub fn contains(&self, loc: &[isize; N]) -> bool {
        (0..N).all(|d| loc[d] >= self.min[d] && loc[d] < self.min[d] + self.dims[d] as isize)
    }

    /// Overlap of two boxes, which may be empty.
    pub fn intersect(&self, other: &Interval<N>) -> Self {
        let mut min = [0_isize; N];
        let mut dims = [0_usize; N];
        for d in 0..N {
            let lo = self.min[d].max(other.min[d]);
            let hi = (self.min[d] + self.dims[d] as isize).min(other.min[d] + other.dims[d] as isize);
            min[d] = lo;
            dims[d] = (hi - lo).max(0) as usize;
        }
        Self { min, dims }
    }

    /// Cumulative product of the sizes of higher dimensions, i.e. the
    /// stride between consecutive entries along each axis in C order.
    pub fn dimprod(&self) -> [usize; N] {
        let mut dimprod = [1_usize; N];
        let mut acc = 1;
        for i in 0..N {
            dimprod[N - i - 1] = acc;
            acc *= self.dims[N - i - 1];
        }
        dimprod
    }

    /// Flat C-order index of a location inside this box.
    #[inline]
    pub fn flat_index(&self, loc: &[isize; N], dimprod: &[usize; N]) -> usize {
        let mut i = 0;
        for d in 0..N {
            i += (loc[d] - self.min[d]) as usize * dimprod[d];
        }
        i
    }

    /// Iterate all locations in C order.
    pub fn iter(&self) -> IntervalIter<N> {
        IntervalIter {
            interval: *self,
            next: if self.is_empty() { None } else { Some(self.min) },
        }
    }
}

impl<const N: usize> IntoIterator for &Interval<N> {
    type Item = [isize; N];
    type IntoIter = IntervalIter<N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Odometer over the locations of an [`Interval`], last axis fastest.
#[derive(Clone, Debug)]
pub struct IntervalIter<const N: usize> {
    interval: Interval<N>,
    next: Option<[isize; N]>,
}

impl<const N: usize> Iterator for IntervalIter<N> {
    type Item = [isize; N];

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        let mut loc = current;
        let mut d = N;
        self.next = loop {
            if d == 0 {
                break None;
            }
            d -= 1;
            loc[d] += 1;
            if loc[d] < self.interval.min[d] + self.interval.dims[d] as isize {
                break Some(loc);
            }
            loc[d] = self.interval.min[d];
        };

        Some(current)
    }
}
