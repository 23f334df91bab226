//! One-dimensional causal / anti-causal recursion for B-spline coefficients.
//!
//! For each pole `z`, a line `x` of `n` samples is turned into coefficients by
//!
//! 1. scaling by the pole's gain `(1 - z)(1 - 1/z)`,
//! 2. initializing `c[0] = sum_{i=0..=H} z^i x[-i]`, truncated at the horizon `H`,
//!    with `x[-i]` resolved through the line's extension policy,
//! 3. the causal sweep `c[i] = x[i] + z c[i-1]`,
//! 4. initializing `c[n-1] = z / (z^2 - 1) (c[n-1] + z c[n-2])`,
//! 5. the anti-causal sweep `c[i] = z (c[i+1] - c[i])`.
//!
//! Poles are applied one after another, each reading the previous pole's output.
//! This is Box 2 of Unser 1999, "Splines: A Perfect Fit for Signal and Image Processing".
//!
//! Arithmetic is `f64` throughout. Non-finite input propagates to the output, and
//! a pole with `|z| >= 1` produces non-finite output; neither is checked.
use num_traits::Float;

use crate::kernel::{Poles, poles::check_tolerance};
use crate::{Extension, Result};

/// Conventional number of terms for a [`Horizon::Fixed`] causal initialization.
pub const DEFAULT_HORIZON: usize = 6;

/// Default accuracy target, used by [`Horizon::default`].
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// How many terms of the causal initialization series to sum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Horizon {
    /// A fixed number of terms for every pole.
    Fixed(usize),
    /// Enough terms that the first omitted weight `|z|^H` is below the tolerance,
    /// i.e. `H = ceil(ln(tol) / ln|z|)`. Larger poles need longer horizons.
    Tolerance(f64),
}

impl Default for Horizon {
    fn default() -> Self {
        Self::Tolerance(DEFAULT_TOLERANCE)
    }
}

impl Horizon {
    /// Tolerance-based horizon, validating the tolerance.
    ///
    /// # Errors
    /// * If `tolerance` is not strictly between 0 and 1
    pub fn tolerance(tolerance: f64) -> Result<Self> {
        Ok(Self::Tolerance(check_tolerance(tolerance)?))
    }

    /// Number of series terms for pole `z`.
    pub fn terms(&self, z: f64) -> usize {
        match *self {
            Self::Fixed(n) => n,
            Self::Tolerance(tol) => {
                let h = Float::ceil(Float::ln(tol) / Float::ln(Float::abs(z)));
                if h.is_finite() && h >= 1.0 {
                    h as usize
                } else {
                    1
                }
            }
        }
    }

    /// Longest horizon over a set of poles; zero for an empty set.
    pub fn max_terms(&self, poles: &Poles) -> usize {
        poles
            .as_slice()
            .iter()
            .map(|&z| self.terms(z))
            .max()
            .unwrap_or(0)
    }

    /// Distance over which a boundary error of the dominant pole decays below the
    /// tolerance. A fixed horizon carries no tolerance of its own, so it is held to
    /// [`DEFAULT_TOLERANCE`] here, and never falls below its own term count.
    pub fn effective_terms(&self, poles: &Poles) -> usize {
        match *self {
            Self::Fixed(n) if !poles.is_empty() => {
                n.max(Self::Tolerance(DEFAULT_TOLERANCE).max_terms(poles))
            }
            _ => self.max_terms(poles),
        }
    }
}

/// Causal initial value `c[0] = sum_{i=0..=horizon} z^i x[-i]`.
///
/// Samples left of the line are resolved through `extension`.
/// `line` must not be empty.
#[inline]
pub fn causal_init(line: &[f64], z: f64, horizon: usize, extension: &Extension<f64>) -> f64 {
    let n = line.len();
    let fill = extension.fill();

    let mut zn = z;
    let mut sum = line[0];
    for i in 1..=horizon {
        let v = match extension.resolve(-(i as isize), n) {
            Some(j) => line[j],
            None => fill,
        };
        sum += zn * v;
        zn *= z;
    }

    sum
}

/// Anti-causal initial value `z / (z^2 - 1) (c[n-1] + z c[n-2])` from the
/// causally filtered line, which must have at least two entries.
#[inline]
pub fn anti_causal_init(line: &[f64], z: f64, ci: f64) -> f64 {
    let n = line.len();
    ci * (line[n - 1] + z * line[n - 2])
}

/// Replace a line of samples with its B-spline coefficients, in place.
///
/// Lines shorter than two samples are left unchanged.
pub fn filter_line(line: &mut [f64], poles: &Poles, horizon: &Horizon, extension: &Extension<f64>) {
    let n = line.len();
    if n < 2 {
        return;
    }

    for (z, ci) in poles.iter() {
        let lambda = (1.0 - z) * (1.0 - 1.0 / z);
        line.iter_mut().for_each(|v| *v *= lambda);

        // Causal
        line[0] = causal_init(line, z, horizon.terms(z), extension);
        for i in 1..n {
            line[i] += z * line[i - 1];
        }

        // Anti-causal
        line[n - 1] = anti_causal_init(line, z, ci);
        for i in (0..n - 1).rev() {
            line[i] = z * (line[i + 1] - line[i]);
        }
    }
}
