//! Poles of the B-spline prefilter.
//!
//! The direct B-spline transform of order `p` is an all-pole IIR filter whose poles
//! are the roots, inside the unit circle, of the characteristic polynomial of the
//! sampled basis. Values follow Unser 1999 ("Splines: A Perfect Fit for Signal and
//! Image Processing"), Table I.
use num_traits::Float;

use super::SplineOrder;
use crate::{Error, Result};

/// Maximum number of poles for any implemented order.
pub const MAX_POLES: usize = 2;

/// Poles of one spline order together with their anti-causal normalization constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Poles {
    z: [f64; MAX_POLES],
    ci: [f64; MAX_POLES],
    len: usize,
}

impl Poles {
    /// Build the pole set for a spline order.
    pub fn for_order(order: SplineOrder) -> Self {
        let (z, len) = match order {
            SplineOrder::Zero | SplineOrder::One => ([0.0; MAX_POLES], 0),
            SplineOrder::Two => ([Float::sqrt(8.0_f64) - 3.0, 0.0], 1),
            SplineOrder::Three => ([Float::sqrt(3.0_f64) - 2.0, 0.0], 1),
            SplineOrder::Four => {
                let r = Float::sqrt(438976.0_f64);
                let s = Float::sqrt(304.0_f64);
                (
                    [
                        Float::sqrt(664.0 - r) + s - 19.0,
                        Float::sqrt(664.0 + r) - s - 19.0,
                    ],
                    2,
                )
            }
            SplineOrder::Five => {
                let r = Float::sqrt(17745.0_f64 / 4.0);
                let s = Float::sqrt(105.0_f64 / 4.0);
                (
                    [
                        Float::sqrt(135.0 / 2.0 - r) + s - 13.0 / 2.0,
                        Float::sqrt(135.0 / 2.0 + r) - s - 13.0 / 2.0,
                    ],
                    2,
                )
            }
        };

        let mut ci = [0.0; MAX_POLES];
        for i in 0..len {
            ci[i] = pole_ci(z[i]);
        }

        Self { z, ci, len }
    }

    /// Pole values, ordered by decreasing magnitude.
    pub fn as_slice(&self) -> &[f64] {
        &self.z[..self.len]
    }

    /// `z / (z^2 - 1)` for each pole.
    pub fn ci(&self) -> &[f64] {
        &self.ci[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate `(z, ci)` pairs in application order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.as_slice().iter().copied().zip(self.ci().iter().copied())
    }

    /// The pole of largest magnitude, which sets the filter's decay length.
    pub fn dominant(&self) -> Option<f64> {
        self.as_slice()
            .iter()
            .copied()
            .fold(None, |acc: Option<f64>, z| match acc {
                Some(a) if Float::abs(a) >= Float::abs(z) => Some(a),
                _ => Some(z),
            })
    }

    /// Overall filter gain, the product of `(1 - z)(1 - 1/z)` over all poles.
    pub fn gain(&self) -> f64 {
        gain_from_poles(self.as_slice())
    }
}

/// Poles for the prefilter of a spline of a given order.
///
/// # Errors
/// * If `order` is greater than 5
pub fn poles(order: usize) -> Result<Poles> {
    Ok(Poles::for_order(SplineOrder::try_from(order)?))
}

/// Anti-causal initialization constant `z / (z^2 - 1)` of a single pole.
#[inline]
pub fn pole_ci(z: f64) -> f64 {
    z / (z * z - 1.0)
}

/// Elementwise [`pole_ci`], writing into `out`.
///
/// # Errors
/// * If `out` and `poles` differ in length
pub fn poles_ci(poles: &[f64], out: &mut [f64]) -> Result<()> {
    if out.len() != poles.len() {
        return Err(Error::ShapeMismatch {
            expected: poles.len(),
            actual: out.len(),
        });
    }
    for (c, &z) in out.iter_mut().zip(poles) {
        *c = pole_ci(z);
    }
    Ok(())
}

/// Product of the per-pole gains `(1 - z)(1 - 1/z)`. Empty pole sets have unit gain.
pub fn gain_from_poles(poles: &[f64]) -> f64 {
    poles.iter().map(|&z| (1.0 - z) * (1.0 - 1.0 / z)).product()
}

/// Validate a tolerance for adaptive horizons.
pub(crate) fn check_tolerance(tolerance: f64) -> Result<f64> {
    if tolerance > 0.0 && tolerance < 1.0 {
        Ok(tolerance)
    } else {
        Err(Error::InvalidTolerance(tolerance))
    }
}
