//! Spline order selection, basis kernels, and prefilter poles.
//!
//! A [`SplineOrder`] fixes everything that depends on the degree of the spline:
//! the width of the evaluation window, the closed-form basis function, and the
//! poles of the recursive prefilter. Decomposition and evaluation must always be
//! run with the same order.
use num_traits::{Float, NumCast};

pub mod basis;
pub mod poles;

pub use basis::{beta0, beta1, beta2, beta3, beta4, beta5};
pub use poles::{gain_from_poles, pole_ci, poles, poles_ci, Poles, MAX_POLES};

use crate::{Error, Result};

/// Largest kernel support of any implemented order.
pub const MAX_SUPPORT: usize = 6;

/// Degree of a B-spline, 0 through 5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SplineOrder {
    Zero,
    One,
    Two,
    #[default]
    Three,
    Four,
    Five,
}

impl TryFrom<usize> for SplineOrder {
    type Error = Error;

    fn try_from(order: usize) -> Result<Self> {
        match order {
            0 => Ok(Self::Zero),
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            5 => Ok(Self::Five),
            _ => Err(Error::UnsupportedOrder(order)),
        }
    }
}

impl SplineOrder {
    /// Polynomial degree `p`.
    #[inline]
    pub fn degree(self) -> usize {
        match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
        }
    }

    /// Number of grid points with nonzero weight around an observation, `p + 1`.
    #[inline]
    pub fn support(self) -> usize {
        self.degree() + 1
    }

    /// Number of window taps below the grid point the window is anchored on.
    /// `p / 2` for even orders and `(p - 1) / 2` for odd orders.
    #[inline]
    pub fn offset(self) -> usize {
        let p = self.degree();
        if p % 2 == 0 {
            p / 2
        } else {
            (p - 1) / 2
        }
    }

    /// First grid index of the evaluation window around `x`.
    ///
    /// Odd orders anchor on `floor(x)`, even orders on the nearest grid point,
    /// so that the `p + 1` taps cover the whole support of the basis centered on `x`.
    ///
    /// # Errors
    /// * If `x` is not finite or its index does not fit in `isize`
    #[inline]
    pub fn window_start(self, x: f64) -> Result<isize> {
        let anchor = if self.degree() % 2 == 0 {
            Float::floor(x + 0.5)
        } else {
            Float::floor(x)
        };
        let anchor = <isize as NumCast>::from(anchor).ok_or(Error::UnrepresentableCoordinate)?;
        Ok(anchor - self.offset() as isize)
    }

    /// Evaluate the normalized basis function of this order.
    #[inline]
    pub fn basis(self, u: f64) -> f64 {
        match self {
            Self::Zero => beta0(u),
            Self::One => beta1(u),
            Self::Two => beta2(u),
            Self::Three => beta3(u),
            Self::Four => beta4(u),
            Self::Five => beta5(u),
        }
    }

    /// Prefilter poles of this order.
    #[inline]
    pub fn poles(self) -> Poles {
        Poles::for_order(self)
    }

    /// Gain of the prefilter, `prod (1 - z)(1 - 1/z)`.
    pub fn gain(self) -> f64 {
        self.poles().gain()
    }
}

/// The normalized basis function for a spline order.
///
/// # Errors
/// * If `order` is greater than 5
pub fn basis_kernel(order: usize) -> Result<fn(f64) -> f64> {
    let kernel: fn(f64) -> f64 = match SplineOrder::try_from(order)? {
        SplineOrder::Zero => beta0,
        SplineOrder::One => beta1,
        SplineOrder::Two => beta2,
        SplineOrder::Three => beta3,
        SplineOrder::Four => beta4,
        SplineOrder::Five => beta5,
    };
    Ok(kernel)
}
