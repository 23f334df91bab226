//! Closed-form centered B-spline basis functions.
//!
//! Each `beta{p}` is the normalized basis of degree `p`, supported on
//! `[-(p+1)/2, (p+1)/2]` and zero outside. The basis functions integrate to one
//! and form a partition of unity on the integer grid, so they pair with
//! coefficients produced by a gain-normalized decomposition.
//!
//! References
//! * M. Unser, "Splines: A Perfect Fit for Signal and Image Processing",
//!   IEEE Signal Processing Magazine, 1999.
use num_traits::Float;

/// Box kernel, 1 on `[-1/2, 1/2)`.
#[inline]
pub fn beta0(u: f64) -> f64 {
    if (-0.5..0.5).contains(&u) {
        1.0
    } else {
        0.0
    }
}

/// Tent kernel of half-width 1.
#[inline]
pub fn beta1(u: f64) -> f64 {
    let a = Float::abs(u);
    if a < 1.0 {
        1.0 - a
    } else {
        0.0
    }
}

/// Quadratic kernel.
#[inline]
pub fn beta2(u: f64) -> f64 {
    let a = Float::abs(u);
    if a < 0.5 {
        0.75 - a * a
    } else if a < 1.5 {
        let t = a - 1.5;
        0.5 * t * t
    } else {
        0.0
    }
}

/// Cubic kernel.
#[inline]
pub fn beta3(u: f64) -> f64 {
    let a = Float::abs(u);
    let a2 = a * a;
    if a < 1.0 {
        2.0 / 3.0 - a2 + 0.5 * a2 * a
    } else if a < 2.0 {
        let t = 2.0 - a;
        t * t * t / 6.0
    } else {
        0.0
    }
}

/// Quartic kernel.
#[inline]
pub fn beta4(u: f64) -> f64 {
    let a = Float::abs(u);
    let a2 = a * a;
    if a < 0.5 {
        115.0 / 192.0 - 0.625 * a2 + 0.25 * a2 * a2
    } else if a < 1.5 {
        (55.0 + 20.0 * a - 120.0 * a2 + 80.0 * a2 * a - 16.0 * a2 * a2) / 96.0
    } else if a < 2.5 {
        let t = 5.0 - 2.0 * a;
        let t2 = t * t;
        t2 * t2 / 384.0
    } else {
        0.0
    }
}

/// Quintic kernel.
#[inline]
pub fn beta5(u: f64) -> f64 {
    let a = Float::abs(u);
    let a2 = a * a;
    let a4 = a2 * a2;
    if a < 1.0 {
        11.0 / 20.0 - 0.5 * a2 + 0.25 * a4 - a4 * a / 12.0
    } else if a < 2.0 {
        17.0 / 40.0 + 0.625 * a - 1.75 * a2 + 1.25 * a2 * a - 0.375 * a4 + a4 * a / 24.0
    } else if a < 3.0 {
        let t = 3.0 - a;
        let t2 = t * t;
        t2 * t2 * t / 120.0
    } else {
        0.0
    }
}
