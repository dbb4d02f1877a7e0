//! Rounding and division helpers
//!
//! Every higher layer rounds tile/block sizes and window extents to
//! hardware-friendly multiples through these functions, so their edge cases
//! (zero values, non-positive divisors) are pinned down here once.

use crate::error::{Error, Result};

/// Integer division rounding towards positive infinity
///
/// The divisor must be non-zero; this is an internal arithmetic building
/// block, not a validated entry point.
#[inline]
pub fn div_ceil(val: usize, m: usize) -> usize {
    debug_assert!(m > 0);
    (val + m - 1) / m
}

/// Round `value` up to the nearest multiple of `divisor`
///
/// Fails with a precondition error if `divisor == 0`.
#[inline]
pub fn ceil_to_multiple(value: usize, divisor: usize) -> Result<usize> {
    if divisor == 0 {
        return Err(Error::InvalidRounding {
            value: value as i64,
            divisor: 0,
        });
    }
    Ok(div_ceil(value, divisor) * divisor)
}

/// Round `value` down to the nearest multiple of `divisor`
///
/// Fails with a precondition error if `divisor == 0`.
#[inline]
pub fn floor_to_multiple(value: usize, divisor: usize) -> Result<usize> {
    if divisor == 0 {
        return Err(Error::InvalidRounding {
            value: value as i64,
            divisor: 0,
        });
    }
    Ok((value / divisor) * divisor)
}

/// Signed variant of [`ceil_to_multiple`]
///
/// Fails if `value < 0` or `divisor <= 0`.
#[inline]
pub fn ceil_to_multiple_i64(value: i64, divisor: i64) -> Result<i64> {
    if value < 0 || divisor <= 0 {
        return Err(Error::InvalidRounding { value, divisor });
    }
    Ok(((value + divisor - 1) / divisor) * divisor)
}

/// Signed variant of [`floor_to_multiple`]
///
/// Fails if `value < 0` or `divisor <= 0`.
#[inline]
pub fn floor_to_multiple_i64(value: i64, divisor: i64) -> Result<i64> {
    if value < 0 || divisor <= 0 {
        return Err(Error::InvalidRounding { value, divisor });
    }
    Ok((value / divisor) * divisor)
}
