//! Percent value validation.
//!
//! Brew parameters (water amount, coffee strength) travel through the API as
//! integer percent values. Callers may express them in finer units via the
//! `accuracy` exponent: an accuracy of `2` means the value is given in
//! hundredths of a percent, so `10_000` is `100 %`. The value is divided down
//! by `10^accuracy` before the `0..=100` range check.

use crate::constants::MAX_PERCENT_ACCURACY;
use crate::error::{Error, Result};

/// Check whether `value` is a valid percent value at the given accuracy.
///
/// # Errors
///
/// Returns an error for an accuracy beyond [`MAX_PERCENT_ACCURACY`]; an
/// out-of-range value is reported as `Ok(false)`, not an error.
///
/// # Examples
///
/// ```
/// use mokka_core::is_percent_value;
///
/// assert!(is_percent_value(100, 0).unwrap());
/// assert!(is_percent_value(10_000, 2).unwrap());
/// assert!(!is_percent_value(150, 0).unwrap());
/// assert!(!is_percent_value(-1, 0).unwrap());
/// ```
pub fn is_percent_value(value: i64, accuracy: u32) -> Result<bool> {
    if accuracy > MAX_PERCENT_ACCURACY {
        return Err(Error::InvalidAccuracy {
            accuracy,
            max: MAX_PERCENT_ACCURACY,
        });
    }

    let scale = 10i64.pow(accuracy);
    Ok((0..=100 * scale).contains(&value))
}

/// Validate that `value` is a percent value at the given accuracy.
///
/// # Errors
///
/// Returns [`Error::InvalidPercent`] naming the offending value when it is
/// outside `0..=100` (after dividing by `10^accuracy`), and
/// [`Error::InvalidAccuracy`] for an unsupported accuracy.
pub fn validate_percent(value: i64, accuracy: u32) -> Result<()> {
    if is_percent_value(value, accuracy)? {
        Ok(())
    } else {
        Err(Error::InvalidPercent { value, accuracy })
    }
}
