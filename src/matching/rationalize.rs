use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::{validate_max_error, validate_max_supercell_size};
use crate::error::{MatchError, Result};

/// Integer approximation `numerator / denominator` of an area ratio
///
/// For `ratio = area_2 / area_1`, `numerator` cells of lattice 1 cover the same area as
/// `denominator` cells of lattice 2, so they are the supercell multiplicities of lattice 1
/// and lattice 2 respectively.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RationalApproximation {
    pub numerator: u32,
    pub denominator: u32,
    /// `|ratio - numerator / denominator| / ratio` (infinite for a zero denominator)
    pub relative_error: f64,
    /// Whether `relative_error` is within the requested tolerance.
    /// `false` means the search reached the term bound before any fraction met the tolerance,
    /// and this is only the closest bracketing fraction.
    pub within_tolerance: bool,
}

impl RationalApproximation {
    fn new(ratio: f64, numerator: u32, denominator: u32, max_error: f64) -> Self {
        let relative_error = if denominator == 0 {
            f64::INFINITY
        } else {
            (ratio - numerator as f64 / denominator as f64).abs() / ratio
        };
        RationalApproximation {
            numerator,
            denominator,
            relative_error,
            within_tolerance: relative_error <= max_error,
        }
    }

    /// As a `(numerator, denominator)` pair
    pub fn as_pair(&self) -> (u32, u32) {
        (self.numerator, self.denominator)
    }

    /// Approximated value
    pub fn value(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

/// Best fraction approximating `ratio` with both terms bounded by `max_denominator`
///
/// Runs a Stern-Brocot mediant search between `0/1` and `1/1`; ratios above one are
/// inverted before the search and the resulting fraction flipped back. Mediants are judged
/// by their relative error against `ratio` itself, the same measure reported in
/// [`RationalApproximation::relative_error`]. The first mediant within `max_error` ends the
/// search. If the bound is reached first, the last fraction visited is returned and flagged
/// as not within tolerance.
///
/// The walk moves one mediant at a time, so ratios close to `0`, `1` or far above `1` take
/// up to `max_denominator` steps before the bound stops them.
///
/// ```
/// use lattice_match::matching::rationalize_ratio;
///
/// let approx = rationalize_ratio(0.5, 1000, 0.01).unwrap();
/// assert_eq!(approx.as_pair(), (1, 2));
/// ```
pub fn rationalize_ratio(
    ratio: f64,
    max_denominator: u32,
    max_error: f64,
) -> Result<RationalApproximation> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(MatchError::invalid_input(format!(
            "ratio must be finite and positive, got {ratio}"
        )));
    }
    validate_max_supercell_size(max_denominator)?;
    validate_max_error(max_error)?;

    if ratio == 1.0 {
        return Ok(RationalApproximation::new(ratio, 1, 1, max_error));
    }

    let inverted = ratio > 1.0;
    let target = if inverted { ratio.recip() } else { ratio };
    let accepts = |p: u64, q: u64| {
        let candidate = if inverted {
            q as f64 / p as f64
        } else {
            p as f64 / q as f64
        };
        (ratio - candidate).abs() / ratio <= max_error
    };
    let (p, q) = stern_brocot_search(target, max_denominator, accepts);
    let (numerator, denominator) = if inverted { (q, p) } else { (p, q) };

    let approximation = RationalApproximation::new(ratio, numerator, denominator, max_error);
    if approximation.within_tolerance {
        debug!(
            "Rationalized {ratio} as {numerator}/{denominator} (relative error {:.3e})",
            approximation.relative_error
        );
    } else {
        warn!(
            "No fraction within {max_error} of {ratio} with terms <= {max_denominator}; \
             using {numerator}/{denominator} (relative error {:.3e})",
            approximation.relative_error
        );
    }
    Ok(approximation)
}

/// Mediant search for `target` in (0, 1), stopping at the first mediant `accepts` takes
fn stern_brocot_search(
    target: f64,
    max_denominator: u32,
    accepts: impl Fn(u64, u64) -> bool,
) -> (u32, u32) {
    let limit = max_denominator as u64;
    // Lower bound a/b, upper bound c/d; terms never exceed 2 * limit
    let (mut a, mut b) = (0u64, 1u64);
    let (mut c, mut d) = (1u64, 1u64);

    let (p, q) = loop {
        if b > limit {
            break (c, d);
        }
        if d > limit {
            break (a, b);
        }

        let mediant = (a + c) as f64 / (b + d) as f64;
        if accepts(a + c, b + d) {
            break if b + d <= limit {
                (a + c, b + d)
            } else if d > b {
                (c, d)
            } else {
                (a, b)
            };
        } else if target > mediant {
            a += c;
            b += d;
        } else {
            c += a;
            d += b;
        }
    };

    // Every returned term is bounded by `limit`
    (p as u32, q as u32)
}
