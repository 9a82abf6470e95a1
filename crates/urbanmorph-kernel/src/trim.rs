//! Percentile-bounded range limiting

use std::cmp::Ordering;

use urbanmorph_core::{Error, Result};

/// Percentile of a sorted sample by the nearest-rank rule.
///
/// The rank is `p / 100 * (n - 1)`, rounded half to even - numpy's
/// `interpolation="nearest"`. Chosen over linear interpolation so the bounds
/// are always actual sample values and the trimmed subset is never empty.
pub fn percentile_nearest(sorted: &[f64], p: f64) -> Result<f64> {
    if sorted.is_empty() {
        return Err(Error::empty_sample("percentile"));
    }
    if !(0.0..=100.0).contains(&p) {
        return Err(Error::invalid_percentile(p));
    }
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let at = rank.round_ties_even() as usize;
    Ok(sorted[at.min(sorted.len() - 1)])
}

/// Restrict a sample to the values inside its own [lo, hi] percentile
/// bounds, inclusive on both sides.
///
/// Bounds are computed on the sample itself, never on a global
/// distribution. Samples of one or two values pass through untouched; the
/// window order is normalized, so `(75, 25)` behaves like `(25, 75)`.
pub fn limit_range(values: &[f64], lo: f64, hi: f64) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(Error::empty_sample("limit_range"));
    }
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if values.len() <= 2 {
        return Ok(values.to_vec());
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let lower = percentile_nearest(&sorted, lo)?;
    let upper = percentile_nearest(&sorted, hi)?;

    Ok(values
        .iter()
        .copied()
        .filter(|&v| lower <= v && v <= upper)
        .collect())
}
