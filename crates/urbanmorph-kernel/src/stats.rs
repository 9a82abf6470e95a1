//! The per-neighborhood statistics bundle

use urbanmorph_classify::BinSet;
use urbanmorph_core::{Error, Result};

use crate::indices::{simpson, theil};
use crate::trim::limit_range;

/// Interquartile window for the trimmed mean and range
pub const INNER_WINDOW: (f64, f64) = (25.0, 75.0);
/// Interdecile window for the inequality index
pub const OUTER_WINDOW: (f64, f64) = (10.0, 90.0);

/// The four contextual statistics of one characteristic over one
/// neighborhood sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextualStats {
    /// Mean of the interquartile (25-75) subset
    pub mean_iq3: f64,
    /// Range of the interquartile subset
    pub range_iq3: f64,
    /// Theil inequality of the interdecile (10-90) subset
    pub theil: f64,
    /// Simpson diversity of the full sample against the global bins
    pub simpson: f64,
}

/// Compute all four statistics for one neighborhood sample.
///
/// The percentile windows are evaluated on the sample itself; only the
/// Simpson index touches the globally-fit `bins`. A single-value sample
/// (isolated unit) yields its value as the mean, zero range, zero
/// inequality, and a Simpson index of 1.
pub fn contextual_stats(values: &[f64], bins: &BinSet) -> Result<ContextualStats> {
    if values.is_empty() {
        return Err(Error::empty_sample("contextual statistics"));
    }

    let iquar = limit_range(values, INNER_WINDOW.0, INNER_WINDOW.1)?;
    let idec = limit_range(values, OUTER_WINDOW.0, OUTER_WINDOW.1)?;

    let mean_iq3 = iquar.iter().sum::<f64>() / iquar.len() as f64;
    let min = iquar.iter().copied().fold(f64::INFINITY, f64::min);
    let max = iquar.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(ContextualStats {
        mean_iq3,
        range_iq3: max - min,
        theil: theil(&idec)?,
        simpson: simpson(values, bins)?,
    })
}
