//! Inequality and diversity indices

use urbanmorph_classify::BinSet;
use urbanmorph_core::{Error, Result};

/// Theil entropy-based inequality index; 0 is perfect equality.
///
/// Exact zeros are replaced with the smallest positive normal double before
/// normalization (there is no log of zero), and entries whose share of the
/// total is not strictly positive contribute nothing instead of an invalid
/// log term. Degenerate neighborhoods - all-zero or negative-valued samples
/// - therefore yield a finite index, never an error.
pub fn theil(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(Error::empty_sample("theil"));
    }

    let n = values.len() as f64;
    let adjusted: Vec<f64> = values
        .iter()
        .map(|&v| if v == 0.0 { f64::MIN_POSITIVE } else { v })
        .collect();
    let total: f64 = adjusted.iter().sum();

    let mut index = 0.0;
    for &v in &adjusted {
        let share = v / total;
        if !(share > 0.0 && n * share > 0.0 && share.is_finite()) {
            continue;
        }
        index += share * (n * share).ln();
    }
    Ok(index)
}

/// Simpson diversity index over globally-fit bins.
///
/// The probability that two random draws from the sample fall into the same
/// bin: sum of squared bin frequencies. Higher means less diverse; a sample
/// concentrated in one bin scores exactly 1. Computed on the full
/// neighborhood sample, not a range-limited subset.
pub fn simpson(values: &[f64], bins: &BinSet) -> Result<f64> {
    if values.is_empty() {
        return Err(Error::empty_sample("simpson"));
    }

    let counts = bins.counts(values);
    let total = values.len() as f64;
    Ok(counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| (c as f64 / total).powi(2))
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use urbanmorph_classify::BreakMethod;

    #[test]
    fn test_theil_known_value() {
        // shares 2/9, 3/9, 4/9: sum of s * ln(3 s)
        let t = theil(&[2.0, 3.0, 4.0]).unwrap();
        let expected = (2.0 / 9.0) * (6.0f64 / 9.0).ln() + (4.0 / 9.0) * (12.0f64 / 9.0).ln();
        assert_relative_eq!(t, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_theil_perfect_equality() {
        let t = theil(&[5.0, 5.0, 5.0, 5.0]).unwrap();
        assert_relative_eq!(t, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_theil_single_value() {
        assert_eq!(theil(&[42.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_theil_zero_values_guarded() {
        // all-zero sample: zeros replaced by the tiniest normal double,
        // shares equalize, index degenerates to 0
        let t = theil(&[0.0, 0.0, 0.0]).unwrap();
        assert_relative_eq!(t, 0.0, epsilon = 1e-12);

        // a mixed sample stays finite
        let t = theil(&[0.0, 1.0, 2.0]).unwrap();
        assert!(t.is_finite());
    }

    #[test]
    fn test_theil_negative_values_guarded() {
        // negative shares contribute zero rather than NaN
        let t = theil(&[-1.0, -2.0, -3.0]).unwrap();
        assert!(t.is_finite());
    }

    #[test]
    fn test_simpson_concentrated() {
        let bins = BinSet::new(vec![1.0, 2.0, 3.0], BreakMethod::EqualInterval).unwrap();
        assert_eq!(simpson(&[0.5, 0.6, 0.7], &bins).unwrap(), 1.0);
    }

    #[test]
    fn test_simpson_uniform_two_bins() {
        let bins = BinSet::new(vec![1.0, 2.0], BreakMethod::EqualInterval).unwrap();
        let s = simpson(&[0.5, 0.6, 1.5, 1.6], &bins).unwrap();
        assert_relative_eq!(s, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_simpson_bounds() {
        let bins = BinSet::new(vec![1.0, 2.0, 3.0, 4.0], BreakMethod::EqualInterval).unwrap();
        let s = simpson(&[0.5, 1.5, 2.5, 3.5, 0.6, 1.6], &bins).unwrap();
        assert!(s > 0.0 && s <= 1.0);
    }

    #[test]
    fn test_empty_samples_rejected() {
        let bins = BinSet::new(vec![1.0], BreakMethod::EqualInterval).unwrap();
        assert!(theil(&[]).is_err());
        assert!(simpson(&[], &bins).is_err());
    }
}
