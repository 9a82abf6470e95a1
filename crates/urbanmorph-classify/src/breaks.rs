//! Break-derivation methods
//!
//! Three ways to place classification breakpoints over a global value
//! distribution: head/tail breaks for heavy right tails, Fisher-Jenks
//! natural breaks with a goodness-of-fit class count for everything in
//! between, and equal intervals as the fallback when head/tail collapses.

use std::cmp::Ordering;

use urbanmorph_core::{Error, Result};

/// Class count used by the equal-interval fallback
pub const EQUAL_INTERVAL_CLASSES: usize = 5;

/// Largest class count the goodness-of-fit search will try
const GADF_MAX_CLASSES: usize = 15;

/// Goodness of absolute deviation fit at which the search stops
const GADF_TARGET: f64 = 0.8;

/// Fisher-Pearson moment coefficient of skewness (g1, biased form).
///
/// Returns 0.0 for samples too small or too flat to carry a skew signal
/// (n < 3 or zero variance), so such characteristics classify as symmetric.
pub fn skewness(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 3 {
        return 0.0;
    }
    let nf = n as f64;
    let mean = values.iter().sum::<f64>() / nf;
    let m2 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / nf;
    if m2 <= 0.0 {
        return 0.0;
    }
    let m3 = values.iter().map(|v| (v - mean).powi(3)).sum::<f64>() / nf;
    m3 / m2.powf(1.5)
}

/// Head/tail breaks for heavy-tailed distributions.
///
/// Iteratively splits at the mean and recurses into the above-mean head
/// while it keeps shrinking; the global max closes the last bin. Fails with
/// [`Error::Classification`] when fewer than two distinct bounds result
/// (constant or near-constant samples) - callers are expected to catch that
/// and fall back to [`equal_interval`].
pub fn head_tail_breaks(values: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(Error::empty_sample("head/tail breaks"));
    }

    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut cuts = Vec::new();
    let mut head = values.to_vec();
    loop {
        let mean = head.iter().sum::<f64>() / head.len() as f64;
        cuts.push(mean);
        let next: Vec<f64> = head.iter().copied().filter(|&v| v > mean).collect();
        if next.is_empty() || next.len() == head.len() {
            break;
        }
        head = next;
    }
    if cuts.last() != Some(&max) {
        cuts.push(max);
    }

    let cuts = dedup_breaks(cuts);
    if cuts.len() < 2 {
        return Err(Error::Classification(
            "head/tail breaks collapsed to a single bin".to_string(),
        ));
    }
    Ok(cuts)
}

/// Equal-interval breakpoints.
///
/// Total for any non-empty sample: a constant sample yields a single
/// breakpoint (one valid bin), which is what the head/tail fallback relies
/// on.
pub fn equal_interval(values: &[f64], classes: usize) -> Result<Vec<f64>> {
    if classes == 0 {
        return Err(Error::InvalidParameter(
            "class count must be positive".to_string(),
        ));
    }
    if values.is_empty() {
        return Err(Error::empty_sample("equal intervals"));
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        return Ok(vec![max]);
    }

    let width = (max - min) / classes as f64;
    let mut cuts: Vec<f64> = (1..=classes).map(|i| min + width * i as f64).collect();
    // close the last bin on the exact max
    *cuts.last_mut().unwrap() = max;
    Ok(dedup_breaks(cuts))
}

/// Natural breaks with an internally chosen class count.
///
/// Fisher-Jenks optimal partitioning (deterministic, unlike k-means-seeded
/// variants), with the class count grown from 2 until the goodness of
/// absolute deviation fit exceeds 0.8 or 15 classes are reached.
pub fn natural_breaks(values: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(Error::empty_sample("natural breaks"));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let n = sorted.len();
    if sorted[0] == sorted[n - 1] {
        return Ok(vec![sorted[n - 1]]);
    }

    let global_median = median_sorted(&sorted);
    let adam: f64 = sorted.iter().map(|v| (v - global_median).abs()).sum();
    if adam == 0.0 {
        return Ok(vec![sorted[n - 1]]);
    }

    let max_classes = GADF_MAX_CLASSES.min(n);
    let mut bounds = Vec::new();
    for classes in 2..=max_classes {
        bounds = fisher_jenks(&sorted, classes);
        let fit = 1.0 - adcm(&sorted, &bounds) / adam;
        if fit > GADF_TARGET {
            break;
        }
    }
    Ok(dedup_breaks(bounds))
}

/// Optimal k-class partition of a sorted sample, returning class upper
/// bounds (the last bound is the sample max).
fn fisher_jenks(sorted: &[f64], classes: usize) -> Vec<f64> {
    let n = sorted.len();
    let k = classes.min(n);

    // lower[l][j]: 1-based index of the first value of class j in the
    // optimal j-class partition of the first l values
    let mut lower = vec![vec![0usize; k + 1]; n + 1];
    let mut variance = vec![vec![0.0f64; k + 1]; n + 1];

    for j in 1..=k {
        lower[1][j] = 1;
        for l in 2..=n {
            variance[l][j] = f64::INFINITY;
        }
    }

    for l in 2..=n {
        let mut sum = 0.0;
        let mut sum_squares = 0.0;
        let mut count = 0.0;
        let mut trailing_variance = 0.0;

        for m in 1..=l {
            let first = l - m + 1;
            let value = sorted[first - 1];

            count += 1.0;
            sum += value;
            sum_squares += value * value;
            trailing_variance = sum_squares - (sum * sum) / count;

            let prev = first - 1;
            if prev != 0 {
                // strict improvement only: on ties the earliest candidate
                // (largest class start) wins, which keeps every backtracked
                // state a feasible partition even with duplicate values
                for j in 2..=k {
                    if variance[l][j] > trailing_variance + variance[prev][j - 1] {
                        lower[l][j] = first;
                        variance[l][j] = trailing_variance + variance[prev][j - 1];
                    }
                }
            }
        }
        lower[l][1] = 1;
        variance[l][1] = trailing_variance;
    }

    let mut bounds = vec![0.0; k];
    bounds[k - 1] = sorted[n - 1];
    let mut right = n;
    for j in (2..=k).rev() {
        let first = lower[right][j];
        bounds[j - 2] = sorted[first - 2];
        right = first - 1;
    }
    bounds
}

/// Sum of absolute deviations around class medians
fn adcm(sorted: &[f64], bounds: &[f64]) -> f64 {
    let mut total = 0.0;
    let mut start = 0;
    for &bound in bounds {
        let end = sorted.partition_point(|v| *v <= bound);
        if end > start {
            let class = &sorted[start..end];
            let median = median_sorted(class);
            total += class.iter().map(|v| (v - median).abs()).sum::<f64>();
            start = end;
        }
    }
    total
}

fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Sort and drop exactly-equal duplicates so the result is strictly
/// increasing
fn dedup_breaks(mut cuts: Vec<f64>) -> Vec<f64> {
    cuts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    cuts.dedup();
    cuts
}
