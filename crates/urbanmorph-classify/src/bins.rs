//! Fixed classification bins for one characteristic

use urbanmorph_core::{Error, Result};

/// How a bin set's breakpoints were derived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakMethod {
    /// Head/tail breaks for heavy-tailed distributions
    HeadTail,
    /// Fisher-Jenks natural breaks
    NaturalBreaks,
    /// Equal-interval fallback
    EqualInterval,
}

/// Ordered classification breakpoints for one characteristic.
///
/// Breakpoints are upper bounds: a value belongs to the first bin whose
/// bound is `>=` the value. A bin set is derived exactly once from the
/// characteristic's full global distribution and never refit on a
/// neighborhood subset; values above the top breakpoint (possible only
/// through float round-off) count in the last bin.
#[derive(Debug, Clone, PartialEq)]
pub struct BinSet {
    breaks: Vec<f64>,
    method: BreakMethod,
}

impl BinSet {
    /// Create a bin set from strictly increasing, finite upper bounds
    pub fn new(breaks: Vec<f64>, method: BreakMethod) -> Result<Self> {
        if breaks.is_empty() {
            return Err(Error::Classification(
                "a bin set needs at least one breakpoint".to_string(),
            ));
        }
        if breaks.iter().any(|b| !b.is_finite()) {
            return Err(Error::Classification(
                "breakpoints must be finite".to_string(),
            ));
        }
        if breaks.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::Classification(
                "breakpoints must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { breaks, method })
    }

    /// The breakpoints (bin upper bounds)
    pub fn breaks(&self) -> &[f64] {
        &self.breaks
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.breaks.len()
    }

    /// A bin set is never empty; kept for API symmetry
    pub fn is_empty(&self) -> bool {
        self.breaks.is_empty()
    }

    /// The derivation method
    pub fn method(&self) -> BreakMethod {
        self.method
    }

    /// Index of the bin a value falls into
    pub fn classify(&self, value: f64) -> usize {
        let at = self.breaks.partition_point(|b| *b < value);
        at.min(self.breaks.len() - 1)
    }

    /// Per-bin counts of a sample
    pub fn counts(&self, values: &[f64]) -> Vec<usize> {
        let mut counts = vec![0usize; self.breaks.len()];
        for &v in values {
            counts[self.classify(v)] += 1;
        }
        counts
    }
}
