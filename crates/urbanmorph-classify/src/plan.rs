//! Skewness-adaptive classification plan
//!
//! Phase one of a contextual run: every characteristic's global distribution
//! is classified exactly once, before any per-unit aggregation starts. The
//! resulting plan is immutable and shared read-only by all workers.

use tracing::debug;

use urbanmorph_core::{AttributeTable, Error, Result, UnitKey};

use crate::bins::{BinSet, BreakMethod};
use crate::breaks::{
    equal_interval, head_tail_breaks, natural_breaks, skewness, EQUAL_INTERVAL_CLASSES,
};

/// Skewness at or above which a distribution counts as heavily right-skewed
const RIGHT_SKEW_THRESHOLD: f64 = 1.0;
/// Skewness at or below which a distribution counts as heavily left-skewed
const LEFT_SKEW_THRESHOLD: f64 = -1.0;

/// Classification plan for one characteristic column.
///
/// Carries everything the aggregation needs: the source column, the output
/// name, the optional inversion pivot for left-skewed characteristics, and
/// the globally-fit bins. When a pivot is present, classification was done
/// on `pivot - value`, and every statistic must be computed on that same
/// inverted sample - [`transform`](Self::transform) applies it.
#[derive(Debug, Clone)]
pub struct ColumnPlan {
    column: usize,
    output: String,
    invert: Option<f64>,
    bins: BinSet,
}

impl ColumnPlan {
    /// Index of the source column in the attribute table
    pub fn column(&self) -> usize {
        self.column
    }

    /// Name under which results are reported (`<name>_r` when inverted)
    pub fn output(&self) -> &str {
        &self.output
    }

    /// The inversion pivot (global max of the original values), if any
    pub fn invert(&self) -> Option<f64> {
        self.invert
    }

    /// The globally-fit bins
    pub fn bins(&self) -> &BinSet {
        &self.bins
    }

    /// Map a raw table value into the sample space the bins were fit on
    pub fn transform(&self, value: f64) -> f64 {
        match self.invert {
            Some(pivot) => pivot - value,
            None => value,
        }
    }
}

/// Global classification plan: one [`ColumnPlan`] per characteristic
#[derive(Debug, Clone)]
pub struct ContextPlan {
    columns: Vec<ColumnPlan>,
}

impl ContextPlan {
    /// Fit the plan on a full attribute table.
    ///
    /// Method choice per characteristic: skewness >= 1 uses head/tail breaks
    /// (equal-interval fallback), skewness <= -1 inverts the series at its
    /// max and head/tail-classifies the inverted values under a `_r` name,
    /// anything in between uses natural breaks.
    pub fn fit<K: UnitKey>(table: &AttributeTable<K>) -> Result<Self> {
        if table.is_empty() {
            return Err(Error::empty_sample("classification plan"));
        }
        if table.num_characteristics() == 0 {
            return Err(Error::InvalidInput(
                "attribute table has no characteristics".to_string(),
            ));
        }

        let columns = table
            .characteristics()
            .iter()
            .enumerate()
            .map(|(c, ch)| fit_column(c, ch.name(), table.column(c)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { columns })
    }

    /// The per-characteristic plans, in table column order
    pub fn columns(&self) -> &[ColumnPlan] {
        &self.columns
    }

    /// Number of planned characteristics
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the plan covers no characteristics
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn fit_column(column: usize, name: &str, values: &[f64]) -> Result<ColumnPlan> {
    let skew = skewness(values);
    if skew >= RIGHT_SKEW_THRESHOLD {
        let bins = head_tail_or_fallback(values)?;
        debug!(name, skew, method = ?bins.method(), "classified right-skewed characteristic");
        Ok(ColumnPlan {
            column,
            output: name.to_string(),
            invert: None,
            bins,
        })
    } else if skew <= LEFT_SKEW_THRESHOLD {
        let pivot = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let inverted: Vec<f64> = values.iter().map(|v| pivot - v).collect();
        let bins = head_tail_or_fallback(&inverted)?;
        debug!(name, skew, pivot, method = ?bins.method(), "classified inverted left-skewed characteristic");
        Ok(ColumnPlan {
            column,
            output: format!("{name}_r"),
            invert: Some(pivot),
            bins,
        })
    } else {
        let bins = BinSet::new(natural_breaks(values)?, BreakMethod::NaturalBreaks)?;
        debug!(name, skew, classes = bins.len(), "classified characteristic with natural breaks");
        Ok(ColumnPlan {
            column,
            output: name.to_string(),
            invert: None,
            bins,
        })
    }
}

/// Attempt head/tail breaks, falling back to equal intervals only on the
/// classification failure itself - never by pre-checking the sample.
fn head_tail_or_fallback(values: &[f64]) -> Result<BinSet> {
    match head_tail_breaks(values) {
        Ok(cuts) => BinSet::new(cuts, BreakMethod::HeadTail),
        Err(Error::Classification(reason)) => {
            debug!(reason = %reason, "head/tail breaks failed, falling back to equal intervals");
            BinSet::new(
                equal_interval(values, EQUAL_INTERVAL_CLASSES)?,
                BreakMethod::EqualInterval,
            )
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::LogNormal;
    use urbanmorph_core::Characteristic;

    fn table_of(columns: Vec<(&str, Vec<f64>)>) -> AttributeTable<u64> {
        let n = columns[0].1.len();
        let mut builder = AttributeTable::builder(
            columns
                .iter()
                .map(|(name, _)| Characteristic::new(*name))
                .collect(),
        );
        for row in 0..n {
            let values: Vec<f64> = columns.iter().map(|(_, v)| v[row]).collect();
            builder.push_row(row as u64, &values).unwrap();
        }
        builder.build()
    }

    fn log_normal_sample(n: usize) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(42);
        let dist = LogNormal::new(0.0, 1.0).unwrap();
        (0..n).map(|_| rng.sample(dist)).collect()
    }

    #[test]
    fn test_right_skewed_uses_head_tail() {
        let table = table_of(vec![("area", log_normal_sample(500))]);
        let plan = ContextPlan::fit(&table).unwrap();

        let col = &plan.columns()[0];
        assert_eq!(col.output(), "area");
        assert_eq!(col.invert(), None);
        assert_eq!(col.bins().method(), BreakMethod::HeadTail);
    }

    #[test]
    fn test_left_skewed_inverts() {
        let original = log_normal_sample(500);
        let mirrored: Vec<f64> = original.iter().map(|v| -v).collect();
        let table = table_of(vec![("closeness", mirrored.clone())]);
        let plan = ContextPlan::fit(&table).unwrap();

        let col = &plan.columns()[0];
        assert_eq!(col.output(), "closeness_r");
        assert_eq!(col.bins().method(), BreakMethod::HeadTail);

        // the pivot is the column max, and transform() inverts around it
        let pivot = mirrored.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(col.invert(), Some(pivot));
        assert_eq!(col.transform(pivot), 0.0);

        // the bins cover the inverted sample, not the original one
        let inverted_max = mirrored.iter().map(|v| pivot - v).fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(*col.bins().breaks().last().unwrap(), inverted_max);
    }

    #[test]
    fn test_symmetric_uses_natural_breaks() {
        let table = table_of(vec![("orientation", vec![10.0, 20.0, 30.0, 40.0, 50.0])]);
        let plan = ContextPlan::fit(&table).unwrap();

        let col = &plan.columns()[0];
        assert_eq!(col.bins().method(), BreakMethod::NaturalBreaks);
        assert_eq!(col.output(), "orientation");
    }

    #[test]
    fn test_constant_right_skew_falls_back() {
        // a constant column has skew 0, so force the head/tail path with a
        // sample that is constant except for one far outlier
        let mut values = vec![1.0; 50];
        values.push(1000.0);
        let table = table_of(vec![("spikes", values)]);
        let plan = ContextPlan::fit(&table).unwrap();

        // head/tail succeeds here; now a fully constant sample must take the
        // equal-interval fallback without surfacing an error
        assert_eq!(plan.columns()[0].bins().method(), BreakMethod::HeadTail);

        let bins = head_tail_or_fallback(&[7.0; 20]).unwrap();
        assert_eq!(bins.method(), BreakMethod::EqualInterval);
        assert_eq!(bins.breaks(), &[7.0]);
        assert_eq!(bins.len(), 1);
    }

    #[test]
    fn test_plan_covers_all_columns_in_order() {
        let table = table_of(vec![
            ("a", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            ("b", vec![5.0, 4.0, 3.0, 2.0, 1.0]),
        ]);
        let plan = ContextPlan::fit(&table).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.columns()[0].column(), 0);
        assert_eq!(plan.columns()[1].column(), 1);
    }

    #[test]
    fn test_empty_table_rejected() {
        let table = AttributeTable::<u64>::builder(vec![Characteristic::new("a")]).build();
        assert!(ContextPlan::fit(&table).is_err());
    }
}
