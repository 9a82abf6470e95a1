//! Skewness-adaptive global bin classification
//!
//! Contextual diversity statistics need a fixed categorization of each
//! characteristic before any neighborhood is visited: bins derived from the
//! characteristic's *global* distribution, never from a local subset. This
//! crate derives those bins once, up front:
//!
//! - heavily right-skewed characteristics (skewness >= 1) get head/tail
//!   breaks, with an equal-interval fallback when the sample cannot split
//! - heavily left-skewed characteristics (skewness <= -1) are inverted at
//!   their max and classified like right-skewed ones, under a `_r` name
//! - everything else gets Fisher-Jenks natural breaks with a
//!   goodness-of-fit class count
//!
//! The output is a [`ContextPlan`]: one immutable [`ColumnPlan`] per
//! characteristic, shared read-only by every aggregation worker.

mod bins;
mod breaks;
mod plan;

pub use bins::{BinSet, BreakMethod};
pub use breaks::{
    equal_interval, head_tail_breaks, natural_breaks, skewness, EQUAL_INTERVAL_CLASSES,
};
pub use plan::{ColumnPlan, ContextPlan};
