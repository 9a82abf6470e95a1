//! Contextual aggregation engine and result assembly
//!
//! The orchestration layer of the urbanmorph workspace: given an immutable
//! attribute table, a contiguity-graph neighborhood index, and a fitted
//! classification plan, compute every unit's four neighborhood statistics
//! per characteristic and assemble them into one wide table.
//!
//! # Phases
//!
//! 1. **Classification** ([`ContextPlan::fit`](urbanmorph_classify::ContextPlan::fit)):
//!    global bins per characteristic, fully computed before any unit task
//! 2. **Aggregation** ([`AggregationEngine::run`]): embarrassingly parallel
//!    per-unit tasks over a [`WorkerPool`](urbanmorph_core::WorkerPool);
//!    whole-or-nothing by default, partial results only on explicit request
//!
//! Each unit's row depends only on its own neighborhood, so iteration order,
//! batching, and worker assignment are irrelevant to the result: a serial
//! run and any parallel run produce bit-identical tables.

mod assemble;
mod engine;

pub use assemble::{ContextualTable, STAT_SUFFIXES};
pub use engine::{contextual_characteristics, AggregationEngine, FailedUnit};
