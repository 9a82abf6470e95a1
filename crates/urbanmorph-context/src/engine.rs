//! Contextual aggregation engine
//!
//! Drives the per-unit phase of a contextual run. Construction validates the
//! inputs and requires an already-fitted [`ContextPlan`] - bins are always
//! final before the first per-unit task starts. Each task resolves one
//! unit's closed neighborhood, slices the attribute table, and runs the
//! statistics kernel once per planned characteristic. Tasks share nothing
//! mutable, so any worker pool produces the same rows in the same order.

use tracing::{debug, info, instrument};

use urbanmorph_classify::ContextPlan;
use urbanmorph_core::{AttributeTable, Error, Result, UnitKey, WorkerPool};
use urbanmorph_graph::ContiguityGraph;
use urbanmorph_kernel::contextual_stats;

use crate::assemble::ContextualTable;

/// A unit whose row could not be computed, reported by
/// [`AggregationEngine::run_partial`]
#[derive(Debug)]
pub struct FailedUnit<K: UnitKey> {
    /// The unit's id
    pub id: K,
    /// Why its row failed
    pub error: Error,
}

/// Orchestrates contextual aggregation over a worker pool
#[derive(Debug)]
pub struct AggregationEngine<'a, K: UnitKey> {
    table: &'a AttributeTable<K>,
    graph: &'a ContiguityGraph<K>,
    plan: &'a ContextPlan,
}

impl<'a, K: UnitKey> AggregationEngine<'a, K> {
    /// Create an engine over an attribute table, a neighborhood index, and a
    /// fitted classification plan.
    ///
    /// Fails fast on contract violations: a plan of the wrong width, or a
    /// table id the graph does not know (the id universes must match).
    pub fn new(
        table: &'a AttributeTable<K>,
        graph: &'a ContiguityGraph<K>,
        plan: &'a ContextPlan,
    ) -> Result<Self> {
        if plan.len() != table.num_characteristics() {
            return Err(Error::size_mismatch(
                table.num_characteristics(),
                plan.len(),
                "classification plan",
            ));
        }
        for id in table.ids() {
            if !graph.contains(id) {
                return Err(Error::unknown_unit(id));
            }
        }
        Ok(Self { table, graph, plan })
    }

    /// Compute one unit's 4xC output row
    fn unit_row(&self, row: usize) -> Result<Vec<f64>> {
        let id = self.table.id_at(row);
        let hood = self.graph.closed_neighborhood(id)?;
        let rows = hood
            .iter()
            .map(|nid| {
                self.table
                    .position(nid)
                    .ok_or_else(|| Error::unknown_unit(nid))
            })
            .collect::<Result<Vec<usize>>>()?;

        let mut out = Vec::with_capacity(self.plan.len() * 4);
        let mut sample = Vec::with_capacity(rows.len());
        for plan in self.plan.columns() {
            let column = self.table.column(plan.column());
            sample.clear();
            sample.extend(rows.iter().map(|&r| plan.transform(column[r])));

            let stats = contextual_stats(&sample, plan.bins())?;
            out.extend_from_slice(&[
                stats.mean_iq3,
                stats.range_iq3,
                stats.theil,
                stats.simpson,
            ]);
        }
        Ok(out)
    }

    /// Run the aggregation, whole or nothing.
    ///
    /// Any per-unit failure aborts the run; a table with silently missing
    /// rows is never returned. Serial and parallel pools produce
    /// bit-identical tables.
    #[instrument(skip_all, fields(units = self.table.len(), characteristics = self.plan.len(), workers = pool.workers()))]
    pub fn run<P: WorkerPool>(&self, pool: &P) -> Result<ContextualTable<K>> {
        let rows = pool.run_tasks(self.table.len(), |row| self.unit_row(row));

        let mut data = Vec::with_capacity(rows.len());
        for row in rows {
            data.push(row?);
        }
        info!(units = data.len(), "contextual aggregation complete");
        Ok(ContextualTable::from_rows(
            self.table.ids().to_vec(),
            self.plan,
            data,
        ))
    }

    /// Run the aggregation, keeping whatever succeeds.
    ///
    /// The explicit opt-in partial-results mode: failed units are returned
    /// alongside the table instead of aborting the run, and never silently
    /// dropped.
    #[instrument(skip_all, fields(units = self.table.len(), workers = pool.workers()))]
    pub fn run_partial<P: WorkerPool>(
        &self,
        pool: &P,
    ) -> (ContextualTable<K>, Vec<FailedUnit<K>>) {
        let rows = pool.run_tasks(self.table.len(), |row| self.unit_row(row));

        let mut ids = Vec::new();
        let mut data = Vec::new();
        let mut failed = Vec::new();
        for (row, result) in rows.into_iter().enumerate() {
            let id = self.table.id_at(row).clone();
            match result {
                Ok(values) => {
                    ids.push(id);
                    data.push(values);
                }
                Err(error) => {
                    debug!(unit = %id, error = %error, "unit failed");
                    failed.push(FailedUnit { id, error });
                }
            }
        }
        info!(
            units = ids.len(),
            failed = failed.len(),
            "partial contextual aggregation complete"
        );
        (ContextualTable::from_rows(ids, self.plan, data), failed)
    }
}

/// Fit the classification plan and aggregate in one call.
///
/// The convenience entry point for the common case: phase one (global bin
/// classification) runs to completion, then every unit's neighborhood
/// statistics are computed over `pool`.
pub fn contextual_characteristics<K: UnitKey, P: WorkerPool>(
    table: &AttributeTable<K>,
    graph: &ContiguityGraph<K>,
    pool: &P,
) -> Result<ContextualTable<K>> {
    let plan = ContextPlan::fit(table)?;
    AggregationEngine::new(table, graph, &plan)?.run(pool)
}
