//! Contextual morphometric characteristics of urban form
//!
//! Given per-unit numeric characteristics (building footprints, tessellation
//! cells, street segments) and a contiguity graph over the same units, this
//! workspace computes four spatially-contextualized statistics per
//! characteristic over every unit's graph neighborhood: interquartile mean
//! and range, Theil inequality, and Simpson diversity against bins fit once
//! on the global distribution.
//!
//! # Architecture
//!
//! - [`urbanmorph_core`]: attribute tables, worker pools, errors
//! - [`urbanmorph_graph`]: the contiguity-graph neighborhood index
//! - [`urbanmorph_classify`]: skewness-adaptive global bin classification
//! - [`urbanmorph_kernel`]: the per-neighborhood statistics kernel
//! - [`urbanmorph_context`]: the aggregation engine and result table
//!
//! # Example
//!
//! ```rust
//! use urbanmorph::prelude::*;
//!
//! let mut builder = AttributeTable::builder(vec![Characteristic::new("area")]);
//! for (id, area) in [(1u64, 120.0), (2, 80.0), (3, 95.0)] {
//!     builder.push_row(id, &[area]).unwrap();
//! }
//! let table = builder.build();
//!
//! let graph = ContiguityGraph::from_edges(1..=3u64, [(1, 2), (2, 3)]).unwrap();
//!
//! let result = contextual_characteristics(&table, &graph, &serial()).unwrap();
//! assert_eq!(result.len(), 3);
//! assert_eq!(result.column_names()[0], "area_meanIQ3");
//! ```

pub use urbanmorph_classify::{
    equal_interval, head_tail_breaks, natural_breaks, skewness, BinSet, BreakMethod, ColumnPlan,
    ContextPlan,
};
pub use urbanmorph_context::{
    contextual_characteristics, AggregationEngine, ContextualTable, FailedUnit, STAT_SUFFIXES,
};
pub use urbanmorph_core::{
    execution::serial, AnyPool, AttributeTable, AttributeTableBuilder, Characteristic, Error,
    Execution, ExecutionStrategy, Result, SerialPool, UnitKey, WorkerPool,
};
#[cfg(feature = "parallel")]
pub use urbanmorph_core::{parallel, parallel_with_workers, RayonPool};
pub use urbanmorph_graph::ContiguityGraph;
pub use urbanmorph_kernel::{
    contextual_stats, limit_range, percentile_nearest, simpson, theil, ContextualStats,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use urbanmorph_classify::{BinSet, ContextPlan};
    pub use urbanmorph_context::{
        contextual_characteristics, AggregationEngine, ContextualTable,
    };
    pub use urbanmorph_core::{
        execution::serial, AttributeTable, Characteristic, Error, Execution, Result, UnitKey,
        WorkerPool,
    };
    #[cfg(feature = "parallel")]
    pub use urbanmorph_core::{parallel, parallel_with_workers};
    pub use urbanmorph_graph::ContiguityGraph;
    pub use urbanmorph_kernel::{contextual_stats, ContextualStats};
}
