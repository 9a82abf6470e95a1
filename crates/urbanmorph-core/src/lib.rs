//! Core types for contextual morphometric aggregation
//!
//! This crate provides the foundation shared by the urbanmorph workspace:
//!
//! 1. **Attribute tables** - immutable per-unit characteristic values,
//!    sanitized at build time
//! 2. **Worker pools** - serial and Rayon-backed execution with identical
//!    results
//! 3. **Errors** - one unified error type
//!
//! # Design Philosophy
//!
//! - **No global state**: everything is passed explicitly; there are no
//!   process-wide singletons or module-level caches
//! - **Immutable aggregation inputs**: tables are sanitized once, then only
//!   read; per-unit tasks never contend
//! - **Deterministic**: result correctness never depends on execution order
//!
//! # Example
//!
//! ```rust
//! use urbanmorph_core::{AttributeTable, Characteristic, WorkerPool};
//!
//! let mut builder = AttributeTable::builder(vec![Characteristic::new("area")]);
//! builder.push_row(1u64, &[120.0]).unwrap();
//! builder.push_row(2u64, &[f64::NAN]).unwrap(); // sanitized to 0.0
//! let table = builder.build();
//!
//! let sums = urbanmorph_core::execution::serial()
//!     .run_tasks(table.len(), |row| table.value(row, 0) * 2.0);
//! assert_eq!(sums, vec![240.0, 0.0]);
//! ```

pub mod error;
pub mod execution;
pub mod table;
pub mod unit;

// Re-export core types
pub use error::{Error, Result};

pub use execution::{serial, AnyPool, Execution, ExecutionStrategy, SerialPool, WorkerPool};
#[cfg(feature = "parallel")]
pub use execution::{parallel, parallel_with_workers, RayonPool};

pub use table::{AttributeTable, AttributeTableBuilder, Characteristic};
pub use unit::UnitKey;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::execution::{serial, AnyPool, Execution, ExecutionStrategy, WorkerPool};
    #[cfg(feature = "parallel")]
    pub use crate::execution::{parallel, parallel_with_workers};
    pub use crate::table::{AttributeTable, Characteristic};
    pub use crate::unit::UnitKey;
}
