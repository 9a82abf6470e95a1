//! Worker pools driving per-unit aggregation tasks
//!
//! Per-unit computations are independent tasks over immutable shared inputs,
//! so a pool only needs to map an index range; there is no shared mutable
//! state and no locking. The serial pool is the reference implementation:
//! any parallel pool must produce bit-identical results.

use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use crate::error::Error;
use crate::error::Result;

/// Execution strategy of a worker pool
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Process units sequentially on the calling thread
    Serial,
    /// Process units in parallel
    Parallel,
}

/// Trait for pools that run per-unit tasks
///
/// `run_tasks` maps `task` over `0..count` and returns results in index
/// order, regardless of completion order. Tasks receive only an index; all
/// shared inputs are captured as immutable borrows.
pub trait WorkerPool: Send + Sync {
    /// Run `count` independent tasks and collect their results in index order
    fn run_tasks<F, R>(&self, count: usize, task: F) -> Vec<R>
    where
        F: Fn(usize) -> R + Send + Sync,
        R: Send;

    /// Get the execution strategy
    fn strategy(&self) -> ExecutionStrategy;

    /// Number of workers available
    fn workers(&self) -> usize;
}

/// Sequential pool
///
/// Runs every task on the calling thread. Used for verification and for
/// inputs small enough that parallel overhead is not worth it.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialPool;

impl WorkerPool for SerialPool {
    fn run_tasks<F, R>(&self, count: usize, task: F) -> Vec<R>
    where
        F: Fn(usize) -> R + Send + Sync,
        R: Send,
    {
        (0..count).map(task).collect()
    }

    fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Serial
    }

    fn workers(&self) -> usize {
        1
    }
}

/// Parallel pool using Rayon
///
/// Uses the global Rayon pool by default, or a dedicated thread pool when an
/// explicit worker count is requested.
#[cfg(feature = "parallel")]
#[derive(Clone, Debug, Default)]
pub struct RayonPool {
    pool: Option<std::sync::Arc<rayon::ThreadPool>>,
}

#[cfg(feature = "parallel")]
impl RayonPool {
    /// Create a pool backed by the global Rayon thread pool
    pub fn new() -> Self {
        Self { pool: None }
    }

    /// Create a pool with a dedicated thread pool of `workers` threads
    pub fn with_workers(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(Error::InvalidParameter(
                "worker count must be positive".to_string(),
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| Error::Execution(format!("Failed to create thread pool: {e}")))?;
        Ok(Self {
            pool: Some(std::sync::Arc::new(pool)),
        })
    }
}

#[cfg(feature = "parallel")]
impl WorkerPool for RayonPool {
    fn run_tasks<F, R>(&self, count: usize, task: F) -> Vec<R>
    where
        F: Fn(usize) -> R + Send + Sync,
        R: Send,
    {
        use rayon::prelude::*;

        if let Some(pool) = &self.pool {
            pool.install(|| (0..count).into_par_iter().map(task).collect())
        } else {
            (0..count).into_par_iter().map(task).collect()
        }
    }

    fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Parallel
    }

    fn workers(&self) -> usize {
        if let Some(pool) = &self.pool {
            pool.current_num_threads()
        } else {
            rayon::current_num_threads()
        }
    }
}

/// Execution mode selector, deserializable from run configuration
///
/// The serde form is tagged, so a config file reads
/// `{"mode": "parallel", "workers": 8}` or `{"mode": "serial"}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Execution {
    /// Single-threaded sequential execution
    Serial,
    /// Parallel execution, optionally with an explicit worker count
    Parallel {
        #[serde(default)]
        workers: Option<usize>,
    },
}

impl Default for Execution {
    fn default() -> Self {
        Execution::Serial
    }
}

impl Execution {
    /// Build the pool this selector describes.
    ///
    /// Selecting parallel execution without the `parallel` feature is an
    /// error, not a silent downgrade.
    pub fn build_pool(self) -> Result<AnyPool> {
        match self {
            Execution::Serial => Ok(AnyPool::Serial(SerialPool)),
            #[cfg(feature = "parallel")]
            Execution::Parallel { workers: None } => Ok(AnyPool::Rayon(RayonPool::new())),
            #[cfg(feature = "parallel")]
            Execution::Parallel { workers: Some(n) } => {
                Ok(AnyPool::Rayon(RayonPool::with_workers(n)?))
            }
            #[cfg(not(feature = "parallel"))]
            Execution::Parallel { .. } => Err(crate::error::Error::Execution(
                "parallel execution requires the `parallel` feature".to_string(),
            )),
        }
    }
}

/// Either pool behind one type, for callers configured at runtime
#[derive(Clone, Debug)]
pub enum AnyPool {
    /// Sequential execution
    Serial(SerialPool),
    /// Rayon-backed parallel execution
    #[cfg(feature = "parallel")]
    Rayon(RayonPool),
}

impl WorkerPool for AnyPool {
    fn run_tasks<F, R>(&self, count: usize, task: F) -> Vec<R>
    where
        F: Fn(usize) -> R + Send + Sync,
        R: Send,
    {
        match self {
            AnyPool::Serial(p) => p.run_tasks(count, task),
            #[cfg(feature = "parallel")]
            AnyPool::Rayon(p) => p.run_tasks(count, task),
        }
    }

    fn strategy(&self) -> ExecutionStrategy {
        match self {
            AnyPool::Serial(p) => p.strategy(),
            #[cfg(feature = "parallel")]
            AnyPool::Rayon(p) => p.strategy(),
        }
    }

    fn workers(&self) -> usize {
        match self {
            AnyPool::Serial(p) => p.workers(),
            #[cfg(feature = "parallel")]
            AnyPool::Rayon(p) => p.workers(),
        }
    }
}

/// Create a sequential pool
pub fn serial() -> SerialPool {
    SerialPool
}

/// Create a parallel pool on the global Rayon thread pool
#[cfg(feature = "parallel")]
pub fn parallel() -> RayonPool {
    RayonPool::new()
}

/// Create a parallel pool with a dedicated thread pool
#[cfg(feature = "parallel")]
pub fn parallel_with_workers(workers: usize) -> Result<RayonPool> {
    RayonPool::with_workers(workers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_pool() {
        let pool = serial();

        let squares = pool.run_tasks(5, |i| i * i);
        assert_eq!(squares, vec![0, 1, 4, 9, 16]);

        assert_eq!(pool.strategy(), ExecutionStrategy::Serial);
        assert_eq!(pool.workers(), 1);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_rayon_pool_matches_serial() {
        let serial_result = serial().run_tasks(100, |i| i as f64 * 1.5);
        let parallel_result = parallel().run_tasks(100, |i| i as f64 * 1.5);
        assert_eq!(serial_result, parallel_result);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_rayon_pool_with_workers() {
        let pool = parallel_with_workers(2).unwrap();
        assert_eq!(pool.workers(), 2);
        assert_eq!(pool.strategy(), ExecutionStrategy::Parallel);

        let results = pool.run_tasks(10, |i| i + 1);
        assert_eq!(results, (1..=10).collect::<Vec<_>>());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_zero_workers_rejected() {
        assert!(RayonPool::with_workers(0).is_err());
    }

    #[test]
    fn test_execution_selector_serde() {
        let ex: Execution = serde_json::from_str(r#"{"mode": "serial"}"#).unwrap();
        assert_eq!(ex, Execution::Serial);

        let ex: Execution = serde_json::from_str(r#"{"mode": "parallel", "workers": 4}"#).unwrap();
        assert_eq!(ex, Execution::Parallel { workers: Some(4) });

        let ex: Execution = serde_json::from_str(r#"{"mode": "parallel"}"#).unwrap();
        assert_eq!(ex, Execution::Parallel { workers: None });
    }

    #[test]
    fn test_selector_builds_serial_pool() {
        let pool = Execution::Serial.build_pool().unwrap();
        assert_eq!(pool.strategy(), ExecutionStrategy::Serial);
        assert_eq!(pool.run_tasks(3, |i| i), vec![0, 1, 2]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_selector_builds_parallel_pool() {
        let pool = Execution::Parallel { workers: Some(2) }.build_pool().unwrap();
        assert_eq!(pool.strategy(), ExecutionStrategy::Parallel);
        assert_eq!(pool.workers(), 2);
    }
}
