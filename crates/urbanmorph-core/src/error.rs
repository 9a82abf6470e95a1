//! Error types for contextual morphometric analysis
//!
//! Provides a unified error type for all urbanmorph crates.

use thiserror::Error;

/// Core error type for contextual aggregation operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} values, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// A unit id present in one input is missing from another.
    ///
    /// Always fatal for a run: it signals a data-integrity mismatch between
    /// the attribute table and the contiguity graph, not a recoverable
    /// per-unit condition.
    #[error("Unit not found: {0}")]
    UnitNotFound(String),

    /// A break-derivation method could not produce usable bins.
    ///
    /// Recovered internally by falling back to equal-interval binning;
    /// callers of the classification plan never see this variant.
    #[error("Classification error: {0}")]
    Classification(String),

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Threading or worker-pool error
    #[error("Execution error: {0}")]
    Execution(String),

    /// IO error (for table export)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for an empty sample
    pub fn empty_sample(_operation: &str) -> Self {
        Self::InsufficientData {
            expected: 1,
            actual: 0,
        }
    }

    /// Create an error for an unknown unit id
    pub fn unknown_unit(id: &dyn std::fmt::Display) -> Self {
        Self::UnitNotFound(id.to_string())
    }

    /// Create an error for a percentile outside [0, 100]
    pub fn invalid_percentile(p: f64) -> Self {
        Self::InvalidParameter(format!("Percentile {p} must be in [0, 100]"))
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("k must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: k must be positive");

        let err = Error::InsufficientData {
            expected: 3,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient data: expected at least 3 values, got 1"
        );

        let err = Error::UnitNotFound("42".to_string());
        assert_eq!(err.to_string(), "Unit not found: 42");

        let err = Error::Classification("single bin".to_string());
        assert_eq!(err.to_string(), "Classification error: single bin");
    }

    #[test]
    fn test_error_helper_functions() {
        match Error::empty_sample("theil") {
            Error::InsufficientData { expected, actual } => {
                assert_eq!(expected, 1);
                assert_eq!(actual, 0);
            }
            _ => panic!("Wrong error type"),
        }

        let err = Error::unknown_unit(&17u64);
        assert_eq!(err.to_string(), "Unit not found: 17");

        let err = Error::invalid_percentile(120.0);
        assert_eq!(
            err.to_string(),
            "Invalid parameter: Percentile 120 must be in [0, 100]"
        );

        let err = Error::size_mismatch(4, 3, "attribute row");
        assert_eq!(
            err.to_string(),
            "Invalid input: Size mismatch in attribute row: expected 4, got 3"
        );
    }

    #[test]
    fn test_error_from_io_error() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => assert!(err.to_string().contains("file not found")),
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_error_from_anyhow() {
        let anyhow_err = anyhow::anyhow!("custom error message");
        let err: Error = anyhow_err.into();

        match err {
            Error::Other(_) => assert!(err.to_string().contains("custom error message")),
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_result_type_alias() {
        fn classify(n: usize) -> Result<usize> {
            if n == 0 {
                return Err(Error::empty_sample("classify"));
            }
            Ok(n)
        }

        assert_eq!(classify(3).unwrap(), 3);
        assert!(classify(0).is_err());
    }
}
