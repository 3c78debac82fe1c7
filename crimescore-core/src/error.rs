//! Error types for training and scoring
//!
//! Training failures are local and reported via `Result`, never panics.
//! A failed training run stores no partial model.

use std::fmt;

/// Errors that can occur while training a year's model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainError {
    /// No districts were supplied for the year
    EmptyDataset,
    /// The clustering engine produced unusable output
    /// (e.g. an assignment/district count mismatch)
    ClusteringFailure(String),
}

impl fmt::Display for TrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainError::EmptyDataset => write!(f, "cannot train on an empty district dataset"),
            TrainError::ClusteringFailure(reason) => {
                write!(f, "clustering failed: {}", reason)
            }
        }
    }
}

impl std::error::Error for TrainError {}

/// Errors that can occur while computing a security score
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    /// No trained model exists for the requested year
    ModelNotFound { year: i32 },
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::ModelNotFound { year } => {
                write!(f, "no trained model for year {}", year)
            }
        }
    }
}

impl std::error::Error for ScoreError {}
