//! Error types for dimension line computation and commit.

use pd_core::CoreError;
use pd_graph::GraphError;
use thiserror::Error;

/// Errors that can occur while planning or committing a dimension.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DimensionError {
    #[error("Chain span is degenerate in the drawing plane: {what}")]
    DegenerateSpan { what: &'static str },

    #[error("Invalid dimension settings: {what}")]
    InvalidSettings { what: &'static str },

    #[error("Invalid dimension plan: {what}")]
    InvalidPlan { what: String },

    #[error("Measurement sink rejected the plan: {what}")]
    Sink { what: String },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

pub type DimensionResult<T> = Result<T, DimensionError>;
