//! Graph-building error types.

use pd_core::{CompId, CoreError};
use pd_model::ModelError;
use thiserror::Error;

/// Fatal errors of a reference graph build. Anything reported here aborts the
/// whole build; anchor misses are not errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Chain is empty")]
    EmptyChain,

    #[error("Component {comp} appears twice in the chain (positions {first} and {second})")]
    DuplicateComponent {
        comp: CompId,
        first: usize,
        second: usize,
    },

    #[error("No connection between components {from} and {to} at chain position {position}")]
    Connectivity {
        from: CompId,
        to: CompId,
        position: usize,
    },

    #[error("Invalid graph settings: {what}")]
    InvalidSettings { what: &'static str },

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Geometry error: {0}")]
    Core(#[from] CoreError),
}

pub type GraphResult<T> = Result<T, GraphError>;
