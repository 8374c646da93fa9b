//! Error types for the pd-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// gives the CLI one error surface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scene error: {0}")]
    Scene(String),

    #[error("Failed to read scene file: {path}")]
    SceneFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scene validation failed: {0}")]
    Validation(String),

    #[error("Scene compilation failed: {0}")]
    Compile(String),

    #[error("Reference graph error: {0}")]
    Graph(String),

    #[error("Dimension error: {0}")]
    Dimension(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to render output: {0}")]
    Output(String),
}

/// Result type for pd-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<pd_project::ProjectError> for AppError {
    fn from(err: pd_project::ProjectError) -> Self {
        match err {
            pd_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Scene(other.to_string()),
        }
    }
}

impl From<pd_model::ModelError> for AppError {
    fn from(err: pd_model::ModelError) -> Self {
        AppError::Compile(err.to_string())
    }
}

impl From<pd_core::CoreError> for AppError {
    fn from(err: pd_core::CoreError) -> Self {
        AppError::Compile(err.to_string())
    }
}

impl From<pd_graph::GraphError> for AppError {
    fn from(err: pd_graph::GraphError) -> Self {
        AppError::Graph(err.to_string())
    }
}

impl From<pd_dimension::DimensionError> for AppError {
    fn from(err: pd_dimension::DimensionError) -> Self {
        match err {
            pd_dimension::DimensionError::Graph(e) => AppError::Graph(e.to_string()),
            other => AppError::Dimension(other.to_string()),
        }
    }
}
