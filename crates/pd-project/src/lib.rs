//! pd-project: scene file format and validation.

pub mod schema;
pub mod validate;

use std::path::Path;

pub use schema::*;
pub use validate::{validate_scene, ValidationError};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported scene format: {what}")]
    Format { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn parse_yaml(content: &str) -> ProjectResult<Scene> {
    let scene: Scene = serde_yaml::from_str(content)?;
    validate_scene(&scene)?;
    Ok(scene)
}

pub fn parse_json(content: &str) -> ProjectResult<Scene> {
    let scene: Scene = serde_json::from_str(content)?;
    validate_scene(&scene)?;
    Ok(scene)
}

pub fn load_yaml(path: &Path) -> ProjectResult<Scene> {
    parse_yaml(&std::fs::read_to_string(path)?)
}

pub fn load_json(path: &Path) -> ProjectResult<Scene> {
    parse_json(&std::fs::read_to_string(path)?)
}

/// Load a scene, picking the format from the file extension.
pub fn load_scene(path: &Path) -> ProjectResult<Scene> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("yaml" | "yml") => load_yaml(path),
        Some("json") => load_json(path),
        other => Err(ProjectError::Format {
            what: format!("expected .yaml, .yml or .json, got {:?}", other.unwrap_or("")),
        }),
    }
}
