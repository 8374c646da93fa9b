//! Scene loading, validation and introspection.

use std::path::Path;

use pd_project::{ProjectError, Scene};

use crate::error::{AppError, AppResult};

/// Summary of a scene for listing.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SceneSummary {
    pub name: String,
    pub component_count: usize,
    pub port_count: usize,
    pub chain_len: usize,
    pub marker_types: Vec<String>,
}

/// Load a scene from a YAML or JSON file.
pub fn load_scene(path: &Path) -> AppResult<Scene> {
    pd_project::load_scene(path).map_err(|e| match e {
        ProjectError::Io(source) => AppError::SceneFileRead {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    })
}

/// Validate scene structure.
pub fn validate_scene(scene: &Scene) -> AppResult<()> {
    pd_project::validate_scene(scene).map_err(|e| AppError::Validation(e.to_string()))?;
    if scene.chain.is_empty() {
        return Err(AppError::Validation("Scene chain must list at least one component".to_string()));
    }
    Ok(())
}

pub fn summarize_scene(scene: &Scene) -> SceneSummary {
    SceneSummary {
        name: scene.name.clone(),
        component_count: scene.components.len(),
        port_count: scene.components.iter().map(|c| c.ports.len()).sum(),
        chain_len: scene.chain.len(),
        marker_types: scene.preferences.marker_types.clone(),
    }
}
