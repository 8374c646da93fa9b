//! Shared application service layer for pipedim.
//!
//! Centralizes what the command line does with a scene: loading and
//! validating it, compiling it into a model, building the reference graph
//! and planning and committing a dimension.

pub mod dimension_service;
pub mod error;
pub mod graph_service;
pub mod scene_compile;
pub mod scene_service;

// Re-export key types for convenience
pub use dimension_service::{
    parse_point, plan_dimension, run_dimension, summarize_plan, MeasurementSummary, PlanSummary,
    PlannedDimension, ReferenceSummary,
};
pub use error::{AppError, AppResult};
pub use graph_service::{build_reference_graph, graph_rows, AnchorView, NodeRow, ReportSummary};
pub use scene_compile::{compile_scene, drawing_plane, graph_settings, style_table, CompiledScene};
pub use scene_service::{load_scene, summarize_scene, validate_scene, SceneSummary};
