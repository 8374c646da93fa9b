//! One dimension action: fresh graph, lines, assembly, plan, commit.

use pd_core::{Point, Vector};
use pd_dimension::{
    chain_category, DimensionAssembler, DimensionLineCalculator, DimensionPlan, MeasurementSink,
    PlannedMeasurement,
};
use pd_graph::ReferenceGraph;
use serde::Serialize;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::graph_service::{anchor_view, build_reference_graph, coords, ReportSummary};
use crate::scene_compile::CompiledScene;

/// Graph and plan of one action. Nothing has been committed yet.
#[derive(Debug)]
pub struct PlannedDimension {
    pub graph: ReferenceGraph,
    pub plan: DimensionPlan,
}

/// Build the graph and the complete plan for a placement point.
pub fn plan_dimension(scene: &CompiledScene, placement: Point) -> AppResult<PlannedDimension> {
    let graph = build_reference_graph(scene)?;
    let category = chain_category(&graph);
    let driving = scene.styles.configured(category).cloned().unwrap_or_default();
    let calculator = DimensionLineCalculator::new(scene.plane, scene.view_scale, driving)?;

    let (start, end) = graph
        .extremity_points()
        .ok_or_else(|| AppError::InvalidInput("chain is empty".to_string()))?;
    let lines = calculator.compute_lines(start, end, placement)?;
    let assembly = DimensionAssembler::new(scene.settings.match_tolerance).assemble(&graph, &lines);
    let plan = DimensionPlan::new(assembly, &lines, category, &scene.styles);
    plan.validate()?;

    Ok(PlannedDimension { graph, plan })
}

/// Plan and commit in one step. Any failure leaves `sink` untouched.
pub fn run_dimension(
    scene: &CompiledScene,
    placement: Point,
    sink: &mut dyn MeasurementSink,
) -> AppResult<(PlannedDimension, usize)> {
    let planned = plan_dimension(scene, placement)?;
    let created = sink.commit(&planned.plan)?;
    info!(scene = %scene.name, created, "dimension created");
    Ok((planned, created))
}

/// Parse a placement point written as `x,y,z`.
pub fn parse_point(text: &str) -> AppResult<Point> {
    let parts = text
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::InvalidInput(format!("invalid point '{text}': {e}")))?;
    match parts.as_slice() {
        [x, y, z] if parts.iter().all(|c| c.is_finite()) => Ok(Point::new(*x, *y, *z)),
        _ => Err(AppError::InvalidInput(format!(
            "invalid point '{text}': expected three finite numbers x,y,z"
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceSummary {
    pub label: Option<String>,
    pub point: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementSummary {
    pub kind: &'static str,
    pub style: String,
    pub category: &'static str,
    pub line_origin: [f64; 3],
    pub line_direction: [f64; 3],
    /// Distance between the outermost references along the line.
    pub length: f64,
    pub references: Vec<ReferenceSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSummary {
    pub scene: String,
    pub measurements: Vec<MeasurementSummary>,
    pub style_fallbacks: usize,
    pub report: ReportSummary,
}

pub fn summarize_plan(scene: &CompiledScene, planned: &PlannedDimension) -> AppResult<PlanSummary> {
    let primary = std::iter::once(("primary", &planned.plan.primary));
    let secondaries = planned.plan.secondaries.iter().map(|m| ("secondary", m));
    let measurements = primary
        .chain(secondaries)
        .map(|(kind, m)| summarize_measurement(scene, kind, m))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(PlanSummary {
        scene: scene.name.clone(),
        measurements,
        style_fallbacks: planned.plan.style_fallbacks,
        report: planned.graph.report().into(),
    })
}

fn summarize_measurement(
    scene: &CompiledScene,
    kind: &'static str,
    m: &PlannedMeasurement,
) -> AppResult<MeasurementSummary> {
    let direction: Vector = m.line.direction().into_inner();
    let length = match m.references.as_slice() {
        [first, .., last] => (last.point() - first.point()).dot(&direction).abs(),
        _ => 0.0,
    };
    let references = m
        .references
        .iter()
        .map(|e| {
            Ok(ReferenceSummary {
                label: anchor_view(scene, e.anchor())?.map(|v| v.label),
                point: coords(&e.point()),
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(MeasurementSummary {
        kind,
        style: m.style.clone(),
        category: m.category.label(),
        line_origin: coords(&m.line.origin()),
        line_direction: [direction.x, direction.y, direction.z],
        length,
        references,
    })
}
