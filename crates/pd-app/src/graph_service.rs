//! Reference graph construction and its tabular view.

use pd_core::Point;
use pd_graph::{build_graph, Anchor, AppliedElision, BuildReport, ReferenceGraph, ReferenceNode};
use pd_model::PipingModel;
use serde::Serialize;

use crate::error::AppResult;
use crate::scene_compile::CompiledScene;

/// A resolved anchor as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchorView {
    pub label: String,
    pub point: [f64; 3],
}

/// One reference node as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRow {
    pub position: usize,
    pub id: String,
    pub category: &'static str,
    pub kind: &'static str,
    pub flange_mode: String,
    pub applied: &'static str,
    pub first: Option<AnchorView>,
    pub center: Option<AnchorView>,
    pub last: Option<AnchorView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub lookups: usize,
    pub clipped_exact: usize,
    pub clipped_projected: usize,
    pub unclipped_exact: usize,
    pub unclipped_projected: usize,
    pub misses: usize,
    pub reconciled: usize,
    pub disagreements: usize,
    pub elided: usize,
}

impl From<&BuildReport> for ReportSummary {
    fn from(r: &BuildReport) -> Self {
        let [clipped_exact, clipped_projected, unclipped_exact, unclipped_projected] = r.hits_by_strategy;
        Self {
            lookups: r.lookups,
            clipped_exact,
            clipped_projected,
            unclipped_exact,
            unclipped_projected,
            misses: r.misses,
            reconciled: r.reconciled,
            disagreements: r.disagreements,
            elided: r.elided,
        }
    }
}

/// Build a fresh reference graph for the scene's chain.
pub fn build_reference_graph(scene: &CompiledScene) -> AppResult<ReferenceGraph> {
    Ok(build_graph(
        &scene.model,
        &scene.settings,
        &scene.chain,
        scene.plane,
        scene.filter.clone(),
    )?)
}

pub fn graph_rows(scene: &CompiledScene, graph: &ReferenceGraph) -> AppResult<Vec<NodeRow>> {
    graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, node)| {
            Ok(NodeRow {
                position: i,
                id: scene.chain_ids.get(i).cloned().unwrap_or_default(),
                category: node.category.label(),
                kind: node_kind(node),
                flange_mode: format!("{:?}", node.flange_mode),
                applied: match node.applied {
                    AppliedElision::None => "-",
                    AppliedElision::Exact => "exact",
                    AppliedElision::Negate => "negate",
                },
                first: anchor_view(scene, node.first_anchor)?,
                center: anchor_view(scene, node.center_anchor)?,
                last: anchor_view(scene, node.last_anchor)?,
            })
        })
        .collect()
}

fn node_kind(node: &ReferenceNode) -> &'static str {
    if node.is_pass_through {
        "marker"
    } else if node.is_linear {
        "linear"
    } else {
        "point-like"
    }
}

pub(crate) fn anchor_view(scene: &CompiledScene, anchor: Option<Anchor>) -> AppResult<Option<AnchorView>> {
    let Some(anchor) = anchor else {
        return Ok(None);
    };
    Ok(Some(AnchorView {
        label: scene.model.anchor_label(anchor.handle)?.to_string(),
        point: coords(&anchor.point),
    }))
}

pub(crate) fn coords(p: &Point) -> [f64; 3] {
    [p.x, p.y, p.z]
}
