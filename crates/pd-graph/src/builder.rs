//! Reference graph builder.
//!
//! One builder per user action: construct it, call [`build`] once, hand the
//! resulting [`ReferenceGraph`] to the assembler. The passes run left to
//! right in a fixed order with no fixpoint iteration:
//!
//! 1. one node per component (classification, origin, extremity flags)
//! 2. connecting port pair for every adjacent pair
//! 3. free end ports of the chain extremities
//! 4. port and center anchors
//! 5. reconciliation of one-sided junction anchors
//! 6. adjacency to point-like nodes
//! 7. flange elision
//!
//! [`build`]: ReferenceGraphBuilder::build

use pd_core::{CompId, NodeId, Plane};
use pd_model::PipingModel;
use tracing::{debug, warn};

use crate::anchors::{AnchorRole, GeometryAnchorIndex};
use crate::classify::ComponentClassifier;
use crate::connect::{port_ref, ConnectivityResolver};
use crate::elision::{self, next_significant, prev_significant};
use crate::error::GraphResult;
use crate::graph::{Anchor, BuildReport, ReferenceGraph, ReferenceNode};
use crate::settings::{CenterlineFilter, GraphSettings};
use crate::validate;

/// Builder for the reference graph of one chain.
pub struct ReferenceGraphBuilder<'a, M: PipingModel + ?Sized> {
    model: &'a M,
    settings: &'a GraphSettings,
    plane: Plane,
    filter: CenterlineFilter,
    report: BuildReport,
}

impl<'a, M: PipingModel + ?Sized> ReferenceGraphBuilder<'a, M> {
    pub fn new(
        model: &'a M,
        settings: &'a GraphSettings,
        plane: Plane,
        filter: CenterlineFilter,
    ) -> Self {
        Self {
            model,
            settings,
            plane,
            filter,
            report: BuildReport::default(),
        }
    }

    /// Run every pass over `chain` and return the finished graph.
    pub fn build(mut self, chain: &[CompId]) -> GraphResult<ReferenceGraph> {
        self.settings.validate()?;
        let index = validate::validate_chain(self.model, chain)?;

        let mut nodes = self.create_nodes(chain)?;
        self.connect_neighbors(&mut nodes)?;
        self.resolve_free_ends(&mut nodes)?;
        self.resolve_anchors(&mut nodes)?;
        self.reconcile_junctions(&mut nodes);
        flag_point_like_adjacency(&mut nodes);
        self.report.elided = elision::apply_all(&mut nodes, self.settings.default_policy);

        if self.report.misses > 0 {
            warn!(
                misses = self.report.misses,
                lookups = self.report.lookups,
                "some anchors could not be resolved in either geometry pass"
            );
        }
        debug!(nodes = nodes.len(), report = ?self.report, "reference graph built");

        Ok(ReferenceGraph {
            nodes,
            index,
            report: self.report,
        })
    }

    /// Pass 1.
    fn create_nodes(&self, chain: &[CompId]) -> GraphResult<Vec<ReferenceNode>> {
        let classifier = ComponentClassifier::new(self.model, self.settings);
        let last = chain.len() - 1;
        let mut nodes = Vec::with_capacity(chain.len());

        for (i, &comp) in chain.iter().enumerate() {
            let component = self.model.component(comp)?;
            let class = classifier.classify(comp)?;

            let mut node = ReferenceNode::new(
                NodeId::from_index(i as u32),
                comp,
                component.category,
                component.location.origin(),
            );
            node.is_start = i == 0;
            node.is_end = i == last;
            node.is_linear = class.is_linear;
            node.is_pass_through = class.is_pass_through;
            node.flange_mode = class.flange_mode;
            nodes.push(node);
        }
        debug!(count = nodes.len(), "created reference nodes");
        Ok(nodes)
    }

    /// Pass 2.
    fn connect_neighbors(&self, nodes: &mut [ReferenceNode]) -> GraphResult<()> {
        let resolver = ConnectivityResolver::new(self.model);
        for i in 0..nodes.len().saturating_sub(1) {
            let (a, b) =
                resolver.try_get_connection(nodes[i].component, nodes[i + 1].component, i)?;
            nodes[i].last_port = Some(a);
            nodes[i + 1].first_port = Some(b);
        }
        Ok(())
    }

    /// Pass 3.
    fn resolve_free_ends(&self, nodes: &mut [ReferenceNode]) -> GraphResult<()> {
        let n = nodes.len();
        if n == 1 {
            let node = &mut nodes[0];
            if node.is_linear {
                let ports = self.model.ports_of(node.component)?;
                if let [a, b] = ports.as_slice() {
                    node.first_port = Some(port_ref(a));
                    node.last_port = Some(port_ref(b));
                }
            }
            return Ok(());
        }

        let resolver = ConnectivityResolver::new(self.model);
        if let Some(entry) = nodes[0].last_port {
            nodes[0].first_port = resolver.parallel_connector(entry.id)?;
        }
        if let Some(entry) = nodes[n - 1].first_port {
            nodes[n - 1].last_port = resolver.parallel_connector(entry.id)?;
        }
        Ok(())
    }

    /// Pass 4.
    fn resolve_anchors(&mut self, nodes: &mut [ReferenceNode]) -> GraphResult<()> {
        let tol = self.settings.match_tolerance;
        for node in nodes.iter_mut() {
            if node.is_pass_through {
                continue;
            }
            let index = GeometryAnchorIndex::from_model(self.model, node.component, &self.filter)?;

            if let Some(port) = node.first_port {
                node.first_anchor = self.lookup(&index, &port.origin, AnchorRole::Port, tol);
            }
            if let Some(port) = node.last_port {
                node.last_anchor = self.lookup(&index, &port.origin, AnchorRole::Port, tol);
            }
            if !node.is_linear {
                let origin = node.origin;
                node.center_anchor = self.lookup(&index, &origin, AnchorRole::Center, tol);
            }
        }
        Ok(())
    }

    fn lookup(
        &mut self,
        index: &GeometryAnchorIndex,
        target: &pd_core::Point,
        role: AnchorRole,
        tol: pd_core::Real,
    ) -> Option<Anchor> {
        self.report.lookups += 1;
        match index.resolve(target, role, &self.plane, tol) {
            Some(hit) => {
                self.report.hits_by_strategy[hit.rank] += 1;
                Some(hit.anchor)
            }
            None => {
                self.report.misses += 1;
                None
            }
        }
    }

    /// Pass 5. Junctions touching a pass-through marker are left alone: the
    /// marker carries no anchors to share.
    fn reconcile_junctions(&mut self, nodes: &mut [ReferenceNode]) {
        for i in 0..nodes.len().saturating_sub(1) {
            if nodes[i].is_pass_through || nodes[i + 1].is_pass_through {
                continue;
            }
            match (nodes[i].last_anchor, nodes[i + 1].first_anchor) {
                (Some(a), None) => {
                    nodes[i + 1].first_anchor = Some(a);
                    self.report.reconciled += 1;
                }
                (None, Some(b)) => {
                    nodes[i].last_anchor = Some(b);
                    self.report.reconciled += 1;
                }
                (Some(a), Some(b)) if a.handle != b.handle => {
                    self.report.disagreements += 1;
                }
                _ => {}
            }
        }
    }
}

/// Pass 6: self or the nearest non-marker neighbor on either side is
/// point-like.
fn flag_point_like_adjacency(nodes: &mut [ReferenceNode]) {
    for i in 0..nodes.len() {
        let neighbor_point_like = |j: Option<usize>| j.is_some_and(|j| nodes[j].is_point_like());
        let flag = nodes[i].is_point_like()
            || neighbor_point_like(prev_significant(nodes, i))
            || neighbor_point_like(next_significant(nodes, i));
        nodes[i].is_adjacent_to_point_like = flag;
    }
}

/// Build the reference graph of `chain` in one call.
pub fn build_graph<M>(
    model: &M,
    settings: &GraphSettings,
    chain: &[CompId],
    plane: Plane,
    filter: CenterlineFilter,
) -> GraphResult<ReferenceGraph>
where
    M: PipingModel + ?Sized,
{
    ReferenceGraphBuilder::new(model, settings, plane, filter).build(chain)
}
