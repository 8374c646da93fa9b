//! Reference graph data structures.

use pd_core::{AnchorHandle, CompId, NodeId, Point, PortId};
use pd_model::Category;

use crate::indexing::ChainIndex;
use crate::settings::{ElisionPolicy, FlangeElisionMode};

/// A resolved measurement endpoint: the handle and where its feature sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub handle: AnchorHandle,
    pub point: Point,
}

/// A connecting port as seen from its owner node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortRef {
    pub id: PortId,
    pub origin: Point,
}

/// What flange elision actually did to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppliedElision {
    #[default]
    None,
    /// Own anchors cleared; the node closes a secondary segment.
    Exact,
    /// Own anchors and the facing anchors of both neighbors cleared.
    Negate,
}

/// One node per chain position.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceNode {
    pub id: NodeId,
    pub component: CompId,
    pub category: Category,
    /// Mode as configured for the component's type.
    pub flange_mode: FlangeElisionMode,
    /// Mode after `Default` was replaced by the global policy.
    pub resolved_policy: Option<ElisionPolicy>,
    pub applied: AppliedElision,
    pub origin: Point,
    pub is_start: bool,
    pub is_end: bool,
    pub is_linear: bool,
    pub is_pass_through: bool,
    pub is_adjacent_to_point_like: bool,
    pub first_port: Option<PortRef>,
    pub last_port: Option<PortRef>,
    pub first_anchor: Option<Anchor>,
    pub center_anchor: Option<Anchor>,
    pub last_anchor: Option<Anchor>,
}

impl ReferenceNode {
    pub(crate) fn new(id: NodeId, component: CompId, category: Category, origin: Point) -> Self {
        Self {
            id,
            component,
            category,
            flange_mode: FlangeElisionMode::None,
            resolved_policy: None,
            applied: AppliedElision::None,
            origin,
            is_start: false,
            is_end: false,
            is_linear: false,
            is_pass_through: false,
            is_adjacent_to_point_like: false,
            first_port: None,
            last_port: None,
            first_anchor: None,
            center_anchor: None,
            last_anchor: None,
        }
    }

    /// Non-linear and not a pass-through marker.
    pub fn is_point_like(&self) -> bool {
        !self.is_linear && !self.is_pass_through
    }

    pub fn is_extremity(&self) -> bool {
        self.is_start || self.is_end
    }

    /// Number of non-null anchors, in 0..=3.
    pub fn reference_count(&self) -> usize {
        [self.first_anchor, self.center_anchor, self.last_anchor]
            .iter()
            .filter(|a| a.is_some())
            .count()
    }

    /// Non-null anchors in first, center, last order.
    pub fn anchors(&self) -> impl Iterator<Item = Anchor> {
        [self.first_anchor, self.center_anchor, self.last_anchor]
            .into_iter()
            .flatten()
    }

    /// Where the leading end of this node is, best source first: anchor,
    /// connecting port, origin.
    pub fn first_point(&self) -> Point {
        self.first_anchor
            .map(|a| a.point)
            .or(self.first_port.map(|p| p.origin))
            .unwrap_or(self.origin)
    }

    /// Trailing counterpart of [`first_point`](Self::first_point).
    pub fn last_point(&self) -> Point {
        self.last_anchor
            .map(|a| a.point)
            .or(self.last_port.map(|p| p.origin))
            .unwrap_or(self.origin)
    }

    /// The chain closes with elision suppressing this node's own break.
    pub fn closes_segment(&self) -> bool {
        self.applied == AppliedElision::Exact
    }
}

/// Aggregate of the non-fatal outcomes of one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Anchor lookups attempted.
    pub lookups: usize,
    /// Hits per lookup strategy, in strategy order.
    pub hits_by_strategy: [usize; 4],
    /// Lookups that found nothing in either pass.
    pub misses: usize,
    /// Junction anchors copied from one side to the other.
    pub reconciled: usize,
    /// Junctions where both sides resolved different handles.
    pub disagreements: usize,
    /// Nodes whose anchors were changed by flange elision.
    pub elided: usize,
}

/// Output of a reference graph build: one node per chain position, in order.
#[derive(Debug, Clone)]
pub struct ReferenceGraph {
    pub(crate) nodes: Vec<ReferenceNode>,
    pub(crate) index: ChainIndex,
    pub(crate) report: BuildReport,
}

impl ReferenceGraph {
    pub fn nodes(&self) -> &[ReferenceNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by ID (returns None if ID out of bounds).
    pub fn node(&self, id: NodeId) -> Option<&ReferenceNode> {
        self.nodes.get(id.position())
    }

    /// The node built for a component, if it is part of the chain.
    pub fn node_for(&self, comp: CompId) -> Option<&ReferenceNode> {
        self.index.position(comp).and_then(|i| self.nodes.get(i))
    }

    pub fn first(&self) -> Option<&ReferenceNode> {
        self.nodes.first()
    }

    pub fn last(&self) -> Option<&ReferenceNode> {
        self.nodes.last()
    }

    /// Leading end of the first node and trailing end of the last node.
    pub fn extremity_points(&self) -> Option<(Point, Point)> {
        Some((self.first()?.first_point(), self.last()?.last_point()))
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pd_core::Id;

    fn anchor(i: u32, x: f64) -> Anchor {
        Anchor {
            handle: Id::from_index(i),
            point: Point::new(x, 0.0, 0.0),
        }
    }

    #[test]
    fn reference_count_counts_non_null() {
        let mut node = ReferenceNode::new(Id::from_index(0), Id::from_index(0), Category::Pipe, Point::origin());
        assert_eq!(node.reference_count(), 0);
        node.first_anchor = Some(anchor(1, 0.0));
        node.last_anchor = Some(anchor(2, 1.0));
        assert_eq!(node.reference_count(), 2);
        node.center_anchor = Some(anchor(3, 0.5));
        assert_eq!(node.reference_count(), 3);
        let order: Vec<u32> = node.anchors().map(|a| a.handle.index()).collect();
        assert_eq!(order, vec![1, 3, 2]);
    }

    #[test]
    fn end_points_fall_back_to_port_then_origin() {
        let mut node = ReferenceNode::new(
            Id::from_index(0),
            Id::from_index(0),
            Category::Pipe,
            Point::new(5.0, 0.0, 0.0),
        );
        assert_eq!(node.first_point(), Point::new(5.0, 0.0, 0.0));
        node.first_port = Some(PortRef {
            id: Id::from_index(0),
            origin: Point::new(1.0, 0.0, 0.0),
        });
        assert_eq!(node.first_point(), Point::new(1.0, 0.0, 0.0));
        node.first_anchor = Some(anchor(9, 0.9));
        assert_eq!(node.first_point(), Point::new(0.9, 0.0, 0.0));
    }

    #[test]
    fn marker_is_not_point_like() {
        let mut node = ReferenceNode::new(Id::from_index(0), Id::from_index(0), Category::PipeAccessory, Point::origin());
        assert!(node.is_point_like());
        node.is_pass_through = true;
        assert!(!node.is_point_like());
    }
}
