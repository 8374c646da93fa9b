//! Splits a reference graph into the primary anchor list and the secondary
//! measurement segments.

use pd_core::{Point, Real, points_coincide, COINCIDENCE_TOL};
use pd_graph::{Anchor, ReferenceGraph, ReferenceNode};
use pd_model::Category;
use tracing::debug;

use crate::lines::DimensionLines;

/// A measurement reference: a resolved anchor, or a bare point where no
/// anchor was available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Endpoint {
    Anchor(Anchor),
    Point(Point),
}

impl Endpoint {
    pub fn point(&self) -> Point {
        match self {
            Endpoint::Anchor(a) => a.point,
            Endpoint::Point(p) => *p,
        }
    }

    pub fn anchor(&self) -> Option<Anchor> {
        match self {
            Endpoint::Anchor(a) => Some(*a),
            Endpoint::Point(_) => None,
        }
    }
}

/// One breakdown measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondarySegment {
    pub anchors: Vec<Anchor>,
    /// Shared category of the contributing nodes, `Generic` when mixed.
    pub category: Category,
    /// Chain positions of the first and last contributing node.
    pub first_node: usize,
    pub last_node: usize,
}

/// Output of [`DimensionAssembler::assemble`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Assembly {
    pub primary: Vec<Endpoint>,
    pub secondaries: Vec<SecondarySegment>,
    /// Segments dropped because they repeat the primary span.
    pub suppressed: usize,
}

/// Shared category of `categories`, `Generic` when they differ or there are none.
pub fn dominant_category<I>(categories: I) -> Category
where
    I: IntoIterator<Item = Category>,
{
    let mut iter = categories.into_iter();
    let Some(first) = iter.next() else {
        return Category::Generic;
    };
    if iter.all(|c| c == first) { first } else { Category::Generic }
}

/// Category driving the secondary style of a whole chain: markers do not count.
pub fn chain_category(graph: &ReferenceGraph) -> Category {
    dominant_category(
        graph
            .nodes()
            .iter()
            .filter(|n| !n.is_pass_through)
            .map(|n| n.category),
    )
}

#[derive(Default)]
struct OpenSegment {
    anchors: Vec<Anchor>,
    categories: Vec<Category>,
    first_node: Option<usize>,
    last_node: usize,
}

impl OpenSegment {
    fn push(&mut self, node: &ReferenceNode, position: usize, tol: Real) {
        let mut contributed = false;
        for anchor in node.anchors() {
            contributed = true;
            if self
                .anchors
                .last()
                .is_some_and(|prev| points_coincide(&prev.point, &anchor.point, tol))
            {
                continue;
            }
            self.anchors.push(anchor);
        }
        if contributed {
            self.categories.push(node.category);
            self.first_node.get_or_insert(position);
            self.last_node = position;
        }
    }

    fn finish(self) -> Option<SecondarySegment> {
        if self.anchors.len() < 2 {
            return None;
        }
        Some(SecondarySegment {
            category: dominant_category(self.categories),
            first_node: self.first_node.unwrap_or(self.last_node),
            last_node: self.last_node,
            anchors: self.anchors,
        })
    }
}

/// Walks the node array once and emits the measurement references.
#[derive(Debug, Clone, Copy)]
pub struct DimensionAssembler {
    tol: Real,
}

impl Default for DimensionAssembler {
    fn default() -> Self {
        Self {
            tol: COINCIDENCE_TOL,
        }
    }
}

impl DimensionAssembler {
    /// `tol` is the distance below which consecutive references collapse.
    pub fn new(tol: Real) -> Self {
        Self { tol }
    }

    pub fn assemble(&self, graph: &ReferenceGraph, lines: &DimensionLines) -> Assembly {
        let primary = self.primary_references(graph);
        let mut assembly = Assembly {
            primary,
            ..Assembly::default()
        };

        if lines.secondary.is_some() {
            for segment in self.secondary_segments(graph) {
                if self.repeats_primary(&segment, &assembly.primary) {
                    assembly.suppressed += 1;
                } else {
                    assembly.secondaries.push(segment);
                }
            }
        }

        debug!(
            primary = assembly.primary.len(),
            secondaries = assembly.secondaries.len(),
            suppressed = assembly.suppressed,
            "assembled dimension references"
        );
        assembly
    }

    /// Start of the chain, every point-like center, end of the chain.
    ///
    /// Coincident neighbors collapse into one reference; an anchor always
    /// wins over a bare point at the same spot.
    fn primary_references(&self, graph: &ReferenceGraph) -> Vec<Endpoint> {
        let nodes = graph.nodes();
        let last = nodes.len().saturating_sub(1);
        let mut out: Vec<Endpoint> = Vec::new();
        let mut push = |e: Endpoint| match out.last_mut() {
            Some(prev) if points_coincide(&prev.point(), &e.point(), self.tol) => {
                if prev.anchor().is_none() && e.anchor().is_some() {
                    *prev = e;
                }
            }
            _ => out.push(e),
        };

        for (i, node) in nodes.iter().enumerate() {
            if i == 0 {
                push(
                    node.first_anchor
                        .map_or(Endpoint::Point(node.first_point()), Endpoint::Anchor),
                );
            }
            if node.is_point_like() {
                if let Some(center) = node.center_anchor {
                    push(Endpoint::Anchor(center));
                }
            }
            if i == last {
                push(
                    node.last_anchor
                        .map_or(Endpoint::Point(node.last_point()), Endpoint::Anchor),
                );
            }
        }
        out
    }

    /// Segments break after the last node and at every node whose elision
    /// acted as Exact.
    fn secondary_segments(&self, graph: &ReferenceGraph) -> Vec<SecondarySegment> {
        let nodes = graph.nodes();
        let mut segments = Vec::new();
        let mut open = OpenSegment::default();

        for (i, node) in nodes.iter().enumerate() {
            if node.closes_segment() {
                segments.extend(std::mem::take(&mut open).finish());
                continue;
            }
            open.push(node, i, self.tol);
        }
        segments.extend(open.finish());
        segments
    }

    fn repeats_primary(&self, segment: &SecondarySegment, primary: &[Endpoint]) -> bool {
        segment.anchors.len() == primary.len()
            && segment
                .anchors
                .iter()
                .zip(primary)
                .all(|(a, p)| points_coincide(&a.point, &p.point(), self.tol))
    }
}
