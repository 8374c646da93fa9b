//! Flange elision over a built node array.
//!
//! Nodes are addressed by position. Walks over pass-through markers are
//! bounded loops that stop at either end of the array.

use tracing::trace;

use crate::graph::{AppliedElision, ReferenceNode};
use crate::settings::ElisionPolicy;

/// Position of the nearest node before `i` that is not a pass-through marker.
pub fn prev_significant(nodes: &[ReferenceNode], i: usize) -> Option<usize> {
    let mut j = i;
    while j > 0 {
        j -= 1;
        if !nodes[j].is_pass_through {
            return Some(j);
        }
    }
    None
}

/// Position of the nearest node after `i` that is not a pass-through marker.
pub fn next_significant(nodes: &[ReferenceNode], i: usize) -> Option<usize> {
    let mut j = i + 1;
    while j < nodes.len() {
        if !nodes[j].is_pass_through {
            return Some(j);
        }
        j += 1;
    }
    None
}

/// Clear the node's own first and last anchors.
pub fn apply_exact(nodes: &mut [ReferenceNode], i: usize) {
    let Some(node) = nodes.get_mut(i) else {
        return;
    };
    node.first_anchor = None;
    node.last_anchor = None;
    node.applied = AppliedElision::Exact;
}

/// Clear the node's own anchors, the trailing anchor of its predecessor and
/// the leading anchor of its successor, skipping pass-through markers.
pub fn apply_negate(nodes: &mut [ReferenceNode], i: usize) {
    if i >= nodes.len() {
        return;
    }
    nodes[i].first_anchor = None;
    nodes[i].last_anchor = None;
    nodes[i].applied = AppliedElision::Negate;

    if let Some(p) = prev_significant(nodes, i) {
        nodes[p].last_anchor = None;
    }
    if let Some(n) = next_significant(nodes, i) {
        nodes[n].first_anchor = None;
    }
}

/// Whether Partial acts as Exact at `i`: chain extremity, or neighbor of a
/// point-like node.
pub fn partial_acts_as_exact(nodes: &[ReferenceNode], i: usize) -> bool {
    nodes
        .get(i)
        .is_some_and(|n| n.is_extremity() || n.is_adjacent_to_point_like)
}

/// Dispatch the elision policy of every node. Returns how many nodes were
/// elided.
pub fn apply_all(nodes: &mut [ReferenceNode], global: ElisionPolicy) -> usize {
    let mut elided = 0;
    for i in 0..nodes.len() {
        let policy = nodes[i].flange_mode.resolve(global);
        nodes[i].resolved_policy = policy;
        let Some(policy) = policy else {
            continue;
        };

        let acts_as_exact = match policy {
            ElisionPolicy::Exact => true,
            ElisionPolicy::Partial => partial_acts_as_exact(nodes, i),
            ElisionPolicy::Negate => false,
        };
        trace!(position = i, ?policy, acts_as_exact, "applying flange elision");

        if acts_as_exact {
            apply_exact(nodes, i);
        } else {
            apply_negate(nodes, i);
        }
        elided += 1;
    }
    elided
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Anchor;
    use crate::settings::FlangeElisionMode;
    use pd_core::{Id, Point};
    use pd_model::Category;

    fn anchored(i: u32) -> ReferenceNode {
        let mut n = ReferenceNode::new(Id::from_index(i), Id::from_index(i), Category::Pipe, Point::origin());
        n.is_linear = true;
        n.first_anchor = Some(Anchor {
            handle: Id::from_index(i * 10),
            point: Point::new(i as f64, 0.0, 0.0),
        });
        n.last_anchor = Some(Anchor {
            handle: Id::from_index(i * 10 + 1),
            point: Point::new(i as f64 + 1.0, 0.0, 0.0),
        });
        n
    }

    fn chain(n: u32) -> Vec<ReferenceNode> {
        let mut nodes: Vec<_> = (0..n).map(anchored).collect();
        if let Some(first) = nodes.first_mut() {
            first.is_start = true;
        }
        if let Some(last) = nodes.last_mut() {
            last.is_end = true;
        }
        nodes
    }

    #[test]
    fn exact_clears_only_own_anchors() {
        let mut nodes = chain(3);
        apply_exact(&mut nodes, 1);
        assert!(nodes[1].first_anchor.is_none() && nodes[1].last_anchor.is_none());
        assert!(nodes[0].last_anchor.is_some());
        assert!(nodes[2].first_anchor.is_some());
        assert_eq!(nodes[1].applied, AppliedElision::Exact);
    }

    #[test]
    fn negate_clears_facing_neighbor_anchors() {
        let mut nodes = chain(3);
        apply_negate(&mut nodes, 1);
        assert!(nodes[0].last_anchor.is_none());
        assert!(nodes[0].first_anchor.is_some());
        assert!(nodes[1].first_anchor.is_none() && nodes[1].last_anchor.is_none());
        assert!(nodes[2].first_anchor.is_none());
        assert!(nodes[2].last_anchor.is_some());
    }

    #[test]
    fn negate_skips_markers() {
        let mut nodes = chain(5);
        nodes[1].is_pass_through = true;
        nodes[1].first_anchor = None;
        nodes[1].last_anchor = None;
        nodes[3].is_pass_through = true;
        nodes[3].first_anchor = None;
        nodes[3].last_anchor = None;

        apply_negate(&mut nodes, 2);
        assert!(nodes[0].last_anchor.is_none());
        assert!(nodes[4].first_anchor.is_none());
        assert!(nodes[0].first_anchor.is_some());
        assert!(nodes[4].last_anchor.is_some());
    }

    #[test]
    fn negate_at_bounds_is_a_no_op_for_missing_neighbors() {
        let mut nodes = chain(2);
        apply_negate(&mut nodes, 0);
        assert!(nodes[1].first_anchor.is_none());
        apply_negate(&mut nodes, 1);
        assert!(nodes[0].last_anchor.is_none());

        let mut single = chain(1);
        apply_negate(&mut single, 0);
        assert_eq!(single[0].reference_count(), 0);
        apply_negate(&mut single, 7);
    }

    #[test]
    fn markers_only_walk_to_the_ends() {
        let mut nodes = chain(3);
        nodes[0].is_pass_through = true;
        nodes[2].is_pass_through = true;
        assert_eq!(prev_significant(&nodes, 1), None);
        assert_eq!(next_significant(&nodes, 1), None);
        apply_negate(&mut nodes, 1);
        assert!(nodes[0].last_anchor.is_some());
    }

    #[test]
    fn partial_at_extremity_acts_as_exact() {
        let mut nodes = chain(3);
        nodes[0].flange_mode = FlangeElisionMode::Partial;
        apply_all(&mut nodes, ElisionPolicy::Exact);
        assert_eq!(nodes[0].applied, AppliedElision::Exact);
        assert!(nodes[1].first_anchor.is_some());
    }

    #[test]
    fn partial_in_run_acts_as_negate() {
        let mut nodes = chain(3);
        nodes[1].flange_mode = FlangeElisionMode::Partial;
        apply_all(&mut nodes, ElisionPolicy::Exact);
        assert_eq!(nodes[1].applied, AppliedElision::Negate);
        assert!(nodes[0].last_anchor.is_none());
        assert!(nodes[2].first_anchor.is_none());
    }

    #[test]
    fn partial_next_to_point_like_acts_as_exact() {
        let mut nodes = chain(3);
        nodes[1].flange_mode = FlangeElisionMode::Partial;
        nodes[1].is_adjacent_to_point_like = true;
        apply_all(&mut nodes, ElisionPolicy::Negate);
        assert_eq!(nodes[1].applied, AppliedElision::Exact);
        assert!(nodes[0].last_anchor.is_some());
    }

    #[test]
    fn default_follows_global_policy() {
        let mut nodes = chain(3);
        nodes[1].flange_mode = FlangeElisionMode::Default;
        let elided = apply_all(&mut nodes, ElisionPolicy::Negate);
        assert_eq!(elided, 1);
        assert_eq!(nodes[1].resolved_policy, Some(ElisionPolicy::Negate));
        assert_eq!(nodes[1].applied, AppliedElision::Negate);
    }

    #[test]
    fn none_is_untouched() {
        let mut nodes = chain(3);
        let before = nodes.clone();
        assert_eq!(apply_all(&mut nodes, ElisionPolicy::Negate), 0);
        assert_eq!(nodes, before);
    }
}
