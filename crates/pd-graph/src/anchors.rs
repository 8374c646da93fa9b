//! Point-to-anchor resolution over a component's boundary geometry.
//!
//! Each component is indexed twice, once from view-clipped geometry and once
//! from unclipped geometry. A target point is looked up with an ordered list
//! of strategies and the first hit wins:
//!
//! 1. view-clipped, exact match
//! 2. view-clipped, match after projecting onto the drawing plane
//! 3. unclipped, exact match
//! 4. unclipped, match after projecting onto the drawing plane
//!
//! Clipping can remove the very feature a port coincides with, and
//! projection relaxes matching for chains not quite aligned with the view.

use pd_core::{AnchorHandle, CompId, Plane, Point, Real};
use pd_model::{BoundaryPrimitive, GeometryMode, PipingModel};

use crate::error::GraphResult;
use crate::graph::Anchor;
use crate::settings::CenterlineFilter;

/// How candidate points are compared with the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// 3-D distance within tolerance.
    Exact,
    /// Distance within tolerance after projecting both onto the drawing plane.
    Projected,
}

/// One step of the lookup fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LookupStrategy {
    pub mode: GeometryMode,
    pub matching: MatchKind,
}

/// Strategies in the order they are tried.
pub const LOOKUP_ORDER: [LookupStrategy; 4] = [
    LookupStrategy {
        mode: GeometryMode::ViewClipped,
        matching: MatchKind::Exact,
    },
    LookupStrategy {
        mode: GeometryMode::ViewClipped,
        matching: MatchKind::Projected,
    },
    LookupStrategy {
        mode: GeometryMode::Unclipped,
        matching: MatchKind::Exact,
    },
    LookupStrategy {
        mode: GeometryMode::Unclipped,
        matching: MatchKind::Projected,
    },
];

/// What a lookup is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorRole {
    /// A connecting port; any boundary feature qualifies.
    Port,
    /// The characteristic point of a point-like component; only centerline
    /// edges accepted by the filter qualify.
    Center,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    point: Point,
    handle: AnchorHandle,
    centerline: bool,
}

impl Entry {
    fn serves(&self, role: AnchorRole) -> bool {
        match role {
            AnchorRole::Port => true,
            AnchorRole::Center => self.centerline,
        }
    }
}

/// A successful lookup and the strategy that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub anchor: Anchor,
    /// Position of the winning strategy in [`LOOKUP_ORDER`].
    pub rank: usize,
}

impl Resolution {
    pub fn strategy(&self) -> LookupStrategy {
        LOOKUP_ORDER[self.rank]
    }
}

/// (point, anchor handle) pairs of one component, per extraction mode.
#[derive(Debug, Clone, Default)]
pub struct GeometryAnchorIndex {
    clipped: Vec<Entry>,
    unclipped: Vec<Entry>,
}

impl GeometryAnchorIndex {
    /// Extract both passes of a component's geometry from the model.
    pub fn from_model<M>(model: &M, comp: CompId, filter: &CenterlineFilter) -> GraphResult<Self>
    where
        M: PipingModel + ?Sized,
    {
        let clipped = model.boundary_geometry(comp, GeometryMode::ViewClipped)?;
        let unclipped = model.boundary_geometry(comp, GeometryMode::Unclipped)?;
        Ok(Self::from_primitives(&clipped, &unclipped, filter))
    }

    pub fn from_primitives(
        clipped: &[BoundaryPrimitive],
        unclipped: &[BoundaryPrimitive],
        filter: &CenterlineFilter,
    ) -> Self {
        Self {
            clipped: extract(clipped, filter),
            unclipped: extract(unclipped, filter),
        }
    }

    /// Number of (point, handle) pairs in one pass.
    pub fn len(&self, mode: GeometryMode) -> usize {
        self.pass(mode).len()
    }

    fn pass(&self, mode: GeometryMode) -> &[Entry] {
        match mode {
            GeometryMode::ViewClipped => &self.clipped,
            GeometryMode::Unclipped => &self.unclipped,
        }
    }

    /// Try every strategy in [`LOOKUP_ORDER`]; `None` when all miss.
    pub fn resolve(
        &self,
        target: &Point,
        role: AnchorRole,
        plane: &Plane,
        tol: Real,
    ) -> Option<Resolution> {
        LOOKUP_ORDER
            .iter()
            .enumerate()
            .find_map(|(rank, strategy)| {
                self.resolve_with(*strategy, target, role, plane, tol)
                    .map(|anchor| Resolution { anchor, rank })
            })
    }

    /// Apply a single strategy: the nearest qualifying candidate within
    /// tolerance, earliest extracted on ties.
    pub fn resolve_with(
        &self,
        strategy: LookupStrategy,
        target: &Point,
        role: AnchorRole,
        plane: &Plane,
        tol: Real,
    ) -> Option<Anchor> {
        let target_cmp = match strategy.matching {
            MatchKind::Exact => *target,
            MatchKind::Projected => plane.project_point(target),
        };

        let mut best: Option<(Real, &Entry)> = None;
        for entry in self.pass(strategy.mode).iter().filter(|e| e.serves(role)) {
            let candidate = match strategy.matching {
                MatchKind::Exact => entry.point,
                MatchKind::Projected => plane.project_point(&entry.point),
            };
            let dist = (candidate - target_cmp).norm();
            if dist > tol {
                continue;
            }
            if best.is_none_or(|(d, _)| dist < d) {
                best = Some((dist, entry));
            }
        }

        best.map(|(_, e)| Anchor {
            handle: e.handle,
            point: e.point,
        })
    }
}

fn extract(primitives: &[BoundaryPrimitive], filter: &CenterlineFilter) -> Vec<Entry> {
    let mut entries = Vec::with_capacity(primitives.len() * 2);
    for primitive in primitives {
        match primitive {
            BoundaryPrimitive::Vertex { point, anchor } => entries.push(Entry {
                point: *point,
                handle: *anchor,
                centerline: false,
            }),
            BoundaryPrimitive::Edge {
                start,
                end,
                start_anchor,
                end_anchor,
                style,
            } => {
                let centerline = filter.accepts(style.as_deref());
                entries.push(Entry {
                    point: *start,
                    handle: *start_anchor,
                    centerline,
                });
                entries.push(Entry {
                    point: *end,
                    handle: *end_anchor,
                    centerline,
                });
            }
            BoundaryPrimitive::Face { center, anchor } => entries.push(Entry {
                point: *center,
                handle: *anchor,
                centerline: false,
            }),
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use pd_core::{Id, Vector, COINCIDENCE_TOL};

    fn face(x: f64, y: f64, z: f64, handle: u32) -> BoundaryPrimitive {
        BoundaryPrimitive::Face {
            center: Point::new(x, y, z),
            anchor: Id::from_index(handle),
        }
    }

    fn xy_plane() -> Plane {
        Plane::new(Point::origin(), Vector::z()).unwrap()
    }

    #[test]
    fn lookup_order_prefers_clipped_then_exact() {
        assert_eq!(LOOKUP_ORDER[0].mode, GeometryMode::ViewClipped);
        assert_eq!(LOOKUP_ORDER[0].matching, MatchKind::Exact);
        assert_eq!(LOOKUP_ORDER[1].matching, MatchKind::Projected);
        assert_eq!(LOOKUP_ORDER[2].mode, GeometryMode::Unclipped);
        assert_eq!(LOOKUP_ORDER[3].matching, MatchKind::Projected);
    }

    #[test]
    fn exact_clipped_hit() {
        let index = GeometryAnchorIndex::from_primitives(
            &[face(1.0, 0.0, 0.0, 1)],
            &[face(1.0, 0.0, 0.0, 2)],
            &CenterlineFilter::accept_all(),
        );
        let hit = index
            .resolve(&Point::new(1.0, 0.0, 0.0), AnchorRole::Port, &xy_plane(), COINCIDENCE_TOL)
            .unwrap();
        assert_eq!(hit.anchor.handle, Id::from_index(1));
        assert_eq!(hit.rank, 0);
    }

    #[test]
    fn projected_clipped_beats_exact_unclipped() {
        // Clipped feature sits above the target along the view normal.
        let index = GeometryAnchorIndex::from_primitives(
            &[face(1.0, 0.0, 3.0, 1)],
            &[face(1.0, 0.0, 0.0, 2)],
            &CenterlineFilter::accept_all(),
        );
        let hit = index
            .resolve(&Point::new(1.0, 0.0, 0.0), AnchorRole::Port, &xy_plane(), COINCIDENCE_TOL)
            .unwrap();
        assert_eq!(hit.anchor.handle, Id::from_index(1));
        assert_eq!(hit.strategy().matching, MatchKind::Projected);
        assert_eq!(hit.anchor.point, Point::new(1.0, 0.0, 3.0));
    }

    #[test]
    fn falls_back_to_unclipped_when_clipped_is_empty() {
        let index = GeometryAnchorIndex::from_primitives(
            &[],
            &[face(2.0, 0.0, 0.0, 7)],
            &CenterlineFilter::accept_all(),
        );
        let hit = index
            .resolve(&Point::new(2.0, 0.0, 0.0), AnchorRole::Port, &xy_plane(), COINCIDENCE_TOL)
            .unwrap();
        assert_eq!(hit.anchor.handle, Id::from_index(7));
        assert_eq!(hit.strategy().mode, GeometryMode::Unclipped);
    }

    #[test]
    fn miss_is_none() {
        let index = GeometryAnchorIndex::from_primitives(
            &[face(0.0, 0.0, 0.0, 1)],
            &[face(0.0, 0.0, 0.0, 1)],
            &CenterlineFilter::accept_all(),
        );
        assert!(index
            .resolve(&Point::new(0.0, 5.0, 0.0), AnchorRole::Port, &xy_plane(), COINCIDENCE_TOL)
            .is_none());
    }

    #[test]
    fn center_role_only_sees_accepted_centerlines() {
        let edge = |style: &str, h: u32| BoundaryPrimitive::Edge {
            start: Point::origin(),
            end: Point::new(1.0, 0.0, 0.0),
            start_anchor: Id::from_index(h),
            end_anchor: Id::from_index(h + 1),
            style: Some(style.to_string()),
        };
        let prims = [face(0.0, 0.0, 0.0, 1), edge("Hidden", 10), edge("Centerline", 20)];
        let filter = CenterlineFilter::new(["Centerline"]);
        let index = GeometryAnchorIndex::from_primitives(&prims, &prims, &filter);

        let center = index
            .resolve(&Point::origin(), AnchorRole::Center, &xy_plane(), COINCIDENCE_TOL)
            .unwrap();
        assert_eq!(center.anchor.handle, Id::from_index(20));

        let port = index
            .resolve(&Point::origin(), AnchorRole::Port, &xy_plane(), COINCIDENCE_TOL)
            .unwrap();
        assert_eq!(port.anchor.handle, Id::from_index(1));
        assert_eq!(index.len(GeometryMode::ViewClipped), 5);
    }

    #[test]
    fn nearest_candidate_wins() {
        let index = GeometryAnchorIndex::from_primitives(
            &[face(1.0, 0.0, 0.0, 1), face(1.0 + 1e-8, 0.0, 0.0, 2)],
            &[],
            &CenterlineFilter::accept_all(),
        );
        let hit = index
            .resolve(&Point::new(1.0 + 1e-8, 0.0, 0.0), AnchorRole::Port, &xy_plane(), COINCIDENCE_TOL)
            .unwrap();
        assert_eq!(hit.anchor.handle, Id::from_index(2));
    }
}
