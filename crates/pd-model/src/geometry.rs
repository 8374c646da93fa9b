//! Boundary geometry as exposed by the host model.

use pd_core::{AnchorHandle, Point};

/// Which geometry the host extracts for a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryMode {
    /// Geometry as visible in the active view (crop and section boxes
    /// applied).
    ViewClipped,
    /// Full component geometry regardless of view visibility.
    Unclipped,
}

impl GeometryMode {
    pub const ALL: [GeometryMode; 2] = [GeometryMode::ViewClipped, GeometryMode::Unclipped];
}

/// One boundary feature with the handles usable as measurement endpoints.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryPrimitive {
    Vertex {
        point: Point,
        anchor: AnchorHandle,
    },
    Edge {
        start: Point,
        end: Point,
        start_anchor: AnchorHandle,
        end_anchor: AnchorHandle,
        /// Line style name, compared against the accepted centerline styles.
        style: Option<String>,
    },
    /// Planar face, anchored at its center.
    Face { center: Point, anchor: AnchorHandle },
}

impl BoundaryPrimitive {
    pub fn style(&self) -> Option<&str> {
        match self {
            BoundaryPrimitive::Edge { style, .. } => style.as_deref(),
            _ => None,
        }
    }
}
