//! Primary and secondary measurement lines.

use pd_core::{Line, Plane, Point, Real, Vector, ensure_finite_point, PLANAR_SPAN_TOL};
use tracing::debug;

use crate::error::{DimensionError, DimensionResult};
use crate::style::DimensionStyle;

/// Shortest projected span that still defines a measurement direction.
const MIN_PROJECTED_SPAN: Real = 1e-9;

/// The measurement lines of one chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionLines {
    pub primary: Line,
    /// Absent when the chain is not parallel to the drawing plane.
    pub secondary: Option<Line>,
}

/// Computes measurement lines in the active drawing plane.
#[derive(Debug, Clone)]
pub struct DimensionLineCalculator {
    plane: Plane,
    view_scale: Real,
    style: DimensionStyle,
}

impl DimensionLineCalculator {
    /// `style` is the driving secondary style; pass `DimensionStyle::default()`
    /// when none is configured.
    pub fn new(plane: Plane, view_scale: Real, style: DimensionStyle) -> DimensionResult<Self> {
        if !view_scale.is_finite() || view_scale <= 0.0 {
            return Err(DimensionError::InvalidSettings {
                what: "view scale must be finite and positive",
            });
        }
        style.validate()?;
        Ok(Self {
            plane,
            view_scale,
            style,
        })
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Distance between the primary and the secondary line in model units.
    pub fn secondary_offset(&self) -> Real {
        self.style.secondary_offset(self.view_scale)
    }

    /// Primary line through `placement`, parallel to the projected span
    /// `start`..`end`, and the secondary line offset from it towards the
    /// chain when the span lies parallel to the plane.
    pub fn compute_lines(&self, start: Point, end: Point, placement: Point) -> DimensionResult<DimensionLines> {
        ensure_finite_point(&start, "chain start")?;
        ensure_finite_point(&end, "chain end")?;
        ensure_finite_point(&placement, "placement point")?;

        let span = end - start;
        let projected = self.plane.project_vector(&span);
        let span_3d = span.norm();
        let span_2d = projected.norm();
        if span_2d < MIN_PROJECTED_SPAN {
            return Err(DimensionError::DegenerateSpan {
                what: "chain extremities coincide when projected onto the plane",
            });
        }

        let primary = Line::new(placement, projected)?;
        let planar = (span_3d - span_2d).abs() < PLANAR_SPAN_TOL;
        let secondary = planar.then(|| {
            let toward = self.toward_chain(&primary, &start);
            primary.translated(&(toward * self.secondary_offset()))
        });

        debug!(span_3d, span_2d, planar, "computed dimension lines");
        Ok(DimensionLines { primary, secondary })
    }

    /// Unit vector in the plane, perpendicular to `primary`, pointing at the
    /// side of the line where `chain_point` lies. When the chain sits on the
    /// line itself the side is `normal x direction`.
    fn toward_chain(&self, primary: &Line, chain_point: &Point) -> Vector {
        let side = self.plane.normal().cross(&*primary.direction());
        let offset = self.plane.project_vector(&(chain_point - primary.origin()));
        if offset.dot(&side) < 0.0 { -side } else { side }
    }
}
