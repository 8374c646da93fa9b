//! Drawing-plane and measurement-line geometry.
//!
//! All coordinates are model units. The drawing plane is where measurements are
//! placed; chains that are not exactly aligned with it are compared through
//! their orthogonal projection onto it.

use nalgebra::{Point3, Unit, Vector3};

use crate::error::{CoreError, CoreResult};
use crate::numeric::{ensure_finite, Real};

pub type Point = Point3<Real>;
pub type Vector = Vector3<Real>;
pub type Direction = Unit<Vector3<Real>>;

/// Smallest vector length accepted as a direction.
const MIN_DIRECTION_NORM: Real = 1e-12;

/// Whether two points lie within `tol` of each other.
pub fn points_coincide(a: &Point, b: &Point, tol: Real) -> bool {
    (a - b).norm() <= tol
}

pub fn ensure_finite_point(p: &Point, what: &'static str) -> CoreResult<()> {
    for c in p.iter() {
        ensure_finite(*c, what)?;
    }
    Ok(())
}

/// Oriented plane used as the active drawing (sketch) plane of a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    origin: Point,
    normal: Direction,
}

impl Plane {
    pub fn new(origin: Point, normal: Vector) -> CoreResult<Self> {
        ensure_finite_point(&origin, "plane origin")?;
        for c in normal.iter() {
            ensure_finite(*c, "plane normal")?;
        }
        let normal = Unit::try_new(normal, MIN_DIRECTION_NORM).ok_or(CoreError::DegeneratePlane {
            what: "zero-length normal",
        })?;
        Ok(Self { origin, normal })
    }

    /// Plane facing the viewer: normal along the view direction, through the
    /// view origin.
    pub fn from_view(view_direction: Vector, view_origin: Point) -> CoreResult<Self> {
        Self::new(view_origin, view_direction)
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn normal(&self) -> Direction {
        self.normal
    }

    pub fn signed_distance(&self, p: &Point) -> Real {
        (p - self.origin).dot(&*self.normal)
    }

    /// Orthogonal projection of a point onto the plane.
    pub fn project_point(&self, p: &Point) -> Point {
        p - self.normal.into_inner() * self.signed_distance(p)
    }

    /// In-plane component of a vector.
    pub fn project_vector(&self, v: &Vector) -> Vector {
        v - self.normal.into_inner() * v.dot(&*self.normal)
    }
}

/// Infinite line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    origin: Point,
    direction: Direction,
}

impl Line {
    pub fn new(origin: Point, direction: Vector) -> CoreResult<Self> {
        ensure_finite_point(&origin, "line origin")?;
        let direction = Unit::try_new(direction, MIN_DIRECTION_NORM).ok_or(CoreError::InvalidArg {
            what: "line direction has zero length",
        })?;
        Ok(Self { origin, direction })
    }

    /// Line through `a` heading towards `b`.
    pub fn through(a: Point, b: Point) -> CoreResult<Self> {
        Self::new(a, b - a)
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn project_point(&self, p: &Point) -> Point {
        self.origin + self.direction.into_inner() * (p - self.origin).dot(&*self.direction)
    }

    pub fn distance_to(&self, p: &Point) -> Real {
        (p - self.project_point(p)).norm()
    }

    /// Same direction, origin moved by `by`.
    pub fn translated(&self, by: &Vector) -> Self {
        Self {
            origin: self.origin + by,
            direction: self.direction,
        }
    }

    pub fn is_parallel_to(&self, other: &Line, tol: Real) -> bool {
        self.direction.cross(&*other.direction).norm() <= tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn projection_drops_normal_component() {
        let plane = Plane::new(Point::new(0.0, 0.0, 2.0), Vector::new(0.0, 0.0, 5.0)).unwrap();
        let p = plane.project_point(&Point::new(1.0, 2.0, 7.0));
        assert_relative_eq!(p.z, 2.0);
        assert_relative_eq!(p.x, 1.0);
        assert_relative_eq!(plane.signed_distance(&Point::new(0.0, 0.0, 7.0)), 5.0);
    }

    #[test]
    fn zero_view_direction_cannot_make_a_plane() {
        let err = Plane::from_view(Vector::zeros(), Point::origin()).unwrap_err();
        assert!(matches!(err, CoreError::DegeneratePlane { .. }));
    }

    #[test]
    fn non_finite_origin_is_rejected() {
        let err = Plane::new(Point::new(Real::NAN, 0.0, 0.0), Vector::z()).unwrap_err();
        assert!(matches!(err, CoreError::NonFinite { .. }));
    }

    #[test]
    fn line_distance_and_translation() {
        let line = Line::through(Point::origin(), Point::new(4.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(line.distance_to(&Point::new(2.0, 3.0, 0.0)), 3.0);

        let moved = line.translated(&Vector::new(0.0, 1.0, 0.0));
        assert!(moved.is_parallel_to(&line, 1e-12));
        assert_relative_eq!(moved.distance_to(&Point::origin()), 1.0);
    }

    #[test]
    fn coincidence_uses_tolerance() {
        let a = Point::new(1.0, 1.0, 1.0);
        assert!(points_coincide(&a, &Point::new(1.0, 1.0, 1.0 + 1e-9), 1e-6));
        assert!(!points_coincide(&a, &Point::new(1.0, 1.0, 1.1), 1e-6));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn coord() -> impl Strategy<Value = Real> {
            -1.0e3..1.0e3
        }

        proptest! {
            #[test]
            fn projected_points_lie_in_plane(
                (nx, ny, nz) in (coord(), coord(), coord()),
                (px, py, pz) in (coord(), coord(), coord()),
            ) {
                prop_assume!(Vector::new(nx, ny, nz).norm() > 1e-3);
                let plane = Plane::new(Point::new(1.0, -2.0, 3.0), Vector::new(nx, ny, nz)).unwrap();
                let projected = plane.project_point(&Point::new(px, py, pz));
                prop_assert!(plane.signed_distance(&projected).abs() < 1e-6);
                let again = plane.project_point(&projected);
                prop_assert!(points_coincide(&projected, &again, 1e-6));
            }
        }
    }
}
