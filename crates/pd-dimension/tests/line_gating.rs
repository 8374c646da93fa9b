//! Secondary line gating over random spans.

use pd_core::{Plane, Point, Vector, PLANAR_SPAN_TOL};
use pd_dimension::{DimensionLineCalculator, DimensionStyle};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    -100.0f64..100.0
}

proptest! {
    #[test]
    fn secondary_exists_only_for_planar_spans(
        (x0, y0, x1, y1) in (coord(), coord(), coord(), coord()),
        dz in prop_oneof![Just(0.0), -5.0f64..5.0],
    ) {
        let start = Point::new(x0, y0, 0.0);
        let end = Point::new(x1, y1, dz);
        let projected = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
        prop_assume!(projected > 1e-3);

        let plane = Plane::new(Point::origin(), Vector::z()).unwrap();
        let calc = DimensionLineCalculator::new(plane, 1.0, DimensionStyle::default()).unwrap();
        let lines = calc.compute_lines(start, end, Point::new(0.0, 0.0, 0.0)).unwrap();

        let span_3d = (end - start).norm();
        prop_assume!(((span_3d - projected).abs() - PLANAR_SPAN_TOL).abs() > 1e-9);
        let planar = (span_3d - projected).abs() < PLANAR_SPAN_TOL;
        prop_assert_eq!(lines.secondary.is_some(), planar);
    }
}
