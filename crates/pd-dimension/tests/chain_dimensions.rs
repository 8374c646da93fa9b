//! End-to-end: build a reference graph, compute lines, assemble and commit.

use approx::assert_relative_eq;
use pd_core::{CompId, Plane, Point, Vector};
use pd_dimension::{
    chain_category, Assembly, DimensionAssembler, DimensionLineCalculator, DimensionLines,
    DimensionPlan, DimensionStyle, Endpoint, MeasurementSink, RecordingSink, StyleTable,
};
use pd_graph::{build_graph, CenterlineFilter, FlangeElisionMode, GraphSettings, ReferenceGraph};
use pd_model::{Category, ComponentSpec, MemoryModel, ModelBuilder, PartKind, CENTERLINE_STYLE};

fn plane() -> Plane {
    Plane::new(Point::origin(), Vector::z()).unwrap()
}

fn pipe(b: &mut ModelBuilder, name: &str, x0: f64, x1: f64) -> CompId {
    b.add_straight(
        ComponentSpec::new(name, Category::Pipe, PartKind::Straight, "Standard"),
        Point::new(x0, 0.0, 0.0),
        Point::new(x1, 0.0, 0.0),
    )
    .unwrap()
}

fn fitting(b: &mut ModelBuilder, name: &str, part: PartKind, x: f64, offsets: &[Vector]) -> CompId {
    let type_name = match part {
        PartKind::Tee => "Tee",
        _ => "Coupling",
    };
    b.add_fitting(
        ComponentSpec::new(name, Category::PipeFitting, part, type_name),
        Point::new(x, 0.0, 0.0),
        offsets,
    )
    .unwrap()
}

fn link(b: &mut ModelBuilder, chain: &[CompId]) {
    for pair in chain.windows(2) {
        b.connect_coincident(pair[0], pair[1]).unwrap();
    }
}

fn graph(model: &MemoryModel, settings: &GraphSettings, chain: &[CompId]) -> ReferenceGraph {
    build_graph(model, settings, chain, plane(), CenterlineFilter::new([CENTERLINE_STYLE])).unwrap()
}

fn dimension(graph: &ReferenceGraph, placement: Point) -> (DimensionLines, Assembly) {
    let calc = DimensionLineCalculator::new(plane(), 1.0, DimensionStyle::default()).unwrap();
    let (start, end) = graph.extremity_points().unwrap();
    let lines = calc.compute_lines(start, end, placement).unwrap();
    let assembly = DimensionAssembler::default().assemble(graph, &lines);
    (lines, assembly)
}

fn xs(refs: &[Endpoint]) -> Vec<f64> {
    refs.iter().map(|e| e.point().x).collect()
}

#[test]
fn straight_junction_straight_measures_through_center() {
    let mut b = ModelBuilder::new();
    let p1 = pipe(&mut b, "P1", 0.0, 4.0);
    let t = fitting(&mut b, "T", PartKind::Tee, 5.0, &[-Vector::x(), Vector::x(), Vector::y()]);
    let p2 = pipe(&mut b, "P2", 6.0, 10.0);
    let chain = [p1, t, p2];
    link(&mut b, &chain);
    let model = b.build().unwrap();

    let g = graph(&model, &GraphSettings::default(), &chain);
    let (lines, assembly) = dimension(&g, Point::new(0.0, 3.0, 0.0));

    assert_eq!(assembly.primary.len(), 3);
    assert_eq!(xs(&assembly.primary), vec![0.0, 5.0, 10.0]);
    assert!(assembly.primary.iter().all(|e| e.anchor().is_some()));
    assert!(lines.secondary.is_some());

    assert_eq!(assembly.secondaries.len(), 1);
    let segment = &assembly.secondaries[0];
    let seg_x: Vec<f64> = segment.anchors.iter().map(|a| a.point.x).collect();
    assert_eq!(seg_x, vec![0.0, 4.0, 5.0, 6.0, 10.0]);
    assert_eq!(segment.category, pd_model::Category::Generic);
}

#[test]
fn elbow_at_chain_start_measures_from_its_center() {
    let mut b = ModelBuilder::new();
    let e = b
        .add_fitting(
            ComponentSpec::new("E", Category::PipeFitting, PartKind::Elbow, "Elbow"),
            Point::origin(),
            &[Vector::x(), Vector::y()],
        )
        .unwrap();
    let p = b
        .add_straight(
            ComponentSpec::new("P", Category::Pipe, PartKind::Straight, "Standard"),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 5.0, 0.0),
        )
        .unwrap();
    let chain = [e, p];
    link(&mut b, &chain);
    let model = b.build().unwrap();

    let g = graph(&model, &GraphSettings::default(), &chain);
    let center = g.nodes()[0].center_anchor.expect("elbow center resolves");
    assert!(g.nodes()[0].first_anchor.is_none());

    let (_, assembly) = dimension(&g, Point::new(3.0, 0.0, 0.0));

    assert_eq!(assembly.primary.len(), 2);
    assert_eq!(assembly.primary[0], Endpoint::Anchor(center));
    assert!(matches!(assembly.primary[1], Endpoint::Anchor(a) if a.point == Point::new(0.0, 5.0, 0.0)));
}

#[test]
fn exact_coupling_starts_breakdown_at_second_component() {
    let mut b = ModelBuilder::new();
    let c = fitting(&mut b, "C", PartKind::Coupling, 0.25, &[-Vector::x() * 0.25, Vector::x() * 0.25]);
    let p1 = pipe(&mut b, "P1", 0.5, 4.0);
    let p2 = pipe(&mut b, "P2", 4.0, 8.0);
    let chain = [c, p1, p2];
    link(&mut b, &chain);
    let model = b.build().unwrap();

    let settings = GraphSettings::default().with_type_mode("Coupling", FlangeElisionMode::Exact);
    let g = graph(&model, &settings, &chain);
    let (_, assembly) = dimension(&g, Point::new(0.0, 3.0, 0.0));

    assert!(g.nodes()[0].is_start);
    assert_eq!(g.nodes()[0].reference_count(), 0);
    // No anchor at the coupling: the primary starts from its free port.
    assert_eq!(assembly.primary[0], Endpoint::Point(Point::new(0.0, 0.0, 0.0)));

    let first = &assembly.secondaries[0];
    assert_eq!(first.first_node, 1);
    assert_eq!(first.category, Category::Pipe);
    let seg_x: Vec<f64> = first.anchors.iter().map(|a| a.point.x).collect();
    assert_eq!(seg_x, vec![0.5, 4.0, 8.0]);
}

#[test]
fn negated_coupling_is_absorbed_by_neighbors() {
    let mut b = ModelBuilder::new();
    let p1 = pipe(&mut b, "P1", 0.0, 4.0);
    let c = fitting(&mut b, "C", PartKind::Coupling, 4.25, &[-Vector::x() * 0.25, Vector::x() * 0.25]);
    let p2 = pipe(&mut b, "P2", 4.5, 8.0);
    let chain = [p1, c, p2];
    link(&mut b, &chain);
    let model = b.build().unwrap();

    let settings = GraphSettings::default().with_type_mode("Coupling", FlangeElisionMode::Negate);
    let g = graph(&model, &settings, &chain);
    let (_, assembly) = dimension(&g, Point::new(0.0, 3.0, 0.0));

    assert_eq!(xs(&assembly.primary), vec![0.0, 8.0]);
    // The single remaining segment repeats the primary span.
    assert!(assembly.secondaries.is_empty());
    assert_eq!(assembly.suppressed, 1);
}

#[test]
fn exact_coupling_in_the_middle_splits_the_breakdown() {
    let mut b = ModelBuilder::new();
    let p1 = pipe(&mut b, "P1", 0.0, 4.0);
    let c = fitting(&mut b, "C", PartKind::Coupling, 4.25, &[-Vector::x() * 0.25, Vector::x() * 0.25]);
    let p2 = pipe(&mut b, "P2", 4.5, 8.0);
    let chain = [p1, c, p2];
    link(&mut b, &chain);
    let model = b.build().unwrap();

    let settings = GraphSettings::default().with_type_mode("Coupling", FlangeElisionMode::Exact);
    let g = graph(&model, &settings, &chain);
    let (_, assembly) = dimension(&g, Point::new(0.0, 3.0, 0.0));

    assert_eq!(assembly.secondaries.len(), 2);
    assert_eq!((assembly.secondaries[0].first_node, assembly.secondaries[0].last_node), (0, 0));
    assert_eq!((assembly.secondaries[1].first_node, assembly.secondaries[1].last_node), (2, 2));
}

#[test]
fn sloped_chain_gets_primary_only() {
    let mut b = ModelBuilder::new();
    let p1 = b
        .add_straight(
            ComponentSpec::new("P1", Category::Pipe, PartKind::Straight, "Standard"),
            Point::new(0.0, 0.0, 0.0),
            Point::new(4.0, 0.0, 1.0),
        )
        .unwrap();
    let model = b.build().unwrap();

    let g = graph(&model, &GraphSettings::default(), &[p1]);
    let (lines, assembly) = dimension(&g, Point::new(0.0, 3.0, 0.0));
    assert!(lines.secondary.is_none());
    assert!(assembly.secondaries.is_empty());
    assert_eq!(assembly.primary.len(), 2);
    assert_relative_eq!(lines.primary.direction().into_inner(), Vector::x());
}

#[test]
fn plan_commits_all_measurements_with_resolved_styles() {
    let mut b = ModelBuilder::new();
    let p1 = pipe(&mut b, "P1", 0.0, 4.0);
    let t = fitting(&mut b, "T", PartKind::Tee, 5.0, &[-Vector::x(), Vector::x(), Vector::y()]);
    let p2 = pipe(&mut b, "P2", 6.0, 10.0);
    let chain = [p1, t, p2];
    link(&mut b, &chain);
    let model = b.build().unwrap();

    let g = graph(&model, &GraphSettings::default(), &chain);
    let (lines, assembly) = dimension(&g, Point::new(0.0, 3.0, 0.0));
    let styles = StyleTable::new(DimensionStyle::new("Model Linear", 0.1, 0.02))
        .with_category(Category::Pipe, DimensionStyle::new("Pipe Run", 0.125, 0.03125));

    let plan = DimensionPlan::new(assembly, &lines, chain_category(&g), &styles);
    assert_eq!(plan.measurement_count(), 2);
    // Mixed chain: Generic has no style of its own.
    assert_eq!(plan.primary.style, "Model Linear");
    assert_eq!(plan.style_fallbacks, 1);

    let mut sink = RecordingSink::new();
    assert_eq!(sink.commit(&plan).unwrap(), 2);
    assert_eq!(sink.len(), 2);
}
