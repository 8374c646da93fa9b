//! pd-graph: reference resolution for piping chains.
//!
//! Provides:
//! - Component classification (`ComponentClassifier`)
//! - Port connectivity between neighbors (`ConnectivityResolver`)
//! - Two-pass geometry anchor lookup (`GeometryAnchorIndex`, `LOOKUP_ORDER`)
//! - The reference graph builder with flange elision (`ReferenceGraphBuilder`)
//!
//! # Example
//!
//! ```
//! use pd_core::{Plane, Point, Vector};
//! use pd_graph::{build_graph, CenterlineFilter, GraphSettings};
//! use pd_model::{Category, ComponentSpec, ModelBuilder, PartKind};
//!
//! let mut builder = ModelBuilder::new();
//! let spec = |n: &str| ComponentSpec::new(n, Category::Pipe, PartKind::Straight, "Standard");
//! let a = builder.add_straight(spec("A"), Point::origin(), Point::new(5.0, 0.0, 0.0)).unwrap();
//! let b = builder.add_straight(spec("B"), Point::new(5.0, 0.0, 0.0), Point::new(9.0, 0.0, 0.0)).unwrap();
//! builder.connect_coincident(a, b).unwrap();
//! let model = builder.build().unwrap();
//!
//! let plane = Plane::new(Point::origin(), Vector::z()).unwrap();
//! let graph = build_graph(&model, &GraphSettings::default(), &[a, b], plane, CenterlineFilter::accept_all()).unwrap();
//!
//! assert_eq!(graph.len(), 2);
//! assert!(graph.nodes()[0].is_start);
//! ```

pub mod anchors;
pub mod builder;
pub mod classify;
pub mod connect;
pub mod elision;
pub mod error;
pub mod graph;
pub mod indexing;
pub mod settings;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use anchors::{AnchorRole, GeometryAnchorIndex, LookupStrategy, MatchKind, Resolution, LOOKUP_ORDER};
pub use builder::{build_graph, ReferenceGraphBuilder};
pub use classify::{Classification, ComponentClassifier};
pub use connect::ConnectivityResolver;
pub use error::{GraphError, GraphResult};
pub use graph::{Anchor, AppliedElision, BuildReport, PortRef, ReferenceGraph, ReferenceNode};
pub use indexing::ChainIndex;
pub use settings::{CenterlineFilter, ElisionPolicy, FlangeElisionMode, GraphSettings};
