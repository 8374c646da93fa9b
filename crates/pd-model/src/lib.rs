//! pd-model: the piping model as seen by the dimensioning engine.
//!
//! Provides:
//! - Components, ports and locations (`Component`, `Port`, `Location`)
//! - Boundary geometry in two extraction modes (`GeometryMode`,
//!   `BoundaryPrimitive`)
//! - The read-only host contract (`PipingModel`)
//! - An in-memory model with authoring helpers (`ModelBuilder`,
//!   `MemoryModel`)
//!
//! # Example
//!
//! ```
//! use pd_core::Point;
//! use pd_model::{Category, ComponentSpec, ModelBuilder, PartKind, PipingModel};
//!
//! let mut builder = ModelBuilder::new();
//! let pipe = builder
//!     .add_straight(
//!         ComponentSpec::new("P1", Category::Pipe, PartKind::Straight, "Standard"),
//!         Point::new(0.0, 0.0, 0.0),
//!         Point::new(10.0, 0.0, 0.0),
//!     )
//!     .unwrap();
//! let model = builder.build().unwrap();
//!
//! assert_eq!(model.ports_of(pipe).unwrap().len(), 2);
//! ```

pub mod component;
pub mod error;
pub mod geometry;
pub mod memory;
pub mod traits;

// Re-exports
pub use component::{Category, Component, Location, PartKind, Port};
pub use error::{ModelError, ModelResult};
pub use geometry::{BoundaryPrimitive, GeometryMode};
pub use memory::{ComponentSpec, MemoryModel, ModelBuilder, CENTERLINE_STYLE};
pub use traits::PipingModel;
