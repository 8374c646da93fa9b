//! pd-dimension: measurement lines and anchor lists for piping chains.
//!
//! Provides:
//! - `DimensionLineCalculator`: primary line through a placement point and
//!   the offset secondary line, gated on the chain lying in the plane
//! - `DimensionAssembler`: primary references and secondary segments from a
//!   built reference graph
//! - `DimensionPlan` and `MeasurementSink`: the single all-or-nothing commit

pub mod assemble;
pub mod error;
pub mod lines;
pub mod plan;
pub mod style;

pub use assemble::{
    chain_category, dominant_category, Assembly, DimensionAssembler, Endpoint, SecondarySegment,
};
pub use error::{DimensionError, DimensionResult};
pub use lines::{DimensionLineCalculator, DimensionLines};
pub use plan::{DimensionPlan, MeasurementSink, PlannedMeasurement, RecordedMeasurement, RecordingSink};
pub use style::{DimensionStyle, StyleResolution, StyleTable, DEFAULT_TEXT_SIZE, DEFAULT_TEXT_TO_LINE};
