//! pd-core: stable foundation for pipedim.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - ids (stable compact IDs for model and graph objects)
//! - geometry (drawing plane, projection, measurement lines)
//! - error (shared error types)

pub mod error;
pub mod geometry;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use geometry::*;
pub use ids::*;
pub use numeric::*;
