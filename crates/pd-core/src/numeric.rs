use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// Distance below which two model points are the same point.
pub const COINCIDENCE_TOL: Real = 1e-6;

/// Largest difference between the 3-D and the plane-projected span of a chain
/// for which the chain still counts as parallel to the drawing plane.
pub const PLANAR_SPAN_TOL: Real = 1e-3;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}
