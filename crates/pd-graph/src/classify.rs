//! Component classification: linear, point-like or pass-through marker, and
//! the flange elision mode of a component.

use pd_core::{CompId, Real};
use pd_model::{Location, PipingModel};

use crate::error::GraphResult;
use crate::settings::{FlangeElisionMode, GraphSettings};

/// Largest deviation (sine or cosine) accepted when comparing port axes.
const AXIS_TOL: Real = 1e-6;

/// Classification facts for one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub is_linear: bool,
    pub is_pass_through: bool,
    pub flange_mode: FlangeElisionMode,
}

pub struct ComponentClassifier<'a, M: PipingModel + ?Sized> {
    model: &'a M,
    settings: &'a GraphSettings,
}

impl<'a, M: PipingModel + ?Sized> ComponentClassifier<'a, M> {
    pub fn new(model: &'a M, settings: &'a GraphSettings) -> Self {
        Self { model, settings }
    }

    /// True iff the component has exactly two ports, facing opposite ways
    /// and lying on one axis with its centerline.
    pub fn is_linear(&self, comp: CompId) -> GraphResult<bool> {
        let ports = self.model.ports_of(comp)?;
        let [a, b] = ports.as_slice() else {
            return Ok(false);
        };

        if a.direction.dot(&*b.direction) > -1.0 + AXIS_TOL {
            return Ok(false);
        }

        let span = b.origin - a.origin;
        let span_len = span.norm();
        if span_len > AXIS_TOL && a.direction.cross(&span).norm() > AXIS_TOL * span_len {
            return Ok(false);
        }

        if let Location::Curve { start, end } = self.model.component(comp)?.location {
            let axis = end - start;
            let axis_len = axis.norm();
            if axis_len > AXIS_TOL && a.direction.cross(&axis).norm() > AXIS_TOL * axis_len {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// True iff the component's type is a designated pass-through marker.
    pub fn is_pass_through_marker(&self, comp: CompId) -> GraphResult<bool> {
        let component = self.model.component(comp)?;
        Ok(self.settings.marker_types.contains(&component.type_name))
    }

    /// `None` for components that are not coupling-type; otherwise the
    /// per-type override, `Default` when the type is not configured.
    pub fn flange_mode(&self, comp: CompId) -> GraphResult<FlangeElisionMode> {
        let component = self.model.component(comp)?;
        if !component.part.is_coupling_type() {
            return Ok(FlangeElisionMode::None);
        }
        Ok(self
            .settings
            .type_modes
            .get(&component.type_name)
            .copied()
            .unwrap_or(FlangeElisionMode::Default))
    }

    pub fn classify(&self, comp: CompId) -> GraphResult<Classification> {
        Ok(Classification {
            is_linear: self.is_linear(comp)?,
            is_pass_through: self.is_pass_through_marker(comp)?,
            flange_mode: self.flange_mode(comp)?,
        })
    }
}
