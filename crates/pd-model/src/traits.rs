//! The read-only contract the host model fulfils.

use pd_core::{CompId, PortId};

use crate::component::{Component, Port};
use crate::error::{ModelError, ModelResult};
use crate::geometry::{BoundaryPrimitive, GeometryMode};

/// Read-only queries into the surrounding piping model.
///
/// Implementations must be deterministic for the lifetime of one graph build:
/// the engine may ask for the same component or geometry several times.
pub trait PipingModel {
    /// Look up a component by id.
    fn component(&self, id: CompId) -> ModelResult<&Component>;

    /// Look up a port by id.
    fn port(&self, id: PortId) -> ModelResult<&Port>;

    /// Boundary primitives of a component in the given extraction mode.
    ///
    /// An empty list is a valid answer (e.g. the component is cropped out of
    /// the view).
    fn boundary_geometry(
        &self,
        id: CompId,
        mode: GeometryMode,
    ) -> ModelResult<Vec<BoundaryPrimitive>>;

    /// All ports of a component, in the component's own order.
    fn ports_of(&self, id: CompId) -> ModelResult<Vec<&Port>> {
        let comp = self.component(id)?;
        comp.ports.iter().map(|&p| self.port(p)).collect()
    }

    /// The port on the other side of a connection, if any.
    fn connected_port(&self, id: PortId) -> ModelResult<Option<&Port>> {
        match self.port(id)?.connected {
            Some(other) => self.port(other).map(Some),
            None => Ok(None),
        }
    }

    /// Human-readable label of an anchor handle, for reports.
    ///
    /// Default implementation returns NotSupported.
    fn anchor_label(&self, _anchor: pd_core::AnchorHandle) -> ModelResult<&str> {
        Err(ModelError::NotSupported {
            what: "anchor labels not provided by this model",
        })
    }
}
