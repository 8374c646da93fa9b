//! Port-level connectivity between chain neighbors.

use pd_core::{CompId, PortId, Real};
use pd_model::{PipingModel, Port};

use crate::error::{GraphError, GraphResult};
use crate::graph::PortRef;

/// Largest deviation accepted when matching a run axis.
const RUN_TOL: Real = 1e-6;

pub struct ConnectivityResolver<'a, M: PipingModel + ?Sized> {
    model: &'a M,
}

impl<'a, M: PipingModel + ?Sized> ConnectivityResolver<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self { model }
    }

    /// The port pair joining `a` to `b`, as (port of `a`, port of `b`).
    ///
    /// `position` is the chain position of `a`, used only for error reporting.
    pub fn try_get_connection(
        &self,
        a: CompId,
        b: CompId,
        position: usize,
    ) -> GraphResult<(PortRef, PortRef)> {
        for port in self.model.ports_of(a)? {
            if let Some(other) = self.model.connected_port(port.id)? {
                if other.owner == b {
                    return Ok((port_ref(port), port_ref(other)));
                }
            }
        }
        Err(GraphError::Connectivity {
            from: a,
            to: b,
            position,
        })
    }

    /// The port at the far end of the run entered through `port`: another
    /// port of the same component facing the opposite way on the same axis.
    ///
    /// For a straight run this is its other end; for a tee it is the run
    /// outlet opposite the given inlet. Components without such a port (an
    /// elbow) yield `None`.
    pub fn parallel_connector(&self, port: PortId) -> GraphResult<Option<PortRef>> {
        let entry = self.model.port(port)?;
        let candidates = self.model.ports_of(entry.owner)?;
        let found = candidates
            .into_iter()
            .filter(|p| p.id != entry.id)
            .find(|p| is_run_opposite(entry, p));
        Ok(found.map(port_ref))
    }
}

fn is_run_opposite(entry: &Port, candidate: &Port) -> bool {
    if entry.direction.dot(&*candidate.direction) > -1.0 + RUN_TOL {
        return false;
    }
    let span = candidate.origin - entry.origin;
    let len = span.norm();
    len <= RUN_TOL || entry.direction.cross(&span).norm() <= RUN_TOL * len
}

pub(crate) fn port_ref(port: &Port) -> PortRef {
    PortRef {
        id: port.id,
        origin: port.origin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pd_core::{Point, Vector};
    use pd_model::{Category, ComponentSpec, ModelBuilder, PartKind};

    fn spec(name: &str, part: PartKind) -> ComponentSpec {
        ComponentSpec::new(name, Category::Pipe, part, "Standard")
    }

    #[test]
    fn connection_between_neighbors() {
        let mut b = ModelBuilder::new();
        let p1 = b
            .add_straight(spec("P1", PartKind::Straight), Point::origin(), Point::new(4.0, 0.0, 0.0))
            .unwrap();
        let p2 = b
            .add_straight(spec("P2", PartKind::Straight), Point::new(4.0, 0.0, 0.0), Point::new(8.0, 0.0, 0.0))
            .unwrap();
        let (pa, pb) = b.connect_coincident(p1, p2).unwrap();
        let model = b.build().unwrap();

        let resolver = ConnectivityResolver::new(&model);
        let (a, bb) = resolver.try_get_connection(p1, p2, 0).unwrap();
        assert_eq!((a.id, bb.id), (pa, pb));
        assert_eq!(a.origin, Point::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn unconnected_neighbors_are_fatal() {
        let mut b = ModelBuilder::new();
        let p1 = b
            .add_straight(spec("P1", PartKind::Straight), Point::origin(), Point::new(4.0, 0.0, 0.0))
            .unwrap();
        let p2 = b
            .add_straight(spec("P2", PartKind::Straight), Point::new(5.0, 0.0, 0.0), Point::new(8.0, 0.0, 0.0))
            .unwrap();
        let model = b.build().unwrap();

        let err = ConnectivityResolver::new(&model)
            .try_get_connection(p1, p2, 3)
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::Connectivity {
                from: p1,
                to: p2,
                position: 3
            }
        );
    }

    #[test]
    fn parallel_connector_of_straight_is_other_end() {
        let mut b = ModelBuilder::new();
        let p = b
            .add_straight(spec("P", PartKind::Straight), Point::origin(), Point::new(4.0, 0.0, 0.0))
            .unwrap();
        let model = b.build().unwrap();
        let ports = model.ports_of(p).unwrap();
        let (start, end) = (ports[0].id, ports[1].id);

        let resolver = ConnectivityResolver::new(&model);
        assert_eq!(resolver.parallel_connector(end).unwrap().map(|r| r.id), Some(start));
        assert_eq!(resolver.parallel_connector(start).unwrap().map(|r| r.id), Some(end));
    }

    #[test]
    fn parallel_connector_of_tee_branch_is_none() {
        let mut b = ModelBuilder::new();
        let tee = b
            .add_fitting(
                spec("T", PartKind::Tee),
                Point::origin(),
                &[-Vector::x(), Vector::x(), Vector::y()],
            )
            .unwrap();
        let model = b.build().unwrap();
        let ports = model.ports_of(tee).unwrap();
        let resolver = ConnectivityResolver::new(&model);

        assert_eq!(resolver.parallel_connector(ports[0].id).unwrap().map(|r| r.id), Some(ports[1].id));
        assert_eq!(resolver.parallel_connector(ports[2].id).unwrap(), None);
    }
}
