//! In-memory piping model.
//!
//! `ModelBuilder` assembles components, ports, connections and boundary
//! geometry, then `build()` validates and freezes them into a `MemoryModel`
//! that implements [`PipingModel`].

use std::collections::HashMap;

use pd_core::{
    ensure_finite_point, points_coincide, AnchorHandle, CompId, Direction, Point, PortId, Vector,
    COINCIDENCE_TOL,
};

use crate::component::{Category, Component, Location, PartKind, Port};
use crate::error::{ModelError, ModelResult};
use crate::geometry::{BoundaryPrimitive, GeometryMode};
use crate::traits::PipingModel;

/// Line style the authoring helpers give to centerline edges.
pub const CENTERLINE_STYLE: &str = "Centerline";

/// Identity of a component to be added to a model.
#[derive(Debug, Clone)]
pub struct ComponentSpec {
    pub name: String,
    pub category: Category,
    pub part: PartKind,
    pub type_name: String,
}

impl ComponentSpec {
    pub fn new(
        name: impl Into<String>,
        category: Category,
        part: PartKind,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            part,
            type_name: type_name.into(),
        }
    }
}

/// Builder for constructing a model incrementally.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    components: Vec<Component>,
    ports: Vec<Port>,
    geometry: HashMap<(CompId, GeometryMode), Vec<BoundaryPrimitive>>,
    anchor_labels: Vec<String>,
}

impl ModelBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component without ports and return its ID.
    pub fn add_component(&mut self, spec: ComponentSpec, location: Location) -> CompId {
        let id = CompId::from_index(self.components.len() as u32);
        self.components.push(Component {
            id,
            name: spec.name,
            category: spec.category,
            part: spec.part,
            type_name: spec.type_name,
            location,
            ports: Vec::new(),
        });
        id
    }

    /// Add an unconnected port to a component.
    pub fn add_port(&mut self, comp: CompId, origin: Point, direction: Vector) -> ModelResult<PortId> {
        ensure_finite_point(&origin, "port origin")?;
        let direction = Direction::try_new(direction, 1e-12).ok_or(ModelError::InvalidArg {
            what: "port direction has zero length",
        })?;
        let id = PortId::from_index(self.ports.len() as u32);
        let owner = self
            .components
            .get_mut(comp.position())
            .ok_or(ModelError::UnknownComponent { comp })?;
        owner.ports.push(id);
        self.ports.push(Port {
            id,
            owner: comp,
            origin,
            direction,
            connected: None,
        });
        Ok(id)
    }

    /// Connect two ports to each other.
    pub fn connect(&mut self, a: PortId, b: PortId) -> ModelResult<()> {
        if a == b {
            return Err(ModelError::InvalidArg {
                what: "a port cannot connect to itself",
            });
        }
        for (port, other) in [(a, b), (b, a)] {
            let p = self
                .ports
                .get(port.position())
                .ok_or(ModelError::UnknownPort { port })?;
            if let Some(existing) = p.connected {
                if existing != other {
                    return Err(ModelError::AlreadyConnected {
                        port,
                        other: existing,
                    });
                }
            }
        }
        self.ports[a.position()].connected = Some(b);
        self.ports[b.position()].connected = Some(a);
        Ok(())
    }

    /// Connect the free ports of `a` and `b` that sit on top of each other
    /// facing opposite ways. Returns the joined pair (port of `a`, port of `b`).
    pub fn connect_coincident(&mut self, a: CompId, b: CompId) -> ModelResult<(PortId, PortId)> {
        let comp_a = self
            .components
            .get(a.position())
            .ok_or(ModelError::UnknownComponent { comp: a })?;
        let comp_b = self
            .components
            .get(b.position())
            .ok_or(ModelError::UnknownComponent { comp: b })?;

        let mut found = None;
        'outer: for &pa in &comp_a.ports {
            let port_a = &self.ports[pa.position()];
            if port_a.connected.is_some() {
                continue;
            }
            for &pb in &comp_b.ports {
                let port_b = &self.ports[pb.position()];
                if port_b.connected.is_none()
                    && points_coincide(&port_a.origin, &port_b.origin, COINCIDENCE_TOL)
                    && port_a.direction.dot(&*port_b.direction) < 0.0
                {
                    found = Some((pa, pb));
                    break 'outer;
                }
            }
        }

        let (pa, pb) = found.ok_or(ModelError::InvalidArg {
            what: "no coincident free ports between components",
        })?;
        self.connect(pa, pb)?;
        Ok((pa, pb))
    }

    /// Allocate a new anchor handle with a display label.
    pub fn alloc_anchor(&mut self, label: impl Into<String>) -> AnchorHandle {
        let id = AnchorHandle::from_index(self.anchor_labels.len() as u32);
        self.anchor_labels.push(label.into());
        id
    }

    /// Add one boundary primitive to a component's geometry in one mode.
    pub fn add_primitive(
        &mut self,
        comp: CompId,
        mode: GeometryMode,
        primitive: BoundaryPrimitive,
    ) -> ModelResult<()> {
        if comp.position() >= self.components.len() {
            return Err(ModelError::UnknownComponent { comp });
        }
        self.geometry.entry((comp, mode)).or_default().push(primitive);
        Ok(())
    }

    /// Add a primitive to both the view-clipped and the unclipped geometry.
    pub fn add_visible_primitive(
        &mut self,
        comp: CompId,
        primitive: BoundaryPrimitive,
    ) -> ModelResult<()> {
        self.add_primitive(comp, GeometryMode::ViewClipped, primitive.clone())?;
        self.add_primitive(comp, GeometryMode::Unclipped, primitive)
    }

    /// Author a straight run from `start` to `end`: curve location, a port at
    /// each end facing outward, an end face at each port and a centerline edge.
    pub fn add_straight(&mut self, spec: ComponentSpec, start: Point, end: Point) -> ModelResult<CompId> {
        let axis = end - start;
        let name = spec.name.clone();
        let comp = self.add_component(spec, Location::Curve { start, end });
        self.add_port(comp, start, -axis)?;
        self.add_port(comp, end, axis)?;

        let start_face = self.alloc_anchor(format!("{name}.start-face"));
        let end_face = self.alloc_anchor(format!("{name}.end-face"));
        let cl_start = self.alloc_anchor(format!("{name}.centerline.start"));
        let cl_end = self.alloc_anchor(format!("{name}.centerline.end"));
        self.add_visible_primitive(
            comp,
            BoundaryPrimitive::Face {
                center: start,
                anchor: start_face,
            },
        )?;
        self.add_visible_primitive(
            comp,
            BoundaryPrimitive::Face {
                center: end,
                anchor: end_face,
            },
        )?;
        self.add_visible_primitive(
            comp,
            BoundaryPrimitive::Edge {
                start,
                end,
                start_anchor: cl_start,
                end_anchor: cl_end,
                style: Some(CENTERLINE_STYLE.to_string()),
            },
        )?;
        Ok(comp)
    }

    /// Author a point-located fitting: one port per offset (facing along the
    /// offset), an end face per port and a centerline edge from the center to
    /// each port. All centerline edges share one center anchor.
    pub fn add_fitting(
        &mut self,
        spec: ComponentSpec,
        center: Point,
        port_offsets: &[Vector],
    ) -> ModelResult<CompId> {
        let name = spec.name.clone();
        let comp = self.add_component(spec, Location::Point(center));
        let center_anchor = self.alloc_anchor(format!("{name}.center"));
        for (i, offset) in port_offsets.iter().enumerate() {
            let origin = center + offset;
            self.add_port(comp, origin, *offset)?;
            let face = self.alloc_anchor(format!("{name}.face{i}"));
            let leg_end = self.alloc_anchor(format!("{name}.centerline{i}.end"));
            self.add_visible_primitive(
                comp,
                BoundaryPrimitive::Face {
                    center: origin,
                    anchor: face,
                },
            )?;
            self.add_visible_primitive(
                comp,
                BoundaryPrimitive::Edge {
                    start: center,
                    end: origin,
                    start_anchor: center_anchor,
                    end_anchor: leg_end,
                    style: Some(CENTERLINE_STYLE.to_string()),
                },
            )?;
        }
        Ok(comp)
    }

    /// Validate and freeze into an immutable model.
    pub fn build(self) -> ModelResult<MemoryModel> {
        for port in &self.ports {
            if let Some(other) = port.connected {
                let back = self
                    .ports
                    .get(other.position())
                    .ok_or(ModelError::UnknownPort { port: other })?;
                if back.connected != Some(port.id) {
                    return Err(ModelError::InvalidArg {
                        what: "port connections must be symmetric",
                    });
                }
                if back.owner == port.owner {
                    return Err(ModelError::InvalidArg {
                        what: "a component cannot connect to itself",
                    });
                }
            }
        }

        Ok(MemoryModel {
            components: self.components,
            ports: self.ports,
            geometry: self.geometry,
            anchor_labels: self.anchor_labels,
        })
    }
}

/// A validated, immutable in-memory piping model.
#[derive(Debug, Clone)]
pub struct MemoryModel {
    components: Vec<Component>,
    ports: Vec<Port>,
    geometry: HashMap<(CompId, GeometryMode), Vec<BoundaryPrimitive>>,
    anchor_labels: Vec<String>,
}

impl MemoryModel {
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn find_component(&self, name: &str) -> Option<CompId> {
        self.components.iter().find(|c| c.name == name).map(|c| c.id)
    }
}

impl PipingModel for MemoryModel {
    fn component(&self, id: CompId) -> ModelResult<&Component> {
        self.components
            .get(id.position())
            .ok_or(ModelError::UnknownComponent { comp: id })
    }

    fn port(&self, id: PortId) -> ModelResult<&Port> {
        self.ports
            .get(id.position())
            .ok_or(ModelError::UnknownPort { port: id })
    }

    fn boundary_geometry(
        &self,
        id: CompId,
        mode: GeometryMode,
    ) -> ModelResult<Vec<BoundaryPrimitive>> {
        self.component(id)?;
        Ok(self.geometry.get(&(id, mode)).cloned().unwrap_or_default())
    }

    fn anchor_label(&self, anchor: AnchorHandle) -> ModelResult<&str> {
        self.anchor_labels
            .get(anchor.position())
            .map(String::as_str)
            .ok_or(ModelError::InvalidArg {
                what: "unknown anchor handle",
            })
    }
}
