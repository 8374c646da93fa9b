//! Piping components, their ports and locations.

use pd_core::{CompId, Direction, Point, PortId, Real};

/// Model category of a component. Secondary measurement styles are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Pipe,
    PipeFitting,
    PipeAccessory,
    MechanicalEquipment,
    /// Used when a measurement covers components of mixed categories.
    Generic,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Pipe => "pipe",
            Category::PipeFitting => "pipe-fitting",
            Category::PipeAccessory => "pipe-accessory",
            Category::MechanicalEquipment => "mechanical-equipment",
            Category::Generic => "generic",
        }
    }
}

/// Shape family of a component as reported by the host model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    Straight,
    Elbow,
    Tee,
    Cross,
    Coupling,
    Union,
    Flange,
    Transition,
    Cap,
    Accessory,
    Other,
}

impl PartKind {
    /// Coupling-type parts join two runs end to end and may have their
    /// measurement break elided.
    pub fn is_coupling_type(self) -> bool {
        matches!(self, PartKind::Coupling | PartKind::Union | PartKind::Flange)
    }
}

/// Where a component sits in the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Location {
    Point(Point),
    Curve { start: Point, end: Point },
}

impl Location {
    /// Characteristic point: the point itself, or the curve midpoint.
    pub fn origin(&self) -> Point {
        match self {
            Location::Point(p) => *p,
            Location::Curve { start, end } => midpoint(start, end),
        }
    }

    pub fn curve_length(&self) -> Option<Real> {
        match self {
            Location::Point(_) => None,
            Location::Curve { start, end } => Some((end - start).norm()),
        }
    }
}

fn midpoint(a: &Point, b: &Point) -> Point {
    Point::from((a.coords + b.coords) * 0.5)
}

/// An oriented connection point. `direction` points away from the owner.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub id: PortId,
    pub owner: CompId,
    pub origin: Point,
    pub direction: Direction,
    pub connected: Option<PortId>,
}

/// A connected piping item.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: CompId,
    pub name: String,
    pub category: Category,
    pub part: PartKind,
    /// Type identity used for per-type preference lookups.
    pub type_name: String,
    pub location: Location,
    pub ports: Vec<PortId>,
}
