//! Scene file schema.
//!
//! A scene carries a host model snapshot (components, ports, boundary
//! geometry), the view the dimension is placed in, the chain to measure and
//! the read-only preferences.

use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;

pub type Vec3 = [f64; 3];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    pub version: u32,
    pub name: String,
    pub view: ViewDef,
    #[serde(default)]
    pub components: Vec<ComponentDef>,
    /// Component ids in chain order.
    #[serde(default)]
    pub chain: Vec<String>,
    #[serde(default)]
    pub preferences: PreferencesDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewDef {
    /// Viewing direction; the drawing plane is created facing it.
    pub direction: Vec3,
    pub origin: Vec3,
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Explicit drawing plane. Created from `direction` and `origin` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plane: Option<PlaneDef>,
}

fn default_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaneDef {
    pub origin: Vec3,
    pub normal: Vec3,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CategoryDef {
    Pipe,
    PipeFitting,
    PipeAccessory,
    MechanicalEquipment,
    Generic,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PartKindDef {
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

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    pub id: String,
    pub name: String,
    pub category: CategoryDef,
    pub part: PartKindDef,
    /// Family/type name, used for elision overrides and marker detection.
    pub type_name: String,
    pub location: LocationDef,
    #[serde(default)]
    pub ports: Vec<PortDef>,
    #[serde(default)]
    pub geometry: Vec<PrimitiveDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LocationDef {
    Point { at: Vec3 },
    Curve { start: Vec3, end: Vec3 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortDef {
    pub id: String,
    pub origin: Vec3,
    pub direction: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_to: Option<String>,
}

/// Geometry pass a primitive belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PassDef {
    /// Visible in the view and present unclipped.
    #[default]
    Both,
    ViewClipped,
    Unclipped,
}

/// A boundary primitive. Anchors are named; primitives that share a name
/// share one anchor handle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrimitiveDef {
    Vertex {
        point: Vec3,
        anchor: String,
        #[serde(default)]
        pass: PassDef,
    },
    Edge {
        start: Vec3,
        end: Vec3,
        start_anchor: String,
        end_anchor: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<String>,
        #[serde(default)]
        pass: PassDef,
    },
    Face {
        center: Vec3,
        anchor: String,
        #[serde(default)]
        pass: PassDef,
    },
}

impl PrimitiveDef {
    pub fn pass(&self) -> PassDef {
        match self {
            PrimitiveDef::Vertex { pass, .. }
            | PrimitiveDef::Edge { pass, .. }
            | PrimitiveDef::Face { pass, .. } => *pass,
        }
    }

    pub fn points(&self) -> Vec<Vec3> {
        match self {
            PrimitiveDef::Vertex { point, .. } => vec![*point],
            PrimitiveDef::Edge { start, end, .. } => vec![*start, *end],
            PrimitiveDef::Face { center, .. } => vec![*center],
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ElisionModeDef {
    None,
    Default,
    Exact,
    Partial,
    Negate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StyleDef {
    pub name: String,
    pub text_size: f64,
    pub text_to_line: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryStyleDef {
    pub category: CategoryDef,
    pub style: StyleDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeModeDef {
    pub type_name: String,
    pub mode: ElisionModeDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreferencesDef {
    #[serde(default)]
    pub type_modes: Vec<TypeModeDef>,
    /// Global elision policy used by components in `default` mode.
    #[serde(default = "default_global_mode")]
    pub default_mode: ElisionModeDef,
    #[serde(default)]
    pub marker_types: Vec<String>,
    /// Edge styles accepted as centerlines. Empty accepts every edge.
    #[serde(default = "default_centerline_styles")]
    pub centerline_styles: Vec<String>,
    #[serde(default)]
    pub secondary_styles: Vec<CategoryStyleDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_style: Option<StyleDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_tolerance: Option<f64>,
}

fn default_global_mode() -> ElisionModeDef {
    ElisionModeDef::Exact
}

fn default_centerline_styles() -> Vec<String> {
    vec!["Centerline".to_string()]
}

impl Default for PreferencesDef {
    fn default() -> Self {
        Self {
            type_modes: Vec::new(),
            default_mode: default_global_mode(),
            marker_types: Vec::new(),
            centerline_styles: default_centerline_styles(),
            secondary_styles: Vec::new(),
            default_style: None,
            match_tolerance: None,
        }
    }
}
