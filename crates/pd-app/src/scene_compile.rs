//! Compilation of a scene file into the in-memory model and the settings
//! one dimension action runs with.

use std::collections::HashMap;

use pd_core::{AnchorHandle, CompId, Plane, Point, Real, Vector, COINCIDENCE_TOL};
use pd_dimension::{DimensionStyle, StyleTable};
use pd_graph::{CenterlineFilter, ElisionPolicy, FlangeElisionMode, GraphSettings};
use pd_model::{
    BoundaryPrimitive, Category, ComponentSpec, GeometryMode, Location, MemoryModel, ModelBuilder,
    PartKind,
};
use pd_project::schema::{
    CategoryDef, ComponentDef, ElisionModeDef, LocationDef, PartKindDef, PassDef, PreferencesDef,
    PrimitiveDef, Scene, StyleDef, Vec3, ViewDef,
};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Everything a dimension action needs, compiled from one scene.
pub struct CompiledScene {
    pub name: String,
    pub model: MemoryModel,
    pub comp_id_map: HashMap<String, CompId>,
    /// Scene ids by chain position, for display.
    pub chain_ids: Vec<String>,
    pub chain: Vec<CompId>,
    pub plane: Plane,
    pub view_scale: Real,
    pub settings: GraphSettings,
    pub filter: CenterlineFilter,
    pub styles: StyleTable,
}

/// Compile a validated scene.
pub fn compile_scene(scene: &Scene) -> AppResult<CompiledScene> {
    let mut builder = ModelBuilder::new();
    let mut comp_id_map = HashMap::new();
    let mut port_id_map = HashMap::new();
    let mut anchors: HashMap<String, AnchorHandle> = HashMap::new();

    for component in &scene.components {
        let comp = builder.add_component(component_spec(component), location(&component.location));
        comp_id_map.insert(component.id.clone(), comp);

        for port in &component.ports {
            let id = builder.add_port(comp, point(port.origin), vector(port.direction))?;
            port_id_map.insert(port.id.clone(), id);
        }
        for primitive in &component.geometry {
            add_primitive(&mut builder, &mut anchors, comp, primitive)?;
        }
    }

    for component in &scene.components {
        for port in &component.ports {
            let Some(target) = &port.connected_to else {
                continue;
            };
            let a = lookup(&port_id_map, &port.id, "port")?;
            let b = lookup(&port_id_map, target, "port")?;
            builder.connect(a, b)?;
        }
    }

    let model = builder.build()?;
    let chain = scene
        .chain
        .iter()
        .map(|id| lookup(&comp_id_map, id, "component"))
        .collect::<AppResult<Vec<_>>>()?;

    debug!(
        scene = %scene.name,
        components = comp_id_map.len(),
        ports = port_id_map.len(),
        anchors = anchors.len(),
        "compiled scene"
    );

    Ok(CompiledScene {
        name: scene.name.clone(),
        model,
        comp_id_map,
        chain_ids: scene.chain.clone(),
        chain,
        plane: drawing_plane(&scene.view)?,
        view_scale: scene.view.scale,
        settings: graph_settings(&scene.preferences)?,
        filter: CenterlineFilter::new(scene.preferences.centerline_styles.iter().cloned()),
        styles: style_table(&scene.preferences),
    })
}

/// The explicit plane when given, otherwise one facing the view.
pub fn drawing_plane(view: &ViewDef) -> AppResult<Plane> {
    let plane = match &view.plane {
        Some(p) => Plane::new(point(p.origin), vector(p.normal))?,
        None => Plane::from_view(vector(view.direction), point(view.origin))?,
    };
    Ok(plane)
}

pub fn graph_settings(prefs: &PreferencesDef) -> AppResult<GraphSettings> {
    let default_policy = match prefs.default_mode {
        ElisionModeDef::Exact => ElisionPolicy::Exact,
        ElisionModeDef::Partial => ElisionPolicy::Partial,
        ElisionModeDef::Negate => ElisionPolicy::Negate,
        other => {
            return Err(AppError::Compile(format!(
                "global elision mode must be exact, partial or negate, got {other:?}"
            )));
        }
    };

    let mut settings = GraphSettings::default().with_default_policy(default_policy);
    for entry in &prefs.type_modes {
        settings = settings.with_type_mode(entry.type_name.clone(), elision_mode(entry.mode));
    }
    for marker in &prefs.marker_types {
        settings = settings.with_marker_type(marker.clone());
    }
    settings.match_tolerance = prefs.match_tolerance.unwrap_or(COINCIDENCE_TOL);
    Ok(settings)
}

pub fn style_table(prefs: &PreferencesDef) -> StyleTable {
    let default_linear = prefs.default_style.as_ref().map(style).unwrap_or_default();
    prefs
        .secondary_styles
        .iter()
        .fold(StyleTable::new(default_linear), |table, entry| {
            table.with_category(category(entry.category), style(&entry.style))
        })
}

fn add_primitive(
    builder: &mut ModelBuilder,
    anchors: &mut HashMap<String, AnchorHandle>,
    comp: CompId,
    def: &PrimitiveDef,
) -> AppResult<()> {
    let mut anchor = |name: &str| {
        *anchors
            .entry(name.to_string())
            .or_insert_with(|| builder.alloc_anchor(name))
    };
    let primitive = match def {
        PrimitiveDef::Vertex { point: p, anchor: a, .. } => BoundaryPrimitive::Vertex {
            point: point(*p),
            anchor: anchor(a.as_str()),
        },
        PrimitiveDef::Edge {
            start,
            end,
            start_anchor,
            end_anchor,
            style,
            ..
        } => BoundaryPrimitive::Edge {
            start: point(*start),
            end: point(*end),
            start_anchor: anchor(start_anchor.as_str()),
            end_anchor: anchor(end_anchor.as_str()),
            style: style.clone(),
        },
        PrimitiveDef::Face { center, anchor: a, .. } => BoundaryPrimitive::Face {
            center: point(*center),
            anchor: anchor(a.as_str()),
        },
    };

    match def.pass() {
        PassDef::Both => builder.add_visible_primitive(comp, primitive)?,
        PassDef::ViewClipped => builder.add_primitive(comp, GeometryMode::ViewClipped, primitive)?,
        PassDef::Unclipped => builder.add_primitive(comp, GeometryMode::Unclipped, primitive)?,
    }
    Ok(())
}

fn lookup<T: Copy>(map: &HashMap<String, T>, id: &str, what: &str) -> AppResult<T> {
    map.get(id)
        .copied()
        .ok_or_else(|| AppError::Compile(format!("{what} not found: {id}")))
}

fn component_spec(def: &ComponentDef) -> ComponentSpec {
    ComponentSpec::new(def.name.clone(), category(def.category), part_kind(def.part), def.type_name.clone())
}

fn location(def: &LocationDef) -> Location {
    match def {
        LocationDef::Point { at } => Location::Point(point(*at)),
        LocationDef::Curve { start, end } => Location::Curve {
            start: point(*start),
            end: point(*end),
        },
    }
}

fn elision_mode(def: ElisionModeDef) -> FlangeElisionMode {
    match def {
        ElisionModeDef::None => FlangeElisionMode::None,
        ElisionModeDef::Default => FlangeElisionMode::Default,
        ElisionModeDef::Exact => FlangeElisionMode::Exact,
        ElisionModeDef::Partial => FlangeElisionMode::Partial,
        ElisionModeDef::Negate => FlangeElisionMode::Negate,
    }
}

fn category(def: CategoryDef) -> Category {
    match def {
        CategoryDef::Pipe => Category::Pipe,
        CategoryDef::PipeFitting => Category::PipeFitting,
        CategoryDef::PipeAccessory => Category::PipeAccessory,
        CategoryDef::MechanicalEquipment => Category::MechanicalEquipment,
        CategoryDef::Generic => Category::Generic,
    }
}

fn part_kind(def: PartKindDef) -> PartKind {
    match def {
        PartKindDef::Straight => PartKind::Straight,
        PartKindDef::Elbow => PartKind::Elbow,
        PartKindDef::Tee => PartKind::Tee,
        PartKindDef::Cross => PartKind::Cross,
        PartKindDef::Coupling => PartKind::Coupling,
        PartKindDef::Union => PartKind::Union,
        PartKindDef::Flange => PartKind::Flange,
        PartKindDef::Transition => PartKind::Transition,
        PartKindDef::Cap => PartKind::Cap,
        PartKindDef::Accessory => PartKind::Accessory,
        PartKindDef::Other => PartKind::Other,
    }
}

fn style(def: &StyleDef) -> DimensionStyle {
    DimensionStyle::new(def.name.clone(), def.text_size, def.text_to_line)
}

fn point(v: Vec3) -> Point {
    Point::new(v[0], v[1], v[2])
}

fn vector(v: Vec3) -> Vector {
    Vector::new(v[0], v[1], v[2])
}
