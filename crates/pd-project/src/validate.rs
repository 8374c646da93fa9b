//! Scene validation logic.

use std::collections::{HashMap, HashSet};

use crate::schema::{ComponentDef, ElisionModeDef, LocationDef, PreferencesDef, Scene, Vec3, LATEST_VERSION};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

/// Report the first structural problem of `scene`, if any.
pub fn validate_scene(scene: &Scene) -> Result<(), ValidationError> {
    if scene.version != LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scene.version,
        });
    }

    validate_vec(&scene.view.direction, "view direction")?;
    validate_vec(&scene.view.origin, "view origin")?;
    if !scene.view.scale.is_finite() || scene.view.scale <= 0.0 {
        return Err(invalid("view scale", scene.view.scale, "must be positive and finite"));
    }
    if let Some(plane) = &scene.view.plane {
        validate_vec(&plane.origin, "view plane origin")?;
        validate_vec(&plane.normal, "view plane normal")?;
    }

    let mut component_ids = HashSet::new();
    let mut port_owner: HashMap<&str, &str> = HashMap::new();
    for component in &scene.components {
        if !component_ids.insert(component.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: component.id.clone(),
                context: "components".to_string(),
            });
        }
        validate_component(component)?;
        for port in &component.ports {
            if port_owner.insert(&port.id, &component.id).is_some() {
                return Err(ValidationError::DuplicateId {
                    id: port.id.clone(),
                    context: "ports".to_string(),
                });
            }
        }
    }

    validate_connections(scene, &port_owner)?;

    let mut in_chain = HashSet::new();
    for id in &scene.chain {
        if !component_ids.contains(id.as_str()) {
            return Err(ValidationError::MissingReference {
                id: id.clone(),
                context: "chain".to_string(),
            });
        }
        if !in_chain.insert(id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: id.clone(),
                context: "chain (closed loops are not supported)".to_string(),
            });
        }
    }

    validate_preferences(&scene.preferences)
}

fn validate_component(component: &ComponentDef) -> Result<(), ValidationError> {
    let field = |what: &str| format!("component '{}' {what}", component.id);
    match &component.location {
        LocationDef::Point { at } => validate_vec(at, &field("location"))?,
        LocationDef::Curve { start, end } => {
            validate_vec(start, &field("location start"))?;
            validate_vec(end, &field("location end"))?;
        }
    }
    for port in &component.ports {
        validate_vec(&port.origin, &field(&format!("port '{}' origin", port.id)))?;
        validate_vec(&port.direction, &field(&format!("port '{}' direction", port.id)))?;
        if port.direction.iter().all(|c| *c == 0.0) {
            return Err(ValidationError::InvalidValue {
                field: field(&format!("port '{}' direction", port.id)),
                value: format!("{:?}", port.direction),
                reason: "must not be zero".to_string(),
            });
        }
    }
    for primitive in &component.geometry {
        for point in primitive.points() {
            validate_vec(&point, &field("geometry"))?;
        }
    }
    Ok(())
}

/// Connections must point at an existing port of another component, and
/// both ends must agree.
fn validate_connections(scene: &Scene, port_owner: &HashMap<&str, &str>) -> Result<(), ValidationError> {
    let back_refs: HashMap<&str, Option<&str>> = scene
        .components
        .iter()
        .flat_map(|c| &c.ports)
        .map(|p| (p.id.as_str(), p.connected_to.as_deref()))
        .collect();

    for component in &scene.components {
        for port in &component.ports {
            let Some(target) = port.connected_to.as_deref() else {
                continue;
            };
            let Some(owner) = port_owner.get(target) else {
                return Err(ValidationError::MissingReference {
                    id: target.to_string(),
                    context: format!("port '{}' connected_to", port.id),
                });
            };
            if *owner == component.id {
                return Err(ValidationError::InvalidValue {
                    field: format!("port '{}' connected_to", port.id),
                    value: target.to_string(),
                    reason: "a component cannot connect to itself".to_string(),
                });
            }
            if back_refs.get(target).copied().flatten() != Some(port.id.as_str()) {
                return Err(ValidationError::InvalidValue {
                    field: format!("port '{}' connected_to", port.id),
                    value: target.to_string(),
                    reason: "connection is not mirrored by the other port".to_string(),
                });
            }
        }
    }
    Ok(())
}

fn validate_preferences(prefs: &PreferencesDef) -> Result<(), ValidationError> {
    if matches!(prefs.default_mode, ElisionModeDef::None | ElisionModeDef::Default) {
        return Err(ValidationError::InvalidValue {
            field: "preferences default_mode".to_string(),
            value: format!("{:?}", prefs.default_mode),
            reason: "global default must be exact, partial or negate".to_string(),
        });
    }

    let mut types = HashSet::new();
    for entry in &prefs.type_modes {
        if !types.insert(entry.type_name.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: entry.type_name.clone(),
                context: "preferences type_modes".to_string(),
            });
        }
    }

    let mut categories = HashSet::new();
    for entry in &prefs.secondary_styles {
        if !categories.insert(entry.category) {
            return Err(ValidationError::DuplicateId {
                id: format!("{:?}", entry.category),
                context: "preferences secondary_styles".to_string(),
            });
        }
    }

    for style in prefs
        .secondary_styles
        .iter()
        .map(|e| &e.style)
        .chain(prefs.default_style.as_ref())
    {
        for (what, v) in [("text_size", style.text_size), ("text_to_line", style.text_to_line)] {
            if !v.is_finite() || v < 0.0 {
                return Err(invalid(&format!("style '{}' {what}", style.name), v, "must be non-negative and finite"));
            }
        }
    }

    match prefs.match_tolerance {
        Some(tol) if !tol.is_finite() || tol <= 0.0 => {
            Err(invalid("preferences match_tolerance", tol, "must be positive and finite"))
        }
        _ => Ok(()),
    }
}

fn validate_vec(v: &Vec3, field: &str) -> Result<(), ValidationError> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: format!("{v:?}"),
            reason: "must be finite".to_string(),
        })
    }
}

fn invalid(field: &str, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PortDef, ViewDef, PartKindDef, CategoryDef};

    fn pipe(id: &str, ports: Vec<PortDef>) -> ComponentDef {
        ComponentDef {
            id: id.to_string(),
            name: id.to_string(),
            category: CategoryDef::Pipe,
            part: PartKindDef::Straight,
            type_name: "Standard".to_string(),
            location: LocationDef::Curve {
                start: [0.0; 3],
                end: [1.0, 0.0, 0.0],
            },
            ports,
            geometry: Vec::new(),
        }
    }

    fn port(id: &str, to: Option<&str>) -> PortDef {
        PortDef {
            id: id.to_string(),
            origin: [0.0; 3],
            direction: [1.0, 0.0, 0.0],
            connected_to: to.map(str::to_string),
        }
    }

    fn scene(components: Vec<ComponentDef>, chain: &[&str]) -> Scene {
        Scene {
            version: LATEST_VERSION,
            name: "test".to_string(),
            view: ViewDef {
                direction: [0.0, 0.0, 1.0],
                origin: [0.0; 3],
                scale: 1.0,
                plane: None,
            },
            components,
            chain: chain.iter().map(|s| s.to_string()).collect(),
            preferences: PreferencesDef::default(),
        }
    }

    #[test]
    fn mirrored_connection_is_valid() {
        let s = scene(
            vec![pipe("a", vec![port("a1", Some("b1"))]), pipe("b", vec![port("b1", Some("a1"))])],
            &["a", "b"],
        );
        validate_scene(&s).unwrap();
    }

    #[test]
    fn dangling_connection_is_rejected() {
        let s = scene(vec![pipe("a", vec![port("a1", Some("zz"))])], &["a"]);
        assert!(matches!(validate_scene(&s), Err(ValidationError::MissingReference { .. })));
    }

    #[test]
    fn one_sided_connection_is_rejected() {
        let s = scene(
            vec![pipe("a", vec![port("a1", Some("b1"))]), pipe("b", vec![port("b1", None)])],
            &["a", "b"],
        );
        assert!(matches!(validate_scene(&s), Err(ValidationError::InvalidValue { .. })));
    }

    #[test]
    fn repeated_chain_entry_is_rejected() {
        let s = scene(vec![pipe("a", vec![])], &["a", "a"]);
        assert!(matches!(validate_scene(&s), Err(ValidationError::DuplicateId { .. })));
    }

    #[test]
    fn global_default_cannot_defer() {
        let mut s = scene(vec![pipe("a", vec![])], &["a"]);
        s.preferences.default_mode = ElisionModeDef::Default;
        assert!(validate_scene(&s).is_err());
    }

    #[test]
    fn non_finite_geometry_is_rejected() {
        let mut s = scene(vec![pipe("a", vec![])], &["a"]);
        s.components[0].location = LocationDef::Point { at: [f64::NAN, 0.0, 0.0] };
        assert!(matches!(validate_scene(&s), Err(ValidationError::InvalidValue { .. })));
    }

    #[test]
    fn future_version_is_rejected() {
        let mut s = scene(vec![], &[]);
        s.version = LATEST_VERSION + 1;
        assert_eq!(validate_scene(&s), Err(ValidationError::UnsupportedVersion { version: 2 }));
    }
}
