//! Read-only preferences consumed by one graph build.

use std::collections::{BTreeSet, HashMap, HashSet};

use pd_core::{Real, COINCIDENCE_TOL};

use crate::error::{GraphError, GraphResult};

/// Per-component flange elision policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlangeElisionMode {
    /// Not an elision-eligible component.
    None,
    /// Defer to the globally configured policy.
    #[default]
    Default,
    Exact,
    Partial,
    Negate,
}

impl FlangeElisionMode {
    /// Concrete policy to dispatch on, with `Default` replaced by the global
    /// policy. `None` yields no policy.
    pub fn resolve(self, global: ElisionPolicy) -> Option<ElisionPolicy> {
        match self {
            FlangeElisionMode::None => None,
            FlangeElisionMode::Default => Some(global),
            FlangeElisionMode::Exact => Some(ElisionPolicy::Exact),
            FlangeElisionMode::Partial => Some(ElisionPolicy::Partial),
            FlangeElisionMode::Negate => Some(ElisionPolicy::Negate),
        }
    }
}

/// A concrete elision behavior; the only values the global default may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElisionPolicy {
    /// The component produces no visible break.
    #[default]
    Exact,
    /// Exact at chain ends and next to point-like components, Negate elsewhere.
    Partial,
    /// The component's footprint is absorbed by its neighbors.
    Negate,
}

impl From<ElisionPolicy> for FlangeElisionMode {
    fn from(p: ElisionPolicy) -> Self {
        match p {
            ElisionPolicy::Exact => FlangeElisionMode::Exact,
            ElisionPolicy::Partial => FlangeElisionMode::Partial,
            ElisionPolicy::Negate => FlangeElisionMode::Negate,
        }
    }
}

/// Line styles whose edges count as centerlines for point-like components.
///
/// An empty filter accepts every styled or unstyled edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CenterlineFilter {
    accepted: BTreeSet<String>,
}

impl CenterlineFilter {
    pub fn accept_all() -> Self {
        Self::default()
    }

    pub fn new<I, S>(styles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            accepted: styles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn accepts(&self, style: Option<&str>) -> bool {
        if self.accepted.is_empty() {
            return true;
        }
        style.is_some_and(|s| self.accepted.contains(s))
    }

    pub fn styles(&self) -> impl Iterator<Item = &str> {
        self.accepted.iter().map(String::as_str)
    }
}

/// Preferences for classification, elision and geometry matching.
#[derive(Debug, Clone)]
pub struct GraphSettings {
    /// Per-type elision overrides, keyed by component type name.
    pub type_modes: HashMap<String, FlangeElisionMode>,
    /// Policy a `Default` mode resolves to.
    pub default_policy: ElisionPolicy,
    /// Type names of pass-through markers.
    pub marker_types: HashSet<String>,
    /// Distance at which a geometry point matches a target point.
    pub match_tolerance: Real,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            type_modes: HashMap::new(),
            default_policy: ElisionPolicy::default(),
            marker_types: HashSet::new(),
            match_tolerance: COINCIDENCE_TOL,
        }
    }
}

impl GraphSettings {
    pub fn with_type_mode(mut self, type_name: impl Into<String>, mode: FlangeElisionMode) -> Self {
        self.type_modes.insert(type_name.into(), mode);
        self
    }

    pub fn with_marker_type(mut self, type_name: impl Into<String>) -> Self {
        self.marker_types.insert(type_name.into());
        self
    }

    pub fn with_default_policy(mut self, policy: ElisionPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    pub(crate) fn validate(&self) -> GraphResult<()> {
        if !self.match_tolerance.is_finite() || self.match_tolerance <= 0.0 {
            return Err(GraphError::InvalidSettings {
                what: "match tolerance must be positive and finite",
            });
        }
        Ok(())
    }
}
