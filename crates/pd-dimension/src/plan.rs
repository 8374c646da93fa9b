//! Dimension plans and the all-or-nothing commit into a measurement sink.

use pd_core::{Line, points_coincide, COINCIDENCE_TOL};
use pd_model::Category;
use tracing::{debug, warn};

use crate::assemble::{Assembly, Endpoint};
use crate::error::{DimensionError, DimensionResult};
use crate::lines::DimensionLines;
use crate::style::StyleTable;

/// One measurement ready to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedMeasurement {
    pub line: Line,
    pub references: Vec<Endpoint>,
    pub style: String,
    pub category: Category,
}

/// Everything one user action will create, computed before any mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionPlan {
    pub primary: PlannedMeasurement,
    pub secondaries: Vec<PlannedMeasurement>,
    /// Secondary categories that had no configured style.
    pub style_fallbacks: usize,
}

impl DimensionPlan {
    /// Attach lines and styles to an assembly. The primary uses the style of
    /// the chain's category; each secondary the style of its own.
    pub fn new(
        assembly: Assembly,
        lines: &DimensionLines,
        chain_category: Category,
        styles: &StyleTable,
    ) -> Self {
        let primary_style = styles.resolve(chain_category);
        let primary = PlannedMeasurement {
            line: lines.primary,
            references: assembly.primary,
            style: primary_style.style.name.clone(),
            category: chain_category,
        };

        let mut style_fallbacks = 0;
        let secondaries = match lines.secondary {
            Some(line) => assembly
                .secondaries
                .into_iter()
                .map(|segment| {
                    let resolved = styles.resolve(segment.category);
                    if resolved.fallback {
                        style_fallbacks += 1;
                    }
                    PlannedMeasurement {
                        line,
                        references: segment.anchors.into_iter().map(Endpoint::Anchor).collect(),
                        style: resolved.style.name.clone(),
                        category: segment.category,
                    }
                })
                .collect(),
            None => Vec::new(),
        };

        if style_fallbacks > 0 {
            warn!(style_fallbacks, "secondary styles fell back to the default linear style");
        }
        Self {
            primary,
            secondaries,
            style_fallbacks,
        }
    }

    pub fn measurement_count(&self) -> usize {
        1 + self.secondaries.len()
    }

    pub fn measurements(&self) -> impl Iterator<Item = &PlannedMeasurement> {
        std::iter::once(&self.primary).chain(&self.secondaries)
    }

    /// Every measurement needs two distinct references.
    pub fn validate(&self) -> DimensionResult<()> {
        for (i, m) in self.measurements().enumerate() {
            let [first, .., last] = m.references.as_slice() else {
                return Err(DimensionError::InvalidPlan {
                    what: format!("measurement {i} has fewer than two references"),
                });
            };
            if points_coincide(&first.point(), &last.point(), COINCIDENCE_TOL) {
                return Err(DimensionError::InvalidPlan {
                    what: format!("measurement {i} spans zero length"),
                });
            }
        }
        Ok(())
    }
}

/// Receiver of finished plans: the only mutating step of a dimension action.
pub trait MeasurementSink {
    /// Create every measurement of `plan` or none of them. Returns how many
    /// were created.
    fn commit(&mut self, plan: &DimensionPlan) -> DimensionResult<usize>;
}

/// A measurement as recorded by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedMeasurement {
    pub id: usize,
    pub measurement: PlannedMeasurement,
}

/// In-memory sink that keeps every committed measurement.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Vec<RecordedMeasurement>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[RecordedMeasurement] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl MeasurementSink for RecordingSink {
    fn commit(&mut self, plan: &DimensionPlan) -> DimensionResult<usize> {
        plan.validate()?;
        let base = self.records.len();
        self.records.extend(plan.measurements().enumerate().map(|(i, m)| RecordedMeasurement {
            id: base + i,
            measurement: m.clone(),
        }));
        debug!(created = plan.measurement_count(), total = self.records.len(), "committed dimension plan");
        Ok(plan.measurement_count())
    }
}
