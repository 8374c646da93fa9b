//! Secondary measurement styles keyed by component category.

use std::collections::HashMap;

use pd_core::Real;
use pd_model::Category;

use crate::error::{DimensionError, DimensionResult};

/// Text size used when no style drives the secondary offset.
pub const DEFAULT_TEXT_SIZE: Real = 1.0 / 8.0;
/// Text-to-line distance used when no style drives the secondary offset.
pub const DEFAULT_TEXT_TO_LINE: Real = 1.0 / 32.0;

/// Measurement style, reduced to what placement needs.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionStyle {
    pub name: String,
    /// Text height in paper units.
    pub text_size: Real,
    /// Gap between the measurement line and its text in paper units.
    pub text_to_line: Real,
}

impl Default for DimensionStyle {
    fn default() -> Self {
        Self {
            name: "Linear".to_string(),
            text_size: DEFAULT_TEXT_SIZE,
            text_to_line: DEFAULT_TEXT_TO_LINE,
        }
    }
}

impl DimensionStyle {
    pub fn new(name: impl Into<String>, text_size: Real, text_to_line: Real) -> Self {
        Self {
            name: name.into(),
            text_size,
            text_to_line,
        }
    }

    /// Distance in model units between the primary and the secondary line.
    pub fn secondary_offset(&self, view_scale: Real) -> Real {
        (self.text_size + 3.0 * self.text_to_line) * view_scale
    }

    pub(crate) fn validate(&self) -> DimensionResult<()> {
        if !self.text_size.is_finite() || self.text_size < 0.0 {
            return Err(DimensionError::InvalidSettings {
                what: "style text size must be finite and non-negative",
            });
        }
        if !self.text_to_line.is_finite() || self.text_to_line < 0.0 {
            return Err(DimensionError::InvalidSettings {
                what: "style text-to-line distance must be finite and non-negative",
            });
        }
        Ok(())
    }
}

/// Outcome of looking up the style for a category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleResolution<'a> {
    pub style: &'a DimensionStyle,
    /// No style is configured for the category; the default linear style
    /// was used instead.
    pub fallback: bool,
}

/// Per-category secondary styles plus the model's default linear style.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    by_category: HashMap<Category, DimensionStyle>,
    default_linear: DimensionStyle,
}

impl StyleTable {
    pub fn new(default_linear: DimensionStyle) -> Self {
        Self {
            by_category: HashMap::new(),
            default_linear,
        }
    }

    pub fn with_category(mut self, category: Category, style: DimensionStyle) -> Self {
        self.by_category.insert(category, style);
        self
    }

    pub fn default_linear(&self) -> &DimensionStyle {
        &self.default_linear
    }

    /// The style configured for exactly this category, if any.
    pub fn configured(&self, category: Category) -> Option<&DimensionStyle> {
        self.by_category.get(&category)
    }

    pub fn resolve(&self, category: Category) -> StyleResolution<'_> {
        match self.by_category.get(&category) {
            Some(style) => StyleResolution {
                style,
                fallback: false,
            },
            None => StyleResolution {
                style: &self.default_linear,
                fallback: true,
            },
        }
    }

    pub fn validate(&self) -> DimensionResult<()> {
        self.default_linear.validate()?;
        self.by_category.values().try_for_each(DimensionStyle::validate)
    }
}
