//! Design specification types
//!
//! A design spec maps each visual-attribute category to an ordered list of
//! chosen tag values. The categories themselves are static configuration,
//! not user data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Visual-attribute categories for a PC case design
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecCategory {
    Shape,
    Style,
    Color,
    Material,
    Ventilation,
    Lighting,
    Features,
    Environment,
}

impl SpecCategory {
    /// All categories in display order
    pub const ALL: [SpecCategory; 8] = [
        SpecCategory::Shape,
        SpecCategory::Style,
        SpecCategory::Color,
        SpecCategory::Material,
        SpecCategory::Ventilation,
        SpecCategory::Lighting,
        SpecCategory::Features,
        SpecCategory::Environment,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            SpecCategory::Shape => "shape",
            SpecCategory::Style => "style",
            SpecCategory::Color => "color",
            SpecCategory::Material => "material",
            SpecCategory::Ventilation => "ventilation",
            SpecCategory::Lighting => "lighting",
            SpecCategory::Features => "features",
            SpecCategory::Environment => "environment",
        }
    }

    /// Static display configuration for this category
    pub fn info(&self) -> &'static CategoryInfo {
        &CATALOG[SpecCategory::ALL.iter().position(|c| c == self).unwrap_or(0)]
    }
}

impl fmt::Display for SpecCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SpecCategory {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpecCategory::ALL
            .iter()
            .copied()
            .find(|c| c.id() == s)
            .ok_or_else(|| crate::Error::UnknownCategory(s.to_string()))
    }
}

/// Static display configuration for a spec category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub id: &'static str,
    pub display_name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

/// The category catalog, in display order
pub static CATALOG: [CategoryInfo; 8] = [
    CategoryInfo { id: "shape", display_name: "Shape", icon: "crop_square", color: "#4A90D9" },
    CategoryInfo { id: "style", display_name: "Style", icon: "palette", color: "#9B59B6" },
    CategoryInfo { id: "color", display_name: "Color", icon: "color_lens", color: "#E74C3C" },
    CategoryInfo { id: "material", display_name: "Material", icon: "texture", color: "#95A5A6" },
    CategoryInfo { id: "ventilation", display_name: "Ventilation", icon: "air", color: "#1ABC9C" },
    CategoryInfo { id: "lighting", display_name: "Lighting", icon: "lightbulb", color: "#F1C40F" },
    CategoryInfo { id: "features", display_name: "Features", icon: "settings", color: "#E67E22" },
    CategoryInfo { id: "environment", display_name: "Environment", icon: "landscape", color: "#2ECC71" },
];

/// Structured design specification: one ordered value list per category
///
/// Empty categories are omitted from the serialized form, matching the wire
/// contract of the extraction backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shape: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub style: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub color: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub material: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ventilation: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lighting: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<String>,
}

impl DesignSpec {
    /// Values chosen for one category, in the order they were added
    pub fn values(&self, category: SpecCategory) -> &[String] {
        match category {
            SpecCategory::Shape => &self.shape,
            SpecCategory::Style => &self.style,
            SpecCategory::Color => &self.color,
            SpecCategory::Material => &self.material,
            SpecCategory::Ventilation => &self.ventilation,
            SpecCategory::Lighting => &self.lighting,
            SpecCategory::Features => &self.features,
            SpecCategory::Environment => &self.environment,
        }
    }

    /// Append a value to one category, preserving insertion order
    pub fn push(&mut self, category: SpecCategory, value: impl Into<String>) {
        let list = match category {
            SpecCategory::Shape => &mut self.shape,
            SpecCategory::Style => &mut self.style,
            SpecCategory::Color => &mut self.color,
            SpecCategory::Material => &mut self.material,
            SpecCategory::Ventilation => &mut self.ventilation,
            SpecCategory::Lighting => &mut self.lighting,
            SpecCategory::Features => &mut self.features,
            SpecCategory::Environment => &mut self.environment,
        };
        list.push(value.into());
    }

    /// Whether no category has any values
    pub fn is_empty(&self) -> bool {
        SpecCategory::ALL.iter().all(|c| self.values(*c).is_empty())
    }

    /// Categories that have at least one value, in display order
    pub fn present_categories(&self) -> Vec<SpecCategory> {
        SpecCategory::ALL
            .iter()
            .copied()
            .filter(|c| !self.values(*c).is_empty())
            .collect()
    }
}
