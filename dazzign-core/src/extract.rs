//! Keyword-based spec extraction
//!
//! The deterministic fallback extractor: scans the prompt for known keywords
//! per category and title-cases the matches. Used when no language-model
//! backend is configured and as the degradation path when one fails.

use crate::spec::{DesignSpec, SpecCategory};

const SHAPE_KEYWORDS: &[&str] = &[
    "mid-tower", "cube", "spherical", "slim", "open-frame", "compact", "ultra-tower",
];
const STYLE_KEYWORDS: &[&str] = &[
    "futuristic", "steampunk", "minimalist", "modern", "sleek", "industrial", "cthulhu", "ghibli",
];
const COLOR_KEYWORDS: &[&str] = &[
    "black", "white", "red", "blue", "green", "silver", "gray", "gold", "brown", "navy",
];
const MATERIAL_KEYWORDS: &[&str] = &[
    "aluminum", "tempered glass", "wood", "acrylic", "steel", "carbon fiber", "glass",
];
const VENTILATION_KEYWORDS: &[&str] = &[
    "mesh", "side vents", "open-air", "airflow", "intake", "cooling",
];
const LIGHTING_KEYWORDS: &[&str] = &[
    "argb", "rgb", "led", "ambient glow", "neon", "illuminated", "no lighting",
];
const FEATURE_KEYWORDS: &[&str] = &[
    "lcd", "handle", "psu shroud", "decorative", "water cooling", "cable management",
    "vertical gpu",
];
const ENVIRONMENT_KEYWORDS: &[&str] = &[
    "dark room", "spotlight", "studio", "on a desk", "with peripherals", "in a showcase",
    "in a gaming setup", "cyberpunk city", "nature background", "futuristic lab",
];

/// Extract a design spec from free text by keyword scanning
///
/// Matching is case-insensitive; matched values are title-cased, except the
/// lighting acronyms which become e.g. "RGB lighting". A prompt with no
/// recognized keywords yields an empty spec.
pub fn extract_spec(prompt: &str) -> DesignSpec {
    let lower = prompt.to_lowercase();
    let mut spec = DesignSpec::default();

    scan(&lower, &mut spec, SpecCategory::Shape, SHAPE_KEYWORDS, title_case);
    scan(&lower, &mut spec, SpecCategory::Style, STYLE_KEYWORDS, title_case);
    scan(&lower, &mut spec, SpecCategory::Color, COLOR_KEYWORDS, title_case);
    scan(&lower, &mut spec, SpecCategory::Material, MATERIAL_KEYWORDS, title_case);
    scan(&lower, &mut spec, SpecCategory::Ventilation, VENTILATION_KEYWORDS, title_case);
    scan(&lower, &mut spec, SpecCategory::Lighting, LIGHTING_KEYWORDS, format_lighting);
    scan(&lower, &mut spec, SpecCategory::Features, FEATURE_KEYWORDS, title_case);
    scan(&lower, &mut spec, SpecCategory::Environment, ENVIRONMENT_KEYWORDS, title_case);

    spec
}

fn scan(
    lower_prompt: &str,
    spec: &mut DesignSpec,
    category: SpecCategory,
    keywords: &[&str],
    format: fn(&str) -> String,
) {
    for keyword in keywords {
        if lower_prompt.contains(keyword) {
            spec.push(category, format(keyword));
        }
    }
}

/// Title-case each whitespace-separated word, preserving hyphenated parts
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            word.split('-')
                .map(capitalize)
                .collect::<Vec<_>>()
                .join("-")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn format_lighting(keyword: &str) -> String {
    match keyword {
        "rgb" | "argb" | "led" => format!("{} lighting", keyword.to_uppercase()),
        other => title_case(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_multiple_categories() {
        let spec = extract_spec(
            "A sleek black cube case with RGB lighting, mesh front panel and water cooling",
        );
        assert_eq!(spec.shape, ["Cube"]);
        assert_eq!(spec.style, ["Sleek"]);
        assert_eq!(spec.color, ["Black"]);
        // "water cooling" also trips the standalone "cooling" keyword
        assert_eq!(spec.ventilation, ["Mesh", "Cooling"]);
        assert_eq!(spec.lighting, ["RGB lighting"]);
        assert_eq!(spec.features, ["Water Cooling"]);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let spec = extract_spec("MINIMALIST WOOD case");
        assert_eq!(spec.style, ["Minimalist"]);
        assert_eq!(spec.material, ["Wood"]);
    }

    #[test]
    fn test_hyphenated_keywords_title_cased() {
        let spec = extract_spec("an open-frame mid-tower build");
        assert_eq!(spec.shape, ["Mid-Tower", "Open-Frame"]);
    }

    #[test]
    fn test_lighting_acronym_formatting() {
        // "argb" also contains "rgb", so both match
        let spec = extract_spec("argb fans and led strips");
        assert_eq!(spec.lighting, ["ARGB lighting", "RGB lighting", "LED lighting"]);
    }

    #[test]
    fn test_no_keywords_yields_empty_spec() {
        let spec = extract_spec("completely unrelated text");
        assert!(spec.is_empty());
    }
}
