//! Structured prompt composition
//!
//! Turns a design spec into the natural-language prompt handed to the image
//! backend. The template walks categories in a fixed order and joins the
//! chosen values of each with "and".

use crate::spec::DesignSpec;

/// Negative prompt applied to every generation request
pub const DEFAULT_NEGATIVE_PROMPT: &str =
    "text, logo, watermark, signature, blurry, lowres, noisy, grainy";

/// Compose a generation prompt from a design spec
///
/// An empty spec still yields a usable prompt ("A high-resolution render of
/// a PC case.").
pub fn structured_prompt(spec: &DesignSpec) -> String {
    let mut parts = vec!["A high-resolution render of".to_string()];

    let shape_desc = if spec.shape.is_empty() {
        "a PC case".to_string()
    } else {
        format!("a {} PC case", spec.shape.join(" and "))
    };

    if spec.style.is_empty() {
        parts.push(shape_desc);
    } else {
        parts.push(format!(
            "{} with a {} aesthetic",
            shape_desc,
            spec.style.join(" and ")
        ));
    }

    if !spec.color.is_empty() {
        parts.push(format!("in {}", spec.color.join(" and ")));
    }
    if !spec.material.is_empty() {
        parts.push(format!("made of {}", spec.material.join(" and ")));
    }
    if !spec.ventilation.is_empty() {
        parts.push(format!("featuring {}", spec.ventilation.join(" and ")));
    }
    if !spec.lighting.is_empty() {
        parts.push(format!("illuminated by {}", spec.lighting.join(" and ")));
    }
    if !spec.features.is_empty() {
        parts.push(format!("including {}", spec.features.join(" and ")));
    }
    if !spec.environment.is_empty() {
        parts.push(format!("set in {}", spec.environment.join(" and ")));
    }

    format!("{}.", parts.join("; "))
}
