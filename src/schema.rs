//! Layout requirement compiler and field validator/repairer.
//!
//! Templates declare a per-layout `fieldsSchema` mapping field names to type
//! specifier strings (`"string"`, `"string[]"`, `"boolean?"`, ...). This
//! module compiles those into a required-field map, soft-fixes near-miss
//! values, and validates slides against the result. Validation is
//! best-effort by design: slides missing required fields are dropped, slides
//! with only type mismatches are kept and reported.

use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::deck::Slide;

/// The shape classes a field specifier reduces to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimplifiedType {
    String,
    Boolean,
    Array,
    Object,
    Any,
}

/// Required fields per layout key.
pub type LayoutRequirements = HashMap<String, HashMap<String, SimplifiedType>>;

/// Reduce a raw type specifier to its simplified class.
/// Grammar: `BASE["?"]` or `BASE"[]"["?"]`; unrecognized bases are `Any`.
pub fn simplify_type(spec: &str) -> SimplifiedType {
    let mut s = spec.trim().to_lowercase();
    if let Some(stripped) = s.strip_suffix('?') {
        s = stripped.trim().to_string();
    }
    match s.as_str() {
        "string" | "str" => SimplifiedType::String,
        "boolean" | "bool" => SimplifiedType::Boolean,
        s if s.ends_with("[]") || s.starts_with('[') => SimplifiedType::Array,
        s if s.starts_with('{') && s.ends_with('}') => SimplifiedType::Object,
        _ => SimplifiedType::Any,
    }
}

/// Compile the required-field map from raw template records.
///
/// Optional fields (trailing `?`) are excluded. Malformed entries (missing
/// layout key, non-object schema, non-string specifiers) are skipped, never
/// an error.
pub fn build_layout_requirements(templates: &Value) -> LayoutRequirements {
    let mut out = LayoutRequirements::new();
    let Some(list) = templates.as_array() else {
        return out;
    };
    for template in list {
        let Some(layout_key) = template.get("layout_key").and_then(Value::as_str) else {
            continue;
        };
        let Some(schema) = template.get("fieldsSchema").and_then(Value::as_object) else {
            continue;
        };
        let mut required = HashMap::new();
        for (name, spec) in schema {
            let Some(spec) = spec.as_str() else { continue };
            if spec.trim().ends_with('?') {
                continue;
            }
            required.insert(name.clone(), simplify_type(spec));
        }
        out.insert(layout_key.to_string(), required);
    }
    out
}

/// Best-effort coercion applied before validation: a list supplied for a
/// string field becomes its first element, a bare string supplied for an
/// array field becomes a one-element sequence.
pub fn soft_fix_fields(
    layout_key: &str,
    fields: &Map<String, Value>,
    reqs: &LayoutRequirements,
) -> Map<String, Value> {
    let mut fixed = fields.clone();
    let Some(expected) = reqs.get(layout_key) else {
        return fixed;
    };
    for (name, typ) in expected {
        let Some(value) = fixed.get(name) else {
            continue;
        };
        match typ {
            SimplifiedType::String => {
                if let Some(first) = value.as_array().and_then(|a| a.first()) {
                    let replacement = match first {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    fixed.insert(name.clone(), Value::String(replacement));
                }
            }
            SimplifiedType::Array => {
                if value.is_string() {
                    fixed.insert(name.clone(), Value::Array(vec![value.clone()]));
                }
            }
            _ => {}
        }
    }
    fixed
}

/// Check required fields against their simplified types. Returns one message
/// per problem; an empty vec means the slide is clean.
pub fn validate_fields(
    layout_key: &str,
    fields: &Map<String, Value>,
    reqs: &LayoutRequirements,
) -> Vec<String> {
    let mut errors = Vec::new();
    let Some(expected) = reqs.get(layout_key) else {
        return errors;
    };
    let mut names: Vec<&String> = expected.keys().collect();
    names.sort();
    for name in names {
        let typ = expected[name];
        let Some(value) = fields.get(name) else {
            errors.push(format!("missing field '{}'", name));
            continue;
        };
        match typ {
            SimplifiedType::String => {
                if !value.is_string() {
                    errors.push(format!("field '{}' must be string", name));
                }
            }
            SimplifiedType::Array => {
                let all_strings = value
                    .as_array()
                    .map(|a| a.iter().all(Value::is_string))
                    .unwrap_or(false);
                // A bare string is tolerated as a deferred-coercion case.
                if !all_strings && !value.is_string() {
                    errors.push(format!("field '{}' must be array of strings", name));
                }
            }
            SimplifiedType::Boolean => {
                if !value.is_boolean() {
                    errors.push(format!("field '{}' must be boolean", name));
                }
            }
            // Object/Any: accepted without deep inspection.
            SimplifiedType::Object | SimplifiedType::Any => {}
        }
    }
    errors
}

/// Validate a slide sequence against templates.
///
/// Slides that still miss a required field after soft-fix are dropped;
/// slides with only type mismatches are kept. Returns the surviving slides
/// and the accumulated diagnostics.
pub fn validate_deck(slides: &[Slide], templates: &Value) -> (Vec<Slide>, Vec<String>) {
    let reqs = build_layout_requirements(templates);
    let mut valid = Vec::new();
    let mut diagnostics = Vec::new();
    for (idx, slide) in slides.iter().enumerate() {
        let fixed = soft_fix_fields(&slide.layout_key, &slide.fields, &reqs);
        let errors = validate_fields(&slide.layout_key, &fixed, &reqs);
        if !errors.is_empty() {
            diagnostics.push(format!("slide[{}]: {}", idx, errors.join("; ")));
            if errors.iter().any(|e| e.starts_with("missing field")) {
                continue;
            }
        }
        valid.push(Slide::new(slide.layout_key.clone(), fixed));
    }
    (valid, diagnostics)
}
