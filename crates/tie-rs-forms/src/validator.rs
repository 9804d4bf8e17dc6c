//! Field validation: required, kind-level, and custom-pattern checks.
//!
//! Validation is accumulating: every registered field is checked and every
//! failing field is marked, rather than stopping at the first failure. A
//! failing run sets the form-level message; a clean run leaves the surface
//! with no markers at all, since stale markers are cleared up front.

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use tie_rs_core::error::{TieError, TieResult};

use crate::registry::FieldRegistry;
use crate::surface::{FormSurface, SurfaceField};
use crate::fields::FieldKind;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("email pattern is valid")
});

/// The outcome of one validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether every checked field passed.
    pub is_valid: bool,
    /// The names of failing fields, in registration order, each at most once.
    pub invalid_fields: Vec<String>,
    /// The form-level message set on failure.
    pub form_message: Option<String>,
}

impl ValidationResult {
    fn valid() -> Self {
        Self {
            is_valid: true,
            invalid_fields: Vec::new(),
            form_message: None,
        }
    }
}

/// Runs every check over the registered fields and marks failures.
///
/// Existing markers are cleared first, so the surface always reflects only
/// the latest run. `failed_text` becomes the form-level message when at
/// least one field fails.
pub fn validate(
    surface: &mut FormSurface,
    registry: &FieldRegistry,
    failed_text: &str,
) -> ValidationResult {
    surface.clear_markers();

    let mut result = ValidationResult::valid();
    for entry in registry.entries() {
        let Some(field) = surface.field(&entry.name) else {
            continue;
        };
        if field_is_valid(field) {
            continue;
        }
        result.is_valid = false;
        result.invalid_fields.push(entry.name.clone());
    }

    for name in &result.invalid_fields {
        surface.mark_field_error(name);
    }
    if !result.is_valid {
        surface.set_form_error(failed_text);
        result.form_message = Some(failed_text.to_string());
        tracing::debug!(invalid = result.invalid_fields.len(), "validation failed");
    }
    result
}

fn field_is_valid(field: &SurfaceField) -> bool {
    if field.required && field.is_empty_for_required() {
        return false;
    }
    kind_check(field) && pattern_check(field)
}

/// Kind-level checks apply only to non-empty values; emptiness is solely
/// the required check's concern.
fn kind_check(field: &SurfaceField) -> bool {
    let Some(value) = field.text_value() else {
        return true;
    };
    if value.is_empty() {
        return true;
    }
    match field.kind {
        // f64's parser accepts "NaN" and "inf"; those are not form numbers
        FieldKind::Number => value.parse::<f64>().is_ok_and(f64::is_finite),
        FieldKind::Email => EMAIL_RE.is_match(value),
        FieldKind::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
        FieldKind::Time => {
            NaiveTime::parse_from_str(value, "%H:%M:%S").is_ok()
                || NaiveTime::parse_from_str(value, "%H:%M").is_ok()
        }
        _ => true,
    }
}

/// Compiles a custom field pattern into a regex.
pub fn compile_pattern(pattern: &str) -> TieResult<Regex> {
    Regex::new(pattern).map_err(|err| TieError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    })
}

fn pattern_check(field: &SurfaceField) -> bool {
    let Some(pattern) = &field.pattern else {
        return true;
    };
    let Some(value) = field.text_value() else {
        return true;
    };
    if value.is_empty() {
        return true;
    }
    match compile_pattern(pattern) {
        Ok(re) => re.is_match(value),
        Err(err) => {
            // an unusable pattern never fails the field
            tracing::warn!(field = %field.name, %err, "skipping pattern check");
            true
        }
    }
}
