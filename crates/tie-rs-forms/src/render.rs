//! HTML rendering of the form surface.
//!
//! Rendering is a pure function over the surface and settings: the output
//! string reflects current values, selections, and error markers, so hosts
//! re-render after any change they care about. Markup follows the
//! Bootstrap-style `form-group` / `control-label` / `form-control`
//! conventions, with `has-error has-feedback` on failing groups.

use std::collections::HashMap;

use tie_rs_core::settings::FormSettings;

use crate::fields::{ChoiceOption, FieldKind};
use crate::surface::{ControlState, FormSurface, SurfaceField};

/// Formats an HTML attributes map into a string like ` key="value" key2="value2"`.
fn render_attrs(attrs: &HashMap<String, String>) -> String {
    if attrs.is_empty() {
        return String::new();
    }
    let mut parts: Vec<String> = attrs
        .iter()
        .map(|(k, v)| format!(r#" {k}="{v}""#))
        .collect();
    parts.sort(); // deterministic output for testing
    parts.join("")
}

fn control_classes(field: &SurfaceField) -> String {
    match &field.css {
        Some(extra) => format!("form-control {extra}"),
        None => "form-control".to_string(),
    }
}

fn input_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Number => "number",
        FieldKind::Email => "email",
        FieldKind::Password => "password",
        FieldKind::Color => "color",
        FieldKind::Date => "date",
        FieldKind::Time => "time",
        _ => "text",
    }
}

fn render_option(option: &ChoiceOption, selected: bool) -> String {
    let marker = if selected { " selected" } else { "" };
    match &option.data_type {
        Some(tag) => format!(
            r#"<option value="{}" data-type="{tag}"{marker}>{}</option>"#,
            option.value, option.label
        ),
        None => format!(
            r#"<option value="{}"{marker}>{}</option>"#,
            option.value, option.label
        ),
    }
}

fn render_control(field: &SurfaceField) -> String {
    let name = &field.name;
    let classes = control_classes(field);
    let attrs = render_attrs(&field.attributes);
    let placeholder = field
        .placeholder
        .as_ref()
        .map(|p| format!(r#" placeholder="{p}""#))
        .unwrap_or_default();

    match &field.control {
        ControlState::Input { value } => {
            if field.kind == FieldKind::LongText {
                format!(
                    r#"<textarea name="{name}" class="{classes}"{placeholder}{attrs}>{value}</textarea>"#
                )
            } else {
                format!(
                    r#"<input type="{}" name="{name}" value="{value}" class="{classes}"{placeholder}{attrs} />"#,
                    input_type(field.kind)
                )
            }
        }
        ControlState::Checkbox { checked } => {
            let marker = if *checked { " checked" } else { "" };
            format!(r#"<input type="checkbox" name="{name}" value="1"{marker}{attrs} />"#)
        }
        ControlState::RadioGroup { options, selected } => {
            let items: Vec<String> = options
                .iter()
                .map(|option| {
                    let marker = if selected.as_deref() == Some(option.value.as_str()) {
                        " checked"
                    } else {
                        ""
                    };
                    format!(
                        r#"<label class="radio-inline"><input type="radio" name="{name}" value="{}"{marker}{attrs} /> {}</label>"#,
                        option.value, option.label
                    )
                })
                .collect();
            items.join("\n")
        }
        ControlState::Select { options, selected } => {
            let items: Vec<String> = options
                .iter()
                .map(|option| {
                    render_option(option, selected.as_deref() == Some(option.value.as_str()))
                })
                .collect();
            format!(
                r#"<select name="{name}" class="{classes}"{attrs}>{}</select>"#,
                items.join("")
            )
        }
        ControlState::MultiSelect { options, selected } => {
            let items: Vec<String> = options
                .iter()
                .map(|option| render_option(option, selected.contains(&option.value)))
                .collect();
            format!(
                r#"<select name="{name}" class="{classes}" multiple{attrs}>{}</select>"#,
                items.join("")
            )
        }
        ControlState::RichText { markup } => format!(
            r#"<div data-name="{name}" class="{classes} rich-text" contenteditable="true"{attrs}>{markup}</div>"#
        ),
        ControlState::File { display_name, .. } => format!(
            r#"<input type="file" name="{name}"{attrs} /><span class="file-name">{display_name}</span>"#
        ),
        ControlState::Button => {
            format!(r#"<button type="button" name="{name}" class="btn"{attrs}>{}</button>"#, field.label)
        }
    }
}

/// Renders one field as a labeled form group.
pub fn render_field(field: &SurfaceField, settings: &FormSettings) -> String {
    let group_classes = if field.error {
        "form-group has-error has-feedback"
    } else {
        "form-group"
    };
    let asterisk = if field.required && settings.show_required_asterisk {
        r#" <span class="required-sign">*</span>"#
    } else {
        ""
    };
    if field.kind == FieldKind::Button {
        return format!(
            "<div class=\"{group_classes}\">{}</div>",
            render_control(field)
        );
    }
    format!(
        "<div class=\"{group_classes}\"><label class=\"control-label\">{}{asterisk}</label>{}</div>",
        field.label,
        render_control(field)
    )
}

/// Renders the full form: legend, form-level error, rows, remaining fields.
pub fn render_form(surface: &FormSurface, settings: &FormSettings) -> String {
    let mut out = String::new();
    match surface.name() {
        Some(name) => out.push_str(&format!("<form name=\"{name}\" novalidate>\n")),
        None => out.push_str("<form novalidate>\n"),
    }

    let any_required = surface.fields().iter().any(|field| field.required);
    if settings.show_required_asterisk && any_required {
        out.push_str(&format!(
            "<p class=\"required-legend\">{}</p>\n",
            settings.required_text
        ));
    }

    if let Some(message) = surface.form_error() {
        out.push_str(&format!(
            "<div class=\"alert alert-danger\">{message}</div>\n"
        ));
    }

    let mut rendered: Vec<&str> = Vec::new();
    for row in surface.rows() {
        out.push_str("<div class=\"row\">\n");
        for name in row {
            if let Some(field) = surface.field(name) {
                out.push_str(&format!(
                    "<div class=\"col\">{}</div>\n",
                    render_field(field, settings)
                ));
                rendered.push(name.as_str());
            }
        }
        out.push_str("</div>\n");
    }

    for field in surface.fields() {
        if rendered.contains(&field.name.as_str()) {
            continue;
        }
        out.push_str(&render_field(field, settings));
        out.push('\n');
    }

    out.push_str("</form>");
    out
}
