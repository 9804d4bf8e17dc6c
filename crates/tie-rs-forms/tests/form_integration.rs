//! Integration tests for the full form lifecycle: declare fields, bind a
//! source, edit, validate, submit, and render.

use std::sync::{Arc, RwLock};

use serde_json::{json, Value};

use tie_rs_core::settings::{FormSettings, SettingsPatch};
use tie_rs_forms::controller::{SubmitOutcome, TieForm};
use tie_rs_forms::fields::{ChoiceOption, FieldDescriptor, FieldKind};
use tie_rs_forms::loader::{apply_options, load_select_options, OptionsLoader, RemoteConfig};
use tie_rs_forms::surface::{ControlState, FileHandle};

use async_trait::async_trait;
use tie_rs_core::error::TieResult;

// ============================================================================
// Shared helpers
// ============================================================================

/// A profile form covering most field kinds.
fn make_profile_form() -> TieForm {
    let mut form = TieForm::new(FormSettings::default());
    form.add_fields(vec![
        FieldDescriptor::new("name", FieldKind::Text).required(true),
        FieldDescriptor::new("email", FieldKind::Email).required(true),
        FieldDescriptor::new("age", FieldKind::Number),
        FieldDescriptor::new("newsletter", FieldKind::Checkbox),
        FieldDescriptor::new("plan", FieldKind::Select)
            .placeholder("Choose a plan")
            .options(vec![
                ChoiceOption::new("free", "Free"),
                ChoiceOption::new("pro", "Pro"),
            ]),
        FieldDescriptor::new("interests", FieldKind::Tags).options(vec![
            ChoiceOption::new("rust", "Rust"),
            ChoiceOption::new("forms", "Forms"),
            ChoiceOption::new("web", "Web"),
        ]),
        FieldDescriptor::new("bio", FieldKind::Wysiwyg),
        FieldDescriptor::new("save", FieldKind::Button),
    ]);
    form
}

fn profile_source() -> Arc<RwLock<Value>> {
    Arc::new(RwLock::new(json!({
        "name": "Ada",
        "email": "ada@example.com",
        "age": 36,
        "newsletter": 1,
        "plan": "pro",
        "interests": ["rust", "web"],
        "bio": "<p>pioneer</p>",
        "address": {"city": "London"}
    })))
}

fn bind_profile(form: &mut TieForm, source: &Arc<RwLock<Value>>) {
    form.bind_source(source);
    form.add_bindings(&[
        ("name", "name"),
        ("email", "email"),
        ("age", "age"),
        ("newsletter", "newsletter"),
        ("plan", "plan"),
        ("interests", "interests"),
        ("bio", "bio"),
    ]);
}

// ============================================================================
// Binding lifecycle
// ============================================================================

#[test]
fn binding_pulls_every_kind_from_the_source() {
    let mut form = make_profile_form();
    let source = profile_source();
    bind_profile(&mut form, &source);

    let surface = form.surface();
    assert_eq!(surface.field("name").unwrap().text_value(), Some("Ada"));
    assert_eq!(surface.field("age").unwrap().text_value(), Some("36"));
    assert_eq!(
        surface.field("newsletter").unwrap().control,
        ControlState::Checkbox { checked: true }
    );
    assert_eq!(surface.field("plan").unwrap().text_value(), Some("pro"));
    let ControlState::MultiSelect { selected, .. } =
        &surface.field("interests").unwrap().control
    else {
        panic!("expected multi-select");
    };
    assert_eq!(selected, &vec!["rust".to_string(), "web".to_string()]);
    assert_eq!(
        surface.field("bio").unwrap().text_value(),
        Some("<p>pioneer</p>")
    );
}

#[test]
fn edits_push_back_into_the_source() {
    let mut form = make_profile_form();
    let source = profile_source();
    bind_profile(&mut form, &source);

    form.surface_mut().set_value("name", "Grace");
    form.notify_change("name");
    form.surface_mut().set_checked("newsletter", false);
    form.notify_change("newsletter");
    form.surface_mut().choose("plan", "free");
    form.notify_change("plan");
    form.surface_mut()
        .set_selected("interests", vec!["forms".into()]);
    form.notify_change("interests");

    let data = source.read().unwrap();
    assert_eq!(data["name"], "Grace");
    assert_eq!(data["newsletter"], 0);
    assert_eq!(data["plan"], "free");
    assert_eq!(data["interests"], json!(["forms"]));
}

#[test]
fn dotted_binding_follows_nested_objects() {
    let mut form = TieForm::new(FormSettings::default());
    form.add_fields(vec![FieldDescriptor::new("city", FieldKind::Text)]);
    let source = profile_source();
    form.bind_source(&source);
    form.add_bindings(&[("city", "address.city")]);

    assert_eq!(form.surface().field("city").unwrap().text_value(), Some("London"));

    form.surface_mut().set_value("city", "Cambridge");
    form.notify_change("city");
    assert_eq!(source.read().unwrap()["address"]["city"], "Cambridge");
}

#[test]
fn unresolvable_binding_does_not_block_later_ones() {
    let mut form = TieForm::new(FormSettings::default());
    form.add_fields(vec![
        FieldDescriptor::new("bad", FieldKind::Text),
        FieldDescriptor::new("good", FieldKind::Text),
    ]);
    let source = Arc::new(RwLock::new(json!({"good": "yes"})));
    form.bind_source(&source);
    form.add_bindings(&[("bad", "missing.deep.path"), ("good", "good")]);

    assert_eq!(form.surface().field("good").unwrap().text_value(), Some("yes"));
    assert_eq!(form.surface().field("bad").unwrap().text_value(), Some(""));
}

#[test]
fn reload_reflects_external_source_changes() {
    let mut form = make_profile_form();
    let source = profile_source();
    bind_profile(&mut form, &source);

    {
        let mut data = source.write().unwrap();
        data["name"] = json!("Grace");
        data["plan"] = json!("free");
    }
    form.reload();

    assert_eq!(form.surface().field("name").unwrap().text_value(), Some("Grace"));
    assert_eq!(form.surface().field("plan").unwrap().text_value(), Some("free"));
}

#[test]
fn file_field_roundtrips_display_name_only() {
    let mut form = TieForm::new(FormSettings::default());
    form.add_fields(vec![FieldDescriptor::new("upload", FieldKind::File)]);
    let source = Arc::new(RwLock::new(json!({"upload": ""})));
    form.bind_source(&source);
    form.add_bindings(&[("upload", "upload")]);

    form.surface_mut().attach_file(
        "upload",
        FileHandle {
            name: "cv.pdf".into(),
            size: 4096,
        },
    );
    form.notify_change("upload");

    let pushed = source.read().unwrap()["upload"].clone();
    assert_eq!(pushed["display_name"], "cv.pdf");
    assert_eq!(pushed["files"][0]["name"], "cv.pdf");

    form.reload();
    let ControlState::File {
        files,
        display_name,
    } = &form.surface().field("upload").unwrap().control
    else {
        panic!("expected file control");
    };
    assert_eq!(display_name, "cv.pdf");
    assert!(files.is_empty());
}

// ============================================================================
// Validation and submission
// ============================================================================

#[test]
fn submit_accumulates_all_failures() {
    let mut form = make_profile_form();
    form.surface_mut().set_value("email", "not-an-email");
    form.surface_mut().set_value("age", "old");

    match form.submit() {
        SubmitOutcome::Invalid(result) => {
            assert_eq!(result.invalid_fields, vec!["name", "email", "age"]);
        }
        other => panic!("expected invalid, got {other:?}"),
    }
    assert!(form.surface().field("name").unwrap().error);
    assert!(form.surface().field("email").unwrap().error);
    assert!(form.surface().form_error().is_some());
}

#[test]
fn fixing_fields_clears_markers_on_resubmit() {
    let mut form = make_profile_form();
    assert!(matches!(form.submit(), SubmitOutcome::Invalid(_)));

    form.surface_mut().set_value("name", "Ada");
    form.surface_mut().set_value("email", "ada@example.com");
    assert_eq!(form.submit(), SubmitOutcome::Submitted);
    assert!(!form.surface().field("name").unwrap().error);
    assert!(form.surface().form_error().is_none());
}

#[test]
fn submit_callback_sees_validated_values() {
    let mut form = make_profile_form();
    form.surface_mut().set_value("name", "Ada");
    form.surface_mut().set_value("email", "ada@example.com");

    let captured = Arc::new(RwLock::new(Vec::new()));
    let sink = Arc::clone(&captured);
    form.on_submit(Arc::new(move |surface| {
        sink.write().unwrap().extend(
            surface
                .fields()
                .iter()
                .filter_map(|field| field.text_value().map(str::to_string)),
        );
    }));

    assert_eq!(form.submit(), SubmitOutcome::Submitted);
    assert!(captured.read().unwrap().contains(&"Ada".to_string()));
}

#[test]
fn server_side_errors_mark_fields_after_submit() {
    let mut form = make_profile_form();
    form.surface_mut().set_value("name", "Ada");
    form.surface_mut().set_value("email", "taken@example.com");
    assert_eq!(form.submit(), SubmitOutcome::Submitted);

    form.mark_field_error(&["email"], Some("This address is already registered"));
    assert!(form.surface().field("email").unwrap().error);
    assert_eq!(
        form.surface().form_error(),
        Some("This address is already registered")
    );
}

#[test]
fn external_markers_are_replaced_by_the_next_validation_pass() {
    let mut form = make_profile_form();
    form.surface_mut().set_value("name", "Ada");

    // two external marking rounds with different field sets
    form.mark_field_error(&["name"], Some("taken"));
    form.mark_field_error(&["age", "bio"], Some("rejected upstream"));
    assert!(form.surface().field("name").unwrap().error);
    assert!(form.surface().field("age").unwrap().error);
    assert!(form.surface().field("bio").unwrap().error);

    // the next validation pass owns the markers outright
    match form.submit() {
        SubmitOutcome::Invalid(result) => {
            assert_eq!(result.invalid_fields, vec!["email"]);
        }
        other => panic!("expected invalid, got {other:?}"),
    }
    assert!(form.surface().field("email").unwrap().error);
    assert!(!form.surface().field("name").unwrap().error);
    assert!(!form.surface().field("age").unwrap().error);
    assert!(!form.surface().field("bio").unwrap().error);
    assert_eq!(
        form.surface().form_error(),
        Some(form.settings().global_validation_failed_text.as_str())
    );
}

#[test]
fn update_settings_toggles_validation_and_reloads() {
    let mut form = make_profile_form();
    let source = profile_source();
    bind_profile(&mut form, &source);

    form.surface_mut().set_value("email", "broken");
    form.update_settings(SettingsPatch::new().validation_enabled(false));

    // reload restored the bound value, and validation is off either way
    assert_eq!(
        form.surface().field("email").unwrap().text_value(),
        Some("ada@example.com")
    );
    assert_eq!(form.submit(), SubmitOutcome::Submitted);
}

// ============================================================================
// Remote options
// ============================================================================

struct CatalogLoader;

#[async_trait]
impl OptionsLoader for CatalogLoader {
    async fn load_options(&self, url: &str) -> TieResult<Vec<ChoiceOption>> {
        assert_eq!(url, "/api/plans");
        Ok(vec![
            ChoiceOption::new("team", "Team"),
            ChoiceOption::new("enterprise", "Enterprise"),
        ])
    }
}

#[tokio::test]
async fn remote_options_land_on_the_select() {
    let mut form = make_profile_form();
    let options = load_select_options(&CatalogLoader, RemoteConfig::default(), "/api/plans")
        .await
        .unwrap();
    assert!(apply_options(form.surface_mut(), "plan", options));

    let ControlState::Select { options, .. } = &form.surface().field("plan").unwrap().control
    else {
        panic!("expected select");
    };
    let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(values, vec!["0", "free", "pro", "team", "enterprise"]);
}

#[tokio::test]
async fn remote_options_for_removed_field_are_dropped() {
    let mut form = make_profile_form();
    let options = load_select_options(&CatalogLoader, RemoteConfig::default(), "/api/plans")
        .await
        .unwrap();
    form.surface_mut().remove_field("plan");
    assert!(!apply_options(form.surface_mut(), "plan", options));
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn render_reflects_state_and_markers() {
    let mut form = make_profile_form();
    let source = profile_source();
    bind_profile(&mut form, &source);

    let html = form.render();
    assert!(html.contains(r#"value="Ada""#));
    assert!(html.contains("required-legend"));
    assert!(!html.contains("has-error"));

    form.surface_mut().set_value("email", "broken");
    assert!(matches!(form.submit(), SubmitOutcome::Invalid(_)));
    let html = form.render();
    assert!(html.contains("has-error has-feedback"));
    assert!(html.contains("alert alert-danger"));
}

#[test]
fn columns_render_as_rows() {
    let mut form = TieForm::new(FormSettings::default());
    form.add_columns(vec![
        vec![
            FieldDescriptor::new("first", FieldKind::Text),
            FieldDescriptor::new("last", FieldKind::Text),
        ],
        vec![FieldDescriptor::new("email", FieldKind::Email)],
    ]);
    let html = form.render();
    assert_eq!(html.matches(r#"<div class="row">"#).count(), 2);
    assert_eq!(html.matches(r#"name="first""#).count(), 1);
}
