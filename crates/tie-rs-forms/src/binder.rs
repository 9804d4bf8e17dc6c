//! The binder: keeps the field surface and the bound source synchronized.
//!
//! Binding a field performs an immediate *pull* (source value into the
//! field's displayed state) and attaches a per-field *push* observer that
//! writes the field's value back on every user-driven change event. Both
//! directions use the kind-specific conversion table implemented in
//! [`pull_into`] and [`push_value`].
//!
//! One observer exists per bound field; re-binding disconnects the previous
//! registration first, so `reload` never accumulates handlers. Observers
//! capture only a `Weak` reference to the source: if the caller has dropped
//! it, a push is silently skipped.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};

use serde_json::{json, Value};

use tie_rs_core::error::TieResult;
use tie_rs_signals::{ChangeHub, ObserverHandle};

use crate::fields::FieldKind;
use crate::path::PropertyPath;
use crate::registry::FieldRegistry;
use crate::surface::{ControlState, FormSurface, SurfaceField};

/// The payload dispatched through the change hub when a field changes.
#[derive(Debug, Clone)]
pub struct FieldChange {
    /// The name of the field that changed.
    pub field: String,
    /// The field's value after the change, already push-converted.
    pub value: Value,
}

/// The outcome of a `bind_field` call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// The field was pulled and its push observer attached.
    Bound,
    /// The field does not exist in the surface; nothing happened.
    MissingField,
    /// The resolved source property is undefined; nothing happened.
    UndefinedProperty,
}

/// Attaches change observers and applies pull/push synchronization.
pub struct Binder {
    hub: ChangeHub<FieldChange>,
    attached: HashMap<String, ObserverHandle>,
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

impl Binder {
    /// Creates a binder with no attached observers.
    pub fn new() -> Self {
        Self {
            hub: ChangeHub::new(),
            attached: HashMap::new(),
        }
    }

    /// Binds one field to a property path on the source.
    ///
    /// No-ops (with a distinguishing [`BindOutcome`]) when the field is
    /// absent from the surface or the resolved property is undefined. Only
    /// a path whose prefix fails to resolve returns an error, and that error
    /// is meant to be logged and skipped so one bad binding does not block
    /// the others.
    pub fn bind_field(
        &mut self,
        surface: &mut FormSurface,
        source: &Arc<RwLock<Value>>,
        field_name: &str,
        property_path: &str,
    ) -> TieResult<BindOutcome> {
        if !surface.contains(field_name) {
            return Ok(BindOutcome::MissingField);
        }

        let path = PropertyPath::parse(property_path);
        let current = {
            let guard = source.read().expect("binding source lock poisoned");
            match path.lookup(&guard)? {
                Some(value) => value.clone(),
                None => return Ok(BindOutcome::UndefinedProperty),
            }
        };

        let kind = match surface.field_mut(field_name) {
            Some(field) => {
                pull_into(field, &current);
                field.kind
            }
            None => return Ok(BindOutcome::MissingField),
        };

        self.attach_observer(field_name, Arc::downgrade(source), path);

        // a rich-text pull re-triggers the synchronization back into the source
        if kind == FieldKind::Wysiwyg {
            self.dispatch_change(surface, field_name);
        }

        Ok(BindOutcome::Bound)
    }

    fn attach_observer(&mut self, field_name: &str, source: Weak<RwLock<Value>>, path: PropertyPath) {
        if let Some(handle) = self.attached.remove(field_name) {
            self.hub.disconnect(handle);
        }

        let observed_path = path.to_string();
        let handle = self.hub.connect(
            field_name,
            Arc::new(move |change: &FieldChange| {
                let Some(source) = source.upgrade() else {
                    tracing::debug!(field = %change.field, "binding source dropped, skipping push");
                    return;
                };
                let mut guard = source.write().expect("binding source lock poisoned");
                if let Err(err) = path.set(&mut guard, change.value.clone()) {
                    tracing::warn!(
                        field = %change.field,
                        path = %observed_path,
                        %err,
                        "push failed to resolve property path"
                    );
                }
            }),
        );
        self.attached.insert(field_name.to_string(), handle);
    }

    /// Handles a user-driven change event: pushes the field's current value
    /// through its observer, if one is attached.
    ///
    /// Returns the number of observers invoked (0 for unbound fields and
    /// kinds with nothing to push).
    pub fn dispatch_change(&self, surface: &FormSurface, field_name: &str) -> usize {
        let Some(field) = surface.field(field_name) else {
            return 0;
        };
        let Some(value) = push_value(field) else {
            return 0;
        };
        self.hub.notify(
            field_name,
            &FieldChange {
                field: field_name.to_string(),
                value,
            },
        )
    }

    /// Cancels the observer for one field. Returns `true` if one existed.
    pub fn detach(&mut self, field_name: &str) -> bool {
        match self.attached.remove(field_name) {
            Some(handle) => self.hub.disconnect(handle),
            None => false,
        }
    }

    /// Cancels every attached observer.
    pub fn detach_all(&mut self) {
        for (_, handle) in self.attached.drain() {
            self.hub.disconnect(handle);
        }
    }

    /// Whether a push observer is attached for the field.
    pub fn is_attached(&self, field_name: &str) -> bool {
        self.attached.contains_key(field_name)
    }

    /// Re-binds every registered entry against its current binding.
    ///
    /// Used after settings changes. Entries without a binding are skipped;
    /// resolution failures are logged and do not block the remaining entries.
    pub fn reload(
        &mut self,
        surface: &mut FormSurface,
        source: &Arc<RwLock<Value>>,
        registry: &FieldRegistry,
    ) {
        for entry in registry.entries() {
            if entry.binding.is_empty() {
                continue;
            }
            match self.bind_field(surface, source, &entry.name, &entry.binding) {
                Ok(outcome) => {
                    tracing::debug!(field = %entry.name, ?outcome, "rebound field");
                }
                Err(err) => {
                    tracing::warn!(field = %entry.name, %err, "rebind skipped");
                }
            }
        }
    }
}

/// JSON truthiness, as the checkbox pull conversion sees it.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Renders a JSON value as a displayed input string.
fn to_display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Pull conversion: copies a bound source value into the field's displayed
/// state (source → field direction of the conversion table).
pub(crate) fn pull_into(field: &mut SurfaceField, value: &Value) {
    match &mut field.control {
        ControlState::Checkbox { checked } => {
            *checked = is_truthy(value);
        }
        ControlState::RadioGroup { options, selected } => {
            let stored = to_display(value);
            *selected = options
                .iter()
                .find(|option| option.value == stored)
                .map(|option| option.value.clone());
        }
        ControlState::Select { options, selected } => {
            let stored = to_display(value);
            // raw option value match wins; the data-type tag is a fallback
            let matched = options
                .iter()
                .find(|option| option.value == stored)
                .or_else(|| {
                    options
                        .iter()
                        .find(|option| option.data_type.as_deref() == Some(stored.as_str()))
                });
            if let Some(option) = matched {
                *selected = Some(option.value.clone());
            }
        }
        ControlState::MultiSelect { options, selected } => {
            let stored: Vec<String> = match value {
                Value::Array(items) => items.iter().map(to_display).collect(),
                other => vec![to_display(other)],
            };
            *selected = stored
                .into_iter()
                .filter(|item| options.iter().any(|option| &option.value == item))
                .collect();
        }
        ControlState::RichText { markup } => {
            *markup = to_display(value);
        }
        ControlState::File { display_name, .. } => {
            // only the display name is restored; content never comes back
            *display_name = match value {
                Value::Object(map) => map
                    .get("display_name")
                    .or_else(|| map.get("name"))
                    .map(to_display)
                    .unwrap_or_default(),
                other => to_display(other),
            };
        }
        ControlState::Input { value: current } => {
            *current = to_display(value);
        }
        ControlState::Button => {}
    }
}

/// Push conversion: the field's current displayed state as a source value
/// (field → source direction of the conversion table).
///
/// Returns `None` when there is nothing to push (unchecked radio group,
/// unselected select, button).
pub(crate) fn push_value(field: &SurfaceField) -> Option<Value> {
    match &field.control {
        ControlState::Checkbox { checked } => Some(json!(i32::from(*checked))),
        ControlState::RadioGroup { selected, .. } => {
            selected.clone().map(Value::String)
        }
        ControlState::Select { options, selected } => {
            let selected = selected.as_deref()?;
            let option = options.iter().find(|option| option.value == selected)?;
            // a data-type tag represents a non-string key and takes precedence
            Some(Value::String(
                option
                    .data_type
                    .clone()
                    .unwrap_or_else(|| option.value.clone()),
            ))
        }
        ControlState::MultiSelect { selected, .. } => Some(Value::Array(
            selected.iter().cloned().map(Value::String).collect(),
        )),
        ControlState::RichText { markup } => Some(Value::String(markup.clone())),
        ControlState::File {
            files,
            display_name,
        } => Some(json!({
            "display_name": display_name,
            "files": files
                .iter()
                .map(|file| json!({"name": file.name, "size": file.size}))
                .collect::<Vec<_>>(),
        })),
        ControlState::Input { value } => Some(Value::String(value.clone())),
        ControlState::Button => None,
    }
}
