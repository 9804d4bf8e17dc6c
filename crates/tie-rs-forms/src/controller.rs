//! The form controller: the public entry point tying descriptors, bindings,
//! validation, and submission together.
//!
//! A [`TieForm`] owns the surface, registry, and binder, but never the bound
//! source: it keeps a `Weak` reference, so dropping the source on the host
//! side cleanly disables synchronization without further coordination.

use std::sync::{Arc, RwLock, Weak};

use serde_json::Value;

use tie_rs_core::settings::{FormSettings, SettingsPatch};

use crate::binder::Binder;
use crate::fields::{FieldDescriptor, FieldKind};
use crate::registry::FieldRegistry;
use crate::render;
use crate::surface::FormSurface;
use crate::validator::{self, ValidationResult};

/// Callback invoked with the validated surface when a submit goes through.
pub type SubmitCallback = Arc<dyn Fn(&FormSurface) + Send + Sync>;

/// The outcome of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation passed (or was disabled) and the callback ran.
    Submitted,
    /// Validation failed; the surface carries the markers.
    Invalid(ValidationResult),
    /// A previous submit is still running; this attempt was rejected.
    AlreadyInFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmitState {
    Idle,
    Validating,
    Submitting,
}

/// A declarative form with two-way binding and validation.
pub struct TieForm {
    settings: FormSettings,
    surface: FormSurface,
    registry: FieldRegistry,
    binder: Binder,
    source: Weak<RwLock<Value>>,
    on_submit: Option<SubmitCallback>,
    state: SubmitState,
}

impl TieForm {
    /// Creates an empty form configured by `settings`.
    pub fn new(settings: FormSettings) -> Self {
        let surface = match &settings.form_name {
            Some(name) => FormSurface::with_name(name),
            None => FormSurface::new(),
        };
        Self {
            settings,
            surface,
            registry: FieldRegistry::new(),
            binder: Binder::new(),
            source: Weak::new(),
            on_submit: None,
            state: SubmitState::Idle,
        }
    }

    /// Adopts an existing surface, registering its current fields.
    ///
    /// This is the capture path: fields already present on the surface become
    /// known to the form without re-declaring descriptors.
    pub fn from_surface(settings: FormSettings, surface: FormSurface) -> Self {
        let mut form = Self::new(settings);
        form.surface = surface;
        form.capture_fields();
        form
    }

    /// Attaches the bound source. Existing bindings are not re-applied;
    /// follow up with [`add_bindings`](Self::add_bindings) or
    /// [`reload`](Self::reload).
    pub fn bind_source(&mut self, source: &Arc<RwLock<Value>>) {
        self.source = Arc::downgrade(source);
    }

    /// Sets the submit callback.
    pub fn on_submit(&mut self, callback: SubmitCallback) {
        self.on_submit = Some(callback);
    }

    /// Adds fields to the surface, one per row. Returns `self` for chaining.
    ///
    /// Buttons are rendered but never registered for binding or validation.
    pub fn add_fields(&mut self, descriptors: Vec<FieldDescriptor>) -> &mut Self {
        for descriptor in descriptors {
            if self.surface.add_field(&descriptor) && descriptor.kind != FieldKind::Button {
                self.registry.register(descriptor.name);
            }
        }
        self
    }

    /// Adds fields grouped into rows for column layout. Returns `self` for
    /// chaining.
    pub fn add_columns(&mut self, rows: Vec<Vec<FieldDescriptor>>) -> &mut Self {
        for row in rows {
            let names: Vec<String> = row
                .iter()
                .map(|descriptor| descriptor.name.clone())
                .collect();
            self.add_fields(row);
            self.surface.add_row(names);
        }
        self
    }

    /// Registers every field currently on the surface.
    pub fn capture_fields(&mut self) {
        for name in self.surface.field_names() {
            let is_button = self
                .surface
                .field(&name)
                .is_some_and(|field| field.kind == FieldKind::Button);
            if !is_button {
                self.registry.register(name);
            }
        }
    }

    /// Declares bindings as `(field name, property path)` pairs and applies
    /// them against the bound source.
    ///
    /// Unknown field names and unresolvable paths are logged and skipped so
    /// one bad pair never blocks the rest.
    pub fn add_bindings(&mut self, bindings: &[(&str, &str)]) {
        for (name, path) in bindings {
            if !self.registry.contains(name) {
                tracing::debug!(field = *name, "binding for unknown field, skipping");
                continue;
            }
            self.registry.set_binding(name, *path);
        }
        let Some(source) = self.source.upgrade() else {
            tracing::debug!("no bound source, bindings recorded but not applied");
            return;
        };
        for (name, path) in bindings {
            if self.registry.binding(name) != Some(*path) {
                continue;
            }
            if let Err(err) = self.binder.bind_field(&mut self.surface, &source, name, path) {
                tracing::warn!(field = *name, %err, "binding skipped");
            }
        }
    }

    /// Merges a settings patch and re-applies every binding.
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.settings.merge(patch);
        self.surface.set_name(self.settings.form_name.clone());
        self.reload();
    }

    /// Clears markers and re-pulls every bound field from the source.
    pub fn reload(&mut self) {
        self.surface.clear_markers();
        let Some(source) = self.source.upgrade() else {
            tracing::debug!("no bound source, reload is a no-op");
            return;
        };
        self.binder
            .reload(&mut self.surface, &source, &self.registry);
    }

    /// Marks the named fields as invalid and sets a form-level message.
    ///
    /// `message` defaults to the configured validation-failed text. Used for
    /// server-side errors reported after a submit.
    pub fn mark_field_error(&mut self, names: &[&str], message: Option<&str>) {
        for name in names {
            if !self.surface.mark_field_error(name) {
                tracing::debug!(field = *name, "error marker for unknown field, skipping");
            }
        }
        let message = message.unwrap_or(&self.settings.global_validation_failed_text);
        self.surface.set_form_error(message);
    }

    /// Sets only the form-level error message.
    ///
    /// `message` defaults to the configured validation-failed text.
    pub fn mark_form_error(&mut self, message: Option<&str>) {
        let message = message.unwrap_or(&self.settings.global_validation_failed_text);
        self.surface.set_form_error(message);
    }

    /// Turns validation back on.
    pub fn enable_validation(&mut self) {
        self.settings.validation_enabled = true;
    }

    /// Turns validation off and clears any current markers.
    pub fn disable_validation(&mut self) {
        self.settings.validation_enabled = false;
        self.surface.clear_markers();
    }

    /// Attempts a submit: validate, then run the callback.
    ///
    /// Reentrant calls (e.g. from within the callback) are rejected with
    /// [`SubmitOutcome::AlreadyInFlight`] rather than recursing.
    pub fn submit(&mut self) -> SubmitOutcome {
        let span = tie_rs_core::logging::form_span(self.surface.name().unwrap_or("anonymous"));
        let _guard = span.enter();

        if self.state != SubmitState::Idle {
            tracing::debug!("submit already in flight, rejecting");
            return SubmitOutcome::AlreadyInFlight;
        }

        if self.settings.validation_enabled {
            self.state = SubmitState::Validating;
            let result = validator::validate(
                &mut self.surface,
                &self.registry,
                &self.settings.global_validation_failed_text,
            );
            if !result.is_valid {
                self.state = SubmitState::Idle;
                return SubmitOutcome::Invalid(result);
            }
        }

        self.state = SubmitState::Submitting;
        if let Some(callback) = &self.on_submit {
            callback(&self.surface);
        }
        self.state = SubmitState::Idle;
        SubmitOutcome::Submitted
    }

    /// Handles a user-driven change to the named field: pushes the new value
    /// into the bound source. Returns the number of observers notified.
    pub fn notify_change(&mut self, name: &str) -> usize {
        self.binder.dispatch_change(&self.surface, name)
    }

    /// Renders the form as HTML.
    pub fn render(&self) -> String {
        render::render_form(&self.surface, &self.settings)
    }

    /// The form's surface.
    pub fn surface(&self) -> &FormSurface {
        &self.surface
    }

    /// The form's surface, mutably. Edits made here are local until
    /// [`notify_change`](Self::notify_change) pushes them.
    pub fn surface_mut(&mut self) -> &mut FormSurface {
        &mut self.surface
    }

    /// The current settings.
    pub fn settings(&self) -> &FormSettings {
        &self.settings
    }

    /// The field registry.
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }
}
