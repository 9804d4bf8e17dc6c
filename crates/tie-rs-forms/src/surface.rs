//! The field surface: an in-memory model of a rendered form.
//!
//! A [`FormSurface`] is what the engine binds against and validates: an
//! ordered set of named fields, each with a kind-specific [`ControlState`]
//! holding the displayed value, plus error markers at the field and form
//! level. Host applications (or tests) simulate user edits through the
//! mutator methods and then hand the change to the form controller via
//! `notify_change`.

use std::collections::HashMap;

use crate::fields::{ChoiceOption, FieldDescriptor, FieldKind};

/// A handle to an attached file: name and size only.
///
/// File content never flows through the bound source; only the display name
/// is restored on pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    /// The file name as chosen by the user.
    pub name: String,
    /// The file size in bytes.
    pub size: u64,
}

/// Kind-specific displayed state of one field.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlState {
    /// A single text-like value (text, number, email, password, pattern,
    /// color, date, time, longtext).
    Input {
        /// The displayed value.
        value: String,
    },
    /// A checkbox.
    Checkbox {
        /// Whether the box is checked.
        checked: bool,
    },
    /// A group of radio options sharing the field name.
    RadioGroup {
        /// The available options.
        options: Vec<ChoiceOption>,
        /// The value of the checked option, if any.
        selected: Option<String>,
    },
    /// A single-choice select box.
    Select {
        /// The available options (the placeholder sentinel, if any, is the
        /// option with value `"0"` at the front).
        options: Vec<ChoiceOption>,
        /// The value of the selected option, if any.
        selected: Option<String>,
    },
    /// A multi-choice select box.
    MultiSelect {
        /// The available options.
        options: Vec<ChoiceOption>,
        /// The selected values, in selection order.
        selected: Vec<String>,
    },
    /// A rich-text editor.
    RichText {
        /// The serialized inner markup.
        markup: String,
    },
    /// A file input.
    File {
        /// The attached files.
        files: Vec<FileHandle>,
        /// The derived display name (shown in the control).
        display_name: String,
    },
    /// A button; no bindable state.
    Button,
}

/// The sentinel option value a select placeholder uses.
pub const SELECT_PLACEHOLDER_VALUE: &str = "0";

/// One rendered field on the surface.
#[derive(Debug, Clone)]
pub struct SurfaceField {
    /// The field name.
    pub name: String,
    /// The field kind.
    pub kind: FieldKind,
    /// Whether the field carries the required marker.
    pub required: bool,
    /// Custom validation pattern, if declared.
    pub pattern: Option<String>,
    /// Human-readable label.
    pub label: String,
    /// Placeholder text.
    pub placeholder: Option<String>,
    /// Extra CSS classes.
    pub css: Option<String>,
    /// Opaque rendering attributes.
    pub attributes: HashMap<String, String>,
    /// The kind-specific displayed state.
    pub control: ControlState,
    /// Whether the field currently carries an error marker.
    pub error: bool,
}

impl SurfaceField {
    /// Builds the initial surface field for a descriptor.
    pub fn from_descriptor(descriptor: &FieldDescriptor) -> Self {
        let control = match descriptor.kind {
            FieldKind::Text
            | FieldKind::Number
            | FieldKind::Email
            | FieldKind::Password
            | FieldKind::Pattern
            | FieldKind::Color
            | FieldKind::Date
            | FieldKind::Time
            | FieldKind::LongText => ControlState::Input {
                value: String::new(),
            },
            FieldKind::Checkbox => ControlState::Checkbox { checked: false },
            FieldKind::Radio => ControlState::RadioGroup {
                options: descriptor.options.clone(),
                selected: None,
            },
            FieldKind::Select => {
                let mut options = Vec::new();
                let mut selected = None;
                if let Some(placeholder) = &descriptor.placeholder {
                    options.push(ChoiceOption::new(SELECT_PLACEHOLDER_VALUE, placeholder));
                    selected = Some(SELECT_PLACEHOLDER_VALUE.to_string());
                }
                options.extend(descriptor.options.iter().cloned());
                ControlState::Select { options, selected }
            }
            FieldKind::Tags => ControlState::MultiSelect {
                options: descriptor.options.clone(),
                selected: Vec::new(),
            },
            FieldKind::Wysiwyg => ControlState::RichText {
                markup: String::new(),
            },
            FieldKind::File => ControlState::File {
                files: Vec::new(),
                display_name: String::new(),
            },
            FieldKind::Button => ControlState::Button,
        };

        Self {
            name: descriptor.name.clone(),
            kind: descriptor.kind,
            required: descriptor.required,
            pattern: descriptor.pattern.clone(),
            label: descriptor.label.clone(),
            placeholder: descriptor.placeholder.clone(),
            css: descriptor.css.clone(),
            attributes: descriptor.attributes.clone(),
            control,
            error: false,
        }
    }

    /// The field's text value as seen by type and pattern checks.
    ///
    /// Returns `None` for kinds without a meaningful text value.
    pub fn text_value(&self) -> Option<&str> {
        match &self.control {
            ControlState::Input { value } => Some(value),
            ControlState::RichText { markup } => Some(markup),
            ControlState::Select { selected, .. } | ControlState::RadioGroup { selected, .. } => {
                selected.as_deref()
            }
            ControlState::File { display_name, .. } => Some(display_name),
            ControlState::Checkbox { .. }
            | ControlState::MultiSelect { .. }
            | ControlState::Button => None,
        }
    }

    /// Whether the field counts as empty for the required check.
    ///
    /// Checkboxes are empty when unchecked, radio groups when no option is
    /// checked, selects while the placeholder sentinel is still selected,
    /// everything else when the value is empty or absent.
    pub fn is_empty_for_required(&self) -> bool {
        match &self.control {
            ControlState::Checkbox { checked } => !checked,
            ControlState::RadioGroup { selected, .. } => selected.is_none(),
            ControlState::Select { selected, .. } => selected
                .as_deref()
                .map_or(true, |v| v == SELECT_PLACEHOLDER_VALUE),
            ControlState::MultiSelect { selected, .. } => selected.is_empty(),
            ControlState::Input { value } => value.is_empty(),
            ControlState::RichText { markup } => markup.is_empty(),
            ControlState::File { files, .. } => files.is_empty(),
            ControlState::Button => false,
        }
    }
}

/// The rendered representation of a form.
#[derive(Debug, Clone, Default)]
pub struct FormSurface {
    name: Option<String>,
    fields: Vec<SurfaceField>,
    rows: Vec<Vec<String>>,
    form_error: Option<String>,
}

impl FormSurface {
    /// Creates an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty surface with a form name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// The form name, if set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Sets the form name.
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Adds a field built from a descriptor. Skips duplicates by name.
    ///
    /// Returns `true` if the field was added.
    pub fn add_field(&mut self, descriptor: &FieldDescriptor) -> bool {
        if self.contains(&descriptor.name) {
            tracing::debug!(field = %descriptor.name, "duplicate field name, skipping");
            return false;
        }
        self.fields.push(SurfaceField::from_descriptor(descriptor));
        true
    }

    /// Records a row grouping of field names for column layout.
    pub fn add_row(&mut self, names: Vec<String>) {
        self.rows.push(names);
    }

    /// The recorded row groupings.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Removes a field (and its row references) from the surface.
    ///
    /// Returns `true` if the field existed.
    pub fn remove_field(&mut self, name: &str) -> bool {
        let len_before = self.fields.len();
        self.fields.retain(|field| field.name != name);
        for row in &mut self.rows {
            row.retain(|n| n != name);
        }
        self.fields.len() < len_before
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&SurfaceField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Looks up a field by name, mutably.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut SurfaceField> {
        self.fields.iter_mut().find(|field| field.name == name)
    }

    /// Whether a field with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// All fields in registration order.
    pub fn fields(&self) -> &[SurfaceField] {
        &self.fields
    }

    /// The names of all fields, in order.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|field| field.name.clone()).collect()
    }

    // ── Markers ──────────────────────────────────────────────────────

    /// Marks a field as invalid. Returns `true` if the field exists.
    pub fn mark_field_error(&mut self, name: &str) -> bool {
        match self.field_mut(name) {
            Some(field) => {
                field.error = true;
                true
            }
            None => false,
        }
    }

    /// Sets the form-level error message.
    pub fn set_form_error(&mut self, message: impl Into<String>) {
        self.form_error = Some(message.into());
    }

    /// The current form-level error message, if any.
    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    /// Clears every field marker and the form-level message.
    pub fn clear_markers(&mut self) {
        for field in &mut self.fields {
            field.error = false;
        }
        self.form_error = None;
    }

    // ── User-driven edits ────────────────────────────────────────────
    //
    // Each mutator returns `true` if the named field exists and has a
    // control of the matching shape. Callers follow up with the form
    // controller's `notify_change` to push the edit into the bound source.

    /// Sets the displayed value of a text-like input.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.field_mut(name) {
            Some(SurfaceField {
                control: ControlState::Input { value: current },
                ..
            }) => {
                *current = value.into();
                true
            }
            _ => false,
        }
    }

    /// Checks or unchecks a checkbox.
    pub fn set_checked(&mut self, name: &str, checked: bool) -> bool {
        match self.field_mut(name) {
            Some(SurfaceField {
                control: ControlState::Checkbox { checked: current },
                ..
            }) => {
                *current = checked;
                true
            }
            _ => false,
        }
    }

    /// Selects an option of a radio group or single-select by raw value.
    ///
    /// Fails (returns `false`) if the option does not exist.
    pub fn choose(&mut self, name: &str, value: &str) -> bool {
        match self.field_mut(name) {
            Some(SurfaceField {
                control:
                    ControlState::RadioGroup { options, selected }
                    | ControlState::Select { options, selected },
                ..
            }) if options.iter().any(|option| option.value == value) => {
                *selected = Some(value.to_string());
                true
            }
            _ => false,
        }
    }

    /// Replaces the selection of a multi-select with the given values.
    ///
    /// Values without a matching option are dropped.
    pub fn set_selected(&mut self, name: &str, values: Vec<String>) -> bool {
        match self.field_mut(name) {
            Some(SurfaceField {
                control: ControlState::MultiSelect { options, selected },
                ..
            }) => {
                *selected = values
                    .into_iter()
                    .filter(|value| options.iter().any(|option| &option.value == value))
                    .collect();
                true
            }
            _ => false,
        }
    }

    /// Removes one value from a multi-select's selection.
    pub fn deselect(&mut self, name: &str, value: &str) -> bool {
        match self.field_mut(name) {
            Some(SurfaceField {
                control: ControlState::MultiSelect { selected, .. },
                ..
            }) => {
                let len_before = selected.len();
                selected.retain(|v| v != value);
                selected.len() < len_before
            }
            _ => false,
        }
    }

    /// Sets the inner markup of a rich-text field.
    pub fn set_markup(&mut self, name: &str, markup: impl Into<String>) -> bool {
        match self.field_mut(name) {
            Some(SurfaceField {
                control: ControlState::RichText { markup: current },
                ..
            }) => {
                *current = markup.into();
                true
            }
            _ => false,
        }
    }

    /// Attaches a file to a file field, updating the display name.
    pub fn attach_file(&mut self, name: &str, file: FileHandle) -> bool {
        match self.field_mut(name) {
            Some(SurfaceField {
                control:
                    ControlState::File {
                        files,
                        display_name,
                    },
                ..
            }) => {
                display_name.clone_from(&file.name);
                files.push(file);
                true
            }
            _ => false,
        }
    }
}
