//! Field descriptors: the declarative input to form construction.
//!
//! A [`FieldDescriptor`] describes one field of a form: its name, kind,
//! validation markers, and rendering metadata. Descriptors are immutable once
//! added to a form; the mutable, displayed state lives in the
//! [`surface`](crate::surface) module.
//!
//! [`FieldKind`] is a closed enum so that every kind-specific code path
//! (push/pull conversion, required-emptiness, rendering) is checked for
//! exhaustiveness at compile time when a new kind is added.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use tie_rs_core::error::{TieError, TieResult};

/// The kind of a form field.
///
/// Kinds control the field's control state, its push/pull conversion, and
/// its type-level validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// A plain text input.
    Text,
    /// A numeric input; non-empty values must be numeric.
    Number,
    /// An email input; non-empty values must match the email pattern.
    Email,
    /// A password input.
    Password,
    /// A text input validated against the field's custom pattern.
    Pattern,
    /// A checkbox; binds to `1`/`0`.
    Checkbox,
    /// A group of radio options sharing the field name.
    Radio,
    /// A single-choice select box.
    Select,
    /// A multi-choice select box (tag picker).
    Tags,
    /// A color picker backed by a text input.
    Color,
    /// A date picker backed by a text input (ISO `YYYY-MM-DD`).
    Date,
    /// A time picker backed by a text input (`HH:MM` or `HH:MM:SS`).
    Time,
    /// A multi-line text area.
    #[serde(rename = "longtext")]
    LongText,
    /// A rich-text editor; binds to serialized inner markup.
    Wysiwyg,
    /// A file input; only the display name round-trips through the source.
    File,
    /// A plain button; carries no bindable state.
    Button,
}

/// One choice of a select, tag, or radio field.
///
/// The optional `data_type` tag supports binding sources whose stored value
/// is not the option's raw value (e.g. a non-string key rendered as a string).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// The option's raw value.
    pub value: String,
    /// The human-readable label.
    pub label: String,
    /// Optional type tag matched against the bound value.
    #[serde(default)]
    pub data_type: Option<String>,
}

impl ChoiceOption {
    /// Creates an option with a raw value and label.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            data_type: None,
        }
    }

    /// Sets the `data_type` tag.
    #[must_use]
    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }
}

/// Complete definition of a form field.
///
/// Built with the `new` constructor plus chained builder methods, mirroring
/// how a host application declares fields:
///
/// ```
/// use tie_rs_forms::fields::{FieldDescriptor, FieldKind};
///
/// let field = FieldDescriptor::new("email", FieldKind::Email)
///     .label("Email Address")
///     .required(true)
///     .placeholder("you@example.com");
/// assert!(field.required);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// The field name, unique within a form.
    pub name: String,
    /// The field kind.
    pub kind: FieldKind,
    /// Human-readable label.
    #[serde(default)]
    pub label: String,
    /// Whether this field carries the required marker.
    #[serde(default)]
    pub required: bool,
    /// Optional custom validation pattern (a regular expression).
    #[serde(default)]
    pub pattern: Option<String>,
    /// Placeholder text; for selects this becomes the sentinel option.
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Additional CSS classes for rendering.
    #[serde(default)]
    pub css: Option<String>,
    /// Opaque extra attributes carried through to rendering.
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    /// Choices for select, tag, and radio kinds.
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
    /// URL to load select options from (see [`crate::loader`]).
    #[serde(default)]
    pub options_url: Option<String>,
    /// Display format hint (date/time kinds).
    #[serde(default)]
    pub format: Option<String>,
}

impl FieldDescriptor {
    /// Creates a descriptor with the given name and kind.
    ///
    /// The label defaults to the name with underscores replaced by spaces.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        let label = name.replace('_', " ");
        Self {
            name,
            kind,
            label,
            required: false,
            pattern: None,
            placeholder: None,
            css: None,
            attributes: HashMap::new(),
            options: Vec::new(),
            options_url: None,
            format: None,
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the required marker.
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the custom validation pattern.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Sets the placeholder text.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Sets extra CSS classes.
    #[must_use]
    pub fn css(mut self, css: impl Into<String>) -> Self {
        self.css = Some(css.into());
        self
    }

    /// Adds one opaque rendering attribute.
    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Sets the choice options.
    #[must_use]
    pub fn options(mut self, options: Vec<ChoiceOption>) -> Self {
        self.options = options;
        self
    }

    /// Sets the URL select options are loaded from.
    #[must_use]
    pub fn options_url(mut self, url: impl Into<String>) -> Self {
        self.options_url = Some(url.into());
        self
    }

    /// Sets the display format hint.
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Parses a descriptor from its JSON representation.
    pub fn from_json_str(json_str: &str) -> TieResult<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| TieError::Serialization(format!("failed to parse field descriptor: {e}")))
    }

    /// Parses a list of descriptors from a JSON array.
    pub fn list_from_json_str(json_str: &str) -> TieResult<Vec<Self>> {
        serde_json::from_str(json_str)
            .map_err(|e| TieError::Serialization(format!("failed to parse field list: {e}")))
    }
}
