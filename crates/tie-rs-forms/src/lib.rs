//! # tie-rs-forms
//!
//! The form engine: declarative field descriptors, a bindable form surface,
//! two-way synchronization against a JSON source, validation, and HTML
//! rendering.
//!
//! ## Usage
//!
//! ```
//! use std::sync::{Arc, RwLock};
//!
//! use serde_json::json;
//! use tie_rs_core::settings::FormSettings;
//! use tie_rs_forms::controller::TieForm;
//! use tie_rs_forms::fields::{FieldDescriptor, FieldKind};
//!
//! let mut form = TieForm::new(FormSettings::default());
//! form.add_fields(vec![
//!     FieldDescriptor::new("name", FieldKind::Text).required(true),
//!     FieldDescriptor::new("email", FieldKind::Email),
//! ]);
//!
//! let source = Arc::new(RwLock::new(json!({"name": "Ada", "email": ""})));
//! form.bind_source(&source);
//! form.add_bindings(&[("name", "name"), ("email", "email")]);
//!
//! // the pull filled the field from the source
//! assert_eq!(form.surface().field("name").unwrap().text_value(), Some("Ada"));
//!
//! // a user edit pushed through notify_change lands in the source
//! form.surface_mut().set_value("email", "ada@example.com");
//! form.notify_change("email");
//! assert_eq!(source.read().unwrap()["email"], "ada@example.com");
//! ```

pub mod binder;
pub mod controller;
pub mod fields;
pub mod loader;
pub mod path;
pub mod registry;
pub mod render;
pub mod surface;
pub mod validator;

pub use binder::{BindOutcome, Binder, FieldChange};
pub use controller::{SubmitCallback, SubmitOutcome, TieForm};
pub use fields::{ChoiceOption, FieldDescriptor, FieldKind};
pub use loader::{apply_options, load_select_options, OptionsLoader, RemoteConfig};
pub use path::PropertyPath;
pub use registry::{FieldRegistry, RegistryEntry};
pub use surface::{ControlState, FileHandle, FormSurface, SurfaceField};
pub use validator::{validate, ValidationResult};
