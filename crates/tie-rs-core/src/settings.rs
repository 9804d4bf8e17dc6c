//! Form settings and partial-settings merging.
//!
//! [`FormSettings`] holds the declarative configuration recognized by a form
//! instance. A [`SettingsPatch`] is the partial mirror used by
//! `update_settings`: only the fields present in the patch override the
//! current values, everything else is left alone.
//!
//! Settings can also be loaded from TOML (see [`FormSettings::from_toml_str`]),
//! so a host application can keep form texts and toggles in a config file.

use serde::{Deserialize, Serialize};

use crate::error::TieError;

/// The complete set of form settings, with sensible defaults.
///
/// The binding source and the submit callback are *not* part of the settings:
/// neither is serializable, and both are wired on the form instance itself.
///
/// # Examples
///
/// ```
/// use tie_rs_core::settings::FormSettings;
///
/// let settings = FormSettings::default();
/// assert!(settings.show_required_asterisk);
/// assert!(settings.validation_enabled);
/// assert!(settings.form_name.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSettings {
    /// Whether required fields are rendered with an asterisk marker.
    pub show_required_asterisk: bool,
    /// The legend text explaining the asterisk marker.
    pub required_text: String,
    /// Optional `name` attribute for the rendered form element.
    pub form_name: Option<String>,
    /// Whether `submit()` runs the validation pass at all.
    pub validation_enabled: bool,
    /// The form-level message shown when validation fails.
    pub global_validation_failed_text: String,
    /// Log level used by [`crate::logging::setup_logging`].
    pub log_level: String,
    /// Whether logging uses the pretty human-readable format.
    pub debug: bool,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            show_required_asterisk: true,
            required_text: "Fields marked with * are required".to_string(),
            form_name: None,
            validation_enabled: true,
            global_validation_failed_text: "Please fix the errors highlighted in the form"
                .to_string(),
            log_level: "info".to_string(),
            debug: false,
        }
    }
}

impl FormSettings {
    /// Applies a partial settings patch, overriding only the fields present.
    pub fn merge(&mut self, patch: SettingsPatch) {
        if let Some(v) = patch.show_required_asterisk {
            self.show_required_asterisk = v;
        }
        if let Some(v) = patch.required_text {
            self.required_text = v;
        }
        if let Some(v) = patch.form_name {
            self.form_name = v;
        }
        if let Some(v) = patch.validation_enabled {
            self.validation_enabled = v;
        }
        if let Some(v) = patch.global_validation_failed_text {
            self.global_validation_failed_text = v;
        }
        if let Some(v) = patch.log_level {
            self.log_level = v;
        }
        if let Some(v) = patch.debug {
            self.debug = v;
        }
    }

    /// Loads settings from a TOML string. Fields not present keep defaults.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, TieError> {
        toml::from_str(toml_str)
            .map_err(|e| TieError::Configuration(format!("failed to parse TOML settings: {e}")))
    }

    /// Loads settings from a TOML file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, TieError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }
}

/// A partial mirror of [`FormSettings`] used for merging.
///
/// `form_name` is doubly optional: `Some(None)` clears an existing form name,
/// `None` leaves it untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    /// Override for [`FormSettings::show_required_asterisk`].
    pub show_required_asterisk: Option<bool>,
    /// Override for [`FormSettings::required_text`].
    pub required_text: Option<String>,
    /// Override for [`FormSettings::form_name`].
    pub form_name: Option<Option<String>>,
    /// Override for [`FormSettings::validation_enabled`].
    pub validation_enabled: Option<bool>,
    /// Override for [`FormSettings::global_validation_failed_text`].
    pub global_validation_failed_text: Option<String>,
    /// Override for [`FormSettings::log_level`].
    pub log_level: Option<String>,
    /// Override for [`FormSettings::debug`].
    pub debug: Option<bool>,
}

impl SettingsPatch {
    /// Creates an empty patch that overrides nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the form name override.
    #[must_use]
    pub fn form_name(mut self, name: impl Into<String>) -> Self {
        self.form_name = Some(Some(name.into()));
        self
    }

    /// Sets the validation toggle override.
    #[must_use]
    pub const fn validation_enabled(mut self, enabled: bool) -> Self {
        self.validation_enabled = Some(enabled);
        self
    }

    /// Sets the required-asterisk override.
    #[must_use]
    pub const fn show_required_asterisk(mut self, show: bool) -> Self {
        self.show_required_asterisk = Some(show);
        self
    }

    /// Sets the form-level failure text override.
    #[must_use]
    pub fn global_validation_failed_text(mut self, text: impl Into<String>) -> Self {
        self.global_validation_failed_text = Some(text.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = FormSettings::default();
        assert!(settings.show_required_asterisk);
        assert!(settings.validation_enabled);
        assert!(settings.form_name.is_none());
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_merge_overrides_present_fields_only() {
        let mut settings = FormSettings::default();
        let patch = SettingsPatch::new()
            .form_name("contact")
            .validation_enabled(false);
        settings.merge(patch);

        assert_eq!(settings.form_name.as_deref(), Some("contact"));
        assert!(!settings.validation_enabled);
        // untouched fields keep their defaults
        assert!(settings.show_required_asterisk);
        assert_eq!(
            settings.global_validation_failed_text,
            "Please fix the errors highlighted in the form"
        );
    }

    #[test]
    fn test_merge_can_clear_form_name() {
        let mut settings = FormSettings::default();
        settings.form_name = Some("old".into());

        let patch = SettingsPatch {
            form_name: Some(None),
            ..SettingsPatch::default()
        };
        settings.merge(patch);
        assert!(settings.form_name.is_none());
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let mut settings = FormSettings::default();
        settings.required_text = "custom".into();
        settings.merge(SettingsPatch::new());
        assert_eq!(settings.required_text, "custom");
    }

    #[test]
    fn test_from_toml_str() {
        let settings = FormSettings::from_toml_str(
            r#"
            show_required_asterisk = false
            form_name = "signup"
            global_validation_failed_text = "Nope"
            "#,
        )
        .unwrap();
        assert!(!settings.show_required_asterisk);
        assert_eq!(settings.form_name.as_deref(), Some("signup"));
        assert_eq!(settings.global_validation_failed_text, "Nope");
        // absent fields fall back to defaults
        assert!(settings.validation_enabled);
    }

    #[test]
    fn test_from_toml_str_malformed() {
        let result = FormSettings::from_toml_str("not [ valid toml");
        assert!(matches!(result, Err(TieError::Configuration(_))));
    }

    #[test]
    fn test_patch_roundtrips_through_json() {
        let patch = SettingsPatch::new().form_name("f").validation_enabled(true);
        let json = serde_json::to_string(&patch).unwrap();
        let back: SettingsPatch = serde_json::from_str(&json).unwrap();
        assert_eq!(back.form_name, Some(Some("f".to_string())));
        assert_eq!(back.validation_enabled, Some(true));
    }
}
