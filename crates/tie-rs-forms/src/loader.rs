//! Remote select options: loading with timeout/retry and late application.
//!
//! The transport itself is abstracted behind [`OptionsLoader`] so hosts plug
//! in whatever HTTP client they already run; the engine only owns the timeout
//! and retry policy around it. Loaded options are applied to the surface by
//! name, which doubles as the cancellation point: if the field was removed
//! while the request was in flight, [`apply_options`] simply reports `false`.

use std::time::Duration;

use async_trait::async_trait;

use tie_rs_core::error::{TieError, TieResult};

use crate::fields::ChoiceOption;
use crate::surface::{ControlState, FormSurface};

/// Timeout and retry policy for remote option loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Number of retries after the first attempt.
    pub retries: u32,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            retries: 0,
        }
    }
}

/// Transport abstraction for fetching select options from a URL.
#[async_trait]
pub trait OptionsLoader: Send + Sync {
    /// Fetches the options list behind `url`.
    async fn load_options(&self, url: &str) -> TieResult<Vec<ChoiceOption>>;
}

/// Loads options through `loader` under the configured timeout and retries.
///
/// A timed-out or failed attempt is retried up to `config.retries` times;
/// the last error is returned when every attempt fails.
pub async fn load_select_options(
    loader: &dyn OptionsLoader,
    config: RemoteConfig,
    url: &str,
) -> TieResult<Vec<ChoiceOption>> {
    let attempts = config.retries.saturating_add(1);
    let mut last_err = None;
    for attempt in 1..=attempts {
        match tokio::time::timeout(config.timeout, loader.load_options(url)).await {
            Ok(Ok(options)) => {
                tracing::debug!(url, count = options.len(), "loaded remote options");
                return Ok(options);
            }
            Ok(Err(err)) => {
                tracing::warn!(url, attempt, %err, "remote options load failed");
                last_err = Some(err);
            }
            Err(_) => {
                tracing::warn!(url, attempt, timeout = ?config.timeout, "remote options load timed out");
                last_err = Some(TieError::RemoteLoad(format!(
                    "timed out after {:?} loading {url}",
                    config.timeout
                )));
            }
        }
    }
    Err(last_err
        .unwrap_or_else(|| TieError::RemoteLoad(format!("no attempts made loading {url}"))))
}

/// Applies loaded options to a select or tag field by name.
///
/// Returns `false` if the field is gone or is not a choice control, which is
/// how a load that outlived its field gets discarded.
pub fn apply_options(surface: &mut FormSurface, name: &str, options: Vec<ChoiceOption>) -> bool {
    let Some(field) = surface.field_mut(name) else {
        tracing::debug!(field = name, "options arrived for a removed field, discarding");
        return false;
    };
    match &mut field.control {
        ControlState::Select {
            options: existing, ..
        }
        | ControlState::MultiSelect {
            options: existing, ..
        } => {
            existing.extend(options);
            true
        }
        _ => {
            tracing::debug!(field = name, "options arrived for a non-choice field, discarding");
            false
        }
    }
}
