//! Logging for the form engine.
//!
//! The engine reports everything it skips or rejects (unknown field names,
//! unresolvable bindings, failed remote loads, in-flight submits) as
//! [`tracing`] events; without a subscriber those events go nowhere, which is
//! the right default for a library. Hosts that want them call
//! [`setup_logging`] once with their settings. [`form_span`] ties engine
//! events to a form instance and is entered by the form controller around
//! submission.

use crate::settings::FormSettings;

/// Installs a global tracing subscriber described by `settings`.
///
/// `log_level` seeds the filter and accepts any `RUST_LOG`-style directive
/// ("debug", "warn", "tie_rs_forms=trace", ...); an unparsable directive
/// falls back to "info". With `debug` set the output is a compact
/// human-readable format; otherwise one JSON object per event. An earlier
/// subscriber wins, so several forms in one process can all call this.
pub fn setup_logging(settings: &FormSettings) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::Subscriber::builder().with_env_filter(filter);

    if settings.debug {
        builder.compact().with_ansi(true).try_init().ok();
    } else {
        builder.json().with_ansi(false).try_init().ok();
    }
}

/// A span attributing engine events to one form instance.
pub fn form_span(form_name: &str) -> tracing::Span {
    tracing::info_span!("form", name = form_name)
}
