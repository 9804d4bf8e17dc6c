//! # tie-rs
//!
//! Declarative form construction with two-way data binding and validation.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient
//! access. You can depend on `tie-rs` to get everything, or depend on
//! individual crates for finer-grained control.

/// Settings, error types, and logging setup.
pub use tie_rs_core as core;

/// The form engine: descriptors, surface, binding, validation, rendering.
#[cfg(feature = "forms")]
pub use tie_rs_forms as forms;

/// Per-field change observers with cancellation handles.
#[cfg(feature = "signals")]
pub use tie_rs_signals as signals;
