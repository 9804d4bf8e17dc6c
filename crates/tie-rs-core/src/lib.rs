//! # tie-rs-core
//!
//! Core types for the tie-rs form engine. This crate has no engine
//! dependencies and provides the foundation for the other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Form settings and partial-settings merging
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;

// Re-export the most commonly used types at the crate root.
pub use error::{TieError, TieResult};
pub use settings::{FormSettings, SettingsPatch};
