//! # pinpoint-core
//!
//! Core types for the Pinpoint element feedback system.
//!
//! Pinpoint lets a developer pick elements on a running localhost page, attach
//! feedback notes to them, and compile those notes into a prompt for an AI
//! coding assistant.
//!
//! ## Core Paradigm
//!
//! - A capture produces an immutable [`ElementContext`] snapshot
//! - An [`Annotation`] binds one note to one context
//! - Annotations are keyed by page URL
//! - Exports become [`GeneratedPrompt`] history entries

pub mod config;
mod error;
pub mod fail_open;
mod types;

pub use config::{PinpointConfig, PromptConfig};
pub use error::{PinpointError, Result};
pub use types::*;
