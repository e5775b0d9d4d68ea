//! Fail-open utilities for graceful degradation
//!
//! Context capture must never abort because an optional sub-step failed. Those
//! sub-steps run through these helpers, which log the failure and substitute a
//! neutral value.
//!
//! DO NOT use fail-open for:
//! - Storage reads and writes (state)
//! - Selector synthesis (the record is useless without it)

use tracing::warn;

use crate::Result;

/// Run an optional operation, logging and discarding any error
///
/// # Usage
///
/// ```
/// use pinpoint_core::fail_open::fail_open;
/// use pinpoint_core::{PinpointError, Result};
///
/// fn discover_name() -> Result<Option<String>> {
///     Err(PinpointError::Other("metadata missing".to_string()))
/// }
///
/// let name = fail_open("component_label", discover_name);
/// assert_eq!(name, None);
/// ```
pub fn fail_open<F, T>(operation_name: &str, f: F) -> Option<T>
where
    F: FnOnce() -> Result<T>,
{
    match f() {
        Ok(val) => Some(val),
        Err(e) => {
            warn!("{} failed (fail-open): {}", operation_name, e);
            None
        }
    }
}

/// Like fail_open but falls back to `T::default()`
pub fn fail_open_or_default<F, T>(operation_name: &str, f: F) -> T
where
    F: FnOnce() -> Result<T>,
    T: Default,
{
    fail_open(operation_name, f).unwrap_or_default()
}
