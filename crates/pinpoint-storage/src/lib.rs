//! Storage for Pinpoint
//!
//! Everything Pinpoint persists lives in one [`StorageData`] document:
//! annotations keyed by page URL, the bounded prompt history, and the picker
//! flag. The store is either in memory or a single JSON file.
//!
//! [`StorageData`]: pinpoint_core::StorageData

mod history;
mod store;

pub use store::{AnnotationStore, StorageMode};
