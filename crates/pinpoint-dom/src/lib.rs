//! DOM model for Pinpoint
//!
//! Pinpoint's capture algorithms run against this crate instead of a live
//! browser. A [`Document`] is an arena of nodes that also carries the data a
//! browser host would compute for each element: its bounding box, resolved
//! style values, running animations, and framework component metadata.
//!
//! # Architecture
//!
//! - [`document`]: Arena tree, attribute/class access, host-provided element data
//! - [`selector`]: CSS selector parsing and matching (`querySelector` semantics)
//! - [`escape`]: `CSS.escape` for identifiers
//! - [`snapshot`]: JSON page snapshots that hydrate into a [`Document`]
//!
//! # Example
//!
//! ```
//! use pinpoint_core::Viewport;
//! use pinpoint_dom::Document;
//!
//! let mut doc = Document::with_body(Viewport::new(1280.0, 720.0));
//! let body = doc.body().unwrap();
//! let button = doc.create_element(body, "button");
//! doc.set_attr(button, "id", "save").unwrap();
//!
//! assert_eq!(doc.query_selector("#save").unwrap(), Some(button));
//! ```

pub mod document;
pub mod escape;
pub mod selector;
pub mod snapshot;

pub use document::{AnimationDuration, Document, ElementData, HostAnimation, NodeId};
pub use escape::css_escape;
pub use selector::{parse_selector_list, SelectorList};
pub use snapshot::{PageSnapshot, SnapshotElement, SnapshotNode};
