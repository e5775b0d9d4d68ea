//! Selector synthesis and element context capture for Pinpoint
//!
//! This crate holds the algorithms that run when a user picks an element:
//! building a selector that re-identifies it, and snapshotting everything a
//! prompt needs to describe it after the element is gone.
//!
//! # Features
//!
//! - **Selector Synthesis**: id fast path, class paths, `:nth-of-type()` tie-breaks
//! - **Context Capture**: geometry, filtered styles, animations, data attributes
//! - **Label Resolution**: pluggable framework resolvers with a utility-class aware fallback
//! - **Picking Support**: hover highlight, click capture, session-owned animation pausing
//!
//! # Example
//!
//! ```
//! use pinpoint_core::{Rect, Viewport};
//! use pinpoint_dom::Document;
//! use pinpoint_capture::{capture_element_context, validate};
//!
//! let mut doc = Document::with_body(Viewport::new(1000.0, 500.0));
//! let body = doc.body().unwrap();
//! let button = doc.create_element(body, "button");
//! doc.set_attr(button, "id", "save-btn").unwrap();
//! doc.set_rect(button, Rect::new(50.0, 100.0, 80.0, 30.0)).unwrap();
//!
//! let context = capture_element_context(&doc, button).unwrap();
//! assert_eq!(context.selector, "#save-btn");
//! assert_eq!(context.component_label.as_deref(), Some("button#save-btn"));
//! assert!(validate(&doc, &context.selector, button));
//! ```
//!
//! # Architecture
//!
//! - [`selector`]: Selector synthesis and validation
//! - [`context`]: Context capture
//! - [`label`]: Component label resolvers and utility-class heuristics
//! - [`animation`]: Session-owned animation pause control
//! - [`picker`]: Hover/click/cancel state for one picking session
//! - [`error`]: Error types for capture operations

pub mod animation;
pub mod context;
pub mod error;
pub mod label;
pub mod picker;
pub mod selector;

// Re-export commonly used types
pub use animation::AnimationController;
pub use context::{capture_element_context, ContextCapturer, RELEVANT_STYLES};
pub use error::{CaptureError, Result};
pub use label::{
    is_utility_class, simplified_label, FrameworkLabelResolver, LabelResolver, NoopLabelResolver,
};
pub use picker::{normalize_note, PickerSession};
pub use selector::{synthesize, truncate_selector, validate};
