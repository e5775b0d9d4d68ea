//! Capture error types - re-exports unified PinpointError from pinpoint-core
//!
//! Capture itself never fails on optional data. Errors only surface for
//! precondition violations such as passing a text node or an unknown node id:
//! - NotAnElement(String) - the node is not an element
//! - NodeNotFound(String) - the node id does not exist in the document

pub use pinpoint_core::{PinpointError, Result};

pub type CaptureError = PinpointError;
