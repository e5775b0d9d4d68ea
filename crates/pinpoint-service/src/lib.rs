//! Background service for Pinpoint
//!
//! The [`Router`] answers the messages the page and popup send: picker
//! toggling, annotation CRUD, counts, and prompt export.

mod message;
mod router;

pub use message::{Message, Response, EMPTY_EXPORT_ERROR, UNKNOWN_MESSAGE_ERROR};
pub use router::Router;
