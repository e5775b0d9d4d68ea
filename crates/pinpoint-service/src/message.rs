//! Wire shapes of router requests and replies

use pinpoint_core::Annotation;
use serde::{Deserialize, Serialize};

/// Error reply for an export with nothing to export
pub const EMPTY_EXPORT_ERROR: &str = "No annotations to export";

/// Error reply for a request the router cannot decode
pub const UNKNOWN_MESSAGE_ERROR: &str = "Unknown message type";

/// A request to the router
///
/// Serialized as `{"type": "SAVE_ANNOTATION", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    TogglePicker,
    /// Save to the sender's page
    SaveAnnotation(Annotation),
    GetAnnotations { url: String },
    /// Delete from the sender's page
    DeleteAnnotation { id: String },
    ClearAnnotations { url: String },
    ExportAnnotations { url: String },
    GetAnnotationCount { url: String },
}

impl Message {
    /// Name of the `type` tag
    pub fn kind(&self) -> &'static str {
        match self {
            Message::TogglePicker => "TOGGLE_PICKER",
            Message::SaveAnnotation(_) => "SAVE_ANNOTATION",
            Message::GetAnnotations { .. } => "GET_ANNOTATIONS",
            Message::DeleteAnnotation { .. } => "DELETE_ANNOTATION",
            Message::ClearAnnotations { .. } => "CLEAR_ANNOTATIONS",
            Message::ExportAnnotations { .. } => "EXPORT_ANNOTATIONS",
            Message::GetAnnotationCount { .. } => "GET_ANNOTATION_COUNT",
        }
    }
}

/// A router reply; serializes as the bare payload object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Active {
        active: bool,
    },
    Success {
        success: bool,
    },
    Annotations {
        annotations: Vec<Annotation>,
    },
    Prompt {
        prompt: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Count {
        count: usize,
    },
    Error {
        error: String,
    },
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            error: message.into(),
        }
    }

    /// Error text carried by the reply, if any
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Response::Prompt { error, .. } => error.as_deref(),
            Response::Error { error } => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_wire_format() {
        let msg: Message = serde_json::from_value(json!({"type": "TOGGLE_PICKER"})).unwrap();
        assert_eq!(msg, Message::TogglePicker);

        let msg: Message = serde_json::from_value(json!({
            "type": "GET_ANNOTATION_COUNT",
            "payload": {"url": "http://localhost:3000/"}
        }))
        .unwrap();
        assert_eq!(
            msg,
            Message::GetAnnotationCount {
                url: "http://localhost:3000/".to_string()
            }
        );
        assert_eq!(msg.kind(), "GET_ANNOTATION_COUNT");

        let value = serde_json::to_value(Message::DeleteAnnotation { id: "a1".into() }).unwrap();
        assert_eq!(value, json!({"type": "DELETE_ANNOTATION", "payload": {"id": "a1"}}));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result = serde_json::from_value::<Message>(json!({"type": "PICKER_STATE"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_response_payload_shapes() {
        assert_eq!(
            serde_json::to_value(Response::Active { active: true }).unwrap(),
            json!({"active": true})
        );
        assert_eq!(
            serde_json::to_value(Response::Prompt {
                prompt: None,
                error: Some(EMPTY_EXPORT_ERROR.to_string()),
            })
            .unwrap(),
            json!({"prompt": null, "error": "No annotations to export"})
        );
        assert_eq!(
            serde_json::to_value(Response::Prompt {
                prompt: Some("## UI Feedback".to_string()),
                error: None,
            })
            .unwrap(),
            json!({"prompt": "## UI Feedback"})
        );
        assert_eq!(
            serde_json::to_value(Response::Count { count: 3 }).unwrap(),
            json!({"count": 3})
        );
    }

    #[test]
    fn test_error_message() {
        assert_eq!(Response::error("boom").error_message(), Some("boom"));
        assert_eq!(Response::Success { success: true }.error_message(), None);
    }
}
