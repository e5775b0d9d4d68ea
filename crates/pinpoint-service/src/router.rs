//! Message dispatch

use pinpoint_core::{PromptConfig, Result};
use pinpoint_prompt::generate_prompt;
use pinpoint_storage::AnnotationStore;
use tracing::{debug, info, warn};

use crate::message::{Message, Response, EMPTY_EXPORT_ERROR, UNKNOWN_MESSAGE_ERROR};

/// Routes [`Message`]s to storage and the prompt generator
pub struct Router {
    store: AnnotationStore,
    prompt: PromptConfig,
}

impl Router {
    pub fn new(store: AnnotationStore, prompt: PromptConfig) -> Self {
        Self { store, prompt }
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    /// Answer `message`; `sender_url` is the page the sender is on
    ///
    /// Storage failures are reported as an error reply rather than returned.
    pub async fn handle(&self, message: Message, sender_url: &str) -> Response {
        let kind = message.kind();
        debug!("Handling {} from {:?}", kind, sender_url);

        match self.dispatch(message, sender_url).await {
            Ok(response) => response,
            Err(e) => {
                warn!("{} failed: {}", kind, e);
                Response::error(e.to_string())
            }
        }
    }

    /// Decode a JSON request and answer it as JSON
    pub async fn handle_json(&self, raw: &str, sender_url: &str) -> serde_json::Value {
        let response = match serde_json::from_str::<Message>(raw) {
            Ok(message) => self.handle(message, sender_url).await,
            Err(e) => {
                debug!("Undecodable message: {}", e);
                Response::error(UNKNOWN_MESSAGE_ERROR)
            }
        };
        serde_json::to_value(&response)
            .unwrap_or_else(|_| serde_json::json!({ "error": UNKNOWN_MESSAGE_ERROR }))
    }

    async fn dispatch(&self, message: Message, sender_url: &str) -> Result<Response> {
        let response = match message {
            Message::TogglePicker => {
                let active = self.store.toggle_picker().await?;
                info!("Picker {}", if active { "activated" } else { "deactivated" });
                Response::Active { active }
            }
            Message::SaveAnnotation(annotation) => {
                self.store.save_annotation(sender_url, annotation).await?;
                Response::Success { success: true }
            }
            Message::GetAnnotations { url } => Response::Annotations {
                annotations: self.store.get_annotations(&url).await?,
            },
            Message::DeleteAnnotation { id } => Response::Success {
                success: self.store.delete_annotation(sender_url, &id).await?,
            },
            Message::ClearAnnotations { url } => {
                self.store.clear_annotations(&url).await?;
                Response::Success { success: true }
            }
            Message::ExportAnnotations { url } => self.export(&url).await?,
            Message::GetAnnotationCount { url } => Response::Count {
                count: self.store.annotation_count(&url).await?,
            },
        };
        Ok(response)
    }

    async fn export(&self, url: &str) -> Result<Response> {
        let annotations = self.store.get_annotations(url).await?;
        if annotations.is_empty() {
            return Ok(Response::Prompt {
                prompt: None,
                error: Some(EMPTY_EXPORT_ERROR.to_string()),
            });
        }

        let generated = generate_prompt(&annotations, url, &self.prompt);
        let prompt = generated.prompt.clone();
        self.store.save_to_history(generated).await?;
        info!("Exported {} annotations for {}", annotations.len(), url);

        Ok(Response::Prompt {
            prompt: Some(prompt),
            error: None,
        })
    }
}
