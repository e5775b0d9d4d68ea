//! Bounded prompt history, newest first

use pinpoint_core::{GeneratedPrompt, Result};
use tracing::debug;

use crate::store::AnnotationStore;

impl AnnotationStore {
    /// Prepend `entry`, evicting the oldest entries beyond capacity
    pub async fn save_to_history(&self, entry: GeneratedPrompt) -> Result<()> {
        let capacity = self.history_capacity;
        let id = entry.id.clone();
        let evicted = self
            .update(|data| {
                data.history.insert(0, entry);
                let evicted = data.history.len().saturating_sub(capacity);
                data.history.truncate(capacity);
                evicted
            })
            .await?;
        debug!("Saved prompt {} to history (evicted {})", id, evicted);
        Ok(())
    }

    pub async fn history(&self) -> Result<Vec<GeneratedPrompt>> {
        self.read(|data| data.history.clone()).await
    }

    /// History entries generated for `url`, newest first
    pub async fn history_by_url(&self, url: &str) -> Result<Vec<GeneratedPrompt>> {
        self.read(|data| {
            data.history
                .iter()
                .filter(|entry| entry.url == url)
                .cloned()
                .collect()
        })
        .await
    }

    pub async fn clear_history(&self) -> Result<()> {
        self.update(|data| data.history.clear()).await
    }

    /// Remove one entry, returning whether it existed
    pub async fn delete_history_entry(&self, id: &str) -> Result<bool> {
        self.update(|data| {
            let before = data.history.len();
            data.history.retain(|entry| entry.id != id);
            data.history.len() != before
        })
        .await
    }
}
