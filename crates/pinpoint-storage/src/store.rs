//! Annotation store

use pinpoint_core::{Annotation, PinpointConfig, PinpointError, Result, StorageData};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

/// Where the store keeps its data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageMode {
    /// Held in process memory only
    InMemory,
    /// One JSON document on disk
    File(PathBuf),
}

/// Async key-value store for annotations, history, and picker state
///
/// Every mutation is a read-modify-write of the whole document, serialized by
/// an internal lock.
pub struct AnnotationStore {
    mode: StorageMode,
    pub(crate) history_capacity: usize,
    // Holds the data itself for InMemory; only serves as the lock for File.
    memory: Mutex<StorageData>,
}

impl AnnotationStore {
    pub fn new(mode: StorageMode, history_capacity: usize) -> Self {
        Self {
            mode,
            history_capacity,
            memory: Mutex::new(StorageData::default()),
        }
    }

    /// Create in-memory storage
    pub fn in_memory() -> Self {
        Self::new(StorageMode::InMemory, PinpointConfig::default().history_capacity)
    }

    /// Create file-backed storage
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(
            StorageMode::File(path.into()),
            PinpointConfig::default().history_capacity,
        )
    }

    /// Create file-backed storage laid out by `config` under `data_root`
    pub fn from_config(config: &PinpointConfig, data_root: &Path) -> Self {
        Self::new(
            StorageMode::File(config.storage_path(data_root)),
            config.history_capacity,
        )
    }

    pub fn mode(&self) -> &StorageMode {
        &self.mode
    }

    /// Snapshot of everything stored
    pub async fn load_all(&self) -> Result<StorageData> {
        self.read(|data| data.clone()).await
    }

    pub(crate) async fn read<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&StorageData) -> T,
    {
        let guard = self.memory.lock().await;
        match &self.mode {
            StorageMode::InMemory => Ok(f(&guard)),
            StorageMode::File(path) => {
                let data = load_file(path).await?;
                Ok(f(&data))
            }
        }
    }

    /// Apply `f` to the stored data and persist the result
    pub(crate) async fn update<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut StorageData) -> T,
    {
        let mut guard = self.memory.lock().await;
        match &self.mode {
            StorageMode::InMemory => Ok(f(&mut guard)),
            StorageMode::File(path) => {
                let mut data = load_file(path).await?;
                let out = f(&mut data);
                save_file(path, &data).await?;
                Ok(out)
            }
        }
    }

    /// Annotations for a page, in save order
    pub async fn get_annotations(&self, url: &str) -> Result<Vec<Annotation>> {
        self.read(|data| data.annotations.get(url).cloned().unwrap_or_default())
            .await
    }

    pub async fn save_annotation(&self, url: &str, annotation: Annotation) -> Result<()> {
        let id = annotation.id.clone();
        self.update(|data| {
            data.annotations
                .entry(url.to_string())
                .or_default()
                .push(annotation);
        })
        .await?;
        debug!("Saved annotation {} for {}", id, url);
        Ok(())
    }

    /// Delete one annotation, returning whether it existed
    pub async fn delete_annotation(&self, url: &str, annotation_id: &str) -> Result<bool> {
        let removed = self
            .update(|data| {
                let Some(annotations) = data.annotations.get_mut(url) else {
                    return false;
                };
                let before = annotations.len();
                annotations.retain(|a| a.id != annotation_id);
                annotations.len() != before
            })
            .await?;
        debug!("Delete annotation {} for {}: removed={}", annotation_id, url, removed);
        Ok(removed)
    }

    /// Drop every annotation for a page
    pub async fn clear_annotations(&self, url: &str) -> Result<()> {
        self.update(|data| {
            data.annotations.remove(url);
        })
        .await?;
        debug!("Cleared annotations for {}", url);
        Ok(())
    }

    pub async fn annotation_count(&self, url: &str) -> Result<usize> {
        self.read(|data| data.annotations.get(url).map(Vec::len).unwrap_or(0))
            .await
    }

    pub async fn picker_state(&self) -> Result<bool> {
        self.read(|data| data.picker_active).await
    }

    pub async fn set_picker_state(&self, active: bool) -> Result<()> {
        self.update(|data| data.picker_active = active).await
    }

    /// Flip the picker flag, returning the new state
    pub async fn toggle_picker(&self) -> Result<bool> {
        self.update(|data| {
            data.picker_active = !data.picker_active;
            data.picker_active
        })
        .await
    }
}

async fn load_file(path: &Path) -> Result<StorageData> {
    if !fs::try_exists(path).await? {
        return Ok(StorageData::default());
    }

    let content = fs::read_to_string(path).await?;
    if content.trim().is_empty() {
        return Ok(StorageData::default());
    }

    serde_json::from_str(&content).map_err(|e| {
        PinpointError::Storage(format!("Failed to parse {}: {}", path.display(), e))
    })
}

async fn save_file(path: &Path, data: &StorageData) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    // Readers never observe a partially written store.
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(data)?).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use pinpoint_core::{ElementContext, Rect, Viewport};
    use tempfile::tempdir;

    fn annotation(note: &str) -> Annotation {
        Annotation::new(
            note,
            ElementContext {
                selector: "main button".to_string(),
                tag_name: "button".to_string(),
                component_label: Some("button".to_string()),
                rect: Rect::new(10.0, 20.0, 30.0, 40.0),
                viewport: Viewport::new(1280.0, 720.0),
                styles: IndexMap::new(),
                animations: Vec::new(),
                attributes: IndexMap::new(),
                timestamp: 1,
            },
        )
    }

    const URL: &str = "http://localhost:3000/";

    #[tokio::test]
    async fn test_in_memory_crud() {
        let store = AnnotationStore::in_memory();
        let first = annotation("first");
        let second = annotation("second");

        store.save_annotation(URL, first.clone()).await.unwrap();
        store.save_annotation(URL, second.clone()).await.unwrap();
        store
            .save_annotation("http://localhost:4000/", annotation("other"))
            .await
            .unwrap();

        let loaded = store.get_annotations(URL).await.unwrap();
        assert_eq!(loaded, vec![first.clone(), second.clone()]);
        assert_eq!(store.annotation_count(URL).await.unwrap(), 2);

        assert!(store.delete_annotation(URL, &first.id).await.unwrap());
        assert!(!store.delete_annotation(URL, &first.id).await.unwrap());
        assert_eq!(store.get_annotations(URL).await.unwrap(), vec![second]);

        store.clear_annotations(URL).await.unwrap();
        assert_eq!(store.annotation_count(URL).await.unwrap(), 0);
        assert_eq!(
            store.annotation_count("http://localhost:4000/").await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_unknown_url_is_empty() {
        let store = AnnotationStore::in_memory();
        assert!(store.get_annotations(URL).await.unwrap().is_empty());
        assert!(!store.delete_annotation(URL, "missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_picker_state() {
        let store = AnnotationStore::in_memory();
        assert!(!store.picker_state().await.unwrap());
        assert!(store.toggle_picker().await.unwrap());
        assert!(store.picker_state().await.unwrap());
        store.set_picker_state(false).await.unwrap();
        assert!(!store.picker_state().await.unwrap());
    }

    #[tokio::test]
    async fn test_file_storage_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("pinpoint_data.json");

        let store = AnnotationStore::file(&path);
        assert!(store.get_annotations(URL).await.unwrap().is_empty());
        let saved = annotation("persist me");
        store.save_annotation(URL, saved.clone()).await.unwrap();
        store.set_picker_state(true).await.unwrap();
        assert!(path.exists());

        let reopened = AnnotationStore::file(&path);
        assert_eq!(reopened.get_annotations(URL).await.unwrap(), vec![saved]);
        assert!(reopened.picker_state().await.unwrap());
    }

    #[tokio::test]
    async fn test_file_storage_json_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pinpoint_data.json");
        let store = AnnotationStore::file(&path);
        store.save_annotation(URL, annotation("shape")).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw["annotations"][URL][0]["createdAt"].is_number());
        assert_eq!(raw["annotations"][URL][0]["context"]["tagName"], "button");
        assert_eq!(raw["pickerActive"], false);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pinpoint_data.json");
        std::fs::write(&path, "{ nope").unwrap();

        let store = AnnotationStore::file(&path);
        let err = store.get_annotations(URL).await.unwrap_err();
        assert!(matches!(err, PinpointError::Storage(_)));
    }

    #[tokio::test]
    async fn test_from_config_path() {
        let dir = tempdir().unwrap();
        let config = PinpointConfig::default();
        let store = AnnotationStore::from_config(&config, dir.path());
        assert_eq!(
            store.mode(),
            &StorageMode::File(dir.path().join(".pinpoint").join("pinpoint_data.json"))
        );
    }
}
