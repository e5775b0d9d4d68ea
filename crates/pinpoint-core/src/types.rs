//! Core type definitions for Pinpoint

use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Milliseconds since the Unix epoch
pub type Timestamp = i64;

/// Current instant in milliseconds since the Unix epoch
pub fn now_millis() -> Timestamp {
    Utc::now().timestamp_millis()
}

/// Viewport-relative bounding box in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }
}

/// Window dimensions in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Animation play state as reported by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayState {
    Idle,
    #[default]
    Running,
    Paused,
    Finished,
}

impl std::fmt::Display for PlayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

impl std::str::FromStr for PlayState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(Self::Idle),
            "running" => Ok(Self::Running),
            "paused" => Ok(Self::Paused),
            "finished" => Ok(Self::Finished),
            _ => Err(format!("Invalid play state: {}", s)),
        }
    }
}

/// Snapshot of one animation attached to a captured element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationInfo {
    /// Animation id, keyframe name, or `"unnamed"`
    pub name: String,
    /// Playback position in milliseconds, if the animation has a timeline
    #[serde(rename = "currentTime")]
    pub current_time_ms: Option<f64>,
    /// Iteration duration in milliseconds (0 when unknown)
    #[serde(rename = "duration")]
    pub duration_ms: f64,
    pub play_state: PlayState,
}

/// Immutable snapshot of an element taken at pick time
///
/// The selector is only guaranteed to resolve against the DOM it was computed
/// from. Consumers must tolerate selectors that no longer match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementContext {
    pub selector: String,
    pub tag_name: String,
    /// Framework component name or a simplified `tag#id` / `tag.class` label
    #[serde(
        rename = "componentName",
        alias = "componentLabel",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub component_label: Option<String>,
    pub rect: Rect,
    pub viewport: Viewport,
    /// Allow-listed computed styles, keyed by camelCase property name
    #[serde(default)]
    pub styles: IndexMap<String, String>,
    #[serde(default)]
    pub animations: Vec<AnimationInfo>,
    /// `id`, `class` and `data-*` attributes in native order
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
    pub timestamp: Timestamp,
}

impl ElementContext {
    /// Label used when rendering this element in prompt text
    pub fn display_label(&self) -> &str {
        self.component_label.as_deref().unwrap_or(&self.tag_name)
    }

    /// Position as integer percentages of the captured viewport
    ///
    /// Returns `None` when either viewport dimension is zero.
    pub fn viewport_position(&self) -> Option<(i64, i64)> {
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return None;
        }
        let x = (self.rect.left / self.viewport.width * 100.0).round() as i64;
        let y = (self.rect.top / self.viewport.height * 100.0).round() as i64;
        Some((x, y))
    }
}

/// A feedback note bound to one captured element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: String,
    pub note: String,
    pub context: ElementContext,
    pub created_at: Timestamp,
}

impl Annotation {
    pub fn new(note: impl Into<String>, context: ElementContext) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            note: note.into(),
            context,
            created_at: now_millis(),
        }
    }
}

/// A prompt compiled from all annotations of one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPrompt {
    pub id: String,
    pub url: String,
    pub prompt: String,
    pub annotation_count: usize,
    pub created_at: Timestamp,
}

/// Everything Pinpoint persists, stored under a single key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageData {
    /// Annotations keyed by page URL
    #[serde(default)]
    pub annotations: HashMap<String, Vec<Annotation>>,
    /// Generated prompts, newest first
    #[serde(default)]
    pub history: Vec<GeneratedPrompt>,
    #[serde(default)]
    pub picker_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(left: f64, top: f64, width: f64, height: f64) -> ElementContext {
        ElementContext {
            selector: "button".to_string(),
            tag_name: "button".to_string(),
            component_label: None,
            rect: Rect::new(top, left, 20.0, 10.0),
            viewport: Viewport::new(width, height),
            styles: IndexMap::new(),
            animations: Vec::new(),
            attributes: IndexMap::new(),
            timestamp: 0,
        }
    }

    #[test]
    fn test_viewport_position_rounds() {
        let ctx = context(100.0, 50.0, 1000.0, 500.0);
        assert_eq!(ctx.viewport_position(), Some((10, 10)));

        let ctx = context(333.0, 0.0, 1000.0, 500.0);
        assert_eq!(ctx.viewport_position(), Some((33, 0)));
    }

    #[test]
    fn test_viewport_position_zero_viewport() {
        let ctx = context(100.0, 50.0, 0.0, 500.0);
        assert_eq!(ctx.viewport_position(), None);
    }

    #[test]
    fn test_display_label_prefers_component() {
        let mut ctx = context(0.0, 0.0, 100.0, 100.0);
        assert_eq!(ctx.display_label(), "button");
        ctx.component_label = Some("SaveButton".to_string());
        assert_eq!(ctx.display_label(), "SaveButton");
    }

    #[test]
    fn test_context_json_shape() {
        let mut ctx = context(1.0, 2.0, 100.0, 100.0);
        ctx.component_label = Some("Card".to_string());
        ctx.animations.push(AnimationInfo {
            name: "fade".to_string(),
            current_time_ms: None,
            duration_ms: 300.0,
            play_state: PlayState::Paused,
        });

        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["tagName"], "button");
        assert_eq!(json["componentName"], "Card");
        assert!(json["animations"][0]["currentTime"].is_null());
        assert_eq!(json["animations"][0]["playState"], "paused");

        let back: ElementContext = serde_json::from_value(json).unwrap();
        assert_eq!(back, ctx);
    }

    #[test]
    fn test_storage_data_defaults_from_empty_object() {
        let data: StorageData = serde_json::from_str("{}").unwrap();
        assert!(data.annotations.is_empty());
        assert!(data.history.is_empty());
        assert!(!data.picker_active);
    }

    #[test]
    fn test_play_state_parsing() {
        assert_eq!("Paused".parse::<PlayState>().unwrap(), PlayState::Paused);
        assert!("stopped".parse::<PlayState>().is_err());
    }
}
