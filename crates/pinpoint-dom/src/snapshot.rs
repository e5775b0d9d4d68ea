//! JSON page snapshots
//!
//! A snapshot is what a host dumps for a page: the element tree plus, for every
//! element, the layout box, resolved styles, animations, and component owners.
//! [`Document::from_snapshot`] hydrates it into an arena.

use indexmap::IndexMap;
use pinpoint_core::{PinpointError, Rect, Result, Viewport};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::document::{Document, ElementData, HostAnimation, NodeId};

/// A serialized page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    pub url: String,
    pub viewport: Viewport,
    /// The `<html>` element
    pub root: SnapshotNode,
}

/// One node of a snapshot tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotNode {
    Element(SnapshotElement),
    Text { text: String },
}

/// A serialized element with its host-computed data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotElement {
    pub tag: String,
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
    #[serde(default)]
    pub rect: Rect,
    /// Resolved style values keyed by hyphenated property name
    #[serde(default)]
    pub styles: HashMap<String, String>,
    #[serde(default)]
    pub animations: Vec<HostAnimation>,
    /// Owning framework components, innermost first
    #[serde(default)]
    pub component_chain: Vec<String>,
    #[serde(default)]
    pub children: Vec<SnapshotNode>,
}

impl PageSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| PinpointError::Snapshot(format!("Failed to parse snapshot: {}", e)))
    }
}

impl Document {
    /// Build a document from a page snapshot
    pub fn from_snapshot(snapshot: &PageSnapshot) -> Result<Self> {
        let SnapshotNode::Element(root) = &snapshot.root else {
            return Err(PinpointError::Snapshot(
                "Snapshot root must be an element".to_string(),
            ));
        };

        let mut doc = Document::new(snapshot.viewport);
        let parent = doc.root();
        let count = hydrate(&mut doc, parent, root);

        debug!("Hydrated {} elements from snapshot of {}", count, snapshot.url);
        Ok(doc)
    }
}

fn hydrate(doc: &mut Document, parent: NodeId, element: &SnapshotElement) -> usize {
    let data = ElementData {
        tag_name: element.tag.clone(),
        attrs: element
            .attributes
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
            .collect(),
        rect: element.rect,
        computed_style: element.styles.clone(),
        animations: element.animations.clone(),
        component_chain: element.component_chain.clone(),
    };
    let node = doc.append_element(parent, data);

    let mut count = 1;
    for child in &element.children {
        match child {
            SnapshotNode::Element(child) => count += hydrate(doc, node, child),
            SnapshotNode::Text { text } => {
                doc.append_text(node, text.clone());
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::AnimationDuration;
    use pinpoint_core::PlayState;

    const SNAPSHOT: &str = r#"{
        "url": "http://localhost:3000",
        "viewport": { "width": 1000, "height": 500 },
        "root": {
            "tag": "HTML",
            "children": [{
                "tag": "body",
                "children": [
                    { "text": "intro" },
                    {
                        "tag": "button",
                        "attributes": { "id": "save-btn", "class": "btn", "Data-Role": "primary" },
                        "rect": { "top": 50, "left": 100, "width": 80, "height": 30 },
                        "styles": { "display": "inline-block" },
                        "animations": [
                            { "animationName": "pulse", "currentTime": 120.5, "duration": 1000, "playState": "running" },
                            { "id": "wipe", "duration": "auto", "playState": "paused" }
                        ],
                        "componentChain": ["_Inner", "SaveButton"],
                        "children": [{ "text": "Save" }]
                    }
                ]
            }]
        }
    }"#;

    #[test]
    fn test_hydrates_snapshot() {
        let snapshot = PageSnapshot::from_json(SNAPSHOT).unwrap();
        let doc = Document::from_snapshot(&snapshot).unwrap();

        assert_eq!(doc.viewport(), Viewport::new(1000.0, 500.0));
        assert_eq!(doc.tag_name(doc.document_element().unwrap()), Some("html"));

        let button = doc.by_id("save-btn").unwrap();
        assert_eq!(doc.attr(button, "data-role"), Some("primary"));
        assert_eq!(doc.bounding_rect(button).unwrap().left, 100.0);
        assert_eq!(doc.computed_style(button, "display"), "inline-block");
        assert_eq!(doc.component_chain(button), ["_Inner", "SaveButton"]);
        assert_eq!(doc.text_content(doc.body().unwrap()), "introSave");

        let animations = doc.animations(button);
        assert_eq!(animations.len(), 2);
        assert_eq!(animations[0].animation_name.as_deref(), Some("pulse"));
        assert_eq!(animations[1].duration, AnimationDuration::Keyword("auto".into()));
        assert_eq!(animations[1].play_state, PlayState::Paused);
    }

    #[test]
    fn test_text_root_rejected() {
        let json = r#"{ "url": "x", "viewport": { "width": 1, "height": 1 }, "root": { "text": "hi" } }"#;
        let snapshot = PageSnapshot::from_json(json).unwrap();
        assert!(matches!(
            Document::from_snapshot(&snapshot),
            Err(PinpointError::Snapshot(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_snapshot_error() {
        assert!(matches!(
            PageSnapshot::from_json("{ not json"),
            Err(PinpointError::Snapshot(_))
        ));
    }
}
