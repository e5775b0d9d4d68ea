//! Arena-backed document tree

use indexmap::IndexMap;
use pinpoint_core::{PinpointError, PlayState, Rect, Result, Viewport};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::selector::{parse_selector_list, SelectorList};

/// Index of a node inside its [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// Iteration duration as the host reports it
///
/// Hosts report either a number of milliseconds or a keyword such as `"auto"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnimationDuration {
    Millis(f64),
    Keyword(String),
}

impl AnimationDuration {
    pub fn as_millis(&self) -> Option<f64> {
        match self {
            Self::Millis(ms) if ms.is_finite() => Some(*ms),
            _ => None,
        }
    }
}

impl Default for AnimationDuration {
    fn default() -> Self {
        Self::Millis(0.0)
    }
}

/// An animation associated with an element
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostAnimation {
    /// Explicit animation id (empty when unset)
    #[serde(default)]
    pub id: String,
    /// Keyframe name for CSS animations
    #[serde(default)]
    pub animation_name: Option<String>,
    #[serde(default)]
    pub current_time: Option<f64>,
    #[serde(default)]
    pub duration: AnimationDuration,
    #[serde(default)]
    pub play_state: PlayState,
}

/// Element payload: markup data plus what the host computed for it
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag_name: String,
    /// Attributes in source order
    pub attrs: IndexMap<String, String>,
    pub rect: Rect,
    /// Resolved style values keyed by hyphenated property name
    pub computed_style: HashMap<String, String>,
    pub animations: Vec<HostAnimation>,
    /// Owning framework components, innermost first
    pub component_chain: Vec<String>,
}

impl ElementData {
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        self.attrs
            .get("class")
            .map(|classes| classes.split_ascii_whitespace().any(|c| c == class_name))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
enum NodeType {
    Document,
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    node_type: NodeType,
}

/// A document tree with host-computed layout, style, and animation data
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    viewport: Viewport,
}

impl Document {
    /// Create an empty document (only the document node)
    pub fn new(viewport: Viewport) -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            viewport,
        }
    }

    /// Create a document with `<html><body></body></html>`
    pub fn with_body(viewport: Viewport) -> Self {
        let mut doc = Self::new(viewport);
        let html = doc.create_element(doc.root, "html");
        doc.create_element(html, "body");
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    /// Append a new element under `parent`
    pub fn create_element(&mut self, parent: NodeId, tag_name: &str) -> NodeId {
        self.create_node(Some(parent), NodeType::Element(ElementData::new(tag_name)))
    }

    /// Append a prepared element under `parent`
    pub fn append_element(&mut self, parent: NodeId, mut data: ElementData) -> NodeId {
        data.tag_name = data.tag_name.to_ascii_lowercase();
        self.create_node(Some(parent), NodeType::Element(data))
    }

    /// Append a text node under `parent`
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text.into()))
    }

    /// Detach a node (and its subtree) from its parent
    pub fn remove_node(&mut self, node: NodeId) -> Result<()> {
        self.check(node)?;
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|child| *child != node);
        }
        Ok(())
    }

    fn check(&self, node: NodeId) -> Result<()> {
        if node.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(PinpointError::NodeNotFound(node.to_string()))
        }
    }

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(node.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(node.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_or_err(&mut self, node: NodeId) -> Result<&mut ElementData> {
        self.check(node)?;
        self.element_mut(node)
            .ok_or_else(|| PinpointError::NotAnElement(node.to_string()))
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag_name.as_str())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    /// Parent if it is an element (the document node is not)
    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node).filter(|parent| self.is_element(*parent))
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    /// Whether `node` is still reachable from the document node
    pub fn is_connected(&self, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == self.root {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// The `<html>` element
    pub fn document_element(&self) -> Option<NodeId> {
        self.element_children(self.root).into_iter().next()
    }

    /// The `<body>` element
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.element_children(html)
            .into_iter()
            .find(|child| self.tag_name(*child) == Some("body"))
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attrs.get(name).map(String::as_str)
    }

    pub fn attrs(&self, node: NodeId) -> Option<&IndexMap<String, String>> {
        self.element(node).map(|e| &e.attrs)
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        let element = self.element_or_err(node)?;
        element
            .attrs
            .insert(name.to_ascii_lowercase(), value.to_string());
        Ok(())
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> Result<()> {
        let element = self.element_or_err(node)?;
        element.attrs.shift_remove(name);
        Ok(())
    }

    /// Class tokens in source order
    pub fn class_list(&self, node: NodeId) -> Vec<&str> {
        self.attr(node, "class")
            .map(|classes| classes.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, node: NodeId, class_name: &str) -> bool {
        self.element(node)
            .map(|e| e.has_class(class_name))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, node: NodeId, class_name: &str) -> Result<()> {
        if self.has_class(node, class_name) {
            return Ok(());
        }
        let element = self.element_or_err(node)?;
        let updated = match element.attrs.get("class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {}", existing.trim(), class_name)
            }
            _ => class_name.to_string(),
        };
        element.attrs.insert("class".to_string(), updated);
        Ok(())
    }

    pub fn remove_class(&mut self, node: NodeId, class_name: &str) -> Result<()> {
        let element = self.element_or_err(node)?;
        let Some(existing) = element.attrs.get("class") else {
            return Ok(());
        };
        let remaining: Vec<&str> = existing
            .split_ascii_whitespace()
            .filter(|c| *c != class_name)
            .collect();
        if remaining.is_empty() {
            element.attrs.shift_remove("class");
        } else {
            let joined = remaining.join(" ");
            element.attrs.insert("class".to_string(), joined);
        }
        Ok(())
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) -> Result<()> {
        self.element_or_err(node)?.rect = rect;
        Ok(())
    }

    pub fn bounding_rect(&self, node: NodeId) -> Option<Rect> {
        self.element(node).map(|e| e.rect)
    }

    /// Set a resolved style value (hyphenated property name)
    pub fn set_computed_style(&mut self, node: NodeId, property: &str, value: &str) -> Result<()> {
        self.element_or_err(node)?
            .computed_style
            .insert(property.to_string(), value.to_string());
        Ok(())
    }

    /// `getComputedStyle(el).getPropertyValue(property)`: empty when unset
    pub fn computed_style(&self, node: NodeId, property: &str) -> &str {
        self.element(node)
            .and_then(|e| e.computed_style.get(property))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn push_animation(&mut self, node: NodeId, animation: HostAnimation) -> Result<()> {
        self.element_or_err(node)?.animations.push(animation);
        Ok(())
    }

    pub fn animations(&self, node: NodeId) -> &[HostAnimation] {
        self.element(node)
            .map(|e| e.animations.as_slice())
            .unwrap_or(&[])
    }

    pub fn set_play_state(&mut self, node: NodeId, index: usize, state: PlayState) -> Result<()> {
        let element = self.element_or_err(node)?;
        let animation = element.animations.get_mut(index).ok_or_else(|| {
            PinpointError::Other(format!("No animation {} on {}", index, node))
        })?;
        animation.play_state = state;
        Ok(())
    }

    /// `document.getAnimations()`: every animation in tree order
    pub fn all_animations(&self) -> Vec<(NodeId, usize)> {
        self.elements()
            .into_iter()
            .flat_map(|node| (0..self.animations(node).len()).map(move |i| (node, i)))
            .collect()
    }

    pub fn set_component_chain(&mut self, node: NodeId, chain: Vec<String>) -> Result<()> {
        self.element_or_err(node)?.component_chain = chain;
        Ok(())
    }

    pub fn component_chain(&self, node: NodeId) -> &[String] {
        self.element(node)
            .map(|e| e.component_chain.as_slice())
            .unwrap_or(&[])
    }

    pub fn text_content(&self, node: NodeId) -> String {
        let Some(n) = self.nodes.get(node.0) else {
            return String::new();
        };
        match &n.node_type {
            NodeType::Text(text) => text.clone(),
            _ => n
                .children
                .iter()
                .map(|child| self.text_content(*child))
                .collect(),
        }
    }

    /// All connected elements in document order
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements_dfs(self.root, &mut out);
        out
    }

    fn collect_elements_dfs(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for child in self.children(node) {
            if self.is_element(*child) {
                out.push(*child);
            }
            self.collect_elements_dfs(*child, out);
        }
    }

    /// First element with the given id, in document order
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.elements()
            .into_iter()
            .find(|node| self.attr(*node, "id") == Some(id))
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        let list = parse_selector_list(selector)?;
        Ok(self
            .elements()
            .into_iter()
            .find(|node| list.matches(self, *node)))
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let list = parse_selector_list(selector)?;
        Ok(self.select(&list))
    }

    /// Match a pre-parsed selector list against the whole document
    pub fn select(&self, list: &SelectorList) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|node| list.matches(self, *node))
            .collect()
    }

    pub fn matches(&self, node: NodeId, selector: &str) -> Result<bool> {
        if !self.is_element(node) {
            return Ok(false);
        }
        let list = parse_selector_list(selector)?;
        Ok(list.matches(self, node))
    }

    /// Nearest inclusive ancestor matching `selector`
    pub fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let list = parse_selector_list(selector)?;
        let mut cursor = Some(node).filter(|n| self.is_element(*n));
        while let Some(current) = cursor {
            if list.matches(self, current) {
                return Ok(Some(current));
            }
            cursor = self.parent_element(current);
        }
        Ok(None)
    }

    /// Whether `node` is `ancestor` or lies inside it
    pub fn is_inclusive_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }
}
