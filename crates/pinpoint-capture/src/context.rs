//! Element context capture
//!
//! Turns a live element into an [`ElementContext`]: selector, tag, label,
//! geometry, filtered styles, animation state and filtered attributes. The
//! record stays meaningful after the element itself is gone.

use indexmap::IndexMap;
use pinpoint_core::fail_open::fail_open;
use pinpoint_core::{now_millis, AnimationInfo, ElementContext, PinpointError, Result};
use pinpoint_dom::{Document, NodeId};
use tracing::debug;

use crate::label::{simplified_label, FrameworkLabelResolver, LabelResolver};
use crate::selector::synthesize;

/// Style properties worth describing to an AI assistant
pub const RELEVANT_STYLES: [&str; 21] = [
    "display",
    "position",
    "width",
    "height",
    "padding",
    "margin",
    "color",
    "backgroundColor",
    "fontSize",
    "fontWeight",
    "border",
    "borderRadius",
    "opacity",
    "transform",
    "transition",
    "animation",
    "boxShadow",
    "gap",
    "flexDirection",
    "justifyContent",
    "alignItems",
];

/// Resolved values that carry no information
const NOISE_VALUES: [&str; 3] = ["none", "normal", "0px"];

/// Captures [`ElementContext`] records
pub struct ContextCapturer {
    resolver: Box<dyn LabelResolver>,
}

impl ContextCapturer {
    /// Capturer that reads framework component metadata
    pub fn new() -> Self {
        Self::with_resolver(FrameworkLabelResolver)
    }

    /// Capturer with a custom label resolver
    pub fn with_resolver(resolver: impl LabelResolver + 'static) -> Self {
        Self {
            resolver: Box::new(resolver),
        }
    }

    /// Snapshot `node`
    ///
    /// Optional sub-captures never abort the capture; a failing label resolver
    /// only means the simplified label is used. Errors are reserved for nodes
    /// that are not elements of `doc`.
    pub fn capture(&self, doc: &Document, node: NodeId) -> Result<ElementContext> {
        let Some(element) = doc.element(node) else {
            return Err(PinpointError::NotAnElement(node.to_string()));
        };

        let component_label = fail_open("component_label", || self.resolver.resolve(doc, node))
            .flatten()
            .unwrap_or_else(|| simplified_label(doc, node));

        let context = ElementContext {
            selector: synthesize(doc, node),
            tag_name: element.tag_name.clone(),
            component_label: Some(component_label),
            rect: element.rect,
            viewport: doc.viewport(),
            styles: capture_styles(doc, node),
            animations: capture_animations(doc, node),
            attributes: capture_attributes(doc, node),
            timestamp: now_millis(),
        };

        debug!(
            "Captured {} ({}) with {} styles, {} animations",
            context.selector,
            context.display_label(),
            context.styles.len(),
            context.animations.len()
        );
        Ok(context)
    }
}

impl Default for ContextCapturer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContextCapturer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextCapturer").finish_non_exhaustive()
    }
}

/// Capture with the default framework resolver
pub fn capture_element_context(doc: &Document, node: NodeId) -> Result<ElementContext> {
    ContextCapturer::new().capture(doc, node)
}

/// `backgroundColor` -> `background-color`
pub fn to_kebab_case(property: &str) -> String {
    let mut out = String::with_capacity(property.len() + 4);
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn is_noise(value: &str) -> bool {
    value.is_empty() || NOISE_VALUES.contains(&value)
}

fn capture_styles(doc: &Document, node: NodeId) -> IndexMap<String, String> {
    RELEVANT_STYLES
        .iter()
        .filter_map(|property| {
            let value = doc.computed_style(node, &to_kebab_case(property));
            (!is_noise(value)).then(|| (property.to_string(), value.to_string()))
        })
        .collect()
}

fn capture_animations(doc: &Document, node: NodeId) -> Vec<AnimationInfo> {
    doc.animations(node)
        .iter()
        .map(|animation| {
            let name = if !animation.id.is_empty() {
                animation.id.clone()
            } else {
                animation
                    .animation_name
                    .clone()
                    .filter(|name| !name.is_empty() && name != "none")
                    .unwrap_or_else(|| "unnamed".to_string())
            };
            AnimationInfo {
                name,
                current_time_ms: animation.current_time,
                duration_ms: animation.duration.as_millis().unwrap_or(0.0),
                play_state: animation.play_state,
            }
        })
        .collect()
}

fn capture_attributes(doc: &Document, node: NodeId) -> IndexMap<String, String> {
    doc.attrs(node)
        .map(|attrs| {
            attrs
                .iter()
                .filter(|(name, _)| {
                    name.as_str() == "id" || name.as_str() == "class" || name.starts_with("data-")
                })
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default()
}
