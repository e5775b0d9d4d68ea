//! Unique selector synthesis
//!
//! Produces a selector that re-identifies an element in the DOM it was computed
//! against. Ids win outright; otherwise the selector is a descendant path of
//! tag + class segments, with `:nth-of-type()` added wherever same-tag siblings
//! would make a segment ambiguous.

use pinpoint_dom::{css_escape, Document, NodeId};
use tracing::debug;

/// Build a selector for `node`
///
/// Stops before `<body>` and `<html>`. When `node` is one of those (or the walk
/// yields no segments), the bare tag name is returned. Segments are joined with
/// a descendant space; if that path first matches another element, they are
/// joined with `>` and anchored at the `<body>` or `<html>` the walk stopped at.
///
/// # Example
/// ```
/// use pinpoint_core::Viewport;
/// use pinpoint_dom::Document;
/// use pinpoint_capture::selector::synthesize;
///
/// let mut doc = Document::with_body(Viewport::new(800.0, 600.0));
/// let body = doc.body().unwrap();
/// let nav = doc.create_element(body, "nav");
/// doc.set_attr(nav, "class", "top bar").unwrap();
/// let link = doc.create_element(nav, "a");
///
/// assert_eq!(synthesize(&doc, link), "nav.top.bar a");
/// ```
pub fn synthesize(doc: &Document, node: NodeId) -> String {
    if let Some(id) = doc.attr(node, "id").filter(|id| !id.is_empty()) {
        return format!("#{}", css_escape(id));
    }

    let mut path: Vec<String> = Vec::new();
    let mut anchor = None;
    let mut current = Some(node).filter(|n| doc.is_element(*n));

    while let Some(element) = current {
        let tag = doc.tag_name(element).unwrap_or_default();
        if tag == "body" || tag == "html" {
            anchor = Some(tag);
            break;
        }
        path.push(segment(doc, element, tag));
        current = doc.parent_element(element);
    }

    if path.is_empty() {
        return doc.tag_name(node).unwrap_or_default().to_string();
    }

    path.reverse();
    let selector = path.join(" ");
    // Detached elements resolve under neither form.
    if !doc.is_connected(node) || validate(doc, &selector, node) {
        debug!("Synthesized selector for {}: {}", node, selector);
        return selector;
    }

    // The descendant path matched an earlier element; pin every step instead.
    let mut anchored = path.join(" > ");
    if let Some(anchor) = anchor {
        anchored = format!("{} > {}", anchor, anchored);
    }
    debug!(
        "Descendant path {} is ambiguous for {}, using {}",
        selector, node, anchored
    );
    anchored
}

fn segment(doc: &Document, element: NodeId, tag: &str) -> String {
    let mut segment = tag.to_string();

    for class_name in doc.class_list(element) {
        segment.push('.');
        segment.push_str(&css_escape(class_name));
    }

    if let Some(parent) = doc.parent(element) {
        let same_tag: Vec<NodeId> = doc
            .element_children(parent)
            .into_iter()
            .filter(|sibling| doc.tag_name(*sibling) == Some(tag))
            .collect();
        if same_tag.len() > 1 {
            if let Some(position) = same_tag.iter().position(|s| *s == element) {
                segment.push_str(&format!(":nth-of-type({})", position + 1));
            }
        }
    }

    segment
}

/// Whether `selector` still resolves to `node`
///
/// Returns `false` for selectors that no longer match, match a different
/// element first, or fail to parse.
pub fn validate(doc: &Document, selector: &str, node: NodeId) -> bool {
    match doc.query_selector(selector) {
        Ok(Some(found)) => found == node,
        Ok(None) => false,
        Err(e) => {
            debug!("Selector no longer valid: {}", e);
            false
        }
    }
}

/// Shorten a selector for display, keeping it under `max_chars` characters
pub fn truncate_selector(selector: &str, max_chars: usize) -> String {
    if selector.chars().count() <= max_chars {
        return selector.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = selector.chars().take(keep).collect();
    out.push_str("...");
    out
}
