//! Picking session state
//!
//! Tracks the hovered element and the highlight class while the picker is
//! active, and turns a click into a captured context. Pinpoint's own UI
//! (everything under the ignore root id) is never pickable.

use pinpoint_core::{ElementContext, PinpointConfig, Result};
use pinpoint_dom::{Document, NodeId};
use tracing::debug;

use crate::animation::AnimationController;
use crate::context::ContextCapturer;

/// One activation of the element picker
#[derive(Debug)]
pub struct PickerSession {
    capturer: ContextCapturer,
    animations: AnimationController,
    hovered: Option<NodeId>,
    ignore_root_id: String,
    highlight_class: String,
}

impl PickerSession {
    pub fn new(config: &PinpointConfig) -> Self {
        Self::with_capturer(config, ContextCapturer::new())
    }

    pub fn with_capturer(config: &PinpointConfig, capturer: ContextCapturer) -> Self {
        Self {
            capturer,
            animations: AnimationController::new(),
            hovered: None,
            ignore_root_id: config.ignore_root_id.clone(),
            highlight_class: config.highlight_class.clone(),
        }
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn animations_paused(&self) -> bool {
        self.animations.has_paused()
    }

    /// Whether `node` belongs to Pinpoint's own UI
    pub fn is_ignored(&self, doc: &Document, node: NodeId) -> bool {
        match doc.by_id(&self.ignore_root_id) {
            Some(root) => doc.is_inclusive_descendant_of(node, root),
            None => false,
        }
    }

    /// Pointer entered `node`: move the highlight onto it
    pub fn hover(&mut self, doc: &mut Document, node: NodeId) -> Result<()> {
        if !doc.is_element(node) || self.is_ignored(doc, node) {
            return Ok(());
        }
        if let Some(previous) = self.hovered.filter(|previous| *previous != node) {
            doc.remove_class(previous, &self.highlight_class)?;
        }
        doc.add_class(node, &self.highlight_class)?;
        self.hovered = Some(node);
        Ok(())
    }

    /// Pointer left `node`
    pub fn unhover(&mut self, doc: &mut Document, node: NodeId) -> Result<()> {
        if doc.is_element(node) {
            doc.remove_class(node, &self.highlight_class)?;
        }
        if self.hovered == Some(node) {
            self.hovered = None;
        }
        Ok(())
    }

    /// User clicked `node`
    ///
    /// Returns `None` for Pinpoint's own UI and non-elements. The highlight is
    /// removed before capture so it never leaks into the recorded classes.
    pub fn click(&mut self, doc: &mut Document, node: NodeId) -> Result<Option<ElementContext>> {
        if !doc.is_element(node) || self.is_ignored(doc, node) {
            return Ok(None);
        }
        if let Some(previous) = self.hovered.take() {
            doc.remove_class(previous, &self.highlight_class)?;
        }
        doc.remove_class(node, &self.highlight_class)?;

        let context = self.capturer.capture(doc, node)?;
        debug!("Picked {}", context.selector);
        Ok(Some(context))
    }

    /// Escape pressed: drop the hover highlight
    pub fn cancel(&mut self, doc: &mut Document) -> Result<()> {
        if let Some(previous) = self.hovered.take() {
            doc.remove_class(previous, &self.highlight_class)?;
        }
        Ok(())
    }

    /// Pause or resume page animations, returning whether they are now paused
    pub fn toggle_animations(&mut self, doc: &mut Document) -> Result<bool> {
        self.animations.toggle(doc)
    }

    /// Tear down the session, restoring highlight and animation state
    pub fn end(mut self, doc: &mut Document) -> Result<()> {
        self.cancel(doc)?;
        self.animations.resume_all(doc);
        Ok(())
    }
}

/// Trim a feedback note, rejecting notes that are empty after trimming
pub fn normalize_note(note: &str) -> Option<String> {
    let trimmed = note.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinpoint_core::{PlayState, Viewport};
    use pinpoint_dom::HostAnimation;

    struct Page {
        doc: Document,
        card: NodeId,
        title: NodeId,
        overlay_button: NodeId,
    }

    fn page() -> Page {
        let mut doc = Document::with_body(Viewport::new(1000.0, 500.0));
        let body = doc.body().unwrap();
        let card = doc.create_element(body, "div");
        doc.set_attr(card, "class", "card").unwrap();
        let title = doc.create_element(card, "h2");
        doc.push_animation(card, HostAnimation::default()).unwrap();

        let overlay = doc.create_element(body, "div");
        doc.set_attr(overlay, "id", "pinpoint-root").unwrap();
        let overlay_button = doc.create_element(overlay, "button");

        Page {
            doc,
            card,
            title,
            overlay_button,
        }
    }

    #[test]
    fn test_hover_moves_highlight() {
        let mut p = page();
        let mut session = PickerSession::new(&PinpointConfig::default());

        session.hover(&mut p.doc, p.card).unwrap();
        assert!(p.doc.has_class(p.card, "pinpoint-highlight"));

        session.hover(&mut p.doc, p.title).unwrap();
        assert!(!p.doc.has_class(p.card, "pinpoint-highlight"));
        assert!(p.doc.has_class(p.title, "pinpoint-highlight"));
        assert_eq!(session.hovered(), Some(p.title));

        session.unhover(&mut p.doc, p.title).unwrap();
        assert!(!p.doc.has_class(p.title, "pinpoint-highlight"));
        assert_eq!(session.hovered(), None);
    }

    #[test]
    fn test_own_ui_is_ignored() {
        let mut p = page();
        let mut session = PickerSession::new(&PinpointConfig::default());

        session.hover(&mut p.doc, p.overlay_button).unwrap();
        assert!(!p.doc.has_class(p.overlay_button, "pinpoint-highlight"));
        assert!(session.click(&mut p.doc, p.overlay_button).unwrap().is_none());
    }

    #[test]
    fn test_click_captures_without_highlight_class() {
        let mut p = page();
        let mut session = PickerSession::new(&PinpointConfig::default());

        session.hover(&mut p.doc, p.card).unwrap();
        let ctx = session.click(&mut p.doc, p.card).unwrap().unwrap();

        assert_eq!(ctx.selector, "div.card:nth-of-type(1)");
        assert_eq!(ctx.attributes["class"], "card");
        assert_eq!(session.hovered(), None);
        assert!(!p.doc.has_class(p.card, "pinpoint-highlight"));
    }

    #[test]
    fn test_click_on_child_clears_parent_highlight() {
        let mut p = page();
        let mut session = PickerSession::new(&PinpointConfig::default());

        session.hover(&mut p.doc, p.card).unwrap();
        let ctx = session.click(&mut p.doc, p.title).unwrap().unwrap();

        assert_eq!(ctx.selector, "div.card:nth-of-type(1) h2");
        assert!(!p.doc.has_class(p.card, "pinpoint-highlight"));
        assert_eq!(session.hovered(), None);

        session.end(&mut p.doc).unwrap();
        assert_eq!(p.doc.attr(p.card, "class"), Some("card"));
    }

    #[test]
    fn test_end_restores_state() {
        let mut p = page();
        let mut session = PickerSession::new(&PinpointConfig::default());

        session.hover(&mut p.doc, p.title).unwrap();
        assert!(session.toggle_animations(&mut p.doc).unwrap());
        assert!(session.animations_paused());
        assert_eq!(p.doc.animations(p.card)[0].play_state, PlayState::Paused);

        session.end(&mut p.doc).unwrap();
        assert!(!p.doc.has_class(p.title, "pinpoint-highlight"));
        assert_eq!(p.doc.animations(p.card)[0].play_state, PlayState::Running);
    }

    #[test]
    fn test_cancel_clears_hover() {
        let mut p = page();
        let mut session = PickerSession::new(&PinpointConfig::default());
        session.hover(&mut p.doc, p.card).unwrap();
        session.cancel(&mut p.doc).unwrap();
        assert_eq!(session.hovered(), None);
        assert!(!p.doc.has_class(p.card, "pinpoint-highlight"));
    }

    #[test]
    fn test_normalize_note() {
        assert_eq!(normalize_note("  too small \n").as_deref(), Some("too small"));
        assert_eq!(normalize_note("   "), None);
    }
}
