//! Page-wide animation pause control
//!
//! One controller belongs to one picking session. It remembers exactly which
//! animations it paused so resuming never touches animations the page had
//! paused on its own.

use pinpoint_core::{PlayState, Result};
use pinpoint_dom::{Document, NodeId};
use tracing::{debug, info};

/// Pauses and resumes every running animation in a document
#[derive(Debug, Default)]
pub struct AnimationController {
    paused: Vec<(NodeId, usize)>,
}

impl AnimationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pause all running animations, returning how many were paused
    pub fn pause_all(&mut self, doc: &mut Document) -> Result<usize> {
        let mut count = 0;
        for (node, index) in doc.all_animations() {
            if doc.animations(node)[index].play_state != PlayState::Running {
                continue;
            }
            doc.set_play_state(node, index, PlayState::Paused)?;
            if !self.paused.contains(&(node, index)) {
                self.paused.push((node, index));
            }
            count += 1;
        }
        info!("Paused {} animations", count);
        Ok(count)
    }

    /// Resume everything this controller paused, returning how many resumed
    pub fn resume_all(&mut self, doc: &mut Document) -> usize {
        let mut count = 0;
        for (node, index) in self.paused.drain(..) {
            let still_paused = doc
                .animations(node)
                .get(index)
                .is_some_and(|a| a.play_state == PlayState::Paused);
            if !still_paused {
                debug!("Animation {} on {} changed while paused; leaving it", index, node);
                continue;
            }
            if doc.set_play_state(node, index, PlayState::Running).is_ok() {
                count += 1;
            }
        }
        info!("Resumed {} animations", count);
        count
    }

    /// Pause when nothing is paused, otherwise resume
    pub fn toggle(&mut self, doc: &mut Document) -> Result<bool> {
        if self.has_paused() {
            self.resume_all(doc);
            Ok(false)
        } else {
            self.pause_all(doc)?;
            Ok(self.has_paused())
        }
    }

    pub fn has_paused(&self) -> bool {
        !self.paused.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinpoint_core::Viewport;
    use pinpoint_dom::HostAnimation;

    fn animated_doc() -> (Document, NodeId, NodeId) {
        let mut doc = Document::with_body(Viewport::new(800.0, 600.0));
        let body = doc.body().unwrap();
        let spinner = doc.create_element(body, "div");
        let banner = doc.create_element(body, "div");
        doc.push_animation(spinner, HostAnimation::default()).unwrap();
        doc.push_animation(
            banner,
            HostAnimation {
                play_state: PlayState::Paused,
                ..HostAnimation::default()
            },
        )
        .unwrap();
        doc.push_animation(banner, HostAnimation::default()).unwrap();
        (doc, spinner, banner)
    }

    #[test]
    fn test_pause_and_resume() {
        let (mut doc, spinner, banner) = animated_doc();
        let mut controller = AnimationController::new();

        assert_eq!(controller.pause_all(&mut doc).unwrap(), 2);
        assert!(controller.has_paused());
        assert_eq!(doc.animations(spinner)[0].play_state, PlayState::Paused);
        assert_eq!(doc.animations(banner)[1].play_state, PlayState::Paused);

        assert_eq!(controller.resume_all(&mut doc), 2);
        assert!(!controller.has_paused());
        assert_eq!(doc.animations(spinner)[0].play_state, PlayState::Running);
        // Paused by the page itself before the session started.
        assert_eq!(doc.animations(banner)[0].play_state, PlayState::Paused);
    }

    #[test]
    fn test_resume_skips_animations_changed_meanwhile() {
        let (mut doc, spinner, _) = animated_doc();
        let mut controller = AnimationController::new();
        controller.pause_all(&mut doc).unwrap();

        doc.set_play_state(spinner, 0, PlayState::Finished).unwrap();
        assert_eq!(controller.resume_all(&mut doc), 1);
        assert_eq!(doc.animations(spinner)[0].play_state, PlayState::Finished);
    }

    #[test]
    fn test_toggle() {
        let (mut doc, spinner, _) = animated_doc();
        let mut controller = AnimationController::new();

        assert!(controller.toggle(&mut doc).unwrap());
        assert_eq!(doc.animations(spinner)[0].play_state, PlayState::Paused);
        assert!(!controller.toggle(&mut doc).unwrap());
        assert_eq!(doc.animations(spinner)[0].play_state, PlayState::Running);
    }

    #[test]
    fn test_separate_controllers_do_not_share_state() {
        let (mut doc, _, _) = animated_doc();
        let mut first = AnimationController::new();
        let second = AnimationController::new();

        first.pause_all(&mut doc).unwrap();
        assert!(first.has_paused());
        assert!(!second.has_paused());
    }
}
