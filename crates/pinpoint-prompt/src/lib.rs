//! Prompt generation for Pinpoint
//!
//! Compiles the annotations of one page into a markdown prompt:
//! - One section per annotation, in input order
//! - Element label, viewport position, and the verbatim feedback
//! - Static guidelines and constraints appended to every section

use pinpoint_core::{now_millis, Annotation, GeneratedPrompt, PromptConfig};
use tracing::debug;
use uuid::Uuid;

/// Separator between annotation sections
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Render the prompt text for `annotations` on `url`
///
/// Pure and deterministic: identical input yields identical output.
pub fn format_prompt(annotations: &[Annotation], url: &str, config: &PromptConfig) -> String {
    let sections: Vec<String> = annotations
        .iter()
        .enumerate()
        .map(|(index, annotation)| format_annotation(annotation, index + 1, config))
        .collect();

    format!(
        "## UI Feedback for {}\n\n{}\n",
        url,
        sections.join(SECTION_SEPARATOR)
    )
}

/// Render the prompt and wrap it as a history entry
pub fn generate_prompt(
    annotations: &[Annotation],
    url: &str,
    config: &PromptConfig,
) -> GeneratedPrompt {
    let prompt = format_prompt(annotations, url, config);
    debug!(
        "Generated prompt for {} ({} annotations, {} bytes)",
        url,
        annotations.len(),
        prompt.len()
    );

    GeneratedPrompt {
        id: Uuid::new_v4().to_string(),
        url: url.to_string(),
        prompt,
        annotation_count: annotations.len(),
        created_at: now_millis(),
    }
}

fn format_annotation(annotation: &Annotation, index: usize, config: &PromptConfig) -> String {
    let context = &annotation.context;
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("### Annotation {}", index));
    lines.push(String::new());

    lines.push(format!("**Element:** {}", context.display_label()));

    if let Some((x, y)) = context.viewport_position() {
        lines.push(format!("**Position:** {}%, {}%", x, y));
    }

    lines.push(format!("**Feedback:** {}", annotation.note));

    push_block(&mut lines, "Guidelines", &config.guidelines);
    push_block(&mut lines, "Constraints", &config.constraints);

    lines.join("\n")
}

fn push_block(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(format!("**{}:**", title));
    for item in items {
        lines.push(format!("- {}", item));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use pinpoint_core::{ElementContext, Rect, Viewport};

    fn annotation(note: &str, label: Option<&str>, left: f64, top: f64) -> Annotation {
        Annotation {
            id: format!("id-{}", note),
            note: note.to_string(),
            context: ElementContext {
                selector: "#x".to_string(),
                tag_name: "button".to_string(),
                component_label: label.map(str::to_string),
                rect: Rect::new(top, left, 10.0, 10.0),
                viewport: Viewport::new(1000.0, 500.0),
                styles: IndexMap::new(),
                animations: Vec::new(),
                attributes: IndexMap::new(),
                timestamp: 1,
            },
            created_at: 1,
        }
    }

    #[test]
    fn test_single_annotation_layout() {
        let prompt = format_prompt(
            &[annotation("too small", None, 100.0, 50.0)],
            "http://localhost:3000",
            &PromptConfig::default(),
        );

        let expected = "\
## UI Feedback for http://localhost:3000

### Annotation 1

**Element:** button
**Position:** 10%, 10%
**Feedback:** too small

**Guidelines:**
- preserve existing interaction patterns
- maintain current animation logic unless specified
- keep accessibility (aria labels, keyboard nav)

**Constraints:**
- mobile viewport must work
- loading states must remain intact
";
        assert_eq!(prompt, expected);
    }

    #[test]
    fn test_sections_in_order_with_separator() {
        let prompt = format_prompt(
            &[
                annotation("first", Some("Header"), 0.0, 0.0),
                annotation("second", Some("Footer"), 500.0, 450.0),
            ],
            "http://localhost:5173/",
            &PromptConfig::default(),
        );

        assert_eq!(prompt.matches(SECTION_SEPARATOR).count(), 1);
        let first = prompt.find("### Annotation 1").unwrap();
        let second = prompt.find("### Annotation 2").unwrap();
        assert!(first < second);
        assert!(prompt.contains("**Element:** Header"));
        assert!(prompt.contains("**Position:** 50%, 90%"));
        assert_eq!(prompt.matches("**Guidelines:**").count(), 2);
    }

    #[test]
    fn test_note_is_verbatim() {
        let note = "make this *snappier* & use `ease-out` <3";
        let prompt = format_prompt(
            &[annotation(note, None, 0.0, 0.0)],
            "http://localhost",
            &PromptConfig::default(),
        );
        assert!(prompt.contains(&format!("**Feedback:** {}", note)));
    }

    #[test]
    fn test_zero_viewport_omits_position() {
        let mut a = annotation("hidden frame", None, 10.0, 10.0);
        a.context.viewport = Viewport::new(0.0, 0.0);
        let prompt = format_prompt(&[a], "http://localhost", &PromptConfig::default());
        assert!(!prompt.contains("**Position:**"));
        assert!(prompt.contains("**Element:** button"));
    }

    #[test]
    fn test_empty_blocks_are_skipped() {
        let config = PromptConfig {
            guidelines: vec!["match the design system".to_string()],
            constraints: Vec::new(),
        };
        let prompt = format_prompt(&[annotation("x", None, 0.0, 0.0)], "u", &config);
        assert!(prompt.contains("- match the design system"));
        assert!(!prompt.contains("**Constraints:**"));
    }

    #[test]
    fn test_deterministic_except_metadata() {
        let annotations = vec![annotation("too small", None, 100.0, 50.0)];
        let config = PromptConfig::default();

        let a = generate_prompt(&annotations, "http://localhost:3000", &config);
        let b = generate_prompt(&annotations, "http://localhost:3000", &config);
        assert_eq!(a.prompt, b.prompt);
        assert_ne!(a.id, b.id);
        assert_eq!(a.annotation_count, 1);
        assert_eq!(a.url, "http://localhost:3000");
    }
}
