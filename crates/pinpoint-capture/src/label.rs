//! Component label resolution
//!
//! A label is the human-readable name used for an element in prompt text.
//! Framework metadata is consulted first through a pluggable [`LabelResolver`];
//! when that yields nothing, [`simplified_label`] builds `tag#id`, `tag.class`
//! or the bare tag, skipping atomic-CSS utility classes.

use pinpoint_core::Result;
use pinpoint_dom::{Document, NodeId};
use regex::RegexSet;
use std::sync::OnceLock;
use tracing::warn;

/// Source of framework component names
pub trait LabelResolver: Send + Sync {
    /// Component name for `node`, or `None` when no metadata is available
    fn resolve(&self, doc: &Document, node: NodeId) -> Result<Option<String>>;
}

/// Walks the owner component chain recorded by the host framework
///
/// Names starting with `_` are internal or anonymous and are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameworkLabelResolver;

impl LabelResolver for FrameworkLabelResolver {
    fn resolve(&self, doc: &Document, node: NodeId) -> Result<Option<String>> {
        Ok(doc
            .component_chain(node)
            .iter()
            .map(|name| name.trim())
            .find(|name| !name.is_empty() && !name.starts_with('_'))
            .map(str::to_string))
    }
}

/// Never reports a component name
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLabelResolver;

impl LabelResolver for NoopLabelResolver {
    fn resolve(&self, _doc: &Document, _node: NodeId) -> Result<Option<String>> {
        Ok(None)
    }
}

static UTILITY_PATTERNS: OnceLock<RegexSet> = OnceLock::new();

/// Values a scale-based utility accepts after its prefix
const SCALE: &str = r"(?:\d+(?:\.\d+)?|\d+/\d+|\[[^\]]+\]|px|auto|full|screen|svh|dvh|min|max|fit|none|xs|sm|md|lg|base|\d?xl|prose)";

/// Palette colors with an optional shade and opacity
const COLOR: &str = r"(?:(?:slate|gray|zinc|neutral|stone|red|orange|amber|yellow|lime|green|emerald|teal|cyan|sky|blue|indigo|violet|purple|fuchsia|pink|rose)-\d{2,3}|white|black|transparent|current|inherit)(?:/\d+)?";

fn utility_patterns() -> &'static RegexSet {
    UTILITY_PATTERNS.get_or_init(|| {
        let patterns = [
            // Variants: hover:, md:, dark:, group-hover: ...
            r"^[\w-]+:.+".to_string(),
            // Spacing
            format!(r"^-?(?:p|px|py|pt|pr|pb|pl|ps|pe|m|mx|my|mt|mr|mb|ml|ms|me|space-x|space-y|gap|gap-x|gap-y)-{SCALE}$"),
            // Sizing
            format!(r"^(?:w|h|min-w|min-h|max-w|max-h|size|basis)-{SCALE}$"),
            // Color
            format!(r"^(?:text|bg|from|via|to|fill|stroke|border|ring|outline|decoration|placeholder|divide|accent|caret|shadow)-{COLOR}$"),
            // Typography
            r"^text-(?:xs|sm|base|lg|\d?xl|left|center|right|justify|start|end|wrap|nowrap|ellipsis|clip)$".to_string(),
            r"^font-(?:thin|extralight|light|normal|medium|semibold|bold|extrabold|black|sans|serif|mono)$".to_string(),
            r"^leading-(?:none|tight|snug|normal|relaxed|loose|\d+)$".to_string(),
            r"^tracking-(?:tighter|tight|normal|wide|wider|widest)$".to_string(),
            // Borders and effects
            format!(r"^(?:border|rounded|ring|outline|shadow|divide)(?:-(?:x|y|t|r|b|l|s|e|tl|tr|bl|br))?(?:-{SCALE})?$"),
            format!(r"^(?:opacity|blur)(?:-{SCALE})?$"),
            // Flex and grid
            r"^flex-(?:row|col|wrap|nowrap|row-reverse|col-reverse|wrap-reverse|1|auto|initial|none)$".to_string(),
            r"^grid-(?:cols|rows)-(?:\d+|none|subgrid|\[[^\]]+\])$".to_string(),
            r"^grid-flow-(?:row|col|dense|row-dense|col-dense)$".to_string(),
            r"^(?:col|row)-(?:span-(?:\d+|full)|start-\d+|end-\d+|auto)$".to_string(),
            r"^(?:items|self)-(?:start|end|center|baseline|stretch|auto)$".to_string(),
            r"^(?:justify|content|place-content|place-items|place-self)-(?:start|end|center|between|around|evenly|stretch|normal|baseline)$".to_string(),
            r"^order-(?:\d+|first|last|none)$".to_string(),
            r"^(?:grow|shrink)-0$".to_string(),
            // Position and transforms
            format!(r"^-?(?:top|right|bottom|left|inset|inset-x|inset-y|start|end)-{SCALE}$"),
            r"^-?z-(?:\d+|auto)$".to_string(),
            format!(r"^-?(?:translate-x|translate-y|rotate|scale|scale-x|scale-y|skew-x|skew-y)-{SCALE}$"),
            // Behaviour
            r"^overflow(?:-[xy])?-(?:auto|hidden|clip|visible|scroll)$".to_string(),
            r"^cursor-(?:pointer|default|wait|text|move|help|not-allowed|none|grab|grabbing|auto)$".to_string(),
            r"^select-(?:none|text|all|auto)$".to_string(),
            r"^pointer-events-(?:none|auto)$".to_string(),
            r"^transition-(?:all|colors|opacity|shadow|transform|none)$".to_string(),
            r"^(?:duration|delay)-\d+$".to_string(),
            r"^ease-(?:linear|in|out|in-out)$".to_string(),
            r"^animate-(?:spin|ping|pulse|bounce|none)$".to_string(),
            r"^aspect-(?:auto|square|video|\[[^\]]+\])$".to_string(),
            r"^object-(?:contain|cover|fill|none|scale-down|center|top|bottom|left|right)$".to_string(),
            r"^whitespace-(?:normal|nowrap|pre|pre-line|pre-wrap|break-spaces)$".to_string(),
            r"^break-(?:normal|words|all|keep)$".to_string(),
            // Single-token layout and text utilities
            r"^(?:block|inline|inline-block|inline-flex|inline-grid|flex|grid|hidden|contents|table|static|fixed|absolute|relative|sticky|container|truncate|uppercase|lowercase|capitalize|italic|underline|antialiased|visible|invisible|grow|shrink|transition)$".to_string(),
        ];
        RegexSet::new(patterns).unwrap_or_else(|e| {
            warn!("Utility class patterns failed to compile: {}", e);
            RegexSet::empty()
        })
    })
}

/// Whether `class_name` looks like an atomic-CSS utility token
pub fn is_utility_class(class_name: &str) -> bool {
    utility_patterns().is_match(class_name)
}

/// `tag#id`, else `tag.class` with the first non-utility class, else `tag`
pub fn simplified_label(doc: &Document, node: NodeId) -> String {
    let tag = doc.tag_name(node).unwrap_or_default();

    if let Some(id) = doc.attr(node, "id").filter(|id| !id.is_empty()) {
        return format!("{}#{}", tag, id);
    }

    match doc
        .class_list(node)
        .into_iter()
        .find(|class_name| !is_utility_class(class_name))
    {
        Some(class_name) => format!("{}.{}", tag, class_name),
        None => tag.to_string(),
    }
}
