//! CSS selector synthesis for matched elements.
//!
//! An element with a non-empty `id` is addressed as `#id`. Everything else
//! gets a structural path rooted at `html`, one `tag:nth-of-type(n)` segment
//! per ancestor below the root element.

use crate::dom::Node;
use crate::sibling::sibling_index;

const SEGMENT_SEPARATOR: &str = " > ";

/// Backslash-escape every character that is not alphanumeric, `-` or `_`.
pub fn css_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if !(ch.is_alphanumeric() || ch == '-' || ch == '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Compute a selector addressing `node` within its document.
///
/// Returns an empty string for non-element nodes; callers treat that as
/// unusable.
pub fn synthesize(node: Node<'_>) -> String {
    if !node.is_element() {
        return String::new();
    }

    if let Some(id) = node.non_empty_attr("id") {
        return format!("#{}", css_escape(id));
    }

    let mut segments = Vec::new();
    let mut cur = Some(node);
    while let Some(el) = cur {
        let Some(tag) = el.tag_name() else { break };
        segments.push(format!("{tag}:nth-of-type({})", sibling_index(el)));

        cur = el
            .parent()
            .filter(|parent| parent.is_element() && !parent.is_html_root());
    }
    segments.push("html".to_string());
    segments.reverse();
    segments.join(SEGMENT_SEPARATOR)
}
