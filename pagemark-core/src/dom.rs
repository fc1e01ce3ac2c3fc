//! Read-only view over a parsed HTML document.
//!
//! [`Document`] owns the `scraper` tree; [`Node`] is a cheap, copyable handle
//! into it exposing only what the scanner and selector synthesizer need:
//! attribute lookup, parent/child traversal and CSS querying.

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Selector};

/// Errors surfaced while querying a [`Document`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The query pattern is not a valid CSS selector.
    #[error("invalid selector `{pattern}`: {reason}")]
    InvalidSelector { pattern: String, reason: String },
}

/// A parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse a full serialized HTML document.
    ///
    /// Parsing is lenient: malformed markup is repaired the way a browser
    /// would, so this never fails.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// The document node (not an element).
    pub fn root(&self) -> Node<'_> {
        Node {
            inner: self.html.tree.root(),
        }
    }

    /// The top-level `html` element.
    pub fn root_element(&self) -> Node<'_> {
        Node {
            inner: *self.html.root_element(),
        }
    }

    /// Return up to `limit` elements matching `pattern`, in document order.
    pub fn select(&self, pattern: &str, limit: usize) -> Result<Vec<Node<'_>>, DomError> {
        let selector = Selector::parse(pattern).map_err(|e| DomError::InvalidSelector {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(self
            .html
            .select(&selector)
            .take(limit)
            .map(|el| Node { inner: *el })
            .collect())
    }

    /// Every element in the document, in document order.
    pub fn elements(&self) -> impl Iterator<Item = Node<'_>> {
        self.html
            .tree
            .root()
            .descendants()
            .filter(|n| n.value().is_element())
            .map(|inner| Node { inner })
    }
}

/// Handle to a single node of a [`Document`].
#[derive(Clone, Copy, Debug)]
pub struct Node<'a> {
    inner: NodeRef<'a, scraper::Node>,
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Node<'_> {}

impl<'a> Node<'a> {
    pub fn is_element(&self) -> bool {
        self.inner.value().is_element()
    }

    /// Lowercase tag name, or `None` for non-element nodes.
    pub fn tag_name(&self) -> Option<&'a str> {
        self.inner.value().as_element().map(|el| el.name())
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.inner.value().as_element().and_then(|el| el.attr(name))
    }

    /// Attribute value, treating an empty string as absent.
    pub fn non_empty_attr(&self, name: &str) -> Option<&'a str> {
        self.attr(name).filter(|v| !v.is_empty())
    }

    /// Class tokens in attribute order.
    pub fn classes(&self) -> Vec<&'a str> {
        self.attr("class")
            .map(|raw| raw.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.inner.parent().map(|inner| Node { inner })
    }

    /// All direct children, elements and non-elements alike.
    pub fn children(&self) -> impl Iterator<Item = Node<'a>> {
        self.inner.children().map(|inner| Node { inner })
    }

    /// Direct element children in document order.
    pub fn element_children(&self) -> impl Iterator<Item = Node<'a>> {
        self.inner
            .children()
            .filter(|n| ElementRef::wrap(*n).is_some())
            .map(|inner| Node { inner })
    }

    /// True for the document's `html` element.
    pub fn is_html_root(&self) -> bool {
        self.tag_name() == Some("html")
            && self.parent().is_some_and(|p| p.inner.value().is_document())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_respects_limit_and_order() {
        let doc = Document::parse("<ul><li id=a></li><li id=b></li><li id=c></li></ul>");
        let nodes = doc.select("li", 2).unwrap();
        let ids: Vec<_> = nodes.iter().filter_map(|n| n.attr("id")).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn select_rejects_garbage_pattern() {
        let doc = Document::parse("<p></p>");
        let err = doc.select("[[[", 5).unwrap_err();
        assert!(matches!(err, DomError::InvalidSelector { .. }));
    }

    #[test]
    fn classes_keep_attribute_order() {
        let doc = Document::parse(r#"<div class="  zeta alpha  beta"></div>"#);
        let div = doc.select("div", 1).unwrap()[0];
        assert_eq!(div.classes(), ["zeta", "alpha", "beta"]);
    }

    #[test]
    fn html_root_detection() {
        let doc = Document::parse("<p>hi</p>");
        assert!(doc.root_element().is_html_root());
        assert!(!doc.root().is_element());
        let body = doc.select("body", 1).unwrap()[0];
        assert!(!body.is_html_root());
        assert_eq!(body.parent(), Some(doc.root_element()));
    }
}
