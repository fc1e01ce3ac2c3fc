use serde::{Deserialize, Serialize};

use crate::dom::Node;
use crate::selector::synthesize;

/// Owned snapshot of one matched element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub selector: String,
}

impl ElementDescriptor {
    /// Snapshot `node`, synthesizing its selector.
    ///
    /// Returns `None` for nodes whose selector comes out empty.
    pub fn from_node(node: Node<'_>) -> Option<Self> {
        let selector = synthesize(node);
        if selector.is_empty() {
            return None;
        }
        Some(Self {
            tag: node.tag_name().unwrap_or_default().to_string(),
            id: node.non_empty_attr("id").map(str::to_string),
            classes: node.classes().into_iter().map(str::to_string).collect(),
            role: node.non_empty_attr("role").map(str::to_string),
            selector,
        })
    }

    /// The synthetic descriptor standing for the whole page body.
    pub fn page_body() -> Self {
        Self {
            tag: "body".to_string(),
            id: None,
            classes: Vec::new(),
            role: None,
            selector: "body".to_string(),
        }
    }
}

/// Deterministic description used whenever no generated text is available.
pub fn fallback_description(descriptor: &ElementDescriptor) -> String {
    format!(
        "A page element represented by a <{}> tag with ID '{}'.",
        descriptor.tag,
        descriptor.id.as_deref().unwrap_or("none")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn snapshot_copies_attributes() {
        let doc = Document::parse(
            r#"<nav id="top" class="menu sticky" role="navigation"></nav>"#,
        );
        let nav = doc.select("nav", 1).unwrap()[0];
        let d = ElementDescriptor::from_node(nav).unwrap();
        assert_eq!(d.tag, "nav");
        assert_eq!(d.id.as_deref(), Some("top"));
        assert_eq!(d.classes, ["menu", "sticky"]);
        assert_eq!(d.role.as_deref(), Some("navigation"));
        assert_eq!(d.selector, "#top");
    }

    #[test]
    fn text_nodes_are_not_described() {
        let doc = Document::parse("<p>words</p>");
        let p = doc.select("p", 1).unwrap()[0];
        let text = p.children().next().unwrap();
        assert!(ElementDescriptor::from_node(text).is_none());
    }

    #[test]
    fn fallback_mentions_tag_and_id() {
        let mut d = ElementDescriptor::page_body();
        assert_eq!(
            fallback_description(&d),
            "A page element represented by a <body> tag with ID 'none'."
        );
        d.tag = "main".into();
        d.id = Some("app".into());
        assert_eq!(
            fallback_description(&d),
            "A page element represented by a <main> tag with ID 'app'."
        );
    }
}
