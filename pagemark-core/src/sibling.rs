use crate::dom::Node;

/// 1-based position of `node` among its parent's element children sharing
/// its tag name, in document order.
///
/// Unparented and non-element nodes resolve to 1, as does a node that cannot
/// be found among its own siblings.
pub fn sibling_index(node: Node<'_>) -> usize {
    let (Some(tag), Some(parent)) = (node.tag_name(), node.parent()) else {
        return 1;
    };

    parent
        .element_children()
        .filter(|sibling| sibling.tag_name() == Some(tag))
        .position(|sibling| sibling == node)
        .map_or(1, |idx| idx + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn counts_only_same_tag_siblings() {
        let doc = Document::parse(
            "<div><span></span><p id=one></p><span></span><p id=two></p><p id=three></p></div>",
        );
        let ps = doc.select("div > p", 5).unwrap();
        let idx: Vec<_> = ps.into_iter().map(sibling_index).collect();
        assert_eq!(idx, [1, 2, 3]);
    }

    #[test]
    fn text_between_siblings_is_ignored() {
        let doc = Document::parse("<section>text<a></a> more <a id=x></a><!-- c --></section>");
        let x = doc.select("#x", 1).unwrap()[0];
        assert_eq!(sibling_index(x), 2);
    }

    #[test]
    fn degenerate_nodes_resolve_to_one() {
        let doc = Document::parse("<p>hello</p>");
        assert_eq!(sibling_index(doc.root()), 1);

        let p = doc.select("p", 1).unwrap()[0];
        let text = p.children().next().unwrap();
        assert!(!text.is_element());
        assert_eq!(sibling_index(text), 1);
    }
}
