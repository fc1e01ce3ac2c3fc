//! Ranking and semantic key assignment.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::descriptor::ElementDescriptor;
use crate::scan::MAX_RANKED_ELEMENTS;

/// Key of the synthetic entry covering the whole page.
pub const PAGE_BODY_KEY: &str = "entire_page_body";

/// Description attached to the page body entry.
pub const PAGE_BODY_DESCRIPTION: &str =
    "The main wrapper for the entire application, good for global styles.";

/// A descriptor with its final, unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedElement {
    pub key: String,
    pub descriptor: ElementDescriptor,
}

impl RankedElement {
    pub fn page_body() -> Self {
        Self {
            key: PAGE_BODY_KEY.to_string(),
            descriptor: ElementDescriptor::page_body(),
        }
    }

    pub fn is_page_body(&self) -> bool {
        self.key == PAGE_BODY_KEY
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub description: String,
    pub selector: String,
}

/// Keyed summary of a page, in ranked order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub major_elements: IndexMap<String, SummaryEntry>,
}

impl PageSummary {
    pub fn push(&mut self, key: String, description: String, selector: String) {
        self.major_elements.insert(
            key,
            SummaryEntry {
                description,
                selector,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.major_elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.major_elements.is_empty()
    }
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_key(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn candidate_key(d: &ElementDescriptor) -> &str {
    d.id.as_deref()
        .or(d.role.as_deref())
        .or(d.classes.first().map(String::as_str))
        .unwrap_or(&d.tag)
}

/// Rank with the default cap.
pub fn rank_and_key(descriptors: Vec<ElementDescriptor>) -> Vec<RankedElement> {
    rank_and_key_with(descriptors, MAX_RANKED_ELEMENTS)
}

/// Sort by selector length, keep `max_ranked` entries and key them.
///
/// The page body entry always comes first and does not count against
/// `max_ranked`.
pub fn rank_and_key_with(
    mut descriptors: Vec<ElementDescriptor>,
    max_ranked: usize,
) -> Vec<RankedElement> {
    descriptors.sort_by_key(|d| d.selector.chars().count());
    descriptors.truncate(max_ranked);

    let mut out = Vec::with_capacity(descriptors.len() + 1);
    out.push(RankedElement::page_body());

    let mut taken: HashSet<String> = HashSet::from([PAGE_BODY_KEY.to_string()]);
    let mut counts: HashMap<String, usize> = HashMap::new();

    for descriptor in descriptors {
        let base = sanitize_key(candidate_key(&descriptor));
        let count = counts.entry(base.clone()).or_insert(0);

        let key = loop {
            *count += 1;
            let key = if *count == 1 {
                base.clone()
            } else {
                format!("{base}_{count}")
            };
            if !taken.contains(&key) {
                break key;
            }
        };

        taken.insert(key.clone());
        out.push(RankedElement { key, descriptor });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(tag: &str, id: Option<&str>, role: Option<&str>, classes: &[&str], sel: &str) -> ElementDescriptor {
        ElementDescriptor {
            tag: tag.into(),
            id: id.map(Into::into),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            role: role.map(Into::into),
            selector: sel.into(),
        }
    }

    fn keys(ranked: &[RankedElement]) -> Vec<&str> {
        ranked.iter().map(|r| r.key.as_str()).collect()
    }

    #[test]
    fn body_entry_always_first() {
        let ranked = rank_and_key(Vec::new());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].key, PAGE_BODY_KEY);
        assert_eq!(ranked[0].descriptor.selector, "body");
    }

    #[test]
    fn role_collisions_get_numbered() {
        let ranked = rank_and_key(vec![
            desc("div", None, Some("button"), &[], "html > div:nth-of-type(1)"),
            desc("div", None, Some("button"), &[], "html > div:nth-of-type(2)"),
        ]);
        assert_eq!(keys(&ranked), ["entire_page_body", "button", "button_2"]);
    }

    #[test]
    fn key_priority_is_id_role_class_tag() {
        let ranked = rank_and_key(vec![
            desc("nav", Some("top"), Some("navigation"), &["menu"], "#a"),
            desc("aside", None, Some("complementary"), &["side"], "#bb"),
            desc("form", None, None, &["login", "wide"], "#ccc"),
            desc("footer", None, None, &[], "#dddd"),
        ]);
        assert_eq!(
            keys(&ranked),
            ["entire_page_body", "top", "complementary", "login", "footer"]
        );
    }

    #[test]
    fn keys_are_sanitized() {
        let ranked = rank_and_key(vec![desc("div", Some("foo.bar baz"), None, &[], r"#foo\.bar\ baz")]);
        assert_eq!(ranked[1].key, "foo_bar_baz");
    }

    #[test]
    fn sorted_by_selector_length_stably() {
        let ranked = rank_and_key(vec![
            desc("main", None, None, &[], "html > body:nth-of-type(1) > main:nth-of-type(1)"),
            desc("nav", Some("b"), None, &[], "#b"),
            desc("nav", Some("a"), None, &[], "#a"),
        ]);
        assert_eq!(keys(&ranked), ["entire_page_body", "b", "a", "main"]);
    }

    #[test]
    fn truncates_to_ten_plus_body() {
        let many: Vec<_> = (0..30)
            .map(|i| desc("div", Some(&format!("el{i}")), None, &[], &format!("#el{i}")))
            .collect();
        let ranked = rank_and_key(many);
        assert_eq!(ranked.len(), MAX_RANKED_ELEMENTS + 1);
    }

    #[test]
    fn suffix_never_clashes_with_existing_key() {
        let ranked = rank_and_key(vec![
            desc("div", Some("entire_page_body"), None, &[], "#x"),
            desc("div", Some("button_2"), None, &[], "#yy"),
            desc("div", None, Some("button"), &[], "#zzz"),
            desc("div", None, Some("button"), &[], "#wwww"),
        ]);
        let ks = keys(&ranked);
        assert_eq!(
            ks,
            ["entire_page_body", "entire_page_body_2", "button_2", "button", "button_3"]
        );
        let unique: HashSet<_> = ks.iter().collect();
        assert_eq!(unique.len(), ks.len());
    }

    #[test]
    fn summary_serializes_in_insertion_order() {
        let mut summary = PageSummary::default();
        summary.push("z".into(), "last letter".into(), "#z".into());
        summary.push("a".into(), "first letter".into(), "#a".into());
        let json = serde_json::to_string(&summary).unwrap();
        assert_eq!(
            json,
            r##"{"major_elements":{"z":{"description":"last letter","selector":"#z"},"a":{"description":"first letter","selector":"#a"}}}"##
        );
    }
}
