//! Tiered element scanner.
//!
//! Patterns are applied in a fixed order. A node matched by several patterns
//! is claimed by the first one, because de-duplication happens on the
//! synthesized selector across the whole scan.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::descriptor::ElementDescriptor;
use crate::dom::Document;

/// Maximum matches taken from a single pattern.
pub const PER_PATTERN_LIMIT: usize = 5;

/// Maximum ranked elements kept after sorting (the page body entry excluded).
pub const MAX_RANKED_ELEMENTS: usize = 10;

/// Priority group of a pattern. Variants are declared in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Semantic landmark tags and ARIA landmark roles.
    Landmark,
    /// Ids conventionally given to the main application container.
    ContainerId,
    /// Search, forms, dialogs and feeds.
    Functional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TieredPattern {
    pub tier: Tier,
    pub css: &'static str,
}

const fn pattern(tier: Tier, css: &'static str) -> TieredPattern {
    TieredPattern { tier, css }
}

/// The scan order. Changing it changes which pattern claims shared nodes.
pub const PATTERNS: &[TieredPattern] = &[
    pattern(Tier::Landmark, "header"),
    pattern(Tier::Landmark, "nav"),
    pattern(Tier::Landmark, "main"),
    pattern(Tier::Landmark, "aside"),
    pattern(Tier::Landmark, "footer"),
    pattern(Tier::Landmark, r#"[role="banner"]"#),
    pattern(Tier::Landmark, r#"[role="navigation"]"#),
    pattern(Tier::Landmark, r#"[role="main"]"#),
    pattern(Tier::Landmark, r#"[role="complementary"]"#),
    pattern(Tier::Landmark, r#"[role="contentinfo"]"#),
    pattern(Tier::ContainerId, r#"[id="main"]"#),
    pattern(Tier::ContainerId, r#"[id="content"]"#),
    pattern(Tier::ContainerId, r#"[id="app"]"#),
    pattern(Tier::ContainerId, r#"[id="root"]"#),
    pattern(Tier::ContainerId, r#"[id="page"]"#),
    pattern(Tier::ContainerId, r#"[id*="main-container"]"#),
    pattern(Tier::ContainerId, r#"[id*="content-wrapper"]"#),
    pattern(Tier::Functional, r#"[role="search"]"#),
    pattern(Tier::Functional, r#"form:not([role="search"])"#),
    pattern(Tier::Functional, r#"[role="dialog"]"#),
    pattern(Tier::Functional, r#"[role="feed"]"#),
];

/// Caps applied by the scanner and ranker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    #[serde(default = "default_per_pattern_limit")]
    pub per_pattern_limit: usize,
    #[serde(default = "default_max_ranked_elements")]
    pub max_ranked_elements: usize,
}

fn default_per_pattern_limit() -> usize {
    PER_PATTERN_LIMIT
}

fn default_max_ranked_elements() -> usize {
    MAX_RANKED_ELEMENTS
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            per_pattern_limit: PER_PATTERN_LIMIT,
            max_ranked_elements: MAX_RANKED_ELEMENTS,
        }
    }
}

/// Scan `doc` with the default caps.
pub fn scan(doc: &Document) -> Vec<ElementDescriptor> {
    scan_with(doc, &ScanOptions::default())
}

/// Collect de-duplicated descriptors in tier, pattern, then document order.
pub fn scan_with(doc: &Document, options: &ScanOptions) -> Vec<ElementDescriptor> {
    let mut found = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for pattern in PATTERNS {
        let matches = match doc.select(pattern.css, options.per_pattern_limit) {
            Ok(nodes) => nodes,
            Err(err) => {
                warn!(pattern = pattern.css, error = %err, "scan.pattern.invalid");
                continue;
            }
        };

        for descriptor in matches.into_iter().filter_map(ElementDescriptor::from_node) {
            if seen.insert(descriptor.selector.clone()) {
                found.push(descriptor);
            }
        }
    }

    debug!(elements = found.len(), "scan.complete");
    found
}
