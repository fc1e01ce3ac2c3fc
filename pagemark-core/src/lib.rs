//! Element selection and selector synthesis for rendered web pages.
//!
//! Given a serialized HTML document this crate finds a bounded, tiered set of
//! structurally significant elements, addresses each with a stable CSS
//! selector and assigns it a unique semantic key.
//!
//! Everything here is synchronous and free of global state, so independent
//! documents can be processed from any number of threads.
//!
//! # Overview
//!
//! - [`dom`]: the parsed document and node handles
//! - [`selector::synthesize`]: `#id` or an `nth-of-type` path
//! - [`sibling::sibling_index`]: same-tag position among siblings
//! - [`scan::scan`]: tiered, capped, de-duplicated element discovery
//! - [`rank::rank_and_key`]: ordering, truncation and key assignment
//!
//! # Examples
//!
//! ```rust
//! use pagemark_core::{dom::Document, rank::rank_and_key, scan::scan};
//!
//! let doc = Document::parse(r#"<body><nav id="top"></nav><main></main></body>"#);
//! let ranked = rank_and_key(scan(&doc));
//!
//! let keys: Vec<_> = ranked.iter().map(|r| r.key.as_str()).collect();
//! assert_eq!(keys, ["entire_page_body", "top", "main"]);
//! assert_eq!(ranked[1].descriptor.selector, "#top");
//! ```
pub mod descriptor;
pub mod dom;
pub mod rank;
pub mod scan;
pub mod selector;
pub mod sibling;

pub use descriptor::{fallback_description, ElementDescriptor};
pub use dom::{Document, DomError};
pub use rank::{rank_and_key, PageSummary, RankedElement, SummaryEntry};
pub use scan::{scan, ScanOptions};

/// Parse `html`, scan it and rank the result in one call.
pub fn analyze(html: &str, options: &ScanOptions) -> Vec<RankedElement> {
    let doc = Document::parse(html);
    let found = scan::scan_with(&doc, options);
    rank::rank_and_key_with(found, options.max_ranked_elements)
}
