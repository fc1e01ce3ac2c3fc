use std::collections::HashSet;

use pagemark_core::rank::PAGE_BODY_KEY;
use pagemark_core::{analyze, Document, ScanOptions};

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><title>Acme</title></head>
<body>
  <div id="root">
    <header class="site-header">
      <nav class="primary nav"><a href="/">Home</a></nav>
      <nav class="secondary nav"><a href="/docs">Docs</a></nav>
    </header>
    <div role="search"><form role="search"><input name="q"></form></div>
    <main id="content">
      <section role="feed"><article>one</article></section>
      <form class="newsletter"><input name="email"></form>
      <form class="contact"><textarea></textarea></form>
    </main>
    <aside role="complementary" class="promo"></aside>
    <div role="dialog" class="cookie-banner"></div>
    <div role="dialog" class="cookie-banner"></div>
    <footer></footer>
  </div>
</body>
</html>"#;

#[test]
fn landing_page_summary_shape() {
    let ranked = analyze(LANDING_PAGE, &ScanOptions::default());

    assert_eq!(ranked[0].key, PAGE_BODY_KEY);
    assert_eq!(ranked[0].descriptor.selector, "body");
    assert!(ranked.len() <= 11);

    let keys: HashSet<_> = ranked.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys.len(), ranked.len());

    // Id-based selectors are the shortest and therefore lead.
    assert_eq!(ranked[1].descriptor.selector, "#root");
    assert_eq!(ranked[1].key, "root");
    assert_eq!(ranked[2].descriptor.selector, "#content");
    assert_eq!(ranked[2].key, "content");

    let dialogs: Vec<_> = ranked
        .iter()
        .filter(|r| r.descriptor.role.as_deref() == Some("dialog"))
        .map(|r| r.key.as_str())
        .collect();
    assert_eq!(dialogs, ["dialog", "dialog_2"]);
}

#[test]
fn repeated_analysis_is_stable() {
    let first = analyze(LANDING_PAGE, &ScanOptions::default());
    let second = analyze(LANDING_PAGE, &ScanOptions::default());
    assert_eq!(first, second);
}

#[test]
fn documents_scan_independently_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(|| {
                let doc = Document::parse(LANDING_PAGE);
                pagemark_core::scan(&doc)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}
