//! Warning reporting across independent parses.
//!
//! Kept in its own test binary: the warning set is process-wide.

use kestrel_common::warning::has_warned;
use kestrel_html::parse_document;

#[test]
fn test_each_parse_reports_its_own_warnings() {
    let first = parse_document("<!doctype html><p>a</p>").unwrap();
    assert_eq!(first.issues.len(), 1);
    assert!(has_warned("HTML Tokenizer", "markup declaration skipped"));

    let clean = parse_document("<p>b</p>").unwrap();
    assert!(clean.issues.is_empty());
    assert!(!has_warned("HTML Tokenizer", "markup declaration skipped"));

    let second = parse_document("<!doctype html><p>c</p>").unwrap();
    assert_eq!(second.issues.len(), 1);
    assert!(has_warned("HTML Tokenizer", "markup declaration skipped"));
}
