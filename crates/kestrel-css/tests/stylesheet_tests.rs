//! Integration tests for stylesheet parsing.

use kestrel_css::{Rule, parse_stylesheet};

#[test]
fn test_typical_embedded_stylesheet() {
    let sheet = parse_stylesheet(
        r"
        /* base */
        html, body { margin: 0; padding: 0 }
        @media (max-width: 600px) { body { font-size: 14px } }
        a:hover > span[data-x='1;2'] { color: #00f !important; }
        ",
    );

    assert_eq!(sheet.rules.len(), 3);

    let base = sheet.rules[0].as_style().unwrap();
    assert_eq!(base.to_string(), "html,body{margin:0;padding:0}");

    match &sheet.rules[1] {
        Rule::At(rule) => {
            assert_eq!(rule.name, "media");
            assert_eq!(rule.prelude, "(max-width: 600px)");
        }
        Rule::Style(_) => panic!("Expected at-rule"),
    }

    let link = sheet.rules[2].as_style().unwrap();
    assert_eq!(link.selectors[0].text, "a:hover > span[data-x='1;2']");
    assert!(link.declarations[0].important);
    assert_eq!(link.declarations[0].to_string(), "color:#00f !important");
}

#[test]
fn test_empty_and_whitespace_only() {
    assert!(parse_stylesheet("").rules.is_empty());
    assert!(parse_stylesheet("  \n\t /* nothing */ ").rules.is_empty());
}

#[test]
fn test_stray_closing_brace_is_skipped() {
    let sheet = parse_stylesheet("} p { x: y }");
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(sheet.rules[0].to_string(), "p{x:y}");
}

#[test]
fn test_declaration_without_colon_is_dropped() {
    let sheet = parse_stylesheet("p { color red; margin: 0 }");
    let rule = sheet.rules[0].as_style().unwrap();
    assert_eq!(rule.declarations.len(), 1);
    assert_eq!(rule.declarations[0].name, "margin");
}
