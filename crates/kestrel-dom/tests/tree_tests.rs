//! Tests for DOM tree construction and navigation.

use kestrel_dom::{Attribute, DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its `NodeId`.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag.to_string(), Vec::new())))
}

// ========== append_child ==========

#[test]
fn test_new_tree_has_only_document() {
    let tree = DomTree::new();
    assert_eq!(tree.len(), 1);
    assert!(matches!(
        tree.get(NodeId::ROOT).map(|n| &n.node_type),
        Some(NodeType::Document)
    ));
    assert!(tree.children(NodeId::ROOT).is_empty());
}

#[test]
fn test_append_child_links_parent_and_children() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, div);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    tree.append_child(div, a);
    tree.append_child(div, b);

    assert_eq!(tree.children(div), &[a, b]);
    assert_eq!(tree.parent(a), Some(div));
    assert_eq!(tree.parent(div), Some(NodeId::ROOT));
    assert_eq!(tree.first_child(div), Some(a));
    assert_eq!(tree.first_child(a), None);
}

#[test]
fn test_append_child_ignores_foreign_ids() {
    let mut tree = DomTree::new();
    tree.append_child(NodeId::ROOT, NodeId(42));
    assert!(tree.children(NodeId::ROOT).is_empty());
}

// ========== text ==========

#[test]
fn test_append_text_only_touches_text_nodes() {
    let mut tree = DomTree::new();
    let text = tree.alloc(NodeType::Text(String::new()));
    let div = alloc_element(&mut tree, "div");

    tree.append_text(text, 'h');
    tree.append_text(text, 'i');
    tree.append_text(div, 'x');
    tree.append_text(NodeId(99), 'y');

    assert_eq!(tree.as_text(text), Some("hi"));
    assert_eq!(tree.as_text(div), None);
    assert_eq!(tree.text_content(div), "");
    assert_eq!(tree.len(), 3);
}

#[test]
fn test_text_content_concatenates_descendants() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    let span = alloc_element(&mut tree, "span");
    let a = tree.alloc(NodeType::Text("a".to_string()));
    let b = tree.alloc(NodeType::Text("b".to_string()));
    tree.append_child(NodeId::ROOT, div);
    tree.append_child(div, span);
    tree.append_child(span, a);
    tree.append_child(div, b);

    assert_eq!(tree.text_content(div), "ab");
    assert_eq!(tree.find_element(NodeId::ROOT, "span"), Some(span));
    assert_eq!(tree.find_element(span, "div"), None);
}

// ========== attributes ==========

#[test]
fn test_element_keeps_duplicate_attributes_in_order() {
    let mut tree = DomTree::new();
    let a = tree.alloc(NodeType::Element(ElementData::new(
        "a".to_string(),
        vec![
            Attribute::new("id".to_string(), "first".to_string()),
            Attribute::new("id".to_string(), "second".to_string()),
        ],
    )));

    let values: Vec<&str> = tree
        .as_element(a)
        .unwrap()
        .attrs
        .iter()
        .map(|attr| attr.value.as_str())
        .collect();
    assert_eq!(values, vec!["first", "second"]);
}

// ========== serialization ==========

#[test]
fn test_view_serializes_nested_structure() {
    let mut tree = DomTree::new();
    let p = tree.alloc(NodeType::Element(ElementData::new(
        "p".to_string(),
        vec![Attribute::new("lang".to_string(), "en".to_string())],
    )));
    let text = tree.alloc(NodeType::Text("hi".to_string()));
    tree.append_child(NodeId::ROOT, p);
    tree.append_child(p, text);

    let json = serde_json::to_value(tree.view(tree.root())).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "type": "document",
            "children": [{
                "type": "element",
                "tagName": "p",
                "attributes": [{"name": "lang", "value": "en"}],
                "children": [{"type": "text", "content": "hi"}]
            }]
        })
    );
}
