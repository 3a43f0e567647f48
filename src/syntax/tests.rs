use super::locator::{
    field_insert_offset, has_annotation, has_method, import_key, import_nodes, package_name,
    public_class_name, public_class_node,
};
use super::{SyntaxTree, find_descendant};
use crate::error::EditError;

const ORDER_SRC: &str = r#"package com.example.orders;

import java.util.List;
import static org.junit.Assert.assertEquals;

@Entity
@Table(name = "orders")
public class Order {
    private Long id;

    public Long getId() { return id; }

    static class Line {
        public boolean equals(Object o) { return false; }
    }
}

class Helper {}
"#;

fn order_tree() -> SyntaxTree {
    SyntaxTree::parse(ORDER_SRC.as_bytes()).unwrap()
}

#[test]
fn parse_rejects_invalid_utf8() {
    let err = SyntaxTree::parse(&[0x70, 0xff, 0xfe]).unwrap_err();
    assert!(matches!(err, EditError::Parse(_)));
}

#[test]
fn parse_accepts_broken_java() {
    let tree = SyntaxTree::parse(b"public class {").unwrap();
    assert!(tree.has_error());
    assert_eq!(tree.source(), "public class {");
}

#[test]
fn query_returns_captures_in_document_order() {
    let tree = order_tree();
    let classes = tree.query("(class_declaration) @class_decl").unwrap();
    let names: Vec<_> = classes
        .iter()
        .filter_map(|c| c.child_by_field_name("name"))
        .map(|n| tree.text(n))
        .collect();
    assert_eq!(names, vec!["Order", "Line", "Helper"]);
}

#[test]
fn query_reports_malformed_pattern() {
    let tree = order_tree();
    let err = tree.query("(class_declaration").unwrap_err();
    match err {
        EditError::Query { pattern, .. } => assert_eq!(pattern, "(class_declaration"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn find_descendant_is_depth_first() {
    let tree = order_tree();
    let modifiers = find_descendant(tree.root(), "modifiers").unwrap();
    assert!(tree.text(modifiers).starts_with("@Entity"));
    assert!(find_descendant(tree.root(), "enum_declaration").is_none());
}

#[test]
fn public_class_tolerates_annotation_block() {
    let tree = order_tree();
    assert_eq!(public_class_name(&tree).unwrap().as_deref(), Some("Order"));
}

#[test]
fn public_class_with_trailing_modifiers() {
    let tree = SyntaxTree::parse(b"public final class Invoice {}").unwrap();
    assert_eq!(public_class_name(&tree).unwrap(), None);
    assert_eq!(field_insert_offset(&tree).unwrap(), None);
}

#[test]
fn public_class_on_annotation_line() {
    let tree = SyntaxTree::parse(b"@Entity public class Invoice {}").unwrap();
    assert_eq!(public_class_name(&tree).unwrap().as_deref(), Some("Invoice"));
}

#[test]
fn nested_public_class_is_not_the_public_class() {
    let tree =
        SyntaxTree::parse(b"class Helper {\n    public static class Nested {\n    }\n}\n").unwrap();
    assert!(public_class_node(&tree).unwrap().is_none());
    assert_eq!(public_class_name(&tree).unwrap(), None);
    assert_eq!(field_insert_offset(&tree).unwrap(), None);

    let tree = SyntaxTree::parse(b"class Outer {\n    public class Inner {}\n}\n").unwrap();
    assert_eq!(public_class_name(&tree).unwrap(), None);
}

#[test]
fn no_public_class_is_not_an_error() {
    let tree = SyntaxTree::parse(b"class Hidden { int x; }").unwrap();
    assert!(public_class_node(&tree).unwrap().is_none());
    assert_eq!(field_insert_offset(&tree).unwrap(), None);
    assert!(!has_annotation(&tree, "Entity").unwrap());
    assert!(!has_method(&tree, "equals").unwrap());
}

#[test]
fn annotations_match_by_exact_name() {
    let tree = order_tree();
    assert!(has_annotation(&tree, "Entity").unwrap());
    assert!(has_annotation(&tree, "Table").unwrap());
    assert!(!has_annotation(&tree, "Ent").unwrap());
    assert!(!has_annotation(&tree, "@Entity").unwrap());
}

#[test]
fn methods_only_count_in_public_class_body() {
    let tree = order_tree();
    assert!(has_method(&tree, "getId").unwrap());
    assert!(!has_method(&tree, "equals").unwrap());
}

#[test]
fn insert_offset_follows_class_body_brace() {
    let tree = order_tree();
    let anchor = "public class Order {";
    let expected = ORDER_SRC.find(anchor).unwrap() + anchor.len();
    assert_eq!(field_insert_offset(&tree).unwrap(), Some(expected));
}

#[test]
fn package_and_imports_are_resolved() {
    let tree = order_tree();
    assert_eq!(
        package_name(&tree).unwrap().as_deref(),
        Some("com.example.orders")
    );
    let keys: Vec<_> = import_nodes(&tree)
        .unwrap()
        .into_iter()
        .map(|node| import_key(&tree, node))
        .collect();
    assert_eq!(
        keys,
        vec!["java.util.List", "static org.junit.Assert.assertEquals"]
    );
}

#[test]
fn default_package_has_no_name() {
    let tree = SyntaxTree::parse(b"public class A {}").unwrap();
    assert_eq!(package_name(&tree).unwrap(), None);
}
