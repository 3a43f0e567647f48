//! Semantic anchors inside a parsed Java buffer: the public class, its
//! annotations and methods, the package and import declarations, and the
//! byte offset where a new member goes.

use super::{SyntaxTree, child_by_kind, find_descendant};
use crate::error::EditResult;
use tracing::debug;
use tree_sitter::Node;

const CLASS_DECLARATION_QUERY: &str = "(program (class_declaration) @class_decl)";
const PACKAGE_QUERY: &str = "(package_declaration) @package";
const IMPORT_QUERY: &str = "(program (import_declaration) @import)";

/// The first top-level class declaration whose modifiers end with the
/// `public` token on their last non-empty line, so annotation blocks stacked
/// above the keyword don't matter. Nested classes never qualify.
pub fn public_class_node(tree: &SyntaxTree) -> EditResult<Option<Node<'_>>> {
    let classes = tree.query(CLASS_DECLARATION_QUERY)?;
    let found = classes.into_iter().find(|class| {
        child_by_kind(*class, "modifiers")
            .is_some_and(|modifiers| ends_with_public(tree.text(modifiers)))
    });
    debug!(
        component = "locator",
        operation = "public_class_node",
        found = found.is_some(),
        "public class lookup"
    );
    Ok(found)
}

fn ends_with_public(modifiers: &str) -> bool {
    modifiers
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .and_then(|line| line.split_whitespace().next_back())
        == Some("public")
}

pub fn public_class_name(tree: &SyntaxTree) -> EditResult<Option<String>> {
    Ok(public_class_node(tree)?
        .and_then(|class| class.child_by_field_name("name"))
        .map(|name| tree.text(name).to_string()))
}

pub fn has_annotation(tree: &SyntaxTree, name: &str) -> EditResult<bool> {
    let Some(class) = public_class_node(tree)? else {
        return Ok(false);
    };
    let Some(modifiers) = find_descendant(class, "modifiers") else {
        return Ok(false);
    };
    let mut cursor = modifiers.walk();
    let present = modifiers
        .children(&mut cursor)
        .filter(|child| matches!(child.kind(), "marker_annotation" | "annotation"))
        .filter_map(|annotation| annotation.child_by_field_name("name"))
        .any(|ident| tree.text(ident) == name);
    debug!(
        component = "locator",
        operation = "has_annotation",
        annotation = name,
        present,
        "annotation lookup"
    );
    Ok(present)
}

/// Only methods declared directly in the public class body count.
pub fn has_method(tree: &SyntaxTree, name: &str) -> EditResult<bool> {
    let Some(body) = public_class_node(tree)?.and_then(|class| class.child_by_field_name("body"))
    else {
        return Ok(false);
    };
    let mut cursor = body.walk();
    let present = body
        .children(&mut cursor)
        .filter(|child| child.kind() == "method_declaration")
        .filter_map(|method| method.child_by_field_name("name"))
        .any(|ident| tree.text(ident) == name);
    debug!(
        component = "locator",
        operation = "has_method",
        method = name,
        present,
        "method lookup"
    );
    Ok(present)
}

/// Byte offset right after the opening brace of the public class body.
pub fn field_insert_offset(tree: &SyntaxTree) -> EditResult<Option<usize>> {
    let offset = public_class_node(tree)?
        .and_then(|class| class.child_by_field_name("body"))
        .and_then(|body| body.child(0).filter(|brace| brace.kind() == "{"))
        .map(|brace| brace.end_byte());
    debug!(
        component = "locator",
        operation = "field_insert_offset",
        offset = ?offset,
        "insert offset computed"
    );
    Ok(offset)
}

pub fn package_node(tree: &SyntaxTree) -> EditResult<Option<Node<'_>>> {
    Ok(tree.query(PACKAGE_QUERY)?.into_iter().next())
}

pub fn package_name(tree: &SyntaxTree) -> EditResult<Option<String>> {
    let Some(package) = package_node(tree)? else {
        return Ok(None);
    };
    let name = child_by_kind(package, "scoped_identifier")
        .or_else(|| child_by_kind(package, "identifier"))
        .map(|ident| tree.text(ident).to_string());
    Ok(name)
}

/// Top-level import declarations in document order.
pub fn import_nodes(tree: &SyntaxTree) -> EditResult<Vec<Node<'_>>> {
    tree.query(IMPORT_QUERY)
}

/// `import static a.b.C;` → `static a.b.C`, `import a . b.*;` → `a.b.*`.
pub fn import_key(tree: &SyntaxTree, import: Node<'_>) -> String {
    let text = tree.text(import).trim();
    let inner = text
        .strip_prefix("import")
        .unwrap_or(text)
        .trim_end()
        .trim_end_matches(';');
    let mut parts = inner.split_whitespace();
    match parts.next() {
        Some("static") => format!("static {}", parts.collect::<String>()),
        Some(first) => std::iter::once(first).chain(parts).collect(),
        None => String::new(),
    }
}
