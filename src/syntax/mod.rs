//! Java syntax trees
//!
//! Parses source bytes with tree-sitter-java and exposes the small query
//! surface the rest of the crate builds on. A [`SyntaxTree`] owns both the
//! tree-sitter tree and the text it was parsed from, so it can always be
//! spliced and re-parsed without going back to disk.

pub mod locator;

use crate::error::{EditError, EditResult};
use std::sync::OnceLock;
use tracing::debug;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor, StreamingIterator, Tree};

fn java_language() -> &'static Language {
    static LANGUAGE: OnceLock<Language> = OnceLock::new();
    LANGUAGE.get_or_init(|| tree_sitter_java::LANGUAGE.into())
}

/// An immutable parsed Java buffer. Mutations produce a new value.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    tree: Tree,
    source: String,
}

impl SyntaxTree {
    /// Decode and parse raw bytes. Only invalid UTF-8 is an error; broken
    /// Java still yields a tree (with error nodes).
    pub fn parse(bytes: &[u8]) -> EditResult<Self> {
        let source = std::str::from_utf8(bytes)
            .map_err(|e| EditError::Parse(e.to_string()))?
            .to_string();
        Self::parse_source(source)
    }

    pub fn parse_source(source: String) -> EditResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(java_language())
            .map_err(|e| EditError::RuntimeInvariant(format!("set java language: {e}")))?;
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| EditError::RuntimeInvariant("parse returned None".to_string()))?;
        debug!(
            component = "syntax",
            operation = "parse",
            bytes = source.len(),
            has_error = tree.root_node().has_error(),
            "parsed java source"
        );
        Ok(Self { tree, source })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn has_error(&self) -> bool {
        self.tree.root_node().has_error()
    }

    pub fn text(&self, node: Node<'_>) -> &str {
        &self.source[node.byte_range()]
    }

    /// Run a structural pattern and return every capture, outermost first,
    /// in document order.
    pub fn query(&self, pattern: &str) -> EditResult<Vec<Node<'_>>> {
        let query = Query::new(java_language(), pattern).map_err(|e| EditError::Query {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        let mut cursor = QueryCursor::new();
        let mut captures = cursor.captures(&query, self.root(), self.source.as_bytes());
        let mut nodes: Vec<Node<'_>> = Vec::new();
        while let Some((m, index)) = captures.next() {
            nodes.push(m.captures[*index].node);
        }
        nodes.sort_by(|a, b| {
            a.start_byte()
                .cmp(&b.start_byte())
                .then(b.end_byte().cmp(&a.end_byte()))
        });
        nodes.dedup_by(|a, b| a.id() == b.id());
        debug!(
            component = "syntax",
            operation = "query",
            pattern,
            captures = nodes.len(),
            "query finished"
        );
        Ok(nodes)
    }
}

/// Depth-first search for the first node of `kind` rooted at `node`
/// (including `node` itself).
pub fn find_descendant<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    if node.kind() == kind {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = find_descendant(child, kind) {
            return Some(found);
        }
    }
    None
}

pub fn child_by_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

#[cfg(test)]
mod tests;
