use super::splice_and_reparse;
use crate::error::EditResult;
use crate::syntax::SyntaxTree;
use crate::syntax::locator::{import_key, import_nodes, package_node};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Fully-qualified names waiting to be imported. Keyed by exact string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImportSet(BTreeSet<String>);

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn merge(&mut self, other: &ImportSet) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ImportSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for ImportSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

fn import_line(name: &str) -> String {
    format!("import {name};")
}

/// Union of the file's imports and `pending`. Existing imports keep their
/// place; missing ones are appended after the last import (or after the
/// package declaration when there is none).
pub fn merge_imports(tree: &SyntaxTree, pending: &ImportSet) -> EditResult<SyntaxTree> {
    let imports = import_nodes(tree)?;
    let keys: Vec<String> = imports.iter().map(|n| import_key(tree, *n)).collect();
    let existing: HashSet<&str> = keys.iter().map(String::as_str).collect();
    let missing: Vec<&str> = pending
        .iter()
        .filter(|name| !existing.contains(name))
        .collect();
    let has_duplicates = existing.len() != keys.len();

    debug!(
        component = "mutation",
        operation = "merge_imports",
        existing = keys.len(),
        pending = pending.len(),
        missing = missing.len(),
        has_duplicates,
        "merging imports"
    );

    if missing.is_empty() && !has_duplicates {
        return Ok(tree.clone());
    }

    let appended: Vec<String> = missing.iter().map(|name| import_line(name)).collect();

    if has_duplicates {
        // Rebuild the whole block, first occurrence wins.
        let (Some(first), Some(last)) = (imports.first(), imports.last()) else {
            return Ok(tree.clone());
        };
        let mut seen = HashSet::new();
        let mut lines: Vec<String> = imports
            .iter()
            .zip(keys.iter())
            .filter(|(_, key)| seen.insert(key.as_str()))
            .map(|(node, _)| tree.text(*node).to_string())
            .collect();
        lines.extend(appended);
        let source = tree.source();
        let rebuilt = format!(
            "{}{}{}",
            &source[..first.start_byte()],
            lines.join("\n"),
            &source[last.end_byte()..]
        );
        return SyntaxTree::parse_source(rebuilt);
    }

    let block = appended.join("\n");
    if let Some(last) = imports.last() {
        return splice_and_reparse(tree, &format!("\n{block}"), last.end_byte());
    }
    if let Some(package) = package_node(tree)? {
        return splice_and_reparse(tree, &format!("\n\n{block}"), package.end_byte());
    }
    splice_and_reparse(tree, &format!("{block}\n\n"), 0)
}
