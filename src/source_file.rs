use crate::error::{EditError, EditResult};
use crate::syntax::SyntaxTree;
use crate::syntax::locator::{has_annotation, package_name, public_class_name};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENTITY_ANNOTATION: &str = "Entity";

/// A Java file on disk plus its current tree. The tree is swapped
/// wholesale on every successful mutation.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    tree: SyntaxTree,
    package: Option<String>,
    class_name: Option<String>,
    is_entity: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceFileInfo {
    pub path: PathBuf,
    pub package: Option<String>,
    pub class_name: Option<String>,
    pub is_entity: bool,
}

impl SourceFile {
    pub fn load(path: impl AsRef<Path>) -> EditResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| EditError::io(path, e))?;
        let tree = SyntaxTree::parse(&bytes)?;
        Self::from_tree(path, tree)
    }

    pub fn from_tree(path: impl Into<PathBuf>, tree: SyntaxTree) -> EditResult<Self> {
        let path = path.into();
        let package = package_name(&tree)?;
        let class_name = public_class_name(&tree)?;
        let is_entity = has_annotation(&tree, ENTITY_ANNOTATION)?;
        debug!(
            component = "source_file",
            operation = "load",
            path = %path.display(),
            package = ?package,
            class_name = ?class_name,
            is_entity,
            "source file resolved"
        );
        Ok(Self {
            path,
            tree,
            package,
            class_name,
            is_entity,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn is_entity(&self) -> bool {
        self.is_entity
    }

    /// `com.example.Order`, or just `Order` in the default package.
    pub fn qualified_name(&self) -> Option<String> {
        let class = self.class_name.as_deref()?;
        Some(match self.package.as_deref() {
            Some(package) => format!("{package}.{class}"),
            None => class.to_string(),
        })
    }

    pub fn info(&self) -> SourceFileInfo {
        SourceFileInfo {
            path: self.path.clone(),
            package: self.package.clone(),
            class_name: self.class_name.clone(),
            is_entity: self.is_entity,
        }
    }

    pub(crate) fn replace_tree(&mut self, tree: SyntaxTree) {
        self.tree = tree;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_resolves_names_and_entity_flag() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Customer.java");
        fs::write(
            &path,
            "package com.example.customers;\n\n@Entity\npublic class Customer {\n}\n",
        )
        .unwrap();

        let file = SourceFile::load(&path).unwrap();
        assert_eq!(file.package(), Some("com.example.customers"));
        assert_eq!(file.class_name(), Some("Customer"));
        assert!(file.is_entity());
        assert_eq!(
            file.qualified_name().as_deref(),
            Some("com.example.customers.Customer")
        );
    }

    #[test]
    fn load_missing_file_is_io_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let err = SourceFile::load(tmp.path().join("Nope.java")).unwrap_err();
        assert!(matches!(err, EditError::Io { .. }));
    }

    #[test]
    fn default_package_qualified_name() {
        let tree = SyntaxTree::parse(b"public class Loose {}").unwrap();
        let file = SourceFile::from_tree("/tmp/Loose.java", tree).unwrap();
        assert_eq!(file.qualified_name().as_deref(), Some("Loose"));
        assert!(!file.is_entity());
    }
}
