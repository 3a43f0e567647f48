//! New-file stubs for classes, interfaces, enums, records and annotations.

use crate::editor::EditorSession;
use crate::error::{EditError, EditResult};
use crate::project::ProjectLayout;
use clap::ValueEnum;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum JavaFileKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

pub fn boilerplate(kind: JavaFileKind, package: &str, name: &str) -> String {
    match kind {
        JavaFileKind::Class => format!("package {package};\n\npublic class {name} {{\n\n}}\n"),
        JavaFileKind::Interface => {
            format!("package {package};\n\npublic interface {name} {{\n\n}}\n")
        }
        JavaFileKind::Enum => format!("package {package};\n\npublic enum {name} {{\n\n}}\n"),
        JavaFileKind::Record => format!("package {package};\n\npublic record {name}(\n\n) {{}}\n"),
        JavaFileKind::Annotation => {
            format!("package {package};\n\npublic @interface {name} {{\n\n}}\n")
        }
    }
}

pub fn file_path(source_root: &Path, package: &str, name: &str) -> PathBuf {
    let mut path = source_root.to_path_buf();
    path.extend(package.split('.').filter(|p| !p.is_empty()));
    path.push(format!("{name}.java"));
    path
}

/// Write a stub under the project's source root and open it. Never
/// overwrites an existing file.
pub fn create_java_file(
    layout: &ProjectLayout,
    kind: JavaFileKind,
    package: &str,
    name: &str,
    editor: &mut dyn EditorSession,
) -> EditResult<PathBuf> {
    let path = file_path(&layout.source_root()?, package, name);
    if path.exists() {
        return Err(EditError::AlreadyExists(path));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| EditError::io(parent, e))?;
    }
    fs::write(&path, boilerplate(kind, package, name)).map_err(|e| EditError::io(&path, e))?;
    info!(component = "scaffold", operation = "create_java_file", kind = ?kind, path = %path.display(), "stub created");

    if let Err(e) = editor.open_new_file(&path) {
        warn!(component = "scaffold", operation = "create_java_file", path = %path.display(), error = %e, "editor open failed");
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::test_support::{EditorCall, RecordingEditor};

    fn layout(root: &Path) -> ProjectLayout {
        ProjectLayout {
            root: root.to_path_buf(),
            main_class: Some(root.join("src/main/java/com/example/App.java")),
            root_package: Some("com.example".to_string()),
        }
    }

    #[test]
    fn boilerplate_per_kind() {
        assert_eq!(
            boilerplate(JavaFileKind::Class, "com.example", "Invoice"),
            "package com.example;\n\npublic class Invoice {\n\n}\n"
        );
        assert_eq!(
            boilerplate(JavaFileKind::Record, "com.example", "Money"),
            "package com.example;\n\npublic record Money(\n\n) {}\n"
        );
        assert!(boilerplate(JavaFileKind::Annotation, "a", "Audited").contains("public @interface Audited {"));
    }

    #[test]
    fn creates_stub_under_source_root() {
        let tmp = tempfile::tempdir().unwrap();
        let mut editor = RecordingEditor::default();

        let path = create_java_file(
            &layout(tmp.path()),
            JavaFileKind::Enum,
            "com.example.billing",
            "Status",
            &mut editor,
        )
        .unwrap();

        assert_eq!(
            path,
            tmp.path().join("src/main/java/com/example/billing/Status.java")
        );
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "package com.example.billing;\n\npublic enum Status {\n\n}\n"
        );
        assert_eq!(editor.calls, vec![EditorCall::OpenNewFile(path)]);
    }

    #[test]
    fn refuses_to_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let existing = tmp.path().join("src/main/java/com/example/Taken.java");
        fs::create_dir_all(existing.parent().unwrap()).unwrap();
        fs::write(&existing, "keep me").unwrap();
        let mut editor = RecordingEditor::default();

        let err = create_java_file(
            &layout(tmp.path()),
            JavaFileKind::Class,
            "com.example",
            "Taken",
            &mut editor,
        )
        .unwrap_err();

        assert!(matches!(err, EditError::AlreadyExists(p) if p == existing));
        assert_eq!(fs::read_to_string(&existing).unwrap(), "keep me");
        assert!(editor.calls.is_empty());
    }

    #[test]
    fn missing_main_class_cannot_proceed() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = ProjectLayout {
            root: tmp.path().to_path_buf(),
            main_class: None,
            root_package: None,
        };
        let err = create_java_file(
            &layout,
            JavaFileKind::Class,
            "a",
            "B",
            &mut RecordingEditor::default(),
        )
        .unwrap_err();
        assert!(matches!(err, EditError::MainClassNotFound));
    }
}
