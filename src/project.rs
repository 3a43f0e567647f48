//! Project layout resolution: build root, main class, root package and
//! entity lookup. Every piece is optional; commands that need a missing
//! piece report it instead of guessing.

use crate::error::{EditError, EditResult};
use crate::source_file::SourceFile;
use crate::syntax::locator::has_annotation;
use ignore::WalkBuilder;
use serde::Serialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

pub const ROOT_MARKERS: [&str; 5] = [
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "settings.gradle",
    "settings.gradle.kts",
];

pub const MAIN_CLASS_ANNOTATION: &str = "SpringBootApplication";

#[derive(Debug, Clone, Serialize)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub main_class: Option<PathBuf>,
    pub root_package: Option<String>,
}

/// Nearest ancestor of `start` (inclusive) holding a build marker.
pub fn find_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| ROOT_MARKERS.iter().any(|m| dir.join(m).is_file()))
        .map(Path::to_path_buf)
}

/// All `.java` files under `root`, honouring ignore files, in path order.
pub fn java_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for result in WalkBuilder::new(root)
        .git_ignore(true)
        .require_git(false)
        .sort_by_file_path(|a, b| a.cmp(b))
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                warn!(component = "project", operation = "walk", error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
        if is_file && entry.path().extension().is_some_and(|ext| ext == "java") {
            files.push(entry.into_path());
        }
    }
    debug!(component = "project", operation = "walk", root = %root.display(), count = files.len(), "java files found");
    files
}

/// First `.java` file whose public class carries `@SpringBootApplication`.
pub fn find_main_class(root: &Path) -> EditResult<Option<SourceFile>> {
    for path in java_files(root) {
        let Ok(text) = fs::read_to_string(&path) else {
            continue;
        };
        if !text.contains(MAIN_CLASS_ANNOTATION) {
            continue;
        }
        let file = SourceFile::load(&path)?;
        if has_annotation(file.tree(), MAIN_CLASS_ANNOTATION)? {
            info!(component = "project", operation = "find_main_class", path = %path.display(), "main class found");
            return Ok(Some(file));
        }
    }
    Ok(None)
}

/// `src/main/java/com/example/App.java` -> `com.example`.
pub fn package_from_path(path: &Path) -> Option<String> {
    let parts: Vec<&str> = path
        .parent()?
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    let main = parts
        .windows(2)
        .rposition(|pair| pair[0] == "src" && pair[1] == "main")?;
    let package = parts.get(main + 3..)?;
    if package.is_empty() {
        None
    } else {
        Some(package.join("."))
    }
}

impl ProjectLayout {
    pub fn resolve(start: &Path) -> EditResult<Self> {
        let root = match find_root(start) {
            Some(root) => root,
            None => {
                warn!(component = "project", operation = "resolve", start = %start.display(), "no build marker found, using start directory");
                start.to_path_buf()
            }
        };
        let main = find_main_class(&root)?;
        let root_package = main.as_ref().and_then(|m| {
            m.package()
                .map(str::to_string)
                .or_else(|| package_from_path(m.path()))
        });
        let layout = Self {
            root,
            main_class: main.map(|m| m.path().to_path_buf()),
            root_package,
        };
        info!(
            component = "project",
            operation = "resolve",
            root = %layout.root.display(),
            main_class = ?layout.main_class,
            root_package = ?layout.root_package,
            "project resolved"
        );
        Ok(layout)
    }

    pub fn require_main_class(&self) -> EditResult<&Path> {
        self.main_class.as_deref().ok_or(EditError::MainClassNotFound)
    }

    /// The `src/main/<lang>` directory the main class lives under.
    pub fn source_root(&self) -> EditResult<PathBuf> {
        let main = self.require_main_class()?;
        let by_layout = main.ancestors().find(|dir| {
            let parent = dir.parent();
            parent.and_then(Path::file_name).is_some_and(|n| n == "main")
                && parent
                    .and_then(Path::parent)
                    .and_then(Path::file_name)
                    .is_some_and(|n| n == "src")
        });
        if let Some(dir) = by_layout {
            return Ok(dir.to_path_buf());
        }
        // Outside the conventional layout: strip the package directories.
        let mut dir = main
            .parent()
            .ok_or_else(|| EditError::RuntimeInvariant(format!("{} has no parent", main.display())))?
            .to_path_buf();
        if let Some(package) = &self.root_package {
            for _ in package.split('.') {
                dir.pop();
            }
        }
        Ok(dir)
    }

    /// Resolve `target` to an entity file: an existing path is loaded
    /// directly, anything else is treated as a class name.
    pub fn resolve_entity(&self, target: &str) -> EditResult<SourceFile> {
        let as_path = Path::new(target);
        if as_path.extension().is_some_and(|ext| ext == "java") && as_path.is_file() {
            return SourceFile::load(as_path);
        }
        self.find_entity_by_class_name(target)
    }

    pub fn find_entity_by_class_name(&self, class_name: &str) -> EditResult<SourceFile> {
        let candidates = java_files(&self.root)
            .into_iter()
            .filter(|p| p.file_stem().is_some_and(|s| s == class_name));
        for path in candidates {
            let file = SourceFile::load(&path)?;
            if file.class_name() == Some(class_name) && file.is_entity() {
                debug!(component = "project", operation = "find_entity", class = class_name, path = %path.display(), "entity resolved");
                return Ok(file);
            }
        }
        Err(EditError::EntityNotFound(class_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(root: &Path, rel: &str, body: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, body).unwrap();
        path
    }

    fn spring_project() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        put(root, "pom.xml", "<project/>");
        put(
            root,
            "src/main/java/com/example/demo/DemoApplication.java",
            "package com.example.demo;\n\n@SpringBootApplication\npublic class DemoApplication {\n}\n",
        );
        put(
            root,
            "src/main/java/com/example/demo/customers/Customer.java",
            "package com.example.demo.customers;\n\n@Entity\npublic class Customer {\n}\n",
        );
        put(
            root,
            "src/main/java/com/example/demo/customers/CustomerDto.java",
            "package com.example.demo.customers;\n\npublic class CustomerDto {\n}\n",
        );
        tmp
    }

    #[test]
    fn resolves_from_nested_directory() {
        let tmp = spring_project();
        let nested = tmp.path().join("src/main/java/com/example/demo/customers");

        let layout = ProjectLayout::resolve(&nested).unwrap();

        assert_eq!(layout.root, tmp.path());
        assert_eq!(
            layout.main_class.as_deref(),
            Some(tmp.path().join("src/main/java/com/example/demo/DemoApplication.java").as_path())
        );
        assert_eq!(layout.root_package.as_deref(), Some("com.example.demo"));
        assert_eq!(layout.source_root().unwrap(), tmp.path().join("src/main/java"));
    }

    #[test]
    fn missing_marker_and_main_class() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::resolve(tmp.path()).unwrap();
        assert_eq!(layout.root, tmp.path());
        assert!(layout.main_class.is_none());
        assert!(layout.root_package.is_none());
        assert!(matches!(
            layout.source_root(),
            Err(EditError::MainClassNotFound)
        ));
    }

    #[test]
    fn annotation_in_comment_is_not_a_main_class() {
        let tmp = tempfile::tempdir().unwrap();
        put(tmp.path(), "build.gradle", "");
        put(
            tmp.path(),
            "src/main/java/a/Fake.java",
            "package a;\n\n// @SpringBootApplication\npublic class Fake {}\n",
        );
        let layout = ProjectLayout::resolve(tmp.path()).unwrap();
        assert!(layout.main_class.is_none());
    }

    #[test]
    fn package_from_path_components() {
        assert_eq!(
            package_from_path(Path::new("/w/src/main/java/com/example/App.java")).as_deref(),
            Some("com.example")
        );
        assert_eq!(
            package_from_path(Path::new("/w/src/main/kotlin/App.kt")),
            None
        );
        assert_eq!(package_from_path(Path::new("/w/App.java")), None);
    }

    #[test]
    fn entity_lookup_by_class_name() {
        let tmp = spring_project();
        let layout = ProjectLayout::resolve(tmp.path()).unwrap();

        let customer = layout.find_entity_by_class_name("Customer").unwrap();
        assert_eq!(customer.package(), Some("com.example.demo.customers"));

        assert!(matches!(
            layout.find_entity_by_class_name("CustomerDto"),
            Err(EditError::EntityNotFound(name)) if name == "CustomerDto"
        ));
        assert!(matches!(
            layout.find_entity_by_class_name("Invoice"),
            Err(EditError::EntityNotFound(_))
        ));
    }

    #[test]
    fn resolve_entity_accepts_paths() {
        let tmp = spring_project();
        let layout = ProjectLayout::resolve(tmp.path()).unwrap();
        let path = tmp
            .path()
            .join("src/main/java/com/example/demo/customers/Customer.java");
        let file = layout.resolve_entity(path.to_str().unwrap()).unwrap();
        assert_eq!(file.class_name(), Some("Customer"));
    }
}
