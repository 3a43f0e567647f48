//! Buffer mutation protocol
//!
//! Every step takes a tree and returns a new one: merge imports, locate the
//! insertion point, splice, re-parse, persist. Nothing touches disk until
//! the final tree is known, and the in-memory tree is only swapped after
//! the write succeeds.

pub mod imports;

pub use imports::{ImportSet, merge_imports};

use crate::editor::EditorSession;
use crate::error::{EditError, EditResult};
use crate::source_file::SourceFile;
use crate::syntax::SyntaxTree;
use crate::syntax::locator::field_insert_offset;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Ask the editor to save after reloading.
    pub save: bool,
    /// Compute everything, write nothing.
    pub dry_run: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            save: true,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileUpdate {
    pub path: PathBuf,
    pub written: bool,
    pub diff: String,
}

/// Insert `text` at byte `offset` of the tree's source and re-parse.
pub fn splice_and_reparse(tree: &SyntaxTree, text: &str, offset: usize) -> EditResult<SyntaxTree> {
    let source = tree.source();
    if offset > source.len() || !source.is_char_boundary(offset) {
        return Err(EditError::RuntimeInvariant(format!(
            "splice offset {offset} is not a boundary of a {} byte buffer",
            source.len()
        )));
    }
    let mut spliced = String::with_capacity(source.len() + text.len());
    spliced.push_str(&source[..offset]);
    spliced.push_str(text);
    spliced.push_str(&source[offset..]);
    debug!(
        component = "mutation",
        operation = "splice_and_reparse",
        offset,
        inserted = text.len(),
        "splicing fragment"
    );
    SyntaxTree::parse_source(spliced)
}

/// Write `tree` to the file's path, then adopt it, then tell the editor.
pub fn persist(
    file: &mut SourceFile,
    tree: SyntaxTree,
    editor: &mut dyn EditorSession,
    options: WriteOptions,
) -> EditResult<FileUpdate> {
    let path = file.path().to_path_buf();
    let diff = diffy::create_patch(file.tree().source(), tree.source()).to_string();

    if options.dry_run {
        info!(component = "mutation", operation = "persist", path = %path.display(), "dry run, not writing");
        file.replace_tree(tree);
        return Ok(FileUpdate {
            path,
            written: false,
            diff,
        });
    }

    fs::write(&path, tree.source()).map_err(|e| EditError::io(&path, e))?;
    file.replace_tree(tree);
    info!(component = "mutation", operation = "persist", path = %path.display(), "file written");

    // The write already happened; editor hiccups don't undo it.
    if let Err(e) = editor.open_or_reload(&path) {
        warn!(component = "mutation", operation = "persist", path = %path.display(), error = %e, "editor reload failed");
    }
    if options.save
        && let Err(e) = editor.save(&path)
    {
        warn!(component = "mutation", operation = "persist", path = %path.display(), error = %e, "editor save failed");
    }

    Ok(FileUpdate {
        path,
        written: true,
        diff,
    })
}

/// Merge imports, find the insertion point, splice `fragment`, persist.
/// On failure nothing is written for this file.
pub fn update_file(
    file: &mut SourceFile,
    fragment: &str,
    pending_imports: &ImportSet,
    editor: &mut dyn EditorSession,
    options: WriteOptions,
) -> EditResult<FileUpdate> {
    let merged = merge_imports(file.tree(), pending_imports)?;
    let offset = field_insert_offset(&merged)?
        .ok_or_else(|| EditError::InsertionPointNotFound(file.path().to_path_buf()))?;
    let spliced = splice_and_reparse(&merged, fragment, offset)?;
    persist(file, spliced, editor, options)
}
