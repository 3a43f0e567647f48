//! Relationship orchestrator
//!
//! Sequences generator and mutation calls across the owning file and,
//! when the mapping calls for it, the inverse file:
//!
//! `Preflight -> BuildOwningFragment -> UpdateOwningFile
//!   [-> BuildInverseFragment -> UpdateInverseFile] -> Done`
//!
//! Any error halts the sequence. Files already written stay written.

pub mod config;

pub use config::{
    CascadeSet, CascadeType, CollectionType, FetchType, ManyToManyConfig, ManyToOneConfig,
    MappingType, OneToOneConfig, RelationshipConfig, RelationshipKind, SideOptions,
};

use crate::editor::EditorSession;
use crate::error::{EditError, EditResult};
use crate::generator::{ColumnField, EntityRef, Fragment, TemplateGenerator};
use crate::mutation::{FileUpdate, WriteOptions, update_file};
use crate::source_file::SourceFile;
use crate::syntax::SyntaxTree;
use crate::syntax::locator::field_insert_offset;
use serde::Serialize;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy)]
pub struct CreateOptions {
    pub write: WriteOptions,
    /// Check every insertion point before the first write.
    pub preflight: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            write: WriteOptions::default(),
            preflight: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationshipReport {
    pub kind: RelationshipKind,
    pub files: Vec<FileUpdate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Preflight,
    BuildOwningFragment,
    UpdateOwningFile,
    BuildInverseFragment,
    UpdateInverseFile,
    Done,
}

struct Progress {
    kind: RelationshipKind,
    stage: Stage,
}

impl Progress {
    fn new(kind: RelationshipKind) -> Self {
        Self {
            kind,
            stage: Stage::Preflight,
        }
    }

    fn advance(&mut self, next: Stage) {
        info!(
            component = "orchestrator",
            operation = %self.kind,
            from = ?self.stage,
            to = ?next,
            "stage transition"
        );
        self.stage = next;
    }

    fn fail(&self, err: EditError) -> EditError {
        error!(
            component = "orchestrator",
            operation = %self.kind,
            stage = ?self.stage,
            error = %err,
            "relationship creation failed"
        );
        err
    }
}

/// Owned copy of a file's class identity; the file itself is mutably
/// borrowed while fragments are applied.
struct ClassIdentity {
    class_name: String,
    package: Option<String>,
}

impl ClassIdentity {
    fn of(file: &SourceFile) -> EditResult<Self> {
        let class_name = file
            .class_name()
            .ok_or_else(|| EditError::InsertionPointNotFound(file.path().to_path_buf()))?;
        if !file.is_entity() {
            warn!(
                component = "orchestrator",
                operation = "resolve",
                path = %file.path().display(),
                class = class_name,
                "class is not annotated with @Entity"
            );
        }
        Ok(Self {
            class_name: class_name.to_string(),
            package: file.package().map(str::to_string),
        })
    }

    fn entity(&self) -> EntityRef<'_> {
        EntityRef::new(&self.class_name, self.package.as_deref())
    }
}

fn ensure_insertion_point(file: &SourceFile) -> EditResult<()> {
    match field_insert_offset(file.tree())? {
        Some(_) => Ok(()),
        None => Err(EditError::InsertionPointNotFound(file.path().to_path_buf())),
    }
}

fn owning_fragment(
    generator: &TemplateGenerator,
    config: &RelationshipConfig,
    owning: EntityRef<'_>,
    inverse: EntityRef<'_>,
) -> Fragment {
    match config {
        RelationshipConfig::ManyToOne(c) => generator.many_to_one(owning, inverse, c.fetch, &c.owning),
        RelationshipConfig::OneToOne(c) => generator.one_to_one_owning(owning, inverse, &c.owning),
        RelationshipConfig::ManyToMany(c) => generator.many_to_many_owning(owning, inverse, &c.owning),
    }
}

fn inverse_fragment(
    generator: &TemplateGenerator,
    config: &RelationshipConfig,
    owning: EntityRef<'_>,
    inverse: EntityRef<'_>,
    inverse_tree: &SyntaxTree,
) -> EditResult<Fragment> {
    match config {
        RelationshipConfig::ManyToOne(c) => {
            Ok(generator.one_to_many(owning, inverse, &c.inverse, c.collection))
        }
        RelationshipConfig::OneToOne(c) => Ok(generator.one_to_one_inverse(owning, inverse, &c.inverse)),
        RelationshipConfig::ManyToMany(c) => {
            generator.many_to_many_inverse(owning, inverse, &c.inverse, inverse_tree)
        }
    }
}

/// Apply `config` to `owning` and, for bidirectional mappings, `inverse`.
///
/// Both handles may point at the same path (self-referential association);
/// the inverse handle then picks up the owning write before its own edit.
pub fn create_relationship(
    owning: &mut SourceFile,
    inverse: &mut SourceFile,
    config: &RelationshipConfig,
    generator: &TemplateGenerator,
    editor: &mut dyn EditorSession,
    options: CreateOptions,
) -> EditResult<RelationshipReport> {
    let kind = config.kind();
    let mut progress = Progress::new(kind);
    let touches_inverse = config.touches_inverse();
    info!(
        component = "orchestrator",
        operation = %kind,
        owning = %owning.path().display(),
        inverse = %inverse.path().display(),
        mapping = ?config.mapping(),
        touches_inverse,
        "creating relationship"
    );

    let owning_id = ClassIdentity::of(owning).map_err(|e| progress.fail(e))?;
    let inverse_id = ClassIdentity::of(inverse).map_err(|e| progress.fail(e))?;
    let same_file = owning.path() == inverse.path();

    if options.preflight {
        ensure_insertion_point(owning).map_err(|e| progress.fail(e))?;
        if touches_inverse && !same_file {
            ensure_insertion_point(inverse).map_err(|e| progress.fail(e))?;
        }
    }

    let mut files = Vec::with_capacity(2);

    progress.advance(Stage::BuildOwningFragment);
    let fragment = owning_fragment(generator, config, owning_id.entity(), inverse_id.entity());

    progress.advance(Stage::UpdateOwningFile);
    let update = update_file(owning, &fragment.text, &fragment.imports, editor, options.write)
        .map_err(|e| progress.fail(e))?;
    files.push(update);

    if same_file {
        inverse.replace_tree(owning.tree().clone());
    }

    if touches_inverse {
        progress.advance(Stage::BuildInverseFragment);
        let fragment = inverse_fragment(
            generator,
            config,
            owning_id.entity(),
            inverse_id.entity(),
            inverse.tree(),
        )
        .map_err(|e| progress.fail(e))?;

        progress.advance(Stage::UpdateInverseFile);
        let update = update_file(inverse, &fragment.text, &fragment.imports, editor, options.write)
            .map_err(|e| progress.fail(e))?;
        files.push(update);

        if same_file {
            owning.replace_tree(inverse.tree().clone());
        }
    }

    progress.advance(Stage::Done);
    Ok(RelationshipReport { kind, files })
}

/// Add a plain `@Column` field to `file`.
pub fn create_column_field(
    file: &mut SourceFile,
    field: &ColumnField,
    generator: &TemplateGenerator,
    editor: &mut dyn EditorSession,
    options: WriteOptions,
) -> EditResult<FileUpdate> {
    info!(
        component = "orchestrator",
        operation = "column_field",
        path = %file.path().display(),
        type_name = %field.type_name,
        "creating column field"
    );
    let fragment = generator.column_field(field);
    update_file(file, &fragment.text, &fragment.imports, editor, options)
}
