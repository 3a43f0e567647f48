use super::{Cli, Command, FieldArgs, InfoArgs, NewArgs};
use crate::config::AppConfig;
use crate::editor::{EditorSession, HeadlessEditor, NvimRemote};
use crate::generator::{ColumnField, TemplateGenerator};
use crate::mutation::{FileUpdate, WriteOptions};
use crate::project::ProjectLayout;
use crate::relationship::{
    CreateOptions, RelationshipReport, create_column_field, create_relationship,
};
use crate::scaffold::create_java_file;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

fn editor_for(config: &AppConfig, dry_run: bool) -> Box<dyn EditorSession> {
    match &config.editor.server {
        Some(server) if !dry_run => Box::new(NvimRemote::new(&config.editor.binary, server)),
        _ => Box::new(HeadlessEditor),
    }
}

fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value).context("serialize report")?;
    writeln!(out, "{s}")?;
    Ok(())
}

fn write_update(out: &mut dyn Write, update: &FileUpdate) -> Result<()> {
    if update.written {
        writeln!(out, "updated {}", update.path.display())?;
    } else {
        writeln!(out, "would update {}", update.path.display())?;
        write!(out, "{}", update.diff)?;
    }
    Ok(())
}

/// Execute one parsed command against the project found from `cwd`.
pub fn run(cli: Cli, config: &AppConfig, cwd: &Path, out: &mut dyn Write) -> Result<()> {
    let layout = ProjectLayout::resolve(cwd).context("resolve project layout")?;
    let generator = TemplateGenerator::new(config.generation.template_settings());
    let mut editor = editor_for(config, cli.dry_run);
    let write = WriteOptions {
        save: config.editor.save_after_write,
        dry_run: cli.dry_run,
    };
    info!(component = "cli", operation = "run", command = ?cli.command, dry_run = cli.dry_run, "running command");

    let (endpoints, relationship) = match &cli.command {
        Command::ManyToOne(args) => (&args.endpoints, args.config()),
        Command::OneToOne(args) => (&args.endpoints, args.config()),
        Command::ManyToMany(args) => (&args.endpoints, args.config()),
        Command::Field(args) => {
            return run_field(args, &layout, &generator, editor.as_mut(), write, cli.json, out);
        }
        Command::New(args) => return run_new(args, &layout, editor.as_mut(), cli.json, out),
        Command::Info(args) => return run_info(args, &layout, out),
    };

    let mut owning = layout
        .resolve_entity(&endpoints.owning)
        .with_context(|| format!("resolve owning entity {}", endpoints.owning))?;
    let mut inverse = layout
        .resolve_entity(&endpoints.inverse)
        .with_context(|| format!("resolve inverse entity {}", endpoints.inverse))?;
    let options = CreateOptions {
        write,
        preflight: config.generation.preflight,
    };
    let report: RelationshipReport = create_relationship(
        &mut owning,
        &mut inverse,
        &relationship,
        &generator,
        editor.as_mut(),
        options,
    )
    .with_context(|| format!("create {} relationship", relationship.kind()))?;

    if cli.json {
        return write_json(out, &report);
    }
    for update in &report.files {
        write_update(out, update)?;
    }
    Ok(())
}

fn run_field(
    args: &FieldArgs,
    layout: &ProjectLayout,
    generator: &TemplateGenerator,
    editor: &mut dyn EditorSession,
    write: WriteOptions,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let mut file = layout
        .resolve_entity(&args.target)
        .with_context(|| format!("resolve entity {}", args.target))?;
    let field = ColumnField {
        type_name: args.type_name.clone(),
        name: args.name.clone(),
        type_import: args.import.clone(),
        nullable: args.nullable,
        unique: args.unique,
        length: args.length,
    };
    let update = create_column_field(&mut file, &field, generator, editor, write)
        .context("create column field")?;
    if json {
        return write_json(out, &update);
    }
    write_update(out, &update)
}

fn run_new(
    args: &NewArgs,
    layout: &ProjectLayout,
    editor: &mut dyn EditorSession,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let package = args
        .package
        .clone()
        .or_else(|| layout.root_package.clone())
        .context("no --package given and the project has no root package")?;
    let path = create_java_file(layout, args.kind, &package, &args.name, editor)
        .with_context(|| format!("create {}", args.name))?;
    if json {
        return write_json(out, &serde_json::json!({ "path": path }));
    }
    writeln!(out, "created {}", path.display())?;
    Ok(())
}

fn run_info(args: &InfoArgs, layout: &ProjectLayout, out: &mut dyn Write) -> Result<()> {
    match &args.target {
        Some(target) => {
            let file = layout
                .resolve_entity(target)
                .with_context(|| format!("resolve entity {target}"))?;
            write_json(out, &file.info())
        }
        None => write_json(out, layout),
    }
}
