//! Command-line surface: argument structs and the command runner.

mod commands;

pub use commands::run;

use crate::config::CliOverrides;
use crate::relationship::{
    CascadeType, CollectionType, FetchType, ManyToManyConfig, ManyToOneConfig, MappingType,
    OneToOneConfig, RelationshipConfig, SideOptions,
};
use crate::scaffold::JavaFileKind;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "erel",
    version,
    about = "Add JPA relationship mappings and fields to Java entity sources"
)]
pub struct Cli {
    /// Log level (error,warn,info,debug,trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Config file to use instead of the global one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Show the changes as diffs without writing
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Print a JSON report
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Skip the insertion point check on every touched file before writing
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub no_preflight: bool,

    /// Neovim server address to reload edited buffers in
    #[arg(long, global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            log_level: self.log_level.clone(),
            config: self.config.clone(),
            editor_server: self.server.clone(),
            no_preflight: self.no_preflight,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Many-to-one on the owning entity, optionally mirrored as one-to-many
    ManyToOne(ManyToOneArgs),
    /// One-to-one with the join column on the owning entity
    OneToOne(OneToOneArgs),
    /// Many-to-many with the join table on the owning entity
    ManyToMany(ManyToManyArgs),
    /// Plain @Column field
    Field(FieldArgs),
    /// New class, interface, enum, record or annotation file
    New(NewArgs),
    /// Show the resolved project layout, or what is known about one file
    Info(InfoArgs),
}

#[derive(Args, Debug, Clone)]
pub struct Endpoints {
    /// Owning entity: path to a .java file or a class name
    pub owning: String,
    /// Inverse entity: path to a .java file or a class name
    pub inverse: String,
}

#[derive(Args, Debug, Clone)]
pub struct ManyToOneArgs {
    #[command(flatten)]
    pub endpoints: Endpoints,
    #[arg(long, value_enum, default_value = "bidirectional-join-column")]
    pub mapping: MappingType,
    #[arg(long, value_enum)]
    pub fetch: Option<FetchType>,
    #[arg(long, value_enum, default_value = "list")]
    pub collection: CollectionType,
    /// Cascades on the many-to-one side
    #[arg(long, value_enum, value_delimiter = ',')]
    pub cascade: Vec<CascadeType>,
    #[arg(long, action = ArgAction::SetTrue)]
    pub mandatory: bool,
    #[arg(long, action = ArgAction::SetTrue)]
    pub unique: bool,
    /// Cascades on the one-to-many side
    #[arg(long, value_enum, value_delimiter = ',')]
    pub inverse_cascade: Vec<CascadeType>,
    #[arg(long, action = ArgAction::SetTrue)]
    pub orphan_removal: bool,
}

impl ManyToOneArgs {
    pub fn config(&self) -> RelationshipConfig {
        RelationshipConfig::ManyToOne(ManyToOneConfig {
            mapping: self.mapping,
            fetch: self.fetch,
            collection: self.collection,
            owning: SideOptions {
                cascades: self.cascade.iter().copied().collect(),
                mandatory: self.mandatory,
                unique: self.unique,
                ..Default::default()
            },
            inverse: SideOptions {
                cascades: self.inverse_cascade.iter().copied().collect(),
                orphan_removal: self.orphan_removal,
                ..Default::default()
            },
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct OneToOneArgs {
    #[command(flatten)]
    pub endpoints: Endpoints,
    #[arg(long, value_enum, default_value = "unidirectional-join-column")]
    pub mapping: MappingType,
    #[arg(long, value_enum, value_delimiter = ',')]
    pub cascade: Vec<CascadeType>,
    #[arg(long, action = ArgAction::SetTrue)]
    pub mandatory: bool,
    #[arg(long, action = ArgAction::SetTrue)]
    pub unique: bool,
    #[arg(long, action = ArgAction::SetTrue)]
    pub orphan_removal: bool,
    #[arg(long, value_enum, value_delimiter = ',')]
    pub inverse_cascade: Vec<CascadeType>,
    #[arg(long, action = ArgAction::SetTrue)]
    pub inverse_mandatory: bool,
    #[arg(long, action = ArgAction::SetTrue)]
    pub inverse_orphan_removal: bool,
}

impl OneToOneArgs {
    pub fn config(&self) -> RelationshipConfig {
        RelationshipConfig::OneToOne(OneToOneConfig {
            mapping: self.mapping,
            owning: SideOptions {
                cascades: self.cascade.iter().copied().collect(),
                mandatory: self.mandatory,
                unique: self.unique,
                orphan_removal: self.orphan_removal,
                ..Default::default()
            },
            inverse: SideOptions {
                cascades: self.inverse_cascade.iter().copied().collect(),
                mandatory: self.inverse_mandatory,
                orphan_removal: self.inverse_orphan_removal,
                ..Default::default()
            },
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct ManyToManyArgs {
    #[command(flatten)]
    pub endpoints: Endpoints,
    #[arg(long, value_enum, default_value = "bidirectional-join-table")]
    pub mapping: MappingType,
    #[arg(long, value_enum, value_delimiter = ',')]
    pub cascade: Vec<CascadeType>,
    #[arg(long, value_enum, value_delimiter = ',')]
    pub inverse_cascade: Vec<CascadeType>,
    /// Add equals/hashCode to the inverse entity if it has neither
    #[arg(long, action = ArgAction::SetTrue)]
    pub equals_hash_code: bool,
}

impl ManyToManyArgs {
    pub fn config(&self) -> RelationshipConfig {
        RelationshipConfig::ManyToMany(ManyToManyConfig {
            mapping: self.mapping,
            owning: SideOptions {
                cascades: self.cascade.iter().copied().collect(),
                ..Default::default()
            },
            inverse: SideOptions {
                cascades: self.inverse_cascade.iter().copied().collect(),
                equals_hash_code: self.equals_hash_code,
                ..Default::default()
            },
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct FieldArgs {
    /// Entity: path to a .java file or a class name
    pub target: String,
    /// Field type, e.g. String or LocalDate
    pub type_name: String,
    /// Field name; derived from the type when omitted
    #[arg(long)]
    pub name: Option<String>,
    /// Import needed by the field type, e.g. java.time.LocalDate
    #[arg(long)]
    pub import: Option<String>,
    #[arg(long)]
    pub nullable: Option<bool>,
    #[arg(long)]
    pub unique: Option<bool>,
    #[arg(long)]
    pub length: Option<u32>,
}

#[derive(Args, Debug, Clone)]
pub struct NewArgs {
    #[arg(value_enum)]
    pub kind: JavaFileKind,
    pub name: String,
    /// Defaults to the project's root package
    #[arg(long)]
    pub package: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct InfoArgs {
    /// Path to a .java file or an entity class name
    pub target: Option<String>,
}
