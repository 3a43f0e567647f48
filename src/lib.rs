pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod generator;
pub mod logging;
pub mod mutation;
pub mod project;
pub mod relationship;
pub mod scaffold;
pub mod source_file;
pub mod syntax;

pub use error::{EditError, EditResult};
pub use source_file::SourceFile;
