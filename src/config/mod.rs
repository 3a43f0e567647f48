use crate::error::EditError;
use crate::generator::{DEFAULT_INDENT, DEFAULT_PERSISTENCE_PACKAGE, TemplateSettings};
use crate::logging::LogFormat;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const PROJECT_CONFIG_DIR: &str = ".erel";
pub const CONFIG_FILE: &str = "config.toml";
pub const APP_DIR: &str = "entity-rel";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_EDITOR_BINARY: &str = "nvim";

const PERSISTENCE_PACKAGES: [&str; 2] = ["jakarta.persistence", "javax.persistence"];

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub log_level: String,
    pub log_format: LogFormat,
    pub log_file: Option<PathBuf>,
    pub generation: GenerationConfig,
    pub editor: EditorConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub indent: String,
    pub persistence_package: String,
    pub preflight: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT.to_string(),
            persistence_package: DEFAULT_PERSISTENCE_PACKAGE.to_string(),
            preflight: true,
        }
    }
}

impl GenerationConfig {
    pub fn template_settings(&self) -> TemplateSettings {
        TemplateSettings {
            indent: self.indent.clone(),
            persistence_package: self.persistence_package.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Neovim server address; headless when absent.
    pub server: Option<String>,
    pub binary: String,
    pub save_after_write: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            server: None,
            binary: DEFAULT_EDITOR_BINARY.to_string(),
            save_after_write: true,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::default(),
            log_file: None,
            generation: GenerationConfig::default(),
            editor: EditorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FileConfig {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub log_file: Option<PathBuf>,
    pub generation: Option<PartialGenerationConfig>,
    pub editor: Option<PartialEditorConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PartialGenerationConfig {
    pub indent: Option<String>,
    pub persistence_package: Option<String>,
    pub preflight: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PartialEditorConfig {
    pub server: Option<String>,
    pub binary: Option<String>,
    pub save_after_write: Option<bool>,
}

/// Values taken from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub config: Option<PathBuf>,
    pub editor_server: Option<String>,
    pub no_preflight: bool,
}

/// Values taken from the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub log_level: Option<String>,
    pub editor_server: Option<String>,
}

impl EnvOverrides {
    /// `EREL_LOG`, then `EREL_NVIM_SERVER` or the `NVIM` address Neovim
    /// exports to its terminal jobs.
    pub fn from_env() -> Self {
        Self {
            log_level: std::env::var("EREL_LOG").ok().filter(|v| !v.is_empty()),
            editor_server: std::env::var("EREL_NVIM_SERVER")
                .ok()
                .or_else(|| std::env::var("NVIM").ok())
                .filter(|v| !v.is_empty()),
        }
    }
}

impl AppConfig {
    pub fn load(cli: &CliOverrides, project_root: &Path) -> Result<Self> {
        let project_cfg = load_project_config(project_root)?;
        let file_cfg = load_file_config(cli.config.as_deref())?;
        Self::merge(cli, &EnvOverrides::from_env(), project_cfg, file_cfg)
    }

    /// CLI, then environment, then project file, then global file, then default.
    pub fn merge(
        cli: &CliOverrides,
        env: &EnvOverrides,
        project_cfg: FileConfig,
        file_cfg: FileConfig,
    ) -> Result<Self> {
        let log_level = cli
            .log_level
            .clone()
            .or_else(|| env.log_level.clone())
            .or(project_cfg.log_level)
            .or(file_cfg.log_level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let log_format = project_cfg
            .log_format
            .or(file_cfg.log_format)
            .unwrap_or_default();
        let log_file = project_cfg.log_file.or(file_cfg.log_file);

        let generation = {
            let defaults = GenerationConfig::default();
            let project = project_cfg.generation.unwrap_or_default();
            let file = file_cfg.generation.unwrap_or_default();
            GenerationConfig {
                indent: project.indent.or(file.indent).unwrap_or(defaults.indent),
                persistence_package: project
                    .persistence_package
                    .or(file.persistence_package)
                    .unwrap_or(defaults.persistence_package),
                preflight: !cli.no_preflight
                    && project
                        .preflight
                        .or(file.preflight)
                        .unwrap_or(defaults.preflight),
            }
        };

        let editor = {
            let defaults = EditorConfig::default();
            let project = project_cfg.editor.unwrap_or_default();
            let file = file_cfg.editor.unwrap_or_default();
            EditorConfig {
                server: cli
                    .editor_server
                    .clone()
                    .or_else(|| env.editor_server.clone())
                    .or(project.server)
                    .or(file.server),
                binary: project.binary.or(file.binary).unwrap_or(defaults.binary),
                save_after_write: project
                    .save_after_write
                    .or(file.save_after_write)
                    .unwrap_or(defaults.save_after_write),
            }
        };

        let config = Self {
            log_level,
            log_format,
            log_file,
            generation,
            editor,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !PERSISTENCE_PACKAGES.contains(&self.generation.persistence_package.as_str()) {
            return Err(EditError::Config(format!(
                "persistence_package must be one of {}, got {:?}",
                PERSISTENCE_PACKAGES.join(", "),
                self.generation.persistence_package
            ))
            .into());
        }
        if !self.generation.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(EditError::Config(format!(
                "indent may only contain spaces and tabs, got {:?}",
                self.generation.indent
            ))
            .into());
        }
        Ok(())
    }
}

fn read_config(path: &Path) -> Result<Option<FileConfig>> {
    let s = fs::read_to_string(path)
        .with_context(|| format!("read config file: {}", path.display()))?;
    match toml::from_str::<FileConfig>(&s) {
        Ok(cfg) => {
            info!(component = "config", path = %path.display(), "loaded config file");
            Ok(Some(cfg))
        }
        Err(e) => {
            warn!(component = "config", path = %path.display(), error = %e, "parse config failed");
            Ok(None)
        }
    }
}

/// First readable global config. An explicit `--config` path must exist.
pub fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig> {
    use std::env;

    if let Some(path) = explicit {
        let cfg = read_config(path)?.ok_or_else(|| {
            EditError::Config(format!("invalid config file: {}", path.display()))
        })?;
        return Ok(cfg);
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Ok(p) = env::var("EREL_CONFIG") {
            v.push(PathBuf::from(p));
        }
        if let Ok(xdg_home) = env::var("XDG_CONFIG_HOME") {
            v.push(Path::new(&xdg_home).join(APP_DIR).join(CONFIG_FILE));
        }
        if let Some(dir) = dirs::config_dir() {
            v.push(dir.join(APP_DIR).join(CONFIG_FILE));
        }
        v
    }

    for p in candidate_paths() {
        if p.exists()
            && let Some(cfg) = read_config(&p)?
        {
            return Ok(cfg);
        }
    }
    Ok(FileConfig::default())
}

/// Load project-specific configuration from `.erel/config.toml`. A file
/// that exists but can't be read or parsed is an error.
pub fn load_project_config(project_root: &Path) -> Result<FileConfig> {
    let path = project_root.join(PROJECT_CONFIG_DIR).join(CONFIG_FILE);
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let cfg = read_config(&path)?.ok_or_else(|| {
        EditError::Config(format!("invalid project config file: {}", path.display()))
    })?;
    Ok(cfg)
}
