//! Editor session collaborator
//!
//! The core only ever tells the editor about paths; it never reads editor
//! state back.

use crate::error::{EditError, EditResult};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

pub trait EditorSession {
    fn open_or_reload(&mut self, path: &Path) -> EditResult<()>;
    fn save(&mut self, path: &Path) -> EditResult<()>;
    fn open_new_file(&mut self, path: &Path) -> EditResult<()>;
}

/// Used when no editor is attached: calls are logged and dropped.
#[derive(Debug, Default)]
pub struct HeadlessEditor;

impl EditorSession for HeadlessEditor {
    fn open_or_reload(&mut self, path: &Path) -> EditResult<()> {
        debug!(component = "editor", operation = "open_or_reload", path = %path.display(), "headless");
        Ok(())
    }

    fn save(&mut self, path: &Path) -> EditResult<()> {
        debug!(component = "editor", operation = "save", path = %path.display(), "headless");
        Ok(())
    }

    fn open_new_file(&mut self, path: &Path) -> EditResult<()> {
        debug!(component = "editor", operation = "open_new_file", path = %path.display(), "headless");
        Ok(())
    }
}

/// Drives a running Neovim through `nvim --server <addr> --remote-send`.
#[derive(Debug, Clone)]
pub struct NvimRemote {
    binary: String,
    server: String,
}

impl NvimRemote {
    pub fn new(binary: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            server: server.into(),
        }
    }

    fn send(&self, operation: &'static str, keys: String) -> EditResult<()> {
        info!(component = "editor", operation, server = %self.server, keys = %keys, "remote send");
        let output = Command::new(&self.binary)
            .args(["--server", &self.server, "--remote-send", &keys])
            .output()
            .map_err(|e| EditError::Editor(format!("spawn {}: {e}", self.binary)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(EditError::Editor(format!("{operation}: {stderr}")));
        }
        Ok(())
    }
}

fn ex_command(command: &str, path: &Path) -> String {
    let escaped = path.display().to_string().replace(' ', "\\ ");
    format!("<C-\\><C-N>:{command} {escaped}<CR>")
}

impl EditorSession for NvimRemote {
    fn open_or_reload(&mut self, path: &Path) -> EditResult<()> {
        self.send("open_or_reload", ex_command("edit!", path))
    }

    fn save(&mut self, path: &Path) -> EditResult<()> {
        self.send("save", ex_command("write", path))
    }

    fn open_new_file(&mut self, path: &Path) -> EditResult<()> {
        self.send("open_new_file", ex_command("edit", path))
    }
}
