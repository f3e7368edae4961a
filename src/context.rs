// File: ./src/context.rs
//! Where the agenda looks for its config file and the exported snapshot.
//!
//! `StandardContext` resolves the platform directories (or everything below
//! `--root`), `TestContext` points at a throwaway directory that is removed
//! when the context is dropped.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const SNAPSHOT_FILE_NAME: &str = "snapshot.json";

pub trait AppContext: std::fmt::Debug {
    /// Directory holding `config.toml`. Created on demand.
    fn config_dir(&self) -> Result<PathBuf>;
    /// Directory the main application exports `snapshot.json` into. Created on demand.
    fn data_dir(&self) -> Result<PathBuf>;

    fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(CONFIG_FILE_NAME))
    }

    fn snapshot_file(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(SNAPSHOT_FILE_NAME))
    }
}

fn created(dir: PathBuf) -> Result<PathBuf> {
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory '{}'", dir.display()))?;
    Ok(dir)
}

#[derive(Clone, Debug, Default)]
pub struct StandardContext {
    root: Option<PathBuf>,
}

impl StandardContext {
    /// With `Some(root)`, config lives in `<root>/config` and the snapshot in
    /// `<root>/data`.
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    fn resolve(&self, subdir: &str, pick: fn(&ProjectDirs) -> &Path) -> Result<PathBuf> {
        let dir = match &self.root {
            Some(root) => root.join(subdir),
            None => {
                let dirs = ProjectDirs::from("com", "lifequest", "lifequest")
                    .context("Could not determine a home directory")?;
                pick(&dirs).to_path_buf()
            }
        };
        created(dir)
    }
}

impl AppContext for StandardContext {
    fn config_dir(&self) -> Result<PathBuf> {
        self.resolve("config", ProjectDirs::config_dir)
    }

    fn data_dir(&self) -> Result<PathBuf> {
        self.resolve("data", ProjectDirs::data_dir)
    }
}

/// Isolated directory tree for tests.
#[derive(Debug)]
pub struct TestContext {
    pub root: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("lifequest_test_{}", uuid::Uuid::new_v4()));
        Self { root }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext for TestContext {
    fn config_dir(&self) -> Result<PathBuf> {
        created(self.root.join("config"))
    }

    fn data_dir(&self) -> Result<PathBuf> {
        created(self.root.join("data"))
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}
