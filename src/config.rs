use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::seed::SeedFixture;
use crate::storage::StoreOptions;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NoteseedConfig {
    pub database: Option<String>,
    /// Drop and recreate the schema before seeding (default: true)
    pub reset: Option<bool>,
    /// Alias unaliased notes by public id on insert (default: true)
    pub auto_alias: Option<bool>,
    /// Overrides the built-in sample values
    pub fixture: Option<SeedFixture>,
}

impl NoteseedConfig {
    pub fn store_options(&self) -> StoreOptions {
        let defaults = StoreOptions::default();
        StoreOptions {
            reset: self.reset.unwrap_or(defaults.reset),
            auto_alias: self.auto_alias.unwrap_or(defaults.auto_alias),
        }
    }

    pub fn fixture(&self) -> SeedFixture {
        self.fixture.clone().unwrap_or_default()
    }

    pub fn database_path(&self) -> PathBuf {
        self.database
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("noteseed.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("noteseed.sqlite")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<NoteseedConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: NoteseedConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &NoteseedConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
