use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Deserialize)]
pub struct Taskcal {
    pub database: String,
    pub page_size: u32,
    pub prod_id: String,
}

#[derive(Debug, Deserialize)]
pub struct Configuration {
    pub taskcal: Taskcal,
}

const DEFAULT_CONFIG: &str = r#"
[taskcal]
# SQLite file holding the tasks.
database="taskcal.db"
# Tasks per page when listing.
page_size=20
# Product identifier written into exported calendars.
prod_id="-//taskcal//Task Export 1.0//EN"

"#;

impl Configuration {
    /// Loads `~/.config/taskcal/taskcal.toml`, writing the defaults first if
    /// the file does not exist yet.
    pub fn new() -> Result<Self> {
        Self::load(&default_path())
    }

    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(config_path, DEFAULT_CONFIG.trim())?;
        }

        let settings = Config::builder()
            .add_source(File::from(config_path).required(true))
            .add_source(
                Environment::with_prefix("TASKCAL")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize::<Configuration>()?)
    }
}

fn default_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".config/taskcal/taskcal.toml")
}
