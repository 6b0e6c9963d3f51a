use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub(crate) const DB_ENV: &str = "LEDGERTUI_DB";
pub(crate) const EXPORT_DIR_ENV: &str = "LEDGERTUI_EXPORT_DIR";

/// Where things live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
    /// CSV exports land here, like a browser download.
    pub export_dir: PathBuf,
}

impl Config {
    pub(crate) fn load() -> Result<Self> {
        let proj_dirs = directories::ProjectDirs::from("com", "ledgertui", "LedgerTUI")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let user_dirs = directories::UserDirs::new();
        let downloads = user_dirs.as_ref().and_then(|d| {
            d.download_dir()
                .map(Path::to_path_buf)
                .or_else(|| Some(d.home_dir().to_path_buf()))
        });

        Ok(Self::resolve(
            data_dir,
            std::env::var_os(DB_ENV).map(PathBuf::from),
            std::env::var_os(EXPORT_DIR_ENV).map(PathBuf::from),
            downloads,
        ))
    }

    /// Overrides win; otherwise the database and log sit in `data_dir` and
    /// exports go to the download directory, or the working directory.
    pub(crate) fn resolve(
        data_dir: &Path,
        db_override: Option<PathBuf>,
        export_override: Option<PathBuf>,
        downloads: Option<PathBuf>,
    ) -> Self {
        Self {
            db_path: db_override.unwrap_or_else(|| data_dir.join("ledgertui.db")),
            log_path: data_dir.join("ledgertui.log"),
            export_dir: export_override
                .or(downloads)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
