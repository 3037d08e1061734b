//! Run configuration: workbook path and destination connection.
//!
//! The TOML file carries the workbook path and optionally the database URL;
//! the URL is usually supplied via `MEDSTAT_DATABASE_URL` so credentials
//! stay out of the file. CLI flags override both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Environment variable holding the destination database URL.
pub const DATABASE_URL_ENV: &str = "MEDSTAT_DATABASE_URL";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to the source workbook.
    pub workbook: PathBuf,
    /// Destination database URL; usually left unset in the file.
    pub database_url: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config: {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parse config: {}", path.display()))
    }

    /// Workbook path with the CLI override applied.
    pub fn workbook_path(&self, override_path: Option<&Path>) -> PathBuf {
        override_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.workbook.clone())
    }

    /// Database URL with precedence: CLI flag, environment, config file.
    pub fn resolve_database_url(&self, override_url: Option<&str>) -> Result<String> {
        if let Some(url) = override_url {
            return Ok(url.to_string());
        }
        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            if !url.trim().is_empty() {
                return Ok(url);
            }
        }
        if let Some(url) = &self.database_url {
            return Ok(url.clone());
        }
        bail!("no database URL configured (set {DATABASE_URL_ENV} or database_url)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medstat.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_minimal_config() {
        let (_dir, path) = write_config("workbook = \"/srv/opd/data.xlsx\"\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.workbook, PathBuf::from("/srv/opd/data.xlsx"));
        assert!(config.database_url.is_none());
    }

    #[test]
    fn rejects_unknown_keys() {
        let (_dir, path) =
            write_config("workbook = \"data.xlsx\"\nworkbok_typo = \"x\"\n");
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        assert!(Config::load(Path::new("/nonexistent/medstat.toml")).is_err());
    }

    #[test]
    fn cli_flag_beats_config_url() {
        let (_dir, path) = write_config(
            "workbook = \"data.xlsx\"\ndatabase_url = \"postgres://file\"\n",
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.resolve_database_url(Some("postgres://flag")).unwrap(),
            "postgres://flag"
        );
        assert_eq!(
            config.resolve_database_url(None).unwrap(),
            "postgres://file"
        );
    }

    #[test]
    fn workbook_override_applies() {
        let (_dir, path) = write_config("workbook = \"data.xlsx\"\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.workbook_path(Some(Path::new("/tmp/other.xlsx"))),
            PathBuf::from("/tmp/other.xlsx")
        );
        assert_eq!(config.workbook_path(None), PathBuf::from("data.xlsx"));
    }
}
