use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub storage: Storage,
    pub catalog: Catalog,
    pub log: Log,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
    pub backend: String, // "memory", "file" or "redis"
    #[serde(default = "default_storage_path")]
    pub path: String,
    #[serde(default)]
    pub redis_dsn: Option<String>,
    #[serde(default = "default_storage_prefix")]
    pub prefix: String,
}

#[derive(Debug, Deserialize)]
pub struct Catalog {
    pub backend: String, // "fake" or "tmdb"
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

fn default_storage_path() -> String {
    "data/cineshelf.json".to_string()
}

fn default_storage_prefix() -> String {
    "cineshelf".to_string()
}

fn default_catalog_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_language() -> String {
    "ko-KR".to_string()
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

/// Reads the TOML file, then lets `CINESHELF__SECTION__KEY` variables override it.
pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .add_source(Environment::with_prefix("CINESHELF").separator("__"))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parses_file_and_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.toml");
        fs::write(
            &path,
            r#"
[storage]
backend = "memory"

[catalog]
backend = "fake"
language = "en-US"

[log]
filter = "debug"
"#,
        )
        .unwrap();

        let settings = parse_settings(path.to_str()).unwrap();
        assert_eq!(settings.storage.backend, "memory");
        assert_eq!(settings.storage.path, "data/cineshelf.json");
        assert_eq!(settings.catalog.language, "en-US");
        assert_eq!(settings.catalog.base_url, "https://api.themoviedb.org/3");
        assert_eq!(settings.log.filter, "debug");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(parse_settings(path.to_str()).is_err());
    }
}
