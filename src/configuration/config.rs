#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::IntoEnumIterator;
use tokio::fs;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Eq, PartialEq, EnumIter, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ConfigFile,
    DataDir,
    MaxProjectsPerFolder,
    MaxRecentProjects,
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    /// Like `get`, but parses a numeric knob and falls back to the built-in
    /// default when the stored value is missing or garbage.
    pub fn get_usize(key: ConfigKey) -> usize {
        if let Ok(val) = Config::get(key).parse::<usize>() {
            return val;
        }

        return Config::default(key).parse::<usize>().unwrap_or(0);
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        let data_dir = dirs::data_dir().unwrap().join("penstock");

        let res = match key {
            ConfigKey::ConfigFile => data_dir.join("config.toml").to_string_lossy().to_string(),
            ConfigKey::DataDir => data_dir.to_string_lossy().to_string(),
            ConfigKey::MaxProjectsPerFolder => "10".to_string(),
            ConfigKey::MaxRecentProjects => "20".to_string(),
        };

        return res;
    }

    pub async fn load(config_file: &path::Path) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key));
        }
        Config::set(ConfigKey::ConfigFile, &config_file.to_string_lossy());

        if config_file.exists() {
            let toml_str = fs::read_to_string(config_file).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if let Some(val) = doc.get(&key.to_string()) {
                    if let Some(val_int) = val.as_integer() {
                        Config::set(key, &val_int.to_string());
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        Config::set(key, val_str);
                    }
                }
            }
        }

        tracing::debug!(
            data_dir = Config::get(ConfigKey::DataDir),
            max_recent_projects = Config::get(ConfigKey::MaxRecentProjects),
            max_projects_per_folder = Config::get(ConfigKey::MaxProjectsPerFolder),
            "config"
        );

        return Ok(());
    }
}
