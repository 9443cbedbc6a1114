use crate::error::{Result, SeoError};
use crate::model::validate_name;
use crate::store::fs::write_atomic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Per-project settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Site root the crawl started from, shown in reports
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Store-wide configuration, stored in `<root>/config.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeoConfig {
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectConfig>,
}

impl SeoConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(SeoError::Io)?;
        serde_json::from_str(&content).map_err(|e| {
            SeoError::Config(format!("{} is not valid: {}", config_path.display(), e))
        })
    }

    /// Save config to the given directory. The file is replaced atomically.
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(SeoError::Serialization)?;
        write_atomic(&config_path, content.as_bytes())
    }

    pub fn base_url(&self, project: &str) -> Option<&str> {
        self.projects
            .get(project)
            .and_then(|p| p.base_url.as_deref())
    }

    /// Set a project's base URL. Trailing slashes are dropped; an empty value clears it.
    pub fn set_base_url(&mut self, project: &str, url: &str) -> Result<()> {
        validate_name("project", project)?;
        let url = url.trim().trim_end_matches('/');
        if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SeoError::Config(format!(
                "base-url must start with http:// or https://, got {:?}",
                url
            )));
        }
        let entry = self.projects.entry(project.to_string()).or_default();
        entry.base_url = if url.is_empty() {
            None
        } else {
            Some(url.to_string())
        };
        Ok(())
    }
}
