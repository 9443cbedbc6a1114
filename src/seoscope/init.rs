use crate::api::{SeoApi, SeoPaths};
use crate::config::SeoConfig;
use crate::error::{Result, SeoError};
use crate::store::fs::FileStore;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the store root.
pub const HOME_ENV: &str = "SEOSCOPE_HOME";

pub struct SeoContext {
    pub api: SeoApi<FileStore>,
    pub config: SeoConfig,
}

/// Resolve the store root: explicit override, then `$SEOSCOPE_HOME`, then the
/// platform data directory.
pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "seoscope", "seoscope")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| SeoError::Config("Could not determine a data directory".to_string()))
}

pub fn initialize(explicit_root: Option<&Path>) -> Result<SeoContext> {
    let root = resolve_root(explicit_root)?;
    let config = SeoConfig::load(&root)?;
    tracing::debug!(root = %root.display(), "store root resolved");

    let store = FileStore::new(root.clone());
    let paths = SeoPaths { root };
    let api = SeoApi::new(store, paths, config.clone());

    Ok(SeoContext { api, config })
}
