use crate::commands::{CmdMessage, CmdResult, SeoPaths};
use crate::config::SeoConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowBaseUrl(String),
    SetBaseUrl(String, String),
}

pub fn run(paths: &SeoPaths, action: ConfigAction) -> Result<CmdResult> {
    let dir = &paths.root;
    match action {
        ConfigAction::ShowAll => {
            let config = SeoConfig::load(dir)?;
            let mut result = CmdResult::default();
            if config.projects.is_empty() {
                result.add_message(CmdMessage::info("No projects configured."));
            }
            Ok(result.with_config(config))
        }
        ConfigAction::ShowBaseUrl(project) => {
            let config = SeoConfig::load(dir)?;
            let mut result = CmdResult::default();
            match config.base_url(&project) {
                Some(url) => result.add_message(CmdMessage::info(url)),
                None => result.add_message(CmdMessage::warning(format!(
                    "No base-url set for {}",
                    project
                ))),
            }
            Ok(result)
        }
        ConfigAction::SetBaseUrl(project, url) => {
            let mut config = SeoConfig::load(dir)?;
            config.set_base_url(&project, &url)?;
            config.save(dir)?;
            tracing::info!(project = %project, "base-url updated");

            let mut result = CmdResult::default();
            let message = match config.base_url(&project) {
                Some(url) => format!("base-url for {} set to {}", project, url),
                None => format!("base-url for {} cleared", project),
            };
            result.add_message(CmdMessage::success(message));
            Ok(result.with_config(config))
        }
    }
}
