use crate::commands::{CmdMessage, CmdResult, SeoPaths};
use crate::error::Result;
use std::fs;

pub fn run(paths: &SeoPaths) -> Result<CmdResult> {
    fs::create_dir_all(paths.root.join("projects"))?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Initialized seoscope store at {}",
        paths.root.display()
    )));
    Ok(result.with_paths(vec![paths.root.clone()]))
}
