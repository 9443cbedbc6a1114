use crate::commands::helpers::{read_document_lenient, write_json};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, SeoError};
use crate::model::{RunDocument, RunRef, Sections};
use crate::store::DataStore;

pub fn load<S: DataStore>(store: &S, run: &RunRef) -> Sections {
    read_document_lenient(store, run, RunDocument::Sections)
        .map(Sections::from_value)
        .unwrap_or_default()
}

pub fn list<S: DataStore>(store: &S, run: &RunRef) -> Result<CmdResult> {
    let sections = load(store, run);
    let mut result = CmdResult::default();
    if sections.is_empty() {
        result.add_message(CmdMessage::info(format!("No sections for {}.", run)));
    }
    Ok(result.with_run(run.clone()).with_sections(sections))
}

pub fn set<S: DataStore>(store: &mut S, run: &RunRef, name: &str, body: &str) -> Result<CmdResult> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SeoError::InvalidName {
            kind: "section",
            name: name.to_string(),
        });
    }

    if !store.run_exists(run)? {
        return Err(SeoError::RunNotFound {
            project: run.project.clone(),
            run_id: run.run_id.clone(),
        });
    }

    let mut sections = load(store, run);
    let existed = sections.get(name).is_some();
    sections.set(name, body);
    write_json(store, run, RunDocument::Sections, &sections.to_value())?;

    let mut result = CmdResult::default();
    let verb = if existed { "Updated" } else { "Added" };
    result.add_message(CmdMessage::success(format!(
        "{} section '{}' on {}",
        verb, name, run
    )));
    Ok(result.with_run(run.clone()).with_sections(sections))
}

pub fn remove<S: DataStore>(store: &mut S, run: &RunRef, name: &str) -> Result<CmdResult> {
    let mut sections = load(store, run);
    let mut result = CmdResult::default();

    if sections.remove(name) {
        write_json(store, run, RunDocument::Sections, &sections.to_value())?;
        result.add_message(CmdMessage::success(format!("Removed section '{}'", name)));
    } else {
        result.add_message(CmdMessage::warning(format!("No section named '{}'", name)));
    }
    Ok(result.with_run(run.clone()).with_sections(sections))
}
