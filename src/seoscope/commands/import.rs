//! Import crawler output into a run.
//!
//! The source directory mirrors a run directory: an optional `audit.json` plus
//! `pages/`, `images/` and `errors/` folders of JSON records. Records are copied
//! byte for byte; nothing is parsed here.

use super::runs::default_run_id;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, SeoError};
use crate::model::{Collection, RunDocument, RunRef};
use crate::store::DataStore;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

pub fn run<S: DataStore>(
    store: &mut S,
    project: &str,
    run_id: Option<String>,
    source: &Path,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    if !source.is_dir() {
        return Err(SeoError::SourceNotFound(source.to_path_buf()));
    }

    let run = RunRef::new(project, run_id.unwrap_or_else(|| default_run_id(now)))?;
    store.ensure_run(&run)?;

    let mut result = CmdResult::default();

    let audit_path = source.join(RunDocument::Audit.file_name());
    if audit_path.is_file() {
        let bytes = fs::read(&audit_path).map_err(SeoError::Io)?;
        match String::from_utf8(bytes) {
            Ok(content) => {
                store.write_document(&run, RunDocument::Audit, &content)?;
                result.add_message(CmdMessage::info("Imported audit.json"));
            }
            Err(e) => {
                tracing::warn!(path = %audit_path.display(), error = %e, "audit is not UTF-8");
                result.add_message(CmdMessage::warning(
                    "Skipped audit.json: not valid UTF-8",
                ));
            }
        }
    }

    let mut imported = 0;
    for collection in Collection::all() {
        let dir = source.join(collection.dir_name());
        if !dir.is_dir() {
            continue;
        }
        let (copied, skipped) = import_collection(store, &run, *collection, &dir)?;
        imported += copied;
        if copied > 0 {
            result.add_message(CmdMessage::info(format!(
                "Imported {} {} record(s)",
                copied,
                collection.dir_name()
            )));
        }
        for name in skipped {
            result.add_message(CmdMessage::warning(format!(
                "Skipped non-JSON file {}/{}",
                collection.dir_name(),
                name
            )));
        }
    }

    tracing::info!(run = %run, records = imported, source = %source.display(), "import finished");
    result.add_message(CmdMessage::success(format!(
        "Imported {} record(s) into {}",
        imported, run
    )));
    Ok(result.with_run(run))
}

fn import_collection<S: DataStore>(
    store: &mut S,
    run: &RunRef,
    collection: Collection,
    dir: &Path,
) -> Result<(usize, Vec<String>)> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .map_err(SeoError::Io)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(SeoError::Io)?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut copied = 0;
    let mut skipped = Vec::new();
    for entry in entries {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            skipped.push(name);
            continue;
        }
        let content = fs::read(&path).map_err(SeoError::Io)?;
        store.write_record(run, collection, &name, &content)?;
        copied += 1;
    }
    Ok((copied, skipped))
}
