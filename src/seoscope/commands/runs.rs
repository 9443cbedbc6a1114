use crate::commands::helpers::read_document_lenient;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, SeoError};
use crate::model::{validate_name, RunDocument, RunInfo, RunRef, Summary};
use crate::store::DataStore;
use chrono::{DateTime, Utc};

/// Run id allocated when the caller does not name one.
pub fn default_run_id(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d-%H%M%S").to_string()
}

/// Create a run's directory so a crawler can start writing into it.
pub fn start<S: DataStore>(
    store: &mut S,
    project: &str,
    run_id: Option<String>,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let run = RunRef::new(project, run_id.unwrap_or_else(|| default_run_id(now)))?;
    if store.run_exists(&run)? {
        return Err(SeoError::RunExists {
            project: run.project,
            run_id: run.run_id,
        });
    }
    store.ensure_run(&run)?;
    tracing::info!(run = %run, "run started");

    let path = store.run_path(&run);
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Started run {} at {}",
        run,
        path.display()
    )));
    Ok(result.with_run(run).with_paths(vec![path]))
}

/// All runs of a project, oldest id first, with their summaries when built.
pub fn list<S: DataStore>(store: &S, project: &str) -> Result<CmdResult> {
    validate_name("project", project)?;

    let mut runs = Vec::new();
    for run_id in store.list_runs(project)? {
        let run = RunRef::new(project, run_id)?;
        let summary = read_document_lenient(store, &run, RunDocument::Summary)
            .and_then(|value| serde_json::from_value::<Summary>(value).ok());
        runs.push(RunInfo { run, summary });
    }

    let mut result = CmdResult::default();
    if runs.is_empty() {
        result.add_message(CmdMessage::info(format!("No runs for {}.", project)));
    }
    Ok(result.with_runs(runs))
}
