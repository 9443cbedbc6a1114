//! Per-project timeseries of run snapshots.
//!
//! Appending is a read-modify-write of the whole document. There is no locking;
//! concurrent writers must be serialized by the caller.

use crate::commands::helpers::parse_lenient;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, SeoError};
use crate::model::{validate_name, RunDocument, RunRef, Summary, Timeseries, TimeseriesRow};
use crate::store::DataStore;

/// Append the run's stored summary to its project's timeseries.
pub fn run<S: DataStore>(store: &mut S, run: &RunRef) -> Result<CmdResult> {
    let summary = load_summary(store, run)?;
    let timeseries = append(store, &summary)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Recorded {} in {} timeseries ({} entries)",
        run.run_id,
        run.project,
        timeseries.items.len()
    )));
    Ok(result.with_run(run.clone()).with_timeseries(timeseries))
}

/// Show a project's timeseries without modifying it.
pub fn show<S: DataStore>(store: &S, project: &str) -> Result<CmdResult> {
    validate_name("project", project)?;
    let timeseries = load(store, project);
    let mut result = CmdResult::default();
    if timeseries.items.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No timeseries entries for {}.",
            project
        )));
    }
    Ok(result.with_timeseries(timeseries))
}

pub fn load<S: DataStore>(store: &S, project: &str) -> Timeseries {
    let raw = store.read_timeseries(project).unwrap_or_else(|e| {
        tracing::warn!(project, error = %e, "unreadable timeseries, starting empty");
        None
    });
    parse_lenient(raw, "timeseries.json")
        .map(|value| Timeseries::from_value(project, value))
        .unwrap_or_else(|| Timeseries::empty(project))
}

/// Append one row derived from `summary` and persist. Prior items are never touched.
pub fn append<S: DataStore>(store: &mut S, summary: &Summary) -> Result<Timeseries> {
    let mut timeseries = load(store, &summary.project);
    timeseries.push(&TimeseriesRow::from_summary(summary))?;

    let content = serde_json::to_string_pretty(&timeseries)?;
    store.write_timeseries(&summary.project, &content)?;
    tracing::info!(
        project = %summary.project,
        run_id = %summary.run_id,
        entries = timeseries.items.len(),
        "timeseries appended"
    );
    Ok(timeseries)
}

fn load_summary<S: DataStore>(store: &S, run: &RunRef) -> Result<Summary> {
    let not_found = || SeoError::SummaryNotFound {
        project: run.project.clone(),
        run_id: run.run_id.clone(),
    };
    let raw = store
        .read_document(run, RunDocument::Summary)?
        .ok_or_else(not_found)?;
    serde_json::from_str(&raw).map_err(|e| {
        tracing::warn!(run = %run, error = %e, "stored summary does not parse");
        not_found()
    })
}
