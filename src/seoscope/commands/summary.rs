//! Summary aggregation.
//!
//! Rebuilds `summary.json` from a run's crawl artifacts. The summary is always
//! regenerated in full; there is no incremental path.

use crate::commands::helpers::{load_audit, record_counts, record_names, write_json};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{
    page_status, timestamp, Collection, IssueTotals, RunDocument, RunRef, StatusBuckets, Summary,
};
use crate::store::DataStore;
use chrono::{DateTime, Utc};

pub fn run<S: DataStore>(store: &mut S, run: &RunRef, now: DateTime<Utc>) -> Result<CmdResult> {
    let summary = build(store, run, now)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Summarized {}: {} pages, {} images, {} errors, {} issues",
        run, summary.pages, summary.images, summary.errors, summary.issues.total
    )));
    Ok(result.with_run(run.clone()).with_summary(summary))
}

/// Aggregate and persist, overwriting any previous summary of the run.
pub fn build<S: DataStore>(store: &mut S, run: &RunRef, now: DateTime<Utc>) -> Result<Summary> {
    let summary = aggregate(store, run, now);
    write_json(store, run, RunDocument::Summary, &summary)?;
    tracing::info!(run = %run, pages = summary.pages, "summary written");
    Ok(summary)
}

fn aggregate<S: DataStore>(store: &S, run: &RunRef, now: DateTime<Utc>) -> Summary {
    let counts = record_counts(store, run);

    let mut status = StatusBuckets::default();
    for name in record_names(store, run, Collection::Pages) {
        let code = match store.read_record(run, Collection::Pages, &name) {
            Ok(Some(raw)) => page_status(&raw),
            Ok(None) => 0,
            Err(e) => {
                tracing::warn!(run = %run, page = %name, error = %e, "unreadable page record");
                0
            }
        };
        status.record(code);
    }

    let audit = load_audit(store, run);

    Summary {
        project: run.project.clone(),
        run_id: run.run_id.clone(),
        generated: timestamp(now),
        pages: counts.pages,
        images: counts.images,
        errors: counts.errors,
        status,
        issues: IssueTotals {
            total: audit.issues_total(),
        },
    }
}
