use crate::commands::helpers::{load_audit, record_counts, write_json};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{
    timestamp, top_issues, CrawlCounts, Report, RunDocument, RunRef, TOP_ISSUES_LIMIT,
};
use crate::store::DataStore;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

pub fn run<S: DataStore>(
    store: &mut S,
    run: &RunRef,
    base_url: Option<&str>,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let report = build(store, run, base_url, now)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Report written for {} ({} top issues)",
        run,
        report.top_issues.len()
    )));
    if base_url.is_none() {
        result.add_message(CmdMessage::warning(format!(
            "No base-url configured for {} (set it with `config base-url`)",
            run.project
        )));
    }
    Ok(result.with_run(run.clone()).with_report(report))
}

/// Compose and persist the run's report. Creates the run directory if missing.
pub fn build<S: DataStore>(
    store: &mut S,
    run: &RunRef,
    base_url: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Report> {
    store.ensure_run(run)?;

    let audit = load_audit(store, run);
    let counts = record_counts(store, run);

    let top: Map<String, Value> = top_issues(audit.issue_counts(), TOP_ISSUES_LIMIT)
        .into_iter()
        .collect();

    let report = Report {
        run_id: run.run_id.clone(),
        project: run.project.clone(),
        base_url: base_url.unwrap_or_default().to_string(),
        generated_at: timestamp(now),
        crawl: CrawlCounts {
            pages_count: counts.pages,
            images_count: counts.images,
            errors_count: counts.errors,
            status_buckets: audit.status_buckets(),
        },
        audit: audit.as_value().clone(),
        top_issues: top,
    };

    write_json(store, run, RunDocument::Report, &report)?;
    tracing::info!(run = %run, top_issues = report.top_issues.len(), "report written");
    Ok(report)
}
