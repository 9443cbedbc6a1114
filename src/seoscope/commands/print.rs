//! Printable report rendering.
//!
//! The stored report document is rendered to markdown through a template, with the
//! run's editable sections appended. HTML output is that markdown converted by
//! pulldown-cmark and wrapped in a print-friendly page.

use crate::commands::helpers::read_document_lenient;
use crate::commands::{report, sections, CmdResult};
use crate::error::Result;
use crate::model::{Report, RunDocument, RunRef, Sections};
use crate::store::DataStore;
use chrono::{DateTime, Utc};
use minijinja::Environment;
use pulldown_cmark::{html, Options, Parser};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintFormat {
    Markdown,
    Html,
}

const REPORT_TEMPLATE: &str = r#"# SEO report: {{ project }}

- Run: `{{ run_id }}`
- Site: {{ base_url if base_url else "(not configured)" }}
- Generated: {{ generated_at }}

## Crawl

| Pages | Images | Errors |
|---:|---:|---:|
| {{ pages }} | {{ images }} | {{ errors }} |
{% if buckets %}

### Status codes

| Bucket | Count |
|---|---:|
{% for b in buckets %}
| {{ b.key }} | {{ b.count }} |
{% endfor %}
{% endif %}

## Top issues

{% if issues %}
| # | Issue | Count |
|---:|---|---:|
{% for issue in issues %}
| {{ issue.rank }} | {{ issue.key }} | {{ issue.count }} |
{% endfor %}
{% else %}
No issues recorded.
{% endif %}
{% for section in sections %}

## {{ section.name }}

{{ section.body }}
{% endfor %}
"#;

const HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>SEO report: {{ project }} ({{ run_id }})</title>
<style>
body { font-family: sans-serif; max-width: 52rem; margin: 2rem auto; color: #222; }
table { border-collapse: collapse; margin: 1rem 0; }
th, td { border: 1px solid #ccc; padding: 0.25rem 0.75rem; }
@media print { body { margin: 0; } }
</style>
</head>
<body>
{{ body|safe }}
</body>
</html>
"#;

#[derive(Serialize)]
struct BucketLine {
    key: String,
    count: Value,
}

#[derive(Serialize)]
struct IssueLine {
    rank: usize,
    key: String,
    count: String,
}

#[derive(Serialize)]
struct SectionBlock {
    name: String,
    body: String,
}

#[derive(Serialize)]
struct ReportView {
    project: String,
    run_id: String,
    base_url: String,
    generated_at: String,
    pages: u64,
    images: u64,
    errors: u64,
    buckets: Vec<BucketLine>,
    issues: Vec<IssueLine>,
    sections: Vec<SectionBlock>,
}

impl ReportView {
    fn new(report: &Report, sections: &Sections) -> Self {
        Self {
            project: report.project.clone(),
            run_id: report.run_id.clone(),
            base_url: report.base_url.clone(),
            generated_at: report.generated_at.clone(),
            pages: report.crawl.pages_count,
            images: report.crawl.images_count,
            errors: report.crawl.errors_count,
            buckets: report
                .crawl
                .status_buckets
                .iter()
                .map(|(key, count)| BucketLine {
                    key: key.clone(),
                    count: count.clone(),
                })
                .collect(),
            issues: report
                .top_issue_list()
                .into_iter()
                .enumerate()
                .map(|(i, (key, count))| IssueLine {
                    rank: i + 1,
                    key,
                    count,
                })
                .collect(),
            sections: sections
                .iter()
                .map(|(name, body)| SectionBlock {
                    name: name.to_string(),
                    body: body.trim_end().to_string(),
                })
                .collect(),
        }
    }
}

pub fn run<S: DataStore>(
    store: &mut S,
    run: &RunRef,
    base_url: Option<&str>,
    format: PrintFormat,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let report = match stored_report(store, run) {
        Some(report) => report,
        None => {
            tracing::debug!(run = %run, "no usable report.json, building one");
            report::build(store, run, base_url, now)?
        }
    };
    let sections = sections::load(store, run);

    let markdown = render_markdown(&report, &sections)?;
    let rendered = match format {
        PrintFormat::Markdown => markdown,
        PrintFormat::Html => render_html(&report, &markdown)?,
    };
    Ok(CmdResult::default()
        .with_run(run.clone())
        .with_report(report)
        .with_rendered(rendered))
}

fn stored_report<S: DataStore>(store: &S, run: &RunRef) -> Option<Report> {
    let value = read_document_lenient(store, run, RunDocument::Report)?;
    match serde_json::from_value(value) {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::warn!(run = %run, error = %e, "report.json has an unexpected shape");
            None
        }
    }
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env
}

pub fn render_markdown(report: &Report, sections: &Sections) -> Result<String> {
    let mut env = environment();
    env.add_template("report.md", REPORT_TEMPLATE)?;
    let view = ReportView::new(report, sections);
    Ok(env.get_template("report.md")?.render(&view)?)
}

fn render_html(report: &Report, markdown: &str) -> Result<String> {
    let mut body = String::new();
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES);
    html::push_html(&mut body, parser);

    let mut env = environment();
    env.add_template("report.html", HTML_TEMPLATE)?;
    Ok(env.get_template("report.html")?.render(minijinja::context! {
        project => &report.project,
        run_id => &report.run_id,
        body => body,
    })?)
}
