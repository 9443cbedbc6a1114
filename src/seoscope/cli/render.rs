//! # Rendering Module
//!
//! Styled terminal output for command results. Templates (see `templates.rs`) own the
//! line structure; this module prepares the data they render.
//!
//! Layout calculations (column widths, padding, truncation) stay in Rust because they
//! need Unicode-aware measuring. Colors are applied by the `style` template filter and
//! only when stdout supports them.

use super::styles::{names, SEO_THEME};
use super::templates::{
    DETAILS_TEMPLATE, MESSAGES_TEMPLATE, REPORT_TEMPLATE, RUNS_TEMPLATE, SECTIONS_TEMPLATE,
    TABLE_TEMPLATE, TEMPLATES,
};
use chrono::{DateTime, Utc};
use console::Term;
use minijinja::{Environment, Error, Value};
use seoscope::api::{CmdMessage, MessageLevel};
use seoscope::config::SeoConfig;
use seoscope::model::{Report, RunInfo, Sections, Summary, Timeseries};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

pub const TIME_WIDTH: usize = 14;
pub const PREVIEW_WIDTH: usize = 60;
const COLUMN_GAP: &str = "  ";
const NOT_SET: &str = "(not set)";

#[derive(Serialize)]
struct MessageData {
    content: String,
    style: &'static str,
}

#[derive(Serialize)]
struct MessagesData {
    messages: Vec<MessageData>,
}

#[derive(Serialize)]
struct Field {
    label: String,
    padding: String,
    value: String,
    style: &'static str,
}

#[derive(Serialize)]
struct DetailsData {
    title: String,
    fields: Vec<Field>,
}

#[derive(Serialize)]
struct IssueLine {
    count: String,
    key: String,
}

#[derive(Serialize)]
struct ReportData {
    title: String,
    fields: Vec<Field>,
    issues: Vec<IssueLine>,
}

#[derive(Serialize)]
struct RunLine {
    run_id: String,
    padding: String,
    time_ago: String,
    detail: String,
    detail_style: &'static str,
}

#[derive(Serialize)]
struct RunsData {
    header: String,
    runs: Vec<RunLine>,
}

#[derive(Serialize)]
struct TableRow {
    line: String,
    style: &'static str,
}

#[derive(Serialize)]
struct TableData {
    header: String,
    rows: Vec<TableRow>,
}

#[derive(Serialize)]
struct SectionLine {
    name: String,
    padding: String,
    preview: String,
}

#[derive(Serialize)]
struct SectionsData {
    sections: Vec<SectionLine>,
}

fn stdout_colors() -> bool {
    Term::stdout().features().colors_supported()
}

fn environment(use_color: bool) -> Result<Environment<'static>, Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_filter("style", move |value: Value, name: String| -> String {
        SEO_THEME.apply(&name, &value.to_string(), use_color)
    });
    for &(name, source) in TEMPLATES {
        env.add_template(name, source)?;
    }
    Ok(env)
}

fn render_template<T: Serialize>(name: &str, data: &T, use_color: bool) -> Result<String, Error> {
    let env = environment(use_color)?;
    env.get_template(name)?.render(data)
}

fn render_or_report<T: Serialize>(name: &str, data: &T, use_color: bool) -> String {
    render_template(name, data, use_color).unwrap_or_else(|e| format!("Render error: {}\n", e))
}

/// Renders command messages, one per line.
pub fn render_messages(messages: &[CmdMessage]) -> String {
    render_messages_with(messages, stdout_colors())
}

fn render_messages_with(messages: &[CmdMessage], use_color: bool) -> String {
    if messages.is_empty() {
        return String::new();
    }

    let message_data: Vec<MessageData> = messages
        .iter()
        .map(|msg| MessageData {
            content: msg.content.clone(),
            style: match msg.level {
                MessageLevel::Info => names::INFO,
                MessageLevel::Success => names::SUCCESS,
                MessageLevel::Warning => names::WARNING,
                MessageLevel::Error => names::ERROR,
            },
        })
        .collect();

    let data = MessagesData {
        messages: message_data,
    };
    render_template(MESSAGES_TEMPLATE, &data, use_color).unwrap_or_else(|_| {
        messages
            .iter()
            .map(|m| format!("{}\n", m.content))
            .collect()
    })
}

pub fn print_messages(messages: &[CmdMessage]) {
    let output = render_messages(messages);
    if !output.is_empty() {
        print!("{}", output);
    }
}

/// Used when stdout carries a document, so notices must not mix into it.
pub fn eprint_messages(messages: &[CmdMessage]) {
    let output = render_messages_with(messages, Term::stderr().features().colors_supported());
    if !output.is_empty() {
        eprint!("{}", output);
    }
}

pub fn render_summary(summary: &Summary) -> String {
    render_summary_with(summary, stdout_colors())
}

fn render_summary_with(summary: &Summary, use_color: bool) -> String {
    let status = &summary.status;
    let error_style = if status.client_error + status.server_error > 0 {
        names::ALERT
    } else {
        names::INFO
    };
    let data = DetailsData {
        title: format!("Summary {}/{}", summary.project, summary.run_id),
        fields: fields(vec![
            ("pages", summary.pages.to_string(), names::INFO),
            ("images", summary.images.to_string(), names::INFO),
            ("errors", summary.errors.to_string(), names::INFO),
            ("issues", summary.issues.total.to_string(), names::INFO),
            ("2xx", status.success.to_string(), names::INFO),
            ("3xx", status.redirect.to_string(), names::INFO),
            ("4xx", status.client_error.to_string(), error_style),
            ("5xx", status.server_error.to_string(), error_style),
            ("other", status.other.to_string(), names::INFO),
            ("generated", summary.generated.clone(), names::TIME),
        ]),
    };
    render_or_report(DETAILS_TEMPLATE, &data, use_color)
}

pub fn render_report(report: &Report) -> String {
    render_report_with(report, stdout_colors())
}

fn render_report_with(report: &Report, use_color: bool) -> String {
    let base_url = if report.base_url.is_empty() {
        NOT_SET.to_string()
    } else {
        report.base_url.clone()
    };
    let crawl = &report.crawl;

    let top = report.top_issue_list();
    let count_width = top
        .iter()
        .map(|(_, count)| count.width())
        .max()
        .unwrap_or(0);
    let issues = top
        .into_iter()
        .map(|(key, count)| IssueLine {
            count: pad_left(&count, count_width),
            key,
        })
        .collect();

    let data = ReportData {
        title: format!("Report {}/{}", report.project, report.run_id),
        fields: fields(vec![
            ("base url", base_url, names::INFO),
            ("generated", report.generated_at.clone(), names::TIME),
            ("pages", crawl.pages_count.to_string(), names::INFO),
            ("images", crawl.images_count.to_string(), names::INFO),
            ("errors", crawl.errors_count.to_string(), names::INFO),
        ]),
        issues,
    };
    render_or_report(REPORT_TEMPLATE, &data, use_color)
}

/// Renders the runs of a project, with relative build times for summarized runs.
pub fn render_runs(runs: &[RunInfo]) -> String {
    render_runs_with(runs, Utc::now(), stdout_colors())
}

fn render_runs_with(runs: &[RunInfo], now: DateTime<Utc>, use_color: bool) -> String {
    if runs.is_empty() {
        return String::new();
    }

    let id_width = runs
        .iter()
        .map(|info| info.run.run_id.width())
        .chain(std::iter::once("RUN".width()))
        .max()
        .unwrap_or(0);

    let lines = runs
        .iter()
        .map(|info| {
            let (time_ago, detail, detail_style) = match &info.summary {
                Some(summary) => {
                    let time_ago = summary
                        .generated_at()
                        .map(|at| format_time_ago(at, now))
                        .unwrap_or_else(|| " ".repeat(TIME_WIDTH));
                    let detail = format!(
                        "{} pages  {} images  {} errors  {} issues",
                        summary.pages, summary.images, summary.errors, summary.issues.total
                    );
                    let style = if summary.status.server_error > 0 {
                        names::ALERT
                    } else {
                        names::INFO
                    };
                    (time_ago, detail, style)
                }
                None => (
                    " ".repeat(TIME_WIDTH),
                    "not summarized".to_string(),
                    names::MUTED,
                ),
            };
            RunLine {
                padding: " ".repeat(id_width.saturating_sub(info.run.run_id.width())),
                run_id: info.run.run_id.clone(),
                time_ago,
                detail,
                detail_style,
            }
        })
        .collect();

    let header = format!(
        "{}{}{}{}TOTALS",
        pad_right("RUN", id_width),
        COLUMN_GAP,
        pad_left("SUMMARIZED", TIME_WIDTH),
        COLUMN_GAP
    );
    render_or_report(
        RUNS_TEMPLATE,
        &RunsData {
            header,
            runs: lines,
        },
        use_color,
    )
}

/// Renders the timeseries rows as an aligned table, oldest first.
pub fn render_timeseries(timeseries: &Timeseries) -> String {
    render_timeseries_with(timeseries, stdout_colors())
}

fn render_timeseries_with(timeseries: &Timeseries, use_color: bool) -> String {
    let rows = timeseries.rows();
    if rows.is_empty() {
        return String::new();
    }

    let headers = [
        "RUN", "DATE", "PAGES", "IMAGES", "ERRORS", "2XX", "3XX", "4XX", "5XX", "ISSUES",
    ];
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.run_id.clone(),
                row.date.clone(),
                row.pages.to_string(),
                row.images.to_string(),
                row.errors.to_string(),
                row.success.to_string(),
                row.redirect.to_string(),
                row.client_error.to_string(),
                row.server_error.to_string(),
                row.issues.to_string(),
            ]
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .map(|row| row[i].width())
                .chain(std::iter::once(header.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    // Text columns (run id, date) align left, counts align right.
    let format_line = |values: &[&str]| -> String {
        values
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (value, width))| {
                if i < 2 {
                    pad_right(value, *width)
                } else {
                    pad_left(value, *width)
                }
            })
            .collect::<Vec<_>>()
            .join(COLUMN_GAP)
            .trim_end()
            .to_string()
    };

    let table_rows = rows
        .iter()
        .zip(&cells)
        .map(|(row, values)| {
            let values: Vec<&str> = values.iter().map(String::as_str).collect();
            TableRow {
                line: format_line(&values),
                style: if row.client_error + row.server_error > 0 {
                    names::ALERT
                } else {
                    names::INFO
                },
            }
        })
        .collect();

    let data = TableData {
        header: format_line(&headers),
        rows: table_rows,
    };
    render_or_report(TABLE_TEMPLATE, &data, use_color)
}

/// Renders section names with a one-line preview of each body.
pub fn render_sections(sections: &Sections) -> String {
    render_sections_with(sections, stdout_colors())
}

fn render_sections_with(sections: &Sections, use_color: bool) -> String {
    if sections.is_empty() {
        return String::new();
    }

    let name_width = sections.iter().map(|(name, _)| name.width()).max().unwrap_or(0);
    let lines = sections
        .iter()
        .map(|(name, body)| {
            let first_line = body.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
            SectionLine {
                name: name.to_string(),
                padding: " ".repeat(name_width.saturating_sub(name.width())),
                preview: truncate_to_width(first_line.trim(), PREVIEW_WIDTH),
            }
        })
        .collect();

    render_or_report(SECTIONS_TEMPLATE, &SectionsData { sections: lines }, use_color)
}

pub fn render_config(config: &SeoConfig) -> String {
    render_config_with(config, stdout_colors())
}

fn render_config_with(config: &SeoConfig, use_color: bool) -> String {
    if config.projects.is_empty() {
        return String::new();
    }

    let entries = config
        .projects
        .iter()
        .map(|(project, settings)| {
            let (value, style) = match &settings.base_url {
                Some(url) => (url.clone(), names::INFO),
                None => (NOT_SET.to_string(), names::MUTED),
            };
            (project.as_str(), value, style)
        })
        .collect();

    let data = DetailsData {
        title: "Projects".to_string(),
        fields: fields(entries),
    };
    render_or_report(DETAILS_TEMPLATE, &data, use_color)
}

fn fields(entries: Vec<(&str, String, &'static str)>) -> Vec<Field> {
    let width = entries
        .iter()
        .map(|(label, _, _)| label.width())
        .max()
        .unwrap_or(0);
    entries
        .into_iter()
        .map(|(label, value, style)| Field {
            padding: " ".repeat(width.saturating_sub(label.width())),
            label: label.to_string(),
            value,
            style,
        })
        .collect()
}

fn pad_right(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(s.width())))
}

fn pad_left(s: &str, width: usize) -> String {
    format!("{}{}", " ".repeat(width.saturating_sub(s.width())), s)
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);

    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
