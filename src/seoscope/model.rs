//! Typed views over the JSON documents of a run.
//!
//! Crawl artifacts (page records, the audit document) are produced by an external
//! crawler, so they are read through accessors that substitute explicit defaults
//! instead of failing. Derived documents (summary, report, timeseries rows) are plain
//! serde structs whose field order is the on-disk order.

use crate::error::{Result, SeoError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;

/// Maximum number of entries kept in a report's `top_issues`.
pub const TOP_ISSUES_LIMIT: usize = 10;

/// Identifies one crawl execution of a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunRef {
    pub project: String,
    pub run_id: String,
}

impl RunRef {
    pub fn new(project: impl Into<String>, run_id: impl Into<String>) -> Result<Self> {
        let project = project.into();
        let run_id = run_id.into();
        validate_name("project", &project)?;
        validate_name("run", &run_id)?;
        Ok(Self { project, run_id })
    }
}

impl fmt::Display for RunRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project, self.run_id)
    }
}

/// Names become directory components, so anything that could escape the tree is rejected.
pub fn validate_name(kind: &'static str, name: &str) -> Result<()> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(SeoError::InvalidName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Per-record collections inside a run directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Pages,
    Images,
    Errors,
}

impl Collection {
    pub fn dir_name(&self) -> &'static str {
        match self {
            Collection::Pages => "pages",
            Collection::Images => "images",
            Collection::Errors => "errors",
        }
    }

    pub fn all() -> &'static [Collection] {
        &[Collection::Pages, Collection::Images, Collection::Errors]
    }
}

/// Single documents inside a run directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunDocument {
    Audit,
    Summary,
    Report,
    Sections,
}

impl RunDocument {
    pub fn file_name(&self) -> &'static str {
        match self {
            RunDocument::Audit => "audit.json",
            RunDocument::Summary => "summary.json",
            RunDocument::Report => "report.json",
            RunDocument::Sections => "sections.json",
        }
    }

    pub fn all() -> &'static [RunDocument] {
        &[
            RunDocument::Audit,
            RunDocument::Summary,
            RunDocument::Report,
            RunDocument::Sections,
        ]
    }
}

/// ISO-8601 UTC timestamp with second precision, e.g. `2024-05-01T09:30:00Z`.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Success,
    Redirect,
    ClientError,
    ServerError,
    Other,
}

impl Bucket {
    pub fn for_status(code: i64) -> Self {
        match code {
            200..=299 => Bucket::Success,
            300..=399 => Bucket::Redirect,
            400..=499 => Bucket::ClientError,
            500..=599 => Bucket::ServerError,
            _ => Bucket::Other,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Bucket::Success => "2xx",
            Bucket::Redirect => "3xx",
            Bucket::ClientError => "4xx",
            Bucket::ServerError => "5xx",
            Bucket::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBuckets {
    #[serde(rename = "2xx", default)]
    pub success: u64,
    #[serde(rename = "3xx", default)]
    pub redirect: u64,
    #[serde(rename = "4xx", default)]
    pub client_error: u64,
    #[serde(rename = "5xx", default)]
    pub server_error: u64,
    #[serde(default)]
    pub other: u64,
}

impl StatusBuckets {
    pub fn record(&mut self, code: i64) {
        let slot = match Bucket::for_status(code) {
            Bucket::Success => &mut self.success,
            Bucket::Redirect => &mut self.redirect,
            Bucket::ClientError => &mut self.client_error,
            Bucket::ServerError => &mut self.server_error,
            Bucket::Other => &mut self.other,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u64 {
        self.success + self.redirect + self.client_error + self.server_error + self.other
    }
}

/// Status code of a raw page record. Absent, malformed or non-numeric values are 0,
/// and so is a record that is not valid UTF-8 JSON at all.
pub fn page_status(raw: &[u8]) -> i64 {
    serde_json::from_slice::<Value>(raw)
        .ok()
        .and_then(|doc| doc.get("status").map(coerce_status))
        .unwrap_or(0)
}

fn coerce_status(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    }
}

/// Ranking weight of an issue count: numbers as-is, numeric strings parsed, anything
/// else 0.
pub fn issue_weight(value: &Value) -> f64 {
    let weight = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    weight.filter(|w| w.is_finite()).unwrap_or(0.0)
}

fn count_label(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.trim().parse::<f64>().is_ok() => s.trim().to_string(),
        _ => "0".to_string(),
    }
}

/// The crawler's audit document.
///
/// The raw JSON is kept untouched for the report passthrough; the accessors below
/// read the few fields aggregation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Audit {
    raw: Value,
}

impl Default for Audit {
    fn default() -> Self {
        Self {
            raw: Value::Object(Map::new()),
        }
    }
}

impl Audit {
    pub fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    fn summary_field(&self, key: &str) -> Option<&Map<String, Value>> {
        self.raw.get("summary")?.get(key)?.as_object()
    }

    /// `summary.issue_counts` in document order, values as the crawler wrote them.
    pub fn issue_counts(&self) -> Vec<(String, Value)> {
        self.summary_field("issue_counts")
            .map(|counts| {
                counts
                    .iter()
                    .map(|(key, count)| (key.clone(), count.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sum of `len(issues)` over all items.
    pub fn issues_total(&self) -> u64 {
        self.raw
            .get("items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("issues").and_then(Value::as_array))
                    .map(|issues| issues.len() as u64)
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Precomputed `summary.status_buckets`, or an empty mapping.
    pub fn status_buckets(&self) -> Map<String, Value> {
        self.summary_field("status_buckets")
            .cloned()
            .unwrap_or_default()
    }
}

/// Highest-count issues, descending. Ties keep their original order.
pub fn top_issues(counts: Vec<(String, Value)>, limit: usize) -> Vec<(String, Value)> {
    let mut ranked = counts;
    // sort_by is stable
    ranked.sort_by(|a, b| {
        issue_weight(&b.1)
            .partial_cmp(&issue_weight(&a.1))
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(limit);
    ranked
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueTotals {
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub project: String,
    pub run_id: String,
    pub generated: String,
    pub pages: u64,
    pub images: u64,
    pub errors: u64,
    pub status: StatusBuckets,
    pub issues: IssueTotals,
}

impl Summary {
    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.generated)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeseriesRow {
    pub run_id: String,
    pub date: String,
    pub pages: u64,
    pub images: u64,
    pub errors: u64,
    #[serde(rename = "2xx")]
    pub success: u64,
    #[serde(rename = "3xx")]
    pub redirect: u64,
    #[serde(rename = "4xx")]
    pub client_error: u64,
    #[serde(rename = "5xx")]
    pub server_error: u64,
    pub issues: u64,
}

impl TimeseriesRow {
    pub fn from_summary(summary: &Summary) -> Self {
        let date = summary
            .generated_at()
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| summary.generated.chars().take(10).collect());
        Self {
            run_id: summary.run_id.clone(),
            date,
            pages: summary.pages,
            images: summary.images,
            errors: summary.errors,
            success: summary.status.success,
            redirect: summary.status.redirect,
            client_error: summary.status.client_error,
            server_error: summary.status.server_error,
            issues: summary.issues.total,
        }
    }
}

/// Per-project append-only list of run snapshots.
///
/// Existing items are kept as raw JSON so that appending never rewrites or drops
/// rows written by older versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeseries {
    pub project: String,
    pub items: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Timeseries {
    pub fn empty(project: &str) -> Self {
        Self {
            project: project.to_string(),
            items: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Lenient load: a non-object document starts over, a missing or non-list
    /// `items` becomes an empty list.
    pub fn from_value(project: &str, value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::empty(project);
        };
        let items = match fields.remove("items") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        fields.remove("project");
        Self {
            project: project.to_string(),
            items,
            extra: fields,
        }
    }

    pub fn push(&mut self, row: &TimeseriesRow) -> Result<()> {
        self.items.push(serde_json::to_value(row)?);
        Ok(())
    }

    /// Items that parse as rows, in order. Foreign items are skipped.
    pub fn rows(&self) -> Vec<TimeseriesRow> {
        self.items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlCounts {
    pub pages_count: u64,
    pub images_count: u64,
    pub errors_count: u64,
    #[serde(default)]
    pub status_buckets: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub run_id: String,
    pub project: String,
    #[serde(default)]
    pub base_url: String,
    pub generated_at: String,
    pub crawl: CrawlCounts,
    #[serde(default)]
    pub audit: Value,
    #[serde(default)]
    pub top_issues: Map<String, Value>,
}

impl Report {
    /// Top issues with their counts formatted for display.
    pub fn top_issue_list(&self) -> Vec<(String, String)> {
        self.top_issues
            .iter()
            .map(|(key, count)| (key.clone(), count_label(count)))
            .collect()
    }
}

/// Named markdown blocks attached to a run's printable report, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    entries: Vec<(String, String)>,
}

impl Sections {
    /// Lenient load: only string-valued entries of an object survive.
    pub fn from_value(value: Value) -> Self {
        let entries = match value {
            Value::Object(fields) => fields
                .into_iter()
                .filter_map(|(name, body)| match body {
                    Value::String(body) => Some((name, body)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        Self { entries }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(name, body)| (name.clone(), Value::String(body.clone())))
                .collect(),
        )
    }

    /// Replaces the body in place when the section exists, appends otherwise.
    pub fn set(&mut self, name: &str, body: &str) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = body.to_string(),
            None => self.entries.push((name.to_string(), body.to_string())),
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| n != name);
        self.entries.len() != before
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, body)| body.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, b)| (n.as_str(), b.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A run as shown by `runs`: its id plus the summary, when one has been built.
#[derive(Debug, Clone)]
pub struct RunInfo {
    pub run: RunRef,
    pub summary: Option<Summary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bucket_ranges() {
        for code in 200..600 {
            let expected = match code / 100 {
                2 => "2xx",
                3 => "3xx",
                4 => "4xx",
                _ => "5xx",
            };
            assert_eq!(Bucket::for_status(code).key(), expected, "status {}", code);
        }
        for code in [-1, 0, 99, 100, 199, 600, 999] {
            assert_eq!(Bucket::for_status(code), Bucket::Other, "status {}", code);
        }
    }

    #[test]
    fn test_page_status_coercion() {
        assert_eq!(page_status(br#"{"status": 404}"#), 404);
        assert_eq!(page_status(br#"{"status": 301.0}"#), 301);
        assert_eq!(page_status(br#"{"status": " 200 "}"#), 200);
        assert_eq!(page_status(br#"{"status": "ok"}"#), 0);
        assert_eq!(page_status(br#"{"status": null}"#), 0);
        assert_eq!(page_status(br#"{"url": "https://example.com"}"#), 0);
        assert_eq!(page_status(b"not json"), 0);
        assert_eq!(page_status(&[0xff, 0xfe, 0x00]), 0);
    }

    #[test]
    fn test_top_issues_stable_on_ties() {
        let counts = vec![
            ("a".to_string(), json!(5)),
            ("b".to_string(), json!(9)),
            ("c".to_string(), json!("9")),
            ("d".to_string(), json!(1)),
        ];
        let keys: Vec<String> = top_issues(counts, TOP_ISSUES_LIMIT)
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_top_issues_truncates() {
        let counts = (0..15).map(|i| (format!("issue-{}", i), json!(i))).collect();
        let top = top_issues(counts, TOP_ISSUES_LIMIT);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0], ("issue-14".to_string(), json!(14)));
        assert_eq!(top[9], ("issue-5".to_string(), json!(5)));
    }

    #[test]
    fn test_top_issues_rank_fractional_and_negative_counts() {
        let counts = vec![
            ("neg".to_string(), json!(-3)),
            ("zero".to_string(), json!(0)),
            ("half".to_string(), json!(2.5)),
            ("two".to_string(), json!(2)),
            ("junk".to_string(), json!("lots")),
        ];
        let top = top_issues(counts, TOP_ISSUES_LIMIT);
        assert_eq!(
            top,
            vec![
                ("half".to_string(), json!(2.5)),
                ("two".to_string(), json!(2)),
                ("zero".to_string(), json!(0)),
                ("junk".to_string(), json!("lots")),
                ("neg".to_string(), json!(-3)),
            ]
        );
    }

    #[test]
    fn test_issue_weight() {
        assert_eq!(issue_weight(&json!(4)), 4.0);
        assert_eq!(issue_weight(&json!(-1.5)), -1.5);
        assert_eq!(issue_weight(&json!(" 7 ")), 7.0);
        assert_eq!(issue_weight(&json!("NaN")), 0.0);
        assert_eq!(issue_weight(&json!(null)), 0.0);
        assert_eq!(issue_weight(&json!([1])), 0.0);
    }

    #[test]
    fn test_top_issue_list_labels() {
        let mut top = Map::new();
        top.insert("half".into(), json!(2.5));
        top.insert("neg".into(), json!(-3));
        top.insert("text".into(), json!(" 4 "));
        top.insert("junk".into(), json!({"n": 1}));
        let report = Report {
            run_id: "r1".into(),
            project: "acme".into(),
            base_url: String::new(),
            generated_at: "2024-05-01T08:00:00Z".into(),
            crawl: CrawlCounts {
                pages_count: 0,
                images_count: 0,
                errors_count: 0,
                status_buckets: Map::new(),
            },
            audit: json!({}),
            top_issues: top,
        };
        let labels: Vec<String> = report
            .top_issue_list()
            .into_iter()
            .map(|(_, count)| count)
            .collect();
        assert_eq!(labels, vec!["2.5", "-3", "4", "0"]);
    }

    #[test]
    fn test_audit_accessors() {
        let audit = Audit::from_value(json!({
            "summary": {
                "issue_counts": {"missing_title": 3, "slow": "2", "broken": null},
                "status_buckets": {"2xx": 4}
            },
            "items": [
                {"issues": ["a", "b"]},
                {"issues": []},
                {"url": "no issues key"},
                {"issues": ["c"]}
            ]
        }));
        assert_eq!(audit.issues_total(), 3);
        assert_eq!(
            audit.issue_counts(),
            vec![
                ("missing_title".to_string(), json!(3)),
                ("slow".to_string(), json!("2")),
                ("broken".to_string(), json!(null)),
            ]
        );
        assert_eq!(audit.status_buckets().get("2xx"), Some(&json!(4)));
    }

    #[test]
    fn test_audit_defaults() {
        let audit = Audit::default();
        assert_eq!(audit.issues_total(), 0);
        assert!(audit.issue_counts().is_empty());
        assert!(audit.status_buckets().is_empty());

        let odd = Audit::from_value(json!({"summary": [], "items": "nope"}));
        assert_eq!(odd.issues_total(), 0);
        assert!(odd.issue_counts().is_empty());
    }

    #[test]
    fn test_timeseries_from_value_resets_items() {
        let ts = Timeseries::from_value("acme", json!({"project": "acme", "items": "broken"}));
        assert!(ts.items.is_empty());

        let ts = Timeseries::from_value("acme", json!([1, 2, 3]));
        assert!(ts.items.is_empty());

        let ts = Timeseries::from_value("acme", json!({"items": [{"legacy": true}], "note": "x"}));
        assert_eq!(ts.items.len(), 1);
        assert_eq!(ts.extra.get("note"), Some(&json!("x")));
        assert!(ts.rows().is_empty());
    }

    #[test]
    fn test_row_date_from_summary() {
        let summary = Summary {
            project: "acme".into(),
            run_id: "r1".into(),
            generated: "2024-05-01T23:59:59Z".into(),
            pages: 3,
            images: 2,
            errors: 1,
            status: StatusBuckets {
                success: 1,
                redirect: 1,
                client_error: 0,
                server_error: 0,
                other: 1,
            },
            issues: IssueTotals { total: 7 },
        };
        let row = TimeseriesRow::from_summary(&summary);
        assert_eq!(row.date, "2024-05-01");
        assert_eq!(row.success, 1);
        assert_eq!(row.issues, 7);

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["2xx"], json!(1));
        assert_eq!(value["3xx"], json!(1));
    }

    #[test]
    fn test_sections_set_replaces_in_place() {
        let mut sections = Sections::default();
        sections.set("intro", "Hello");
        sections.set("outro", "Bye");
        sections.set("intro", "Hi");
        let names: Vec<&str> = sections.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["intro", "outro"]);
        assert_eq!(sections.get("intro"), Some("Hi"));
        assert!(sections.remove("outro"));
        assert!(!sections.remove("outro"));
        assert_eq!(sections.len(), 1);
    }

    #[test]
    fn test_validate_name() {
        assert!(RunRef::new("acme", "2024-05-01").is_ok());
        assert!(RunRef::new("", "r1").is_err());
        assert!(RunRef::new("acme", "..").is_err());
        assert!(RunRef::new("a/b", "r1").is_err());
        assert!(RunRef::new("acme", "r\\1").is_err());
    }
}
