//! # CLI Templates
//!
//! Terminal output is rendered from minijinja templates kept as stand-alone files and
//! embedded at compile time, so layout edits never touch Rust code.
//!
//! Conventions:
//!
//! - The environment runs with `trim_blocks` and `lstrip_blocks`: block tags sit on
//!   their own lines and never emit whitespace. Every output line is a line of
//!   template text.
//! - Widths, padding and truncation are computed in Rust (they need Unicode-aware
//!   measuring) and arrive in the data as plain strings.
//! - Style choice is data too: render code passes a style name (`row.style`) rather
//!   than branching on flags inside the template.
//! - Shared fragments (`fields.tmp`) are pulled in with `{% include %}`.

pub const MESSAGES_TEMPLATE: &str = "messages.tmp";
pub const DETAILS_TEMPLATE: &str = "details.tmp";
pub const REPORT_TEMPLATE: &str = "report.tmp";
pub const RUNS_TEMPLATE: &str = "runs.tmp";
pub const TABLE_TEMPLATE: &str = "table.tmp";
pub const SECTIONS_TEMPLATE: &str = "sections.tmp";

/// Every template, keyed by the name it is registered (and included) under.
pub const TEMPLATES: &[(&str, &str)] = &[
    (MESSAGES_TEMPLATE, include_str!("templates/messages.tmp")),
    ("fields.tmp", include_str!("templates/fields.tmp")),
    (DETAILS_TEMPLATE, include_str!("templates/details.tmp")),
    (REPORT_TEMPLATE, include_str!("templates/report.tmp")),
    (RUNS_TEMPLATE, include_str!("templates/runs.tmp")),
    (TABLE_TEMPLATE, include_str!("templates/table.tmp")),
    (SECTIONS_TEMPLATE, include_str!("templates/sections.tmp")),
];
