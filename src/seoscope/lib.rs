//! # Seoscope Architecture
//!
//! Seoscope turns the raw output of a site crawl (one JSON file per page, image and
//! crawl error, plus an audit document) into summaries, a per-project timeseries and
//! printable reports. It is a library with a CLI client on top.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Validates names, supplies clock and config               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Aggregation, timeseries, report building, rendering      │
//! │  - Operates on Rust types, returns Rust types               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract DataStore trait                                 │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data flow
//!
//! A crawl fills a run's `pages/`, `images/` and `errors/` collections and writes
//! `audit.json`. `summarize` buckets page statuses and counts records into
//! `summary.json`; that summary can be appended to the project's `timeseries.json`.
//! `report` combines counts, the audit and its top issues into `report.json`, which
//! `print` renders together with any editable sections.
//!
//! Crawl artifacts are untrusted: missing or malformed inputs degrade to empty data.
//! Write failures always propagate.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Document types and typed accessors
//! - [`config`]: Store configuration (project base URLs)
//! - [`init`]: Store root resolution and context setup
//! - [`logging`]: One-time tracing subscriber setup
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod logging;
pub mod model;
pub mod store;
