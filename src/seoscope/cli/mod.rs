//! # CLI Behavior
//!
//! This is **one possible UI client** for seoscope, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and output
//! formatting.
//!
//! ## Store root
//!
//! Every command works against one store root, resolved from `--home`, then
//! `$SEOSCOPE_HOME`, then the platform data directory.
//!
//! ## Output streams
//!
//! Rendered tables and messages go to stdout. `print` writes the report document
//! itself to stdout (or `--output`), so its messages go to stderr instead. Logs always
//! go to stderr, filtered by `SEOSCOPE_LOG` or `-v`.
//!
//! ## Section bodies
//!
//! `section set` takes the body from its trailing arguments. With no body arguments
//! and piped stdin, the body is read from stdin:
//!
//! ```text
//! cat intro.md | seoscope section set acme 20240501-080000 Intro
//! ```
//!
//! ## Module Structure
//!
//! - `commands`: Per-command handlers that call the API and print output
//! - `render`: Output formatting (tables, colors, messages)
//! - `setup`: Argument parsing via clap, grouped help text
//! - `styles`: Terminal styling theme
//! - `templates`: Output templates

mod commands;
mod render;
pub mod setup;
mod styles;
mod templates;

pub use commands::run;
