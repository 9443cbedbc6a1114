//! # Storage Layer
//!
//! The [`DataStore`] trait is a key-value blob store keyed by run, document and
//! collection. It moves raw JSON text; parsing and defaulting belong to the command
//! layer, which decides per document whether a malformed file is an error or empty data.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage under a root directory
//! - [`memory::InMemoryStore`]: no persistence, used by command tests
//!
//! ## Storage Format
//!
//! For `FileStore`:
//! ```text
//! <root>/
//! ├── config.json
//! └── projects/<project>/
//!     ├── timeseries.json
//!     └── runs/<run_id>/
//!         ├── audit.json
//!         ├── pages/*.json
//!         ├── images/*.json
//!         ├── errors/*.json
//!         ├── summary.json
//!         ├── report.json
//!         └── sections.json
//! ```

use crate::error::Result;
use crate::model::{Collection, RunDocument, RunRef};
use std::path::PathBuf;

pub mod fs;
pub mod memory;

/// Abstract interface for run storage.
///
/// Reads return `Ok(None)` when the target does not exist; `Err` is reserved for
/// real I/O failures. Writes replace the whole document.
pub trait DataStore {
    /// Read one document of a run
    fn read_document(&self, run: &RunRef, doc: RunDocument) -> Result<Option<String>>;

    /// Write (overwrite) one document of a run
    fn write_document(&mut self, run: &RunRef, doc: RunDocument, content: &str) -> Result<()>;

    /// Names of the `*.json` records in a collection, sorted. Missing collection is empty.
    fn list_records(&self, run: &RunRef, collection: Collection) -> Result<Vec<String>>;

    /// Read a single record by name. Records are opaque bytes.
    fn read_record(
        &self,
        run: &RunRef,
        collection: Collection,
        name: &str,
    ) -> Result<Option<Vec<u8>>>;

    /// Write a single record (used when importing crawl output)
    fn write_record(
        &mut self,
        run: &RunRef,
        collection: Collection,
        name: &str,
        content: &[u8],
    ) -> Result<()>;

    /// Read the project's timeseries document
    fn read_timeseries(&self, project: &str) -> Result<Option<String>>;

    /// Write the project's timeseries document
    fn write_timeseries(&mut self, project: &str, content: &str) -> Result<()>;

    /// Whether the run's directory exists
    fn run_exists(&self, run: &RunRef) -> Result<bool>;

    /// Create the run's directory structure if needed
    fn ensure_run(&mut self, run: &RunRef) -> Result<()>;

    /// Run ids of a project, sorted ascending
    fn list_runs(&self, project: &str) -> Result<Vec<String>>;

    /// Location of the run (real directory for file stores, virtual otherwise)
    fn run_path(&self, run: &RunRef) -> PathBuf;
}
