//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single entry point
//! for all seoscope operations, whatever the UI.
//!
//! It:
//! - **Normalizes inputs**: raw project and run names become validated [`RunRef`]s
//! - **Supplies context**: the current time and the project's configured base URL
//! - **Dispatches** to the matching `commands::*` function
//!
//! It does no aggregation itself and never prints.
//!
//! `SeoApi<S: DataStore>` is generic over the storage backend:
//! - Production: `SeoApi<FileStore>`
//! - Testing: `SeoApi<InMemoryStore>`

use crate::commands;
use crate::config::SeoConfig;
use crate::error::Result;
use crate::model::RunRef;
use crate::store::DataStore;
use chrono::Utc;
use std::path::Path;

pub struct SeoApi<S: DataStore> {
    store: S,
    paths: commands::SeoPaths,
    config: SeoConfig,
}

impl<S: DataStore> SeoApi<S> {
    pub fn new(store: S, paths: commands::SeoPaths, config: SeoConfig) -> Self {
        Self {
            store,
            paths,
            config,
        }
    }

    pub fn start_run(&mut self, project: &str, run_id: Option<String>) -> Result<CmdResult> {
        commands::runs::start(&mut self.store, project, run_id, Utc::now())
    }

    pub fn list_runs(&self, project: &str) -> Result<CmdResult> {
        commands::runs::list(&self.store, project)
    }

    pub fn import_run(
        &mut self,
        project: &str,
        run_id: Option<String>,
        source: &Path,
    ) -> Result<CmdResult> {
        commands::import::run(&mut self.store, project, run_id, source, Utc::now())
    }

    /// Rebuild the run's summary, optionally recording it in the project timeseries.
    pub fn summarize(&mut self, project: &str, run_id: &str, record: bool) -> Result<CmdResult> {
        let run = RunRef::new(project, run_id)?;
        let mut result = commands::summary::run(&mut self.store, &run, Utc::now())?;
        if record {
            if let Some(summary) = result.summary.clone() {
                let timeseries = commands::timeseries::append(&mut self.store, &summary)?;
                result.add_message(CmdMessage::success(format!(
                    "Recorded in {} timeseries ({} entries)",
                    project,
                    timeseries.items.len()
                )));
                result = result.with_timeseries(timeseries);
            }
        }
        Ok(result)
    }

    pub fn record(&mut self, project: &str, run_id: &str) -> Result<CmdResult> {
        let run = RunRef::new(project, run_id)?;
        commands::timeseries::run(&mut self.store, &run)
    }

    pub fn timeseries(&self, project: &str) -> Result<CmdResult> {
        commands::timeseries::show(&self.store, project)
    }

    pub fn build_report(&mut self, project: &str, run_id: &str) -> Result<CmdResult> {
        let run = RunRef::new(project, run_id)?;
        let base_url = self.config.base_url(project);
        commands::report::run(&mut self.store, &run, base_url, Utc::now())
    }

    pub fn print_report(
        &mut self,
        project: &str,
        run_id: &str,
        format: PrintFormat,
    ) -> Result<CmdResult> {
        let run = RunRef::new(project, run_id)?;
        let base_url = self.config.base_url(project);
        commands::print::run(&mut self.store, &run, base_url, format, Utc::now())
    }

    pub fn export_run(&self, project: &str, run_id: &str, dest: &Path) -> Result<CmdResult> {
        let run = RunRef::new(project, run_id)?;
        commands::export::run(&self.store, &run, dest)
    }

    pub fn sections(&self, project: &str, run_id: &str) -> Result<CmdResult> {
        let run = RunRef::new(project, run_id)?;
        commands::sections::list(&self.store, &run)
    }

    pub fn set_section(
        &mut self,
        project: &str,
        run_id: &str,
        name: &str,
        body: &str,
    ) -> Result<CmdResult> {
        let run = RunRef::new(project, run_id)?;
        commands::sections::set(&mut self.store, &run, name, body)
    }

    pub fn remove_section(&mut self, project: &str, run_id: &str, name: &str) -> Result<CmdResult> {
        let run = RunRef::new(project, run_id)?;
        commands::sections::remove(&mut self.store, &run, name)
    }

    pub fn config(&mut self, action: ConfigAction) -> Result<CmdResult> {
        let result = commands::config::run(&self.paths, action)?;
        if let Some(config) = &result.config {
            self.config = config.clone();
        }
        Ok(result)
    }

    pub fn init(&self) -> Result<CmdResult> {
        commands::init::run(&self.paths)
    }

    pub fn paths(&self) -> &commands::SeoPaths {
        &self.paths
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::print::PrintFormat;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel, SeoPaths};
