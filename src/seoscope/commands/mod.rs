use crate::config::SeoConfig;
use crate::model::{Report, RunInfo, RunRef, Sections, Summary, Timeseries};
use std::path::PathBuf;

pub mod config;
pub mod export;
pub mod helpers;
pub mod import;
pub mod init;
pub mod print;
pub mod report;
pub mod runs;
pub mod sections;
pub mod summary;
pub mod timeseries;

/// Where the store lives on disk. Config and init work on this directly.
#[derive(Debug, Clone)]
pub struct SeoPaths {
    pub root: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub run: Option<RunRef>,
    pub summary: Option<Summary>,
    pub report: Option<Report>,
    pub timeseries: Option<Timeseries>,
    pub runs: Vec<RunInfo>,
    pub sections: Option<Sections>,
    pub rendered: Option<String>,
    pub paths: Vec<PathBuf>,
    pub config: Option<SeoConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_run(mut self, run: RunRef) -> Self {
        self.run = Some(run);
        self
    }

    pub fn with_summary(mut self, summary: Summary) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn with_report(mut self, report: Report) -> Self {
        self.report = Some(report);
        self
    }

    pub fn with_timeseries(mut self, timeseries: Timeseries) -> Self {
        self.timeseries = Some(timeseries);
        self
    }

    pub fn with_runs(mut self, runs: Vec<RunInfo>) -> Self {
        self.runs = runs;
        self
    }

    pub fn with_sections(mut self, sections: Sections) -> Self {
        self.sections = Some(sections);
        self
    }

    pub fn with_rendered(mut self, rendered: String) -> Self {
        self.rendered = Some(rendered);
        self
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_config(mut self, config: SeoConfig) -> Self {
        self.config = Some(config);
        self
    }
}
