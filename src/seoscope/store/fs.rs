use super::DataStore;
use crate::error::{Result, SeoError};
use crate::model::{Collection, RunDocument, RunRef};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const TIMESERIES_FILENAME: &str = "timeseries.json";

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn project_dir(&self, project: &str) -> PathBuf {
        self.root.join("projects").join(project)
    }

    fn runs_dir(&self, project: &str) -> PathBuf {
        self.project_dir(project).join("runs")
    }

    fn collection_dir(&self, run: &RunRef, collection: Collection) -> PathBuf {
        self.run_path(run).join(collection.dir_name())
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(SeoError::Io)?;
        }
        Ok(())
    }

    fn read_optional(path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SeoError::Io(e)),
        }
    }

    fn read_bytes_optional(path: &Path) -> Result<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SeoError::Io(e)),
        }
    }
}

/// Writes to a sibling tmp file, then renames over the target. Creates the parent
/// directory if needed.
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| SeoError::Store(format!("No parent for {}", path.display())))?;
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(SeoError::Io)?;
    }

    let tmp_file = dir.join(format!(".write-{}.tmp", Uuid::new_v4()));
    fs::write(&tmp_file, content).map_err(SeoError::Io)?;
    if let Err(e) = fs::rename(&tmp_file, path) {
        let _ = fs::remove_file(&tmp_file);
        return Err(SeoError::Io(e));
    }
    Ok(())
}

fn is_json_file(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("json")
}

impl DataStore for FileStore {
    fn read_document(&self, run: &RunRef, doc: RunDocument) -> Result<Option<String>> {
        Self::read_optional(&self.run_path(run).join(doc.file_name()))
    }

    fn write_document(&mut self, run: &RunRef, doc: RunDocument, content: &str) -> Result<()> {
        let path = self.run_path(run).join(doc.file_name());
        write_atomic(&path, content.as_bytes())
    }

    fn list_records(&self, run: &RunRef, collection: Collection) -> Result<Vec<String>> {
        let dir = self.collection_dir(run, collection);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SeoError::Io(e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(SeoError::Io)?.path();
            if !is_json_file(&path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_record(
        &self,
        run: &RunRef,
        collection: Collection,
        name: &str,
    ) -> Result<Option<Vec<u8>>> {
        Self::read_bytes_optional(&self.collection_dir(run, collection).join(name))
    }

    fn write_record(
        &mut self,
        run: &RunRef,
        collection: Collection,
        name: &str,
        content: &[u8],
    ) -> Result<()> {
        let path = self.collection_dir(run, collection).join(name);
        write_atomic(&path, content)
    }

    fn read_timeseries(&self, project: &str) -> Result<Option<String>> {
        Self::read_optional(&self.project_dir(project).join(TIMESERIES_FILENAME))
    }

    fn write_timeseries(&mut self, project: &str, content: &str) -> Result<()> {
        let path = self.project_dir(project).join(TIMESERIES_FILENAME);
        write_atomic(&path, content.as_bytes())
    }

    fn run_exists(&self, run: &RunRef) -> Result<bool> {
        Ok(self.run_path(run).is_dir())
    }

    fn ensure_run(&mut self, run: &RunRef) -> Result<()> {
        for collection in Collection::all() {
            self.ensure_dir(&self.collection_dir(run, *collection))?;
        }
        Ok(())
    }

    fn list_runs(&self, project: &str) -> Result<Vec<String>> {
        let entries = match fs::read_dir(self.runs_dir(project)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SeoError::Io(e)),
        };

        let mut runs = Vec::new();
        for entry in entries {
            let path = entry.map_err(SeoError::Io)?.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                runs.push(name.to_string());
            }
        }
        runs.sort();
        Ok(runs)
    }

    fn run_path(&self, run: &RunRef) -> PathBuf {
        self.runs_dir(&run.project).join(&run.run_id)
    }
}
