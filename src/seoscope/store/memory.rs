use super::DataStore;
use crate::error::Result;
use crate::model::{Collection, RunDocument, RunRef};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    runs: BTreeSet<(String, String)>,
    documents: HashMap<(RunRef, RunDocument), String>,
    records: HashMap<(RunRef, Collection), BTreeMap<String, Vec<u8>>>,
    timeseries: HashMap<String, String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn touch(&mut self, run: &RunRef) {
        self.runs.insert((run.project.clone(), run.run_id.clone()));
    }
}

impl DataStore for InMemoryStore {
    fn read_document(&self, run: &RunRef, doc: RunDocument) -> Result<Option<String>> {
        Ok(self.documents.get(&(run.clone(), doc)).cloned())
    }

    fn write_document(&mut self, run: &RunRef, doc: RunDocument, content: &str) -> Result<()> {
        self.touch(run);
        self.documents
            .insert((run.clone(), doc), content.to_string());
        Ok(())
    }

    fn list_records(&self, run: &RunRef, collection: Collection) -> Result<Vec<String>> {
        Ok(self
            .records
            .get(&(run.clone(), collection))
            .map(|records| {
                records
                    .keys()
                    .filter(|name| name.ends_with(".json"))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn read_record(
        &self,
        run: &RunRef,
        collection: Collection,
        name: &str,
    ) -> Result<Option<Vec<u8>>> {
        Ok(self
            .records
            .get(&(run.clone(), collection))
            .and_then(|records| records.get(name))
            .cloned())
    }

    fn write_record(
        &mut self,
        run: &RunRef,
        collection: Collection,
        name: &str,
        content: &[u8],
    ) -> Result<()> {
        self.touch(run);
        self.records
            .entry((run.clone(), collection))
            .or_default()
            .insert(name.to_string(), content.to_vec());
        Ok(())
    }

    fn read_timeseries(&self, project: &str) -> Result<Option<String>> {
        Ok(self.timeseries.get(project).cloned())
    }

    fn write_timeseries(&mut self, project: &str, content: &str) -> Result<()> {
        self.timeseries
            .insert(project.to_string(), content.to_string());
        Ok(())
    }

    fn run_exists(&self, run: &RunRef) -> Result<bool> {
        Ok(self
            .runs
            .contains(&(run.project.clone(), run.run_id.clone())))
    }

    fn ensure_run(&mut self, run: &RunRef) -> Result<()> {
        self.touch(run);
        Ok(())
    }

    fn list_runs(&self, project: &str) -> Result<Vec<String>> {
        Ok(self
            .runs
            .iter()
            .filter(|(p, _)| p == project)
            .map(|(_, run_id)| run_id.clone())
            .collect())
    }

    fn run_path(&self, run: &RunRef) -> PathBuf {
        PathBuf::from(format!("mem://{}/{}", run.project, run.run_id))
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use serde_json::{json, Value};

    /// Builds a run's crawl artifacts the way a crawler would leave them.
    pub struct RunFixture {
        pub store: InMemoryStore,
        pub run: RunRef,
        next_record: usize,
    }

    impl RunFixture {
        pub fn new(project: &str, run_id: &str) -> Self {
            let run = RunRef::new(project, run_id).unwrap();
            let mut store = InMemoryStore::new();
            store.ensure_run(&run).unwrap();
            Self {
                store,
                run,
                next_record: 0,
            }
        }

        fn next_name(&mut self) -> String {
            self.next_record += 1;
            format!("{:04}.json", self.next_record)
        }

        pub fn with_page(mut self, status: Value) -> Self {
            let name = self.next_name();
            let body = json!({"url": format!("https://example.com/{}", name), "status": status});
            self.store
                .write_record(&self.run, Collection::Pages, &name, body.to_string().as_bytes())
                .unwrap();
            self
        }

        pub fn with_pages(mut self, statuses: &[i64]) -> Self {
            for status in statuses {
                self = self.with_page(json!(status));
            }
            self
        }

        pub fn with_raw_page(mut self, raw: impl AsRef<[u8]>) -> Self {
            let name = self.next_name();
            self.store
                .write_record(&self.run, Collection::Pages, &name, raw.as_ref())
                .unwrap();
            self
        }

        pub fn with_records(mut self, collection: Collection, count: usize) -> Self {
            for _ in 0..count {
                let name = self.next_name();
                self.store
                    .write_record(&self.run, collection, &name, b"not parsed")
                    .unwrap();
            }
            self
        }

        pub fn with_audit(mut self, audit: Value) -> Self {
            self.store
                .write_document(&self.run, RunDocument::Audit, &audit.to_string())
                .unwrap();
            self
        }
    }
}
