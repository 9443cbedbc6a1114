use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, SeoError};
use crate::model::{Collection, RunDocument, RunRef};
use crate::store::DataStore;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Bundle every document and record of a run into `<dest>/<project>-<run_id>.tar.gz`.
pub fn run<S: DataStore>(store: &S, run: &RunRef, dest: &Path) -> Result<CmdResult> {
    if !store.run_exists(run)? {
        let mut res = CmdResult::default();
        res.add_message(CmdMessage::warning(format!("No run {} to export.", run)));
        return Ok(res);
    }

    fs::create_dir_all(dest).map_err(SeoError::Io)?;
    let path = dest.join(format!("{}-{}.tar.gz", run.project, run.run_id));
    let file = File::create(&path).map_err(SeoError::Io)?;
    let entries = write_archive(file, store, run)?;
    tracing::info!(run = %run, entries, archive = %path.display(), "run exported");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} file(s) to {}",
        entries,
        path.display()
    )));
    Ok(result.with_run(run.clone()).with_paths(vec![path]))
}

fn write_archive<W: Write, S: DataStore>(writer: W, store: &S, run: &RunRef) -> Result<usize> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);
    let prefix = format!("{}/{}", run.project, run.run_id);
    let mut entries = 0;

    for doc in RunDocument::all() {
        if let Some(content) = store.read_document(run, *doc)? {
            let entry = format!("{}/{}", prefix, doc.file_name());
            append(&mut tar, &entry, content.as_bytes())?;
            entries += 1;
        }
    }

    for collection in Collection::all() {
        for name in store.list_records(run, *collection)? {
            if let Some(content) = store.read_record(run, *collection, &name)? {
                let entry = format!("{}/{}/{}", prefix, collection.dir_name(), name);
                append(&mut tar, &entry, &content)?;
                entries += 1;
            }
        }
    }

    tar.into_inner()
        .map_err(SeoError::Io)?
        .finish()
        .map_err(SeoError::Io)?;
    Ok(entries)
}

fn append<W: Write>(tar: &mut tar::Builder<W>, entry_name: &str, content: &[u8]) -> Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    tar.append_data(&mut header, entry_name, content)
        .map_err(SeoError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::RunFixture;
    use crate::store::memory::InMemoryStore;
    use flate2::read::GzDecoder;
    use serde_json::json;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_write_archive_contains_run_files() {
        let fixture = RunFixture::new("acme", "r1")
            .with_pages(&[200])
            .with_records(Collection::Errors, 1)
            .with_audit(json!({"items": []}));

        let mut buf = Vec::new();
        let count = write_archive(&mut buf, &fixture.store, &fixture.run).unwrap();
        assert_eq!(count, 3);
        assert_eq!(&buf[..2], &[0x1f, 0x8b]);

        let mut archive = tar::Archive::new(GzDecoder::new(&buf[..]));
        let mut names: Vec<String> = archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "acme/r1/audit.json",
                "acme/r1/errors/0002.json",
                "acme/r1/pages/0001.json",
            ]
        );
    }

    #[test]
    fn test_write_archive_keeps_binary_records() {
        let binary = [0xff, 0xfe, 0x00];
        let mut fixture = RunFixture::new("acme", "r1").with_pages(&[200]);
        fixture
            .store
            .write_record(&fixture.run, Collection::Images, "a.json", &binary)
            .unwrap();

        let mut buf = Vec::new();
        let count = write_archive(&mut buf, &fixture.store, &fixture.run).unwrap();
        assert_eq!(count, 2);

        let mut archive = tar::Archive::new(GzDecoder::new(&buf[..]));
        let mut image = archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap())
            .find(|e| e.path().unwrap().ends_with("images/a.json"))
            .unwrap();
        let mut content = Vec::new();
        image.read_to_end(&mut content).unwrap();
        assert_eq!(content, binary);
    }

    #[test]
    fn test_export_writes_file() {
        let dest = TempDir::new().unwrap();
        let fixture = RunFixture::new("acme", "r1").with_pages(&[200]);

        let result = run(&fixture.store, &fixture.run, dest.path()).unwrap();
        assert_eq!(result.paths.len(), 1);
        assert!(dest.path().join("acme-r1.tar.gz").is_file());
    }

    #[test]
    fn test_export_missing_run() {
        let dest = TempDir::new().unwrap();
        let store = InMemoryStore::new();
        let result = run(&store, &RunRef::new("acme", "nope").unwrap(), dest.path()).unwrap();
        assert!(result.paths.is_empty());
        assert!(!dest.path().join("acme-nope.tar.gz").exists());
    }
}
