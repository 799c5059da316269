//! Test fixtures for creating test data
//!
//! Working directories, retrievers wired to the recording runner, and tree
//! snapshots for comparing staged output byte for byte.

use super::mock_services::RecordingCommandRunner;
use srcstage::application::SourceRetriever;
use srcstage::domain::entities::RetrievalRequest;
use srcstage::domain::value_objects::SourceUrl;
use srcstage::infrastructure::{LocalFileSystem, PathMode};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use walkdir::WalkDir;

pub const TRUNK_URL: &str = "https://svn.example.org/proj/trunk";

/// A checkout tree with a `lib/foo` subdirectory worth promoting
pub const PROJECT_TREE: &[(&str, &str)] = &[
    ("README", "project readme\n"),
    ("lib/foo/Makefile", "all:\n\tcc foo.c\n"),
    ("lib/foo/src/foo.c", "int foo(void) { return 1; }\n"),
    ("lib/bar/bar.c", "int bar(void) { return 2; }\n"),
];

/// Temporary working directory for one retrieval
pub struct WorkspaceFixture {
    pub temp_dir: TempDir,
}

impl WorkspaceFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn working_dir(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    pub fn source_dir(&self) -> PathBuf {
        self.temp_dir.path().join("source")
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.temp_dir.path().join("context-tmp")
    }

    pub fn request(&self, source: &str) -> RetrievalRequest {
        RetrievalRequest::new(self.working_dir(), SourceUrl::new(source).unwrap())
    }

    /// Put some content in the canonical dir, as a previous run would have
    pub fn seed_source_dir(&self) {
        let stale = self.source_dir().join("stale");
        fs::create_dir_all(&stale).unwrap();
        fs::write(stale.join("old.txt"), "from a previous run").unwrap();
    }
}

/// Retriever wired to `runner` and the real filesystem
pub fn retriever(runner: Arc<RecordingCommandRunner>) -> SourceRetriever {
    SourceRetriever::new(runner, Arc::new(LocalFileSystem::new())).with_path_mode(PathMode::Native)
}

/// Relative path -> contents for every file under `root`
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let relative = entry.path().strip_prefix(root).unwrap().to_path_buf();
            (relative, fs::read(entry.path()).unwrap())
        })
        .collect()
}

/// Snapshot of the `prefix` subtree of an in-memory tree description
pub fn expected_subtree(tree: &[(&str, &str)], prefix: &str) -> BTreeMap<PathBuf, Vec<u8>> {
    let prefix = format!("{}/", prefix.trim_end_matches('/'));
    tree.iter()
        .filter_map(|(path, contents)| {
            path.strip_prefix(prefix.as_str())
                .map(|rest| (PathBuf::from(rest), contents.as_bytes().to_vec()))
        })
        .collect()
}
