//! Shared test fixtures and utilities for integration tests.
//!
//! # Sample Vocabulary
//!
//! [`LLT_ASC`], [`PT_ASC`] and [`MDHIER_ASC`] form a small distribution in the MedDRA
//! ASCII layout, including rows the loader must tolerate:
//! - an inactive LLT (`Head pain`)
//! - an LLT whose PT does not exist (`orphan term`)
//! - a truncated row missing its PT code
//! - a PT with no hierarchy rows (`Unclassified finding`)
//! - a PT with a primary and a secondary path (`Headache`)
//!
//! # Available Fixtures
//!
//! - `engine`: a [`SearchEngine`] over the sample text held in memory
//! - `data_dir`: a [`TempWorkspace`] with the sample files written to disk

use meddra_search::{EngineConfig, SearchEngine, StaticSource, VocabularyFile};
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const HEADACHE_PT: &str = "10019211";
pub const TENSION_HEADACHE_PT: &str = "10043269";

pub const LLT_ASC: &str = "\
10019211$Headache$10019211$$$$$$$Y$$
10019198$Head pain$10019211$$$$$$$N$$
10028813$Nausea$10028813$$$$$$$Y$$
10002034$Anaemia$10002034$$$$$$$Y$$
20000001$두통$10019211$$$$$$$Y$$
20000002$빈혈$10002034$$$$$$$Y$$
20000003$긴장성 두통$10043269$$$$$$$Y$$
20000004$orphan term$99999999$$$$$$$Y$$
20000005$truncated
30000001$Unclassified finding$30000001$$$$$$$Y$$
";

pub const PT_ASC: &str = "\
10019211$Headache$$10029205$$$$$$$$
10028813$Nausea$$10017947$$$$$$$$
10002034$Anaemia$$10005329$$$$$$$$
10043269$Tension headache$$10029205$$$$$$$$
30000001$Unclassified finding$$10022891$$$$$$$$
";

pub const MDHIER_ASC: &str = "\
10019211$10033372$10033371$10018065$Headache$Pain and discomfort NEC$General system disorders NEC$General disorders and administration site conditions$Genrl$$$N$
10019211$10019233$10019231$10029205$Headache$Headaches NEC$Headaches$Nervous system disorders$Nerv$$$Y$
10028813$10028817$10017969$10017947$Nausea$Nausea and vomiting symptoms$Gastrointestinal signs and symptoms$Gastrointestinal disorders$Gastr$$$Y$
10002034$10002086$10018851$10005329$Anaemia$Anaemias NEC$Anaemias nonhaemolytic and marrow depression$Blood and lymphatic system disorders$Blood$$$Y$
10043269$10019233$10019231$10029205$Tension headache$Headaches NEC$Headaches$Nervous system disorders$Nerv$$$Y$
";

/// A temporary directory for test isolation.
///
/// Automatically cleaned up when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    /// Creates a new empty temporary workspace.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Creates a workspace holding the sample distribution.
    pub fn with_sample() -> Self {
        let workspace = Self::new();
        workspace.write_vocabulary(LLT_ASC, PT_ASC, MDHIER_ASC);
        workspace
    }

    /// Returns the root path of this workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with the given content within this workspace.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) {
        let full_path = self.root.join(path);
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }

    /// Writes all three vocabulary files, replacing any existing ones.
    pub fn write_vocabulary(&self, llt: &str, pt: &str, hierarchy: &str) {
        self.create_file(VocabularyFile::LowLevelTerms.file_name(), llt);
        self.create_file(VocabularyFile::PreferredTerms.file_name(), pt);
        self.create_file(VocabularyFile::Hierarchy.file_name(), hierarchy);
    }

    /// Removes one vocabulary file.
    ///
    /// # Panics
    /// Panics if the file does not exist.
    pub fn remove_vocabulary_file(&self, file: VocabularyFile) {
        std::fs::remove_file(self.root.join(file.file_name()))
            .unwrap_or_else(|e| panic!("Failed to remove '{}': {}", file.file_name(), e));
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// An engine over the sample vocabulary, held in memory.
#[fixture]
pub fn engine() -> SearchEngine {
    meddra_search::tracing::init();
    SearchEngine::new(
        StaticSource::new(LLT_ASC, PT_ASC, MDHIER_ASC),
        EngineConfig::default(),
    )
}

/// A temp directory holding the sample distribution on disk.
#[fixture]
pub fn data_dir() -> TempWorkspace {
    meddra_search::tracing::init();
    TempWorkspace::with_sample()
}
