//! Where the raw vocabulary text comes from.

use crate::error::LoadError;
use futures::future::BoxFuture;
use std::path::PathBuf;

/// One of the three files making up a MedDRA ASCII distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VocabularyFile {
    LowLevelTerms,
    PreferredTerms,
    Hierarchy,
}

impl VocabularyFile {
    pub const ALL: [Self; 3] = [Self::LowLevelTerms, Self::PreferredTerms, Self::Hierarchy];

    /// File name inside an ASCII distribution directory.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::LowLevelTerms => "llt.asc",
            Self::PreferredTerms => "pt.asc",
            Self::Hierarchy => "mdhier.asc",
        }
    }
}

/// Provider of raw vocabulary text.
///
/// A fetch error aborts the whole load; an empty string is a valid (empty) file.
pub trait VocabularySource: Send + Sync {
    fn fetch(&self, file: VocabularyFile) -> BoxFuture<'_, Result<String, LoadError>>;

    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;
}

/// Reads `llt.asc`, `pt.asc` and `mdhier.asc` from a directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl VocabularySource for DirectorySource {
    fn fetch(&self, file: VocabularyFile) -> BoxFuture<'_, Result<String, LoadError>> {
        Box::pin(async move {
            let path = self.root.join(file.file_name());
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| LoadError::Fetch {
                    file: file.file_name(),
                    location: path.display().to_string(),
                    reason: e.to_string(),
                })
        })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Vocabulary text held in memory, for embedding and tests.
///
/// A file left as `None` fails to fetch, which models an unreachable source.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    llt: Option<String>,
    pt: Option<String>,
    hierarchy: Option<String>,
}

impl StaticSource {
    pub fn new(
        llt: impl Into<String>,
        pt: impl Into<String>,
        hierarchy: impl Into<String>,
    ) -> Self {
        Self {
            llt: Some(llt.into()),
            pt: Some(pt.into()),
            hierarchy: Some(hierarchy.into()),
        }
    }

    /// Make `file` unavailable.
    #[must_use]
    pub fn without(mut self, file: VocabularyFile) -> Self {
        *self.slot(file) = None;
        self
    }

    fn slot(&mut self, file: VocabularyFile) -> &mut Option<String> {
        match file {
            VocabularyFile::LowLevelTerms => &mut self.llt,
            VocabularyFile::PreferredTerms => &mut self.pt,
            VocabularyFile::Hierarchy => &mut self.hierarchy,
        }
    }
}

impl VocabularySource for StaticSource {
    fn fetch(&self, file: VocabularyFile) -> BoxFuture<'_, Result<String, LoadError>> {
        let text = match file {
            VocabularyFile::LowLevelTerms => &self.llt,
            VocabularyFile::PreferredTerms => &self.pt,
            VocabularyFile::Hierarchy => &self.hierarchy,
        };
        let result = text.clone().ok_or_else(|| LoadError::Fetch {
            file: file.file_name(),
            location: "memory".to_string(),
            reason: "not provided".to_string(),
        });
        Box::pin(async move { result })
    }

    fn describe(&self) -> String {
        "in-memory vocabulary".to_string()
    }
}
