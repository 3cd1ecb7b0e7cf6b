//! MedDRA terminology search.
//!
//! Loads a MedDRA ASCII distribution (LLT, PT and hierarchy files) into an in-memory
//! [`Vocabulary`], and finds terms by substring or by edit distance. [`SearchEngine`]
//! owns the lazily loaded dataset; [`AutoSearch`] runs a list of phrases through it one
//! at a time.

pub mod autosearch;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod search;
pub mod text;
pub mod tracing;
pub mod types;
pub mod vocabulary;

pub use autosearch::{
    AutoSearch, AutoSearchEvent, AutoSearchState, AutoSearchSummary, QueryTerm, Step,
    TermLookup, TermProgress, TermStatus,
};
pub use config::EngineConfig;
pub use engine::SearchEngine;
pub use error::{ConfigError, LoadError, Result, SearchError};
pub use search::PtDetails;
pub use types::{SearchMode, SearchOptions, SearchOutcome, SearchResult};
pub use vocabulary::{
    DirectorySource, HierarchyEntry, LowLevelTerm, PreferredTerm, StaticSource, Vocabulary,
    VocabularyFile, VocabularySource, VocabularyStats,
};
