//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for the command-line edge of meddra-search.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods. Library operations return the typed errors below.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when loading the vocabulary fails.
///
/// `Clone` because a single in-flight load is awaited by every concurrent caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// A vocabulary file could not be fetched from its source.
    #[error("failed to read {file} from {location}: {reason}")]
    Fetch {
        file: &'static str,
        location: String,
        reason: String,
    },
    /// The blocking parse worker died before producing a dataset.
    #[error("vocabulary parse worker failed: {0}")]
    Worker(String),
}

/// Error returned when a single batch lookup fails.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// The vocabulary could not be made available for the lookup.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The lookup itself failed for this term.
    ///
    /// Raised by custom [`TermLookup`](crate::autosearch::TermLookup) implementations,
    /// such as a remote lookup; the built-in engine only fails with [`Self::Load`].
    #[error("lookup failed for '{term}': {reason}")]
    Lookup { term: String, reason: String },
}

/// Error returned when reading an engine configuration file fails.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
