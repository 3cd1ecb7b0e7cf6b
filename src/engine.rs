//! The search engine: owns the loaded vocabulary and serves queries against it.
//!
//! The vocabulary is loaded lazily on first use. Concurrent first callers all await the
//! same load through a shared future; a failed load leaves the slot empty so the next
//! call retries, and never disturbs a dataset that is already installed.

use crate::autosearch::TermLookup;
use crate::config::EngineConfig;
use crate::error::{LoadError, SearchError};
use crate::search::{self, PtDetails, SynonymHints};
use crate::types::{SearchMode, SearchOptions, SearchOutcome, SearchResult};
use crate::vocabulary::{Vocabulary, VocabularyFile, VocabularySource, VocabularyStats};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};

/// Type alias for the shared vocabulary load future.
type SharedLoad = Shared<BoxFuture<'static, Result<Arc<Vocabulary>, LoadError>>>;

/// Cheap to clone; clones share the dataset and any in-flight load.
#[derive(Clone)]
pub struct SearchEngine {
    state: Arc<EngineState>,
}

struct EngineState {
    source: Arc<dyn VocabularySource>,
    config: EngineConfig,
    hints: SynonymHints,
    /// Installed dataset, replaced wholesale on a successful (re)load.
    dataset: RwLock<Option<Arc<Vocabulary>>>,
    /// Load currently in progress, awaited by every caller that needs it.
    in_flight: Mutex<Option<SharedLoad>>,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("source", &self.state.source.describe())
            .field("synonym_terms", &self.state.hints.len())
            .finish_non_exhaustive()
    }
}

impl SearchEngine {
    pub fn new(source: impl VocabularySource + 'static, config: EngineConfig) -> Self {
        Self::with_source(Arc::new(source), config)
    }

    pub fn with_source(source: Arc<dyn VocabularySource>, config: EngineConfig) -> Self {
        let hints = SynonymHints::new(&config.synonyms);
        Self {
            state: Arc::new(EngineState {
                source,
                config,
                hints,
                dataset: RwLock::new(None),
                in_flight: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.state.config
    }

    /// The installed dataset, without triggering a load.
    pub async fn loaded(&self) -> Option<Arc<Vocabulary>> {
        self.state.dataset.read().await.clone()
    }

    /// Check if a load is in progress.
    pub async fn is_loading(&self) -> bool {
        self.state.in_flight.lock().await.is_some()
    }

    /// Return the dataset, loading it first if needed.
    pub async fn ensure_loaded(&self) -> Result<Arc<Vocabulary>, LoadError> {
        if let Some(vocab) = self.loaded().await {
            tracing::debug!("Vocabulary cache hit");
            return Ok(vocab);
        }
        self.join_load(false).await
    }

    /// Fetch and parse the vocabulary again, swapping it in on success.
    ///
    /// A load already in flight is joined rather than duplicated. On failure the
    /// previous dataset stays installed.
    pub async fn reload(&self) -> Result<Arc<Vocabulary>, LoadError> {
        self.join_load(true).await
    }

    async fn join_load(&self, force: bool) -> Result<Arc<Vocabulary>, LoadError> {
        let load = {
            let mut in_flight = self.state.in_flight.lock().await;
            if let Some(load) = in_flight.as_ref() {
                tracing::debug!("Awaiting in-flight vocabulary load");
                load.clone()
            } else {
                // The previous load may have finished between the cache check and here
                if !force && let Some(vocab) = self.loaded().await {
                    return Ok(vocab);
                }
                let load = EngineState::load_shared(&self.state);
                *in_flight = Some(load.clone());
                load
            }
        };
        load.await
    }

    /// Run a query in `mode` with a caller-supplied limit, clamped to the configured
    /// bounds.
    ///
    /// [`SearchMode::Auto`] runs an exact search and falls back to approximate search
    /// only when nothing matched.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
        include_inactive: bool,
        mode: SearchMode,
    ) -> Result<SearchOutcome, LoadError> {
        let vocab = self.ensure_loaded().await?;
        let options = SearchOptions::new(self.state.config.limits.clamp(limit), include_inactive);
        Ok(self.search_in(&vocab, query, options, mode))
    }

    pub async fn search_exact(
        &self,
        query: &str,
        limit: usize,
        include_inactive: bool,
    ) -> Result<SearchOutcome, LoadError> {
        self.search(query, limit, include_inactive, SearchMode::Exact)
            .await
    }

    pub async fn search_approximate(
        &self,
        query: &str,
        limit: usize,
        include_inactive: bool,
    ) -> Result<SearchOutcome, LoadError> {
        self.search(query, limit, include_inactive, SearchMode::Approximate)
            .await
    }

    fn search_in(
        &self,
        vocab: &Vocabulary,
        query: &str,
        options: SearchOptions,
        mode: SearchMode,
    ) -> SearchOutcome {
        let config = &self.state.config;
        let approximate = || {
            search::search_approximate(
                vocab,
                query,
                options,
                &config.approximate,
                &self.state.hints,
            )
        };

        match mode {
            SearchMode::Exact => search::search_exact(vocab, query, options, &config.exact),
            SearchMode::Approximate => approximate(),
            SearchMode::Auto => {
                let exact = search::search_exact(vocab, query, options, &config.exact);
                if !exact.is_empty() {
                    return exact;
                }
                tracing::debug!("No exact match for '{}', trying approximate search", query);
                let mut fallback = approximate();
                fallback.approximate_used = !fallback.is_empty();
                fallback
            }
        }
    }

    /// PT details, loading the vocabulary if needed. `Ok(None)` for an unknown PT.
    pub async fn details(&self, pt_code: &str) -> Result<Option<PtDetails>, LoadError> {
        let vocab = self.ensure_loaded().await?;
        Ok(search::pt_details(&vocab, pt_code.trim()))
    }

    /// Record counts of the installed dataset, without triggering a load.
    pub async fn dataset_stats(&self) -> Option<VocabularyStats> {
        self.loaded().await.map(|vocab| vocab.stats())
    }
}

impl EngineState {
    /// Build the shared load future for `state`.
    ///
    /// The future keeps only a weak handle on the engine while fetching and parsing,
    /// since `in_flight` itself stores the future.
    fn load_shared(state: &Arc<Self>) -> SharedLoad {
        let source = Arc::clone(&state.source);
        let state = Arc::downgrade(state);
        let load: BoxFuture<'static, Result<Arc<Vocabulary>, LoadError>> = Box::pin(async move {
            let result = load_vocabulary(source.as_ref()).await;
            if let Err(err) = &result {
                tracing::warn!("Vocabulary load failed: {}", err);
            }
            let Some(state) = state.upgrade() else {
                tracing::debug!("Engine dropped during vocabulary load");
                return result;
            };
            if let Ok(vocab) = &result {
                *state.dataset.write().await = Some(Arc::clone(vocab));
            }
            *state.in_flight.lock().await = None;
            result
        });
        load.shared()
    }
}

async fn load_vocabulary(source: &dyn VocabularySource) -> Result<Arc<Vocabulary>, LoadError> {
    let started = Instant::now();
    tracing::info!("Loading vocabulary from {}", source.describe());

    let (llt_text, pt_text, hierarchy_text) = futures::try_join!(
        source.fetch(VocabularyFile::LowLevelTerms),
        source.fetch(VocabularyFile::PreferredTerms),
        source.fetch(VocabularyFile::Hierarchy),
    )?;

    let vocab = tokio::task::spawn_blocking(move || {
        Vocabulary::parse(&llt_text, &pt_text, &hierarchy_text)
    })
    .await
    .map_err(|e| LoadError::Worker(e.to_string()))?;

    let stats = vocab.stats();
    tracing::info!(
        "Loaded {} LLTs ({} active), {} PTs, {} hierarchy rows in {:?}",
        stats.llts,
        stats.active_llts,
        stats.pts,
        stats.hierarchy_rows,
        started.elapsed()
    );
    Ok(Arc::new(vocab))
}

impl TermLookup for SearchEngine {
    fn lookup<'a>(
        &'a self,
        term: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<SearchResult>, SearchError>> {
        Box::pin(async move {
            let vocab = self.ensure_loaded().await?;
            let options = SearchOptions::new(limit, false);
            let outcome = search::search_exact(&vocab, term, options, &self.state.config.exact);
            Ok(outcome.results)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::StaticSource;
    use assert2::{check, let_assert};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    const LLT: &str = "L1$headache$P1$$$$$$$Y$$\nL2$head pain$P1$$$$$$$N$$\n";
    const PT: &str = "P1$Headache$$S1$$$$$$$$\n";
    const HIER: &str = "P1$H1$G1$S1$Headache$Headaches$Headaches grp$Nervous$Nerv$$$Y$\n";

    /// Counts fetches; fails every fetch while `broken` is set.
    struct FlakySource {
        inner: StaticSource,
        fetches: AtomicUsize,
        broken: AtomicBool,
    }

    impl FlakySource {
        fn new(broken: bool) -> Self {
            Self {
                inner: StaticSource::new(LLT, PT, HIER),
                fetches: AtomicUsize::new(0),
                broken: AtomicBool::new(broken),
            }
        }
    }

    impl VocabularySource for FlakySource {
        fn fetch(&self, file: VocabularyFile) -> BoxFuture<'_, Result<String, LoadError>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.broken.load(Ordering::SeqCst) {
                return Box::pin(async move {
                    tokio::task::yield_now().await;
                    Err(LoadError::Fetch {
                        file: file.file_name(),
                        location: "flaky".to_string(),
                        reason: "offline".to_string(),
                    })
                });
            }
            Box::pin(async move {
                tokio::task::yield_now().await;
                self.inner.fetch(file).await
            })
        }

        fn describe(&self) -> String {
            "flaky".to_string()
        }
    }

    fn engine(source: &Arc<FlakySource>) -> SearchEngine {
        let source = Arc::clone(source) as Arc<dyn VocabularySource>;
        SearchEngine::with_source(source, EngineConfig::default())
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_load() {
        let source = Arc::new(FlakySource::new(false));
        let engine = engine(&source);

        let (a, b, c) = tokio::join!(
            engine.ensure_loaded(),
            engine.ensure_loaded(),
            engine.search_exact("head", 10, false),
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        check!(Arc::ptr_eq(&a, &b));
        check!(c.unwrap().len() == 1);
        check!(source.fetches.load(Ordering::SeqCst) == VocabularyFile::ALL.len());
        check!(!engine.is_loading().await);

        engine.ensure_loaded().await.unwrap();
        check!(source.fetches.load(Ordering::SeqCst) == VocabularyFile::ALL.len());
    }

    #[tokio::test]
    async fn test_failed_load_can_be_retried() {
        let source = Arc::new(FlakySource::new(true));
        let engine = engine(&source);

        let_assert!(Err(LoadError::Fetch { .. }) = engine.ensure_loaded().await);
        check!(engine.loaded().await.is_none());
        check!(!engine.is_loading().await);

        source.broken.store(false, Ordering::SeqCst);
        check!(engine.ensure_loaded().await.is_ok());
        check!(engine.dataset_stats().await.map(|s| s.llts) == Some(2));
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_dataset() {
        let source = Arc::new(FlakySource::new(false));
        let engine = engine(&source);
        let before = engine.ensure_loaded().await.unwrap();

        source.broken.store(true, Ordering::SeqCst);
        check!(engine.reload().await.is_err());
        let_assert!(Some(after) = engine.loaded().await);
        check!(Arc::ptr_eq(&before, &after));

        source.broken.store(false, Ordering::SeqCst);
        let fresh = engine.reload().await.unwrap();
        check!(!Arc::ptr_eq(&before, &fresh));
    }

    #[tokio::test]
    async fn test_abandoned_load_releases_engine() {
        let source = Arc::new(FlakySource::new(false));
        let engine = engine(&source);
        let state = Arc::downgrade(&engine.state);

        let mut load = Box::pin(engine.ensure_loaded());
        check!(futures::poll!(&mut load).is_pending());
        check!(engine.is_loading().await);

        drop(load);
        drop(engine);
        check!(state.upgrade().is_none());
    }

    #[tokio::test]
    async fn test_limit_is_clamped() {
        let engine = SearchEngine::new(StaticSource::new(LLT, PT, HIER), EngineConfig::default());
        // 0 means the default limit rather than no results
        check!(engine.search_exact("head", 0, true).await.unwrap().len() == 2);
    }

    #[tokio::test]
    async fn test_auto_mode_falls_back() {
        let engine = SearchEngine::new(StaticSource::new(LLT, PT, HIER), EngineConfig::default());

        let exact = engine.search("head", 10, false, SearchMode::Auto).await.unwrap();
        check!(exact.mode == SearchMode::Exact);
        check!(!exact.approximate_used);

        let fuzzy = engine.search("headahce", 10, false, SearchMode::Auto).await.unwrap();
        check!(fuzzy.mode == SearchMode::Approximate);
        check!(fuzzy.approximate_used);
        check!(fuzzy.results[0].llt_code == "L1");

        let none = engine.search("zzzzzzzzzzzz", 10, false, SearchMode::Auto).await.unwrap();
        check!(none.is_empty());
        check!(!none.approximate_used);
    }

    #[tokio::test]
    async fn test_lookup_excludes_inactive() {
        let engine = SearchEngine::new(StaticSource::new(LLT, PT, HIER), EngineConfig::default());
        let results = engine.lookup("head", 10).await.unwrap();
        check!(results.len() == 1);
        check!(results[0].llt_code == "L1");
    }

    #[tokio::test]
    async fn test_lookup_reports_load_failure() {
        let source = StaticSource::new(LLT, PT, HIER).without(VocabularyFile::Hierarchy);
        let engine = SearchEngine::new(source, EngineConfig::default());
        let_assert!(Err(SearchError::Load(LoadError::Fetch { file, .. })) = engine.lookup("head", 10).await);
        check!(file == "mdhier.asc");
    }

    #[tokio::test]
    async fn test_details_for_unknown_pt() {
        let engine = SearchEngine::new(StaticSource::new(LLT, PT, HIER), EngineConfig::default());
        check!(engine.details("P1").await.unwrap().is_some());
        check!(engine.details("P9").await.unwrap().is_none());
    }
}
