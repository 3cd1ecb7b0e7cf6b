//! Sequential batch lookup of extracted symptom phrases.
//!
//! A batch is a list of [`QueryTerm`]s searched one at a time, in order. Each term moves
//! `pending → searching → completed | error`; a failure is recorded against its term and
//! the batch carries on. Only one batch is live at a time: starting another supersedes
//! the current one, and a superseded run stops at its next step.

use crate::config::BatchConfig;
use crate::error::SearchError;
use crate::types::SearchResult;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

/// Resolves one batch term to its matches.
///
/// [`SearchEngine`](crate::engine::SearchEngine) implements this by loading the
/// vocabulary on demand and running an exact search without inactive terms.
pub trait TermLookup: Send + Sync {
    fn lookup<'a>(
        &'a self,
        term: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<SearchResult>, SearchError>>;
}

/// A phrase to look up, with an optional translation shown alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTerm {
    /// Text that is searched.
    pub display: String,
    pub alternate: Option<String>,
}

impl QueryTerm {
    pub fn new(display: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            alternate: None,
        }
    }

    #[must_use]
    pub fn with_alternate(mut self, alternate: impl Into<String>) -> Self {
        self.alternate = Some(alternate.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermStatus {
    #[default]
    Pending,
    Searching,
    Completed,
    Error,
}

impl TermStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Searching => "searching",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for TermStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of one term within a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermProgress {
    pub display: String,
    pub alternate: Option<String>,
    pub status: TermStatus,
    pub result_count: usize,
    pub results: Vec<SearchResult>,
}

impl From<QueryTerm> for TermProgress {
    fn from(term: QueryTerm) -> Self {
        Self {
            display: term.display,
            alternate: term.alternate,
            status: TermStatus::Pending,
            result_count: 0,
            results: Vec::new(),
        }
    }
}

/// Totals reported when a batch finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AutoSearchSummary {
    /// Terms handled, failed ones included.
    pub terms_processed: usize,
    pub terms_failed: usize,
    pub total_results: usize,
}

/// State of the live (or last) batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AutoSearchState {
    /// Identifier of the batch this state belongs to. 0 before any batch.
    pub run_id: u64,
    pub terms: Vec<TermProgress>,
    /// Index of the next term to search; equals `terms.len()` once finished.
    pub current_index: usize,
    pub terms_processed: usize,
    pub terms_failed: usize,
    pub total_results: usize,
    pub finished: bool,
}

impl AutoSearchState {
    fn new(run_id: u64, terms: Vec<QueryTerm>) -> Self {
        Self {
            run_id,
            terms: terms.into_iter().map(TermProgress::from).collect(),
            ..Self::default()
        }
    }

    /// Results per input term, in input order.
    ///
    /// Repeated phrases get one entry each. A failed or unsearched term has no results.
    pub fn results_by_term(&self) -> Vec<(&str, &[SearchResult])> {
        self.terms
            .iter()
            .map(|term| (term.display.as_str(), term.results.as_slice()))
            .collect()
    }

    pub const fn summary(&self) -> AutoSearchSummary {
        AutoSearchSummary {
            terms_processed: self.terms_processed,
            terms_failed: self.terms_failed,
            total_results: self.total_results,
        }
    }
}

/// Progress notifications for a display layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum AutoSearchEvent {
    Status {
        run_id: u64,
        index: usize,
        term: String,
        status: TermStatus,
        result_count: usize,
    },
    Finished {
        run_id: u64,
        summary: AutoSearchSummary,
    },
}

/// Outcome of a single [`AutoSearch::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// One term was handled and more remain.
    Advanced,
    /// Every term has been handled.
    Finished(AutoSearchSummary),
    /// A newer batch replaced this one; nothing was recorded.
    Superseded,
}

struct Live {
    state: AutoSearchState,
    cancel: CancellationToken,
}

/// Single-flight batch runner.
pub struct AutoSearch<L> {
    lookup: L,
    config: BatchConfig,
    live: Mutex<Live>,
    next_run: AtomicU64,
    events: Option<UnboundedSender<AutoSearchEvent>>,
}

impl<L: TermLookup> AutoSearch<L> {
    pub fn new(lookup: L, config: BatchConfig) -> Self {
        Self {
            lookup,
            config,
            live: Mutex::new(Live {
                state: AutoSearchState::default(),
                cancel: CancellationToken::new(),
            }),
            next_run: AtomicU64::new(1),
            events: None,
        }
    }

    /// Send status events to `events`. A closed receiver is ignored.
    #[must_use]
    pub fn with_events(mut self, events: UnboundedSender<AutoSearchEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub const fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Replace any current batch with `terms`, all pending. Returns the new run id.
    pub async fn start(&self, terms: Vec<QueryTerm>) -> u64 {
        self.begin(terms).await.0
    }

    async fn begin(&self, terms: Vec<QueryTerm>) -> (u64, CancellationToken) {
        let run_id = self.next_run.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();

        let mut live = self.live.lock().await;
        live.cancel.cancel();
        live.cancel = token.clone();
        if live.state.run_id != 0 && !live.state.finished {
            tracing::debug!("Batch {} superseded by {}", live.state.run_id, run_id);
        }
        tracing::info!("Starting batch {} with {} terms", run_id, terms.len());
        live.state = AutoSearchState::new(run_id, terms);
        (run_id, token)
    }

    /// Handle the term at the cursor of batch `run_id`.
    ///
    /// Run id 0 never names a batch and is always [`Step::Superseded`].
    /// The lookup runs without holding the state lock, so a newer batch can start
    /// meanwhile; its result is then dropped and [`Step::Superseded`] returned.
    pub async fn step(&self, run_id: u64) -> Step {
        let (index, term) = {
            let mut live = self.live.lock().await;
            let state = &mut live.state;
            // run 0 is the idle state before any batch
            if run_id == 0 || state.run_id != run_id {
                return Step::Superseded;
            }
            if state.current_index >= state.terms.len() {
                return self.finish(state);
            }
            let index = state.current_index;
            let term = &mut state.terms[index];
            term.status = TermStatus::Searching;
            let display = term.display.clone();
            self.emit_status(run_id, index, term);
            (index, display)
        };

        let outcome = self.lookup.lookup(&term, self.config.limit).await;

        let mut live = self.live.lock().await;
        let state = &mut live.state;
        if state.run_id != run_id {
            tracing::debug!("Dropping result for '{}' from superseded batch {}", term, run_id);
            return Step::Superseded;
        }

        let progress = &mut state.terms[index];
        match outcome {
            Ok(results) => {
                tracing::debug!("Batch term '{}' matched {} terms", term, results.len());
                progress.status = TermStatus::Completed;
                progress.result_count = results.len();
                progress.results = results;
                state.total_results += progress.result_count;
            }
            Err(err) => {
                tracing::warn!("Batch term '{}' failed: {}", term, err);
                progress.status = TermStatus::Error;
                progress.result_count = 0;
                progress.results.clear();
                state.terms_failed += 1;
            }
        }
        self.emit_status(run_id, index, progress);
        state.terms_processed += 1;
        state.current_index += 1;

        if state.current_index >= state.terms.len() {
            self.finish(state)
        } else {
            Step::Advanced
        }
    }

    /// Run a whole batch, pausing `batch.delay` between terms.
    ///
    /// Returns `None` if another batch superseded this one before it finished.
    pub async fn run(&self, terms: Vec<QueryTerm>) -> Option<AutoSearchSummary> {
        let (run_id, cancelled) = self.begin(terms).await;
        let delay = self.config.delay();
        loop {
            match self.step(run_id).await {
                Step::Advanced => {}
                Step::Finished(summary) => return Some(summary),
                Step::Superseded => return None,
            }
            if delay.is_zero() {
                continue;
            }
            tokio::select! {
                () = cancelled.cancelled() => return None,
                () = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Copy of the current batch state.
    pub async fn snapshot(&self) -> AutoSearchState {
        self.live.lock().await.state.clone()
    }

    fn finish(&self, state: &mut AutoSearchState) -> Step {
        let summary = state.summary();
        if !state.finished {
            state.finished = true;
            tracing::info!(
                "Batch {} finished: {} terms, {} failed, {} results",
                state.run_id,
                summary.terms_processed,
                summary.terms_failed,
                summary.total_results
            );
            self.emit(AutoSearchEvent::Finished {
                run_id: state.run_id,
                summary,
            });
        }
        Step::Finished(summary)
    }

    fn emit_status(&self, run_id: u64, index: usize, term: &TermProgress) {
        self.emit(AutoSearchEvent::Status {
            run_id,
            index,
            term: term.display.clone(),
            status: term.status,
            result_count: term.result_count,
        });
    }

    fn emit(&self, event: AutoSearchEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }
}
