//! Search orchestration: cache lookup, result fetch, background summary.
//!
//! A search moves through
//!
//! ```text
//! Idle → CacheCheck ─┬─ hit ──────────────────────────────────────────→ Done
//!                    └─ miss → FetchingResults → ResultsReady → Summarizing → Done
//! ```
//!
//! and every step is published on a [`watch`] channel of [`SearchView`]s.
//! Results are published (and `results_loading` cleared) before the summary
//! request starts; the summary runs on a spawned task and the caller may
//! await it through [`SummaryTask`].
//!
//! # Superseded searches
//!
//! Each call to [`SearchOrchestrator::search`] takes a new generation
//! number. Work finishing under an older generation never touches the
//! published view. A late summary is still written to the cache under the
//! key it was dispatched for, so the work is not lost.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{CacheKey, CacheWrite, SessionCache};
use crate::client::MovieBackend;
use crate::sanitize::sanitize;
use crate::search::{self, NO_RESULTS_SUMMARY};
use crate::types::{Movie, SearchParams};

/// Where a search currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchPhase {
    #[default]
    Idle,
    CacheCheck,
    FetchingResults,
    ResultsReady,
    Summarizing,
    Done,
}

/// Everything a view needs to render the active search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchView {
    pub phase: SearchPhase,
    /// Trimmed query of the active search.
    pub query: String,
    pub key: Option<CacheKey>,
    pub movies: Vec<Movie>,
    pub summary: String,
    pub results_loading: bool,
    pub summary_loading: bool,
    /// Movies and summary came from the session cache.
    pub from_cache: bool,
}

/// How a call to [`SearchOrchestrator::search`] ended.
#[derive(Debug)]
pub enum SearchOutcome {
    /// Empty query; state was reset.
    Idle,
    /// Served from the session cache.
    Cached,
    /// The backend found nothing; no summary was requested.
    NoResults,
    /// Results are published; the summary is still being generated.
    Fetched(SummaryTask),
    /// A newer search started while results were loading.
    Superseded,
}

/// Handle to a background summary.
///
/// Dropping it detaches the task; the summary is still cached when done.
#[derive(Debug)]
pub struct SummaryTask {
    key: CacheKey,
    handle: JoinHandle<String>,
}

impl SummaryTask {
    /// Cache key the summary will be written under.
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Wait for the summary. Returns the sanitized text, or `None` if the
    /// task panicked or was aborted.
    pub async fn wait(self) -> Option<String> {
        match self.handle.await {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(key = %self.key, error = %e, "summary task did not complete");
                None
            }
        }
    }
}

struct Inner {
    backend: Arc<dyn MovieBackend>,
    cache: SessionCache,
    view: watch::Sender<SearchView>,
    generation: AtomicU64,
}

/// Page-level search controller.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SearchOrchestrator {
    inner: Arc<Inner>,
}

impl SearchOrchestrator {
    pub fn new(backend: Arc<dyn MovieBackend>, cache: SessionCache) -> Self {
        let (view, _) = watch::channel(SearchView::default());
        Self {
            inner: Arc::new(Inner {
                backend,
                cache,
                view,
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Subscribe to view updates.
    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.inner.view.subscribe()
    }

    /// Snapshot of the current view.
    pub fn view(&self) -> SearchView {
        self.inner.view.borrow().clone()
    }

    pub fn cache(&self) -> &SessionCache {
        &self.inner.cache
    }

    /// Drop the displayed search and return to `Idle`.
    ///
    /// Work still in flight for the previous search is discarded from the
    /// view (its summary is still cached).
    pub fn reset(&self) {
        self.begin(SearchView::default());
    }

    /// Run a search.
    ///
    /// Returns once results are published. On a cache miss with results, the
    /// summary continues in the background; see [`SearchOutcome::Fetched`].
    pub async fn search(&self, params: SearchParams) -> SearchOutcome {
        let query = params.trimmed_query().to_string();
        if query.is_empty() {
            self.reset();
            return SearchOutcome::Idle;
        }

        let key = CacheKey::for_params(&params);
        let generation = self.begin(SearchView {
            phase: SearchPhase::CacheCheck,
            query: query.clone(),
            key: Some(key.clone()),
            results_loading: true,
            summary_loading: true,
            ..SearchView::default()
        });
        info!(%key, mode = %params.mode, "search started");

        if let Some(entry) = self.inner.cache.get(&key) {
            debug!(%key, movies = entry.movies.len(), reduced = entry.is_reduced, "cache hit");
            self.update(generation, |view| {
                view.movies = entry.movies;
                view.summary = entry.summary;
                view.from_cache = true;
                view.results_loading = false;
                view.summary_loading = false;
                view.phase = SearchPhase::Done;
            });
            return SearchOutcome::Cached;
        }

        self.update(generation, |view| view.phase = SearchPhase::FetchingResults);
        let movies = search::search_movies(self.inner.backend.as_ref(), &params).await;

        let published = movies.clone();
        let current = self.update(generation, |view| {
            view.movies = published;
            view.results_loading = false;
            view.phase = SearchPhase::ResultsReady;
        });
        if !current {
            debug!(%key, "results arrived for a superseded search");
            return SearchOutcome::Superseded;
        }

        if movies.is_empty() {
            self.update(generation, |view| {
                view.summary = NO_RESULTS_SUMMARY.to_string();
                view.summary_loading = false;
                view.phase = SearchPhase::Done;
            });
            return SearchOutcome::NoResults;
        }

        self.update(generation, |view| view.phase = SearchPhase::Summarizing);
        let this = self.clone();
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            this.finish_summary(generation, task_key, query, movies)
                .await
        });
        SearchOutcome::Fetched(SummaryTask { key, handle })
    }

    /// Generate, clean and cache the summary, then publish it if the search
    /// is still current.
    async fn finish_summary(
        &self,
        generation: u64,
        key: CacheKey,
        query: String,
        movies: Vec<Movie>,
    ) -> String {
        let raw = search::search_summary(self.inner.backend.as_ref(), &movies, &query).await;
        let summary = sanitize(&raw);

        match self.inner.cache.set(&key, &movies, &summary) {
            Ok(CacheWrite::Reduced) => info!(%key, "cached reduced search result"),
            Ok(outcome) => debug!(%key, ?outcome, "cached search result"),
            Err(e) => warn!(%key, error = %e, "search result not cached"),
        }

        let published = summary.clone();
        let current = self.update(generation, |view| {
            view.summary = published;
            view.summary_loading = false;
            view.phase = SearchPhase::Done;
        });
        if !current {
            debug!(%key, "summary finished for a superseded search");
        }
        summary
    }

    /// Start a new generation showing `view`.
    ///
    /// The counter moves under the channel lock, so concurrent callers
    /// publish in generation order.
    fn begin(&self, view: SearchView) -> u64 {
        let mut generation = 0;
        self.inner.view.send_modify(|current| {
            generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *current = view;
        });
        generation
    }

    /// Apply `change` to the view if `generation` is still the active one.
    fn update(&self, generation: u64, change: impl FnOnce(&mut SearchView)) -> bool {
        self.inner.view.send_if_modified(|view| {
            if self.inner.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            change(view);
            true
        })
    }
}
