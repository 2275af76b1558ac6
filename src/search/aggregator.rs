//! Debounced multi-category search.
//!
//! A [`SearchSession`] is a single task that owns the search state. Query
//! text arrives on a channel (one message per keystroke), is debounced, and
//! each released query fans out into three concurrent category searches.
//! Completed fan-outs come back tagged with the generation they were issued
//! under; anything older than the latest generation is dropped.
//!
//! ```text
//!  set_query ──► input channel ──► Debouncer ──► generation += 1
//!                                                   │ spawn
//!                                                   ▼
//!                        artist ┐
//!                        track  ├─ join ──► (generation, outcome) ──► apply if current
//!                        playlist┘                                       │
//!                                                                        ▼
//!                                                              watch<SearchState>
//! ```

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::debounce::Debouncer;
use crate::api::{ApiError, InsightsApi, SearchKind, SearchResponse};
use crate::config::SearchConfig;
use crate::notify::Notifier;

/// Per-category result limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub artists: u32,
    pub tracks: u32,
    pub playlists: u32,
}

impl SearchLimits {
    pub fn for_kind(&self, kind: SearchKind) -> u32 {
        match kind {
            SearchKind::Artist => self.artists,
            SearchKind::Track => self.tracks,
            SearchKind::Playlist => self.playlists,
        }
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchLimits {
    fn from(config: &SearchConfig) -> Self {
        Self {
            artists: config.artist_limit,
            tracks: config.track_limit,
            playlists: config.playlist_limit,
        }
    }
}

/// Result of one fan-out: whatever succeeded, plus why the rest failed.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub response: SearchResponse,
    pub failures: Vec<(SearchKind, ApiError)>,
}

impl SearchOutcome {
    pub fn all_failed(&self) -> bool {
        self.failures.len() == SearchKind::ALL.len()
    }
}

/// Run the three category searches concurrently.
///
/// A failing category is logged and left absent in the response; it never
/// affects the other two.
pub async fn search_all<A>(api: &A, query: &str, limits: SearchLimits) -> SearchOutcome
where
    A: InsightsApi + ?Sized,
{
    let searches = SearchKind::ALL
        .map(|kind| async move { (kind, api.search(query, kind, limits.for_kind(kind)).await) });

    let mut outcome = SearchOutcome::default();
    for (kind, result) in join_all(searches).await {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                outcome.failures.push((kind, e));
                continue;
            }
        };
        match kind {
            SearchKind::Artist => outcome.response.artists = response.artists,
            SearchKind::Track => outcome.response.tracks = response.tracks,
            SearchKind::Playlist => outcome.response.playlists = response.playlists,
        }
    }

    for (kind, err) in &outcome.failures {
        tracing::warn!(query, %kind, "Search category failed: {}", err);
    }

    outcome
}

/// Snapshot of the search page published after every change.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// Query the current results (or pending request) belong to
    pub query: String,
    /// Generation of the latest issued query; 0 before the first one
    pub generation: u64,
    /// A request for `generation` is outstanding
    pub loading: bool,
    pub results: SearchResponse,
    /// Categories that failed for `generation`
    pub failed: Vec<SearchKind>,
}

/// Builder for a search session.
pub struct SearchAggregator<A: ?Sized> {
    api: Arc<A>,
    limits: SearchLimits,
    debouncer: Debouncer<String>,
    notifier: Option<Notifier>,
}

impl<A> SearchAggregator<A>
where
    A: InsightsApi + ?Sized + 'static,
{
    pub fn new(api: Arc<A>, config: &SearchConfig) -> Self {
        Self {
            api,
            limits: SearchLimits::from(config),
            debouncer: Debouncer::new(config.debounce_window()),
            notifier: None,
        }
    }

    /// Raise a toast when every category of a search fails.
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Start the session task. Must be called inside a tokio runtime.
    pub fn spawn(self) -> SearchSession {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SearchState::default());
        tracing::debug!(
            window_ms = self.debouncer.window().as_millis() as u64,
            "Search session started"
        );
        let task = tokio::spawn(self.run(input_rx, state_tx));

        SearchSession {
            input_tx,
            state_rx,
            task,
        }
    }

    async fn run(
        mut self,
        mut input_rx: mpsc::UnboundedReceiver<String>,
        state_tx: watch::Sender<SearchState>,
    ) {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<(u64, SearchOutcome)>();
        let mut generation = 0u64;

        loop {
            tokio::select! {
                // A keystroke landing on the deadline restarts the window
                biased;

                input = input_rx.recv() => match input {
                    Some(text) => self.debouncer.push(text),
                    None => {
                        // Input closed: a query still inside its window is never sent
                        if let Some(query) = self.debouncer.cancel() {
                            tracing::debug!(query = %query, "Dropping pending search on close");
                        }
                        break;
                    }
                },

                query = self.debouncer.ready() => {
                    generation += 1;
                    self.dispatch(generation, query, &state_tx, &done_tx);
                }

                Some((issued, outcome)) = done_rx.recv() => {
                    if issued != generation {
                        tracing::debug!(issued, current = generation, "Discarding stale search response");
                        continue;
                    }
                    self.apply(outcome, &state_tx);
                }
            }
        }

        tracing::debug!("Search session closed");
    }

    fn dispatch(
        &self,
        generation: u64,
        query: String,
        state_tx: &watch::Sender<SearchState>,
        done_tx: &mpsc::UnboundedSender<(u64, SearchOutcome)>,
    ) {
        let trimmed = query.trim().to_string();

        if trimmed.is_empty() {
            // Cleared locally; the generation bump also orphans in-flight requests
            state_tx.send_modify(|s| {
                s.query = query;
                s.generation = generation;
                s.loading = false;
                s.results = SearchResponse::default();
                s.failed.clear();
            });
            return;
        }

        tracing::info!(query = %trimmed, generation, "Searching");
        state_tx.send_modify(|s| {
            s.query = trimmed.clone();
            s.generation = generation;
            s.loading = true;
        });

        let api = Arc::clone(&self.api);
        let limits = self.limits;
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let outcome = search_all(api.as_ref(), &trimmed, limits).await;
            // Session gone means nobody cares about the answer
            let _ = done_tx.send((generation, outcome));
        });
    }

    fn apply(&self, outcome: SearchOutcome, state_tx: &watch::Sender<SearchState>) {
        if outcome.all_failed()
            && let Some(notifier) = &self.notifier
        {
            notifier.error(
                "Search failed",
                "Unable to search at the moment. Please try again.",
            );
        }

        state_tx.send_modify(|s| {
            s.loading = false;
            s.failed = outcome.failures.iter().map(|(kind, _)| *kind).collect();
            s.results = outcome.response;
        });
    }
}

/// Handle to a running search session.
pub struct SearchSession {
    input_tx: mpsc::UnboundedSender<String>,
    state_rx: watch::Receiver<SearchState>,
    task: JoinHandle<()>,
}

impl SearchSession {
    /// Feed the current contents of the search box.
    pub fn set_query(&self, text: impl Into<String>) {
        if self.input_tx.send(text.into()).is_err() {
            tracing::warn!("Search session is no longer running");
        }
    }

    /// Latest published state.
    pub fn state(&self) -> SearchState {
        self.state_rx.borrow().clone()
    }

    /// A receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state_rx.clone()
    }

    /// Stop accepting input and wait for the session task to finish.
    ///
    /// In-flight category requests are left to complete on their own and
    /// their results are dropped.
    pub async fn shutdown(self) {
        drop(self.input_tx);
        if let Err(e) = self.task.await {
            tracing::error!("Search session task failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::{Instant, sleep};

    use super::*;
    use crate::api::traits::mocks::{MockInsightsApi, MockSearch, page_for};
    use crate::test_utils::mock_track;

    fn tracks_named(query: &str, n: usize) -> Vec<crate::api::Track> {
        (0..n)
            .map(|i| mock_track(&format!("{query}-{i}"), &format!("{query} #{i}")))
            .collect()
    }

    fn session(api: Arc<MockInsightsApi>) -> SearchSession {
        SearchAggregator::new(api, &SearchConfig::default()).spawn()
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_fires_once_after_last_keystroke() {
        let api = Arc::new(MockInsightsApi::new());
        let search = session(Arc::clone(&api));
        let start = Instant::now();

        // "Rahman" typed in 100ms increments
        for end in 1..="Rahman".len() {
            search.set_query(&"Rahman"[..end]);
            sleep(Duration::from_millis(100)).await;
        }
        // Last keystroke at t=500; nothing may have fired by t=900
        sleep(Duration::from_millis(300)).await;
        assert!(api.search_calls().is_empty());

        sleep(Duration::from_millis(200)).await;
        let calls = api.search_calls();
        assert_eq!(calls.len(), 3);
        for call in &calls {
            assert_eq!(call.query, "Rahman");
            assert_eq!(call.at - start, Duration::from_millis(1000));
        }

        let mut kinds: Vec<_> = calls.iter().map(|c| (c.kind, c.limit)).collect();
        kinds.sort();
        assert_eq!(
            kinds,
            vec![
                (SearchKind::Artist, 10),
                (SearchKind::Track, 20),
                (SearchKind::Playlist, 10)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_failing_category_leaves_others() {
        let api = Arc::new(MockInsightsApi::new().with_search(|q, kind| match kind {
            SearchKind::Artist => MockSearch::fail(ApiError::Network("connection reset".into())),
            _ => MockSearch::ok(page_for(kind, tracks_named(q, 5))),
        }));
        let search = session(Arc::clone(&api));

        search.set_query("Rahman");
        sleep(Duration::from_millis(600)).await;

        let state = search.state();
        assert!(!state.loading);
        assert!(state.results.artists.is_none());
        assert_eq!(state.results.tracks.as_ref().unwrap().items.len(), 5);
        assert!(state.results.playlists.is_some());
        assert_eq!(state.failed, vec![SearchKind::Artist]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_never_overwrites_newer_query() {
        let api = Arc::new(MockInsightsApi::new().with_search(|q, kind| {
            let delay = if q == "slow" { 1000 } else { 10 };
            MockSearch::ok(page_for(kind, tracks_named(q, 1))).after(Duration::from_millis(delay))
        }));
        let search = session(Arc::clone(&api));

        search.set_query("slow");
        // "slow" issued at t=500, resolves at t=1500
        sleep(Duration::from_millis(600)).await;
        search.set_query("fast");
        // "fast" issued at t=1100, resolves at t=1110
        sleep(Duration::from_millis(600)).await;

        let state = search.state();
        assert_eq!(state.query, "fast");
        assert_eq!(state.results.track_items()[0].name, "fast #0");

        // Let the stale answer arrive
        sleep(Duration::from_millis(1000)).await;
        let state = search.state();
        assert_eq!(state.query, "fast");
        assert_eq!(state.generation, 2);
        assert_eq!(state.results.track_items()[0].name, "fast #0");
    }

    #[tokio::test(start_paused = true)]
    async fn test_whitespace_query_clears_without_request() {
        let api = Arc::new(MockInsightsApi::new());
        let search = session(Arc::clone(&api));

        search.set_query("Arijit");
        sleep(Duration::from_millis(600)).await;
        assert_eq!(api.search_calls().len(), 3);
        assert!(!search.state().results.is_cleared());

        search.set_query("   ");
        sleep(Duration::from_millis(600)).await;
        assert_eq!(api.search_calls().len(), 3);
        let state = search.state();
        assert!(state.results.is_cleared());
        assert!(!state.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_orphans_in_flight_request() {
        let api = Arc::new(MockInsightsApi::new().with_search(|q, kind| {
            MockSearch::ok(page_for(kind, tracks_named(q, 2))).after(Duration::from_millis(800))
        }));
        let search = session(Arc::clone(&api));

        search.set_query("Shreya");
        sleep(Duration::from_millis(600)).await;
        assert!(search.state().loading);

        search.set_query("");
        sleep(Duration::from_millis(2000)).await;
        assert!(search.state().results.is_cleared());
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_categories_failing_raises_one_toast() {
        let api = Arc::new(
            MockInsightsApi::new().with_search(|_, _| MockSearch::fail(ApiError::Timeout)),
        );
        let notifier = Notifier::new();
        let search = SearchAggregator::new(Arc::clone(&api), &SearchConfig::default())
            .with_notifier(notifier.clone())
            .spawn();

        search.set_query("anything");
        sleep(Duration::from_millis(600)).await;

        let toasts = notifier.drain();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].title, "Search failed");
        assert!(search.state().results.is_cleared());
        assert_eq!(search.state().failed.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_ends_session() {
        let api = Arc::new(MockInsightsApi::new());
        let search = session(api);
        search.set_query("pending");
        search.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_drops_query_inside_window() {
        let api = Arc::new(MockInsightsApi::new());
        let search = session(Arc::clone(&api));

        search.set_query("Arijit");
        sleep(Duration::from_millis(200)).await;
        search.shutdown().await;

        // Well past the window the query was waiting on
        sleep(Duration::from_millis(2000)).await;
        assert!(api.search_calls().is_empty());
    }

    #[tokio::test]
    async fn test_search_all_isolates_failures() {
        let api = MockInsightsApi::new().with_search(|q, kind| match kind {
            SearchKind::Playlist => MockSearch::fail(ApiError::Server {
                status: 503,
                message: "unavailable".into(),
            }),
            _ => MockSearch::ok(page_for(kind, tracks_named(q, 3))),
        });

        let outcome = search_all(&api, "Badshah", SearchLimits::default()).await;
        assert!(!outcome.all_failed());
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.response.playlists.is_none());
        assert!(outcome.response.artists.is_some());
        assert_eq!(outcome.response.track_items().len(), 3);
    }
}

/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use std::time::Duration;

    use proptest::prelude::*;

    use super::*;
    use crate::api::traits::mocks::{MockInsightsApi, SearchCall};

    fn type_out(text: &str, gaps: &[u64]) -> Vec<SearchCall> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();

        rt.block_on(async {
            let api = Arc::new(MockInsightsApi::new());
            let search = SearchAggregator::new(Arc::clone(&api), &SearchConfig::default()).spawn();
            for (end, gap) in (1..=text.len()).zip(gaps) {
                search.set_query(&text[..end]);
                tokio::time::sleep(Duration::from_millis(*gap)).await;
            }
            tokio::time::sleep(Duration::from_millis(1000)).await;
            api.search_calls()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Keystrokes closer together than the window collapse into one call set
        #[test]
        fn burst_issues_single_call_set(
            text in "[a-zA-Z ]{0,11}[a-zA-Z]",
            gaps in prop::collection::vec(0u64..500, 12),
        ) {
            let calls = type_out(&text, &gaps);
            prop_assert_eq!(calls.len(), 3);
            for call in &calls {
                prop_assert_eq!(&call.query, text.trim());
            }
        }
    }
}
