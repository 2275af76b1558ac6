//! Trait seam for the analytics API.
//!
//! Views and the search aggregator take `dyn InsightsApi` / generic
//! implementations so tests can substitute the mock below for the real
//! HTTP client.

use async_trait::async_trait;

use super::client::InsightsClient;
use super::domain::{
    ApiError, Artist, ChartSnapshot, Genre, GenreComparison, KpiStats, Market, SearchKind,
    SearchResponse, Track,
};

/// Everything the dashboard reads from the analytics API.
#[async_trait]
pub trait InsightsApi: Send + Sync {
    async fn top_today(&self, market: &Market) -> Result<ChartSnapshot, ApiError>;

    async fn top_year(&self, year: i32, market: &Market) -> Result<ChartSnapshot, ApiError>;

    async fn top_artists(&self, year: i32, market: &Market) -> Result<Vec<Artist>, ApiError>;

    async fn artist_top_tracks(
        &self,
        artist_id: &str,
        market: &Market,
    ) -> Result<Vec<Track>, ApiError>;

    async fn artist(&self, artist_id: &str) -> Result<Artist, ApiError>;

    async fn top_genres(&self, year: i32, market: &Market) -> Result<Vec<Genre>, ApiError>;

    /// Search one category. Only that category is populated on success.
    async fn search(
        &self,
        query: &str,
        kind: SearchKind,
        limit: u32,
    ) -> Result<SearchResponse, ApiError>;

    async fn compare_genres(
        &self,
        year: i32,
        markets: &[Market],
    ) -> Result<GenreComparison, ApiError>;

    async fn kpi_stats(&self) -> Result<KpiStats, ApiError>;
}

#[async_trait]
impl InsightsApi for InsightsClient {
    async fn top_today(&self, market: &Market) -> Result<ChartSnapshot, ApiError> {
        self.top_today(market).await
    }

    async fn top_year(&self, year: i32, market: &Market) -> Result<ChartSnapshot, ApiError> {
        self.top_year(year, market).await
    }

    async fn top_artists(&self, year: i32, market: &Market) -> Result<Vec<Artist>, ApiError> {
        self.top_artists(year, market).await
    }

    async fn artist_top_tracks(
        &self,
        artist_id: &str,
        market: &Market,
    ) -> Result<Vec<Track>, ApiError> {
        self.artist_top_tracks(artist_id, market).await
    }

    async fn artist(&self, artist_id: &str) -> Result<Artist, ApiError> {
        self.artist(artist_id).await
    }

    async fn top_genres(&self, year: i32, market: &Market) -> Result<Vec<Genre>, ApiError> {
        self.top_genres(year, market).await
    }

    async fn search(
        &self,
        query: &str,
        kind: SearchKind,
        limit: u32,
    ) -> Result<SearchResponse, ApiError> {
        self.search(query, kind, limit).await
    }

    async fn compare_genres(
        &self,
        year: i32,
        markets: &[Market],
    ) -> Result<GenreComparison, ApiError> {
        self.compare_genres(year, markets).await
    }

    async fn kpi_stats(&self) -> Result<KpiStats, ApiError> {
        self.kpi_stats().await
    }
}

/// Mock API for testing.
///
/// Each endpoint returns a configurable canned result; unset endpoints fail
/// with a network error. Search answers come from a closure so tests can
/// vary the result and latency per query and category.
#[cfg(test)]
pub mod mocks {
    use std::sync::Arc;
    use std::time::Duration;

    use parking_lot::Mutex;
    use tokio::time::Instant;

    use super::*;
    use crate::api::domain::Page;

    /// What one mocked search call does.
    pub struct MockSearch {
        pub delay: Duration,
        pub result: Result<SearchResponse, ApiError>,
    }

    impl MockSearch {
        pub fn ok(response: SearchResponse) -> Self {
            Self {
                delay: Duration::ZERO,
                result: Ok(response),
            }
        }

        pub fn fail(error: ApiError) -> Self {
            Self {
                delay: Duration::ZERO,
                result: Err(error),
            }
        }

        pub fn after(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    /// A recorded search call.
    #[derive(Debug, Clone)]
    pub struct SearchCall {
        pub query: String,
        pub kind: SearchKind,
        pub limit: u32,
        pub at: Instant,
    }

    type SearchHandler = Box<dyn Fn(&str, SearchKind) -> MockSearch + Send + Sync>;

    pub struct MockInsightsApi {
        pub chart: Option<ChartSnapshot>,
        pub kpi: Option<KpiStats>,
        pub artists: Option<Vec<Artist>>,
        pub artist_tracks: Option<Vec<Track>>,
        pub genres: Option<Vec<Genre>>,
        pub comparison: Option<GenreComparison>,
        search: SearchHandler,
        calls: Arc<Mutex<Vec<SearchCall>>>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl MockInsightsApi {
        /// Every endpoint fails; search answers each category with one empty page.
        pub fn new() -> Self {
            Self {
                chart: None,
                kpi: None,
                artists: None,
                artist_tracks: None,
                genres: None,
                comparison: None,
                search: Box::new(|_, kind| MockSearch::ok(page_for(kind, Vec::new()))),
                calls: Arc::new(Mutex::new(Vec::new())),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn with_search(
            mut self,
            handler: impl Fn(&str, SearchKind) -> MockSearch + Send + Sync + 'static,
        ) -> Self {
            self.search = Box::new(handler);
            self
        }

        /// Search calls in the order they were issued.
        pub fn search_calls(&self) -> Vec<SearchCall> {
            self.calls.lock().clone()
        }

        /// Names of every non-search endpoint hit, in order.
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().clone()
        }

        fn record(&self, endpoint: &str) {
            self.requests.lock().push(endpoint.to_string());
        }

        fn canned<T: Clone>(&self, endpoint: &str, value: &Option<T>) -> Result<T, ApiError> {
            self.record(endpoint);
            value
                .clone()
                .ok_or_else(|| ApiError::Network(format!("mock: {endpoint} unavailable")))
        }
    }

    /// A response populated only for `kind`; tracks pages carry `tracks`.
    pub fn page_for(kind: SearchKind, tracks: Vec<Track>) -> SearchResponse {
        let total = tracks.len() as u64;
        match kind {
            SearchKind::Artist => SearchResponse {
                artists: Some(Page {
                    items: Vec::new(),
                    total: 0,
                }),
                ..Default::default()
            },
            SearchKind::Track => SearchResponse {
                tracks: Some(Page {
                    items: tracks,
                    total,
                }),
                ..Default::default()
            },
            SearchKind::Playlist => SearchResponse {
                playlists: Some(Page {
                    items: Vec::new(),
                    total: 0,
                }),
                ..Default::default()
            },
        }
    }

    #[async_trait]
    impl InsightsApi for MockInsightsApi {
        async fn top_today(&self, _market: &Market) -> Result<ChartSnapshot, ApiError> {
            self.canned("top_today", &self.chart)
        }

        async fn top_year(&self, _year: i32, _market: &Market) -> Result<ChartSnapshot, ApiError> {
            self.canned("top_year", &self.chart)
        }

        async fn top_artists(&self, _year: i32, _market: &Market) -> Result<Vec<Artist>, ApiError> {
            self.canned("top_artists", &self.artists)
        }

        async fn artist_top_tracks(
            &self,
            _artist_id: &str,
            _market: &Market,
        ) -> Result<Vec<Track>, ApiError> {
            self.canned("artist_top_tracks", &self.artist_tracks)
        }

        async fn artist(&self, artist_id: &str) -> Result<Artist, ApiError> {
            self.record("artist");
            self.artists
                .as_ref()
                .and_then(|list| list.iter().find(|a| a.id == artist_id).cloned())
                .ok_or_else(|| ApiError::NotFound(format!("/artists/{artist_id}")))
        }

        async fn top_genres(&self, _year: i32, _market: &Market) -> Result<Vec<Genre>, ApiError> {
            self.canned("top_genres", &self.genres)
        }

        async fn search(
            &self,
            query: &str,
            kind: SearchKind,
            limit: u32,
        ) -> Result<SearchResponse, ApiError> {
            self.calls.lock().push(SearchCall {
                query: query.to_string(),
                kind,
                limit,
                at: Instant::now(),
            });
            let MockSearch { delay, result } = (self.search)(query, kind);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            result
        }

        async fn compare_genres(
            &self,
            _year: i32,
            _markets: &[Market],
        ) -> Result<GenreComparison, ApiError> {
            self.canned("compare_genres", &self.comparison)
        }

        async fn kpi_stats(&self) -> Result<KpiStats, ApiError> {
            self.canned("kpi_stats", &self.kpi)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::test_utils::mock_track;

        #[tokio::test]
        async fn test_unset_endpoint_fails() {
            let mock = MockInsightsApi::new();
            let result = mock.kpi_stats().await;
            assert!(matches!(result, Err(ApiError::Network(_))));
            assert_eq!(mock.requests(), vec!["kpi_stats"]);
        }

        #[tokio::test]
        async fn test_search_handler_and_recording() {
            let mock = MockInsightsApi::new().with_search(|q, kind| match kind {
                SearchKind::Track => MockSearch::ok(page_for(kind, vec![mock_track("t1", q)])),
                _ => MockSearch::fail(ApiError::Timeout),
            });

            let tracks = mock.search("Rahman", SearchKind::Track, 20).await.unwrap();
            assert_eq!(tracks.track_items()[0].name, "Rahman");
            assert!(mock.search("Rahman", SearchKind::Artist, 10).await.is_err());

            let calls = mock.search_calls();
            assert_eq!(calls.len(), 2);
            assert_eq!(calls[0].limit, 20);
            assert_eq!(calls[1].kind, SearchKind::Artist);
        }
    }
}
