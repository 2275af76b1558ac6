//! Analytics API HTTP client
//!
//! All endpoints are GETs under a versioned base path (`/v1`) with query
//! parameters, returning JSON. Failures are logged here once, by category,
//! and returned as [`ApiError`] for the call site to turn into a fallback.

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::domain::{
    ApiError, Artist, ChartSnapshot, Genre, GenreComparison, KpiStats, Market, SearchKind,
    SearchResponse, Track,
};
use super::{adapter, dto};
use crate::config::ApiConfig;

/// User agent string sent with every request
const USER_AGENT: &str = concat!("MusicInsights/", env!("CARGO_PKG_VERSION"));

/// Analytics API client
#[derive(Clone)]
pub struct InsightsClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl InsightsClient {
    /// Create a client from the `[api]` config section
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::with_base_url(config.endpoint(), config.timeout())
    }

    /// Create a client against an explicit versioned base URL
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying HTTP client, shared with the preview downloader
    pub fn http(&self) -> &reqwest::Client {
        &self.http_client
    }

    /// Today's top chart for a market
    pub async fn top_today(&self, market: &Market) -> Result<ChartSnapshot, ApiError> {
        let response: dto::ChartResponse = self
            .get("/charts/top-today", &[("market", market.to_string())])
            .await?;
        adapter::to_chart(response)
    }

    /// A year's top chart for a market
    pub async fn top_year(&self, year: i32, market: &Market) -> Result<ChartSnapshot, ApiError> {
        let response: dto::ChartResponse = self
            .get(
                "/charts/top-year",
                &[("year", year.to_string()), ("market", market.to_string())],
            )
            .await?;
        adapter::to_chart(response)
    }

    pub async fn top_artists(&self, year: i32, market: &Market) -> Result<Vec<Artist>, ApiError> {
        let response: dto::TopArtistsResponse = self
            .get(
                "/artists/top",
                &[("year", year.to_string()), ("market", market.to_string())],
            )
            .await?;
        adapter::to_artists(response.artists)
    }

    pub async fn artist_top_tracks(
        &self,
        artist_id: &str,
        market: &Market,
    ) -> Result<Vec<Track>, ApiError> {
        let path = format!("/artists/{}/top-tracks", urlencoding::encode(artist_id));
        let response: dto::TopTracksResponse =
            self.get(&path, &[("market", market.to_string())]).await?;
        adapter::to_tracks(response.tracks)
    }

    pub async fn artist(&self, artist_id: &str) -> Result<Artist, ApiError> {
        let path = format!("/artists/{}", urlencoding::encode(artist_id));
        let response: dto::ArtistDto = self.get(&path, &[]).await?;
        adapter::to_artist(response)
    }

    pub async fn top_genres(&self, year: i32, market: &Market) -> Result<Vec<Genre>, ApiError> {
        let response: dto::TopGenresResponse = self
            .get(
                "/genres/top",
                &[("year", year.to_string()), ("market", market.to_string())],
            )
            .await?;
        adapter::to_genres(response.genres)
    }

    /// Search a single category
    pub async fn search(
        &self,
        query: &str,
        kind: SearchKind,
        limit: u32,
    ) -> Result<SearchResponse, ApiError> {
        let response: dto::SearchResponseDto = self
            .get(
                "/search",
                &[
                    ("q", query.to_string()),
                    ("type", kind.as_str().to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        adapter::to_search(response)
    }

    pub async fn compare_genres(
        &self,
        year: i32,
        markets: &[Market],
    ) -> Result<GenreComparison, ApiError> {
        let response: dto::CompareResponse = self
            .get(
                "/compare/genres",
                &[("year", year.to_string()), ("markets", Market::join(markets))],
            )
            .await?;
        adapter::to_comparison(response, markets)
    }

    pub async fn kpi_stats(&self) -> Result<KpiStats, ApiError> {
        let response: dto::KpiResponse = self.get("/analytics/kpi", &[]).await?;
        adapter::to_kpi(response)
    }

    /// Send a GET and decode the JSON body
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, ?query, "GET");

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                let err = classify_transport_error(&e);
                log_failure(path, &err);
                err
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.json::<dto::ErrorBody>().await.ok();
            let message = body
                .as_ref()
                .and_then(|b| b.text())
                .map(str::to_string)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());

            let err = if status == reqwest::StatusCode::NOT_FOUND {
                ApiError::NotFound(path.to_string())
            } else if status.is_server_error() {
                ApiError::Server {
                    status: status.as_u16(),
                    message,
                }
            } else {
                ApiError::Status {
                    status: status.as_u16(),
                    message,
                }
            };
            log_failure(path, &err);
            return Err(err);
        }

        response.json::<T>().await.map_err(|e| {
            let err = if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::Parse(e.to_string())
            };
            log_failure(path, &err);
            err
        })
    }
}

fn classify_transport_error(e: &reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(e.to_string())
    }
}

/// One log line per failure, worded by category.
fn log_failure(path: &str, err: &ApiError) {
    match err {
        ApiError::Timeout => tracing::error!(path, "Request timeout"),
        ApiError::Server { status, message } => {
            tracing::error!(path, status, "Server error: {}", message)
        }
        ApiError::NotFound(_) => tracing::error!(path, "Endpoint not found"),
        other => tracing::error!(path, "API error: {}", other),
    }
}
