//! Internal domain models for the analytics API.
//!
//! These types are OUR types - they don't change when the wire format
//! changes. Every response is validated and converted into them by the
//! adapter before anything else in the crate sees it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

/// Shown wherever an entity has no artwork.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Two-letter region code scoping chart and search results.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Market(String);

impl Market {
    /// Parse a market code, normalizing to uppercase.
    pub fn parse(code: &str) -> Result<Self, ApiError> {
        let code = code.trim();
        if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code.to_ascii_uppercase()))
        } else {
            Err(ApiError::InvalidMarket(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse a comma separated list such as `IN,US,GB`.
    pub fn parse_list(codes: &str) -> Result<Vec<Self>, ApiError> {
        codes
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(Self::parse)
            .collect()
    }

    /// Join markets into the comma list the compare endpoint expects.
    pub fn join(markets: &[Market]) -> String {
        markets
            .iter()
            .map(Market::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for Market {
    fn default() -> Self {
        Self("IN".to_string())
    }
}

impl FromStr for Market {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One artwork variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Pick the first image, or the placeholder when there are none.
pub fn image_url(images: &[Image]) -> &str {
    images
        .first()
        .map(|i| i.url.as_str())
        .unwrap_or(PLACEHOLDER_IMAGE)
}

/// Artist as referenced from a track.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub images: Vec<Image>,
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD` as published
    pub release_date: Option<String>,
}

/// A track snapshot as returned by the API.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<ArtistRef>,
    pub album: Album,
    pub preview_url: Option<String>,
    pub external_url: Option<String>,
    /// 0 - 100
    pub popularity: u8,
    pub rank: Option<u32>,
}

impl Track {
    /// Artist names joined for display.
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn has_preview(&self) -> bool {
        self.preview_url.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub images: Vec<Image>,
    pub followers: u64,
    /// 0 - 100
    pub popularity: u8,
    pub external_url: Option<String>,
    pub genres: Vec<String>,
}

impl Artist {
    pub fn image_url(&self) -> &str {
        image_url(&self.images)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner: Option<String>,
    pub track_count: u64,
    pub images: Vec<Image>,
    pub external_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Genre {
    pub name: String,
    pub count: u64,
    /// Share of the chart, 0.0 - 100.0
    pub percentage: f64,
}

/// A point-in-time capture of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSnapshot {
    pub tracks: Vec<Track>,
    pub snapshot_id: String,
    pub last_updated: Option<DateTime<Utc>>,
    pub total: u64,
}

impl ChartSnapshot {
    /// An empty chart, used when the fetch failed.
    pub fn empty() -> Self {
        Self {
            tracks: Vec::new(),
            snapshot_id: String::new(),
            last_updated: None,
            total: 0,
        }
    }
}

/// Headline numbers for the overview page.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiStats {
    pub last_snapshot: Option<DateTime<Utc>>,
    pub total_tracks: u64,
    pub total_artists: u64,
    pub total_genres: u64,
}

impl KpiStats {
    /// Zeroed stats stamped with the current time.
    pub fn zeroed_now() -> Self {
        Self {
            last_snapshot: Some(Utc::now()),
            total_tracks: 0,
            total_artists: 0,
            total_genres: 0,
        }
    }
}

/// One genre's share in each compared market.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreShares {
    pub genre: String,
    pub shares: BTreeMap<Market, f64>,
}

impl GenreShares {
    /// Share in a market; markets the API didn't report count as zero.
    pub fn share(&self, market: &Market) -> f64 {
        self.shares.get(market).copied().unwrap_or(0.0)
    }
}

/// Genre-by-market breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreComparison {
    pub markets: Vec<Market>,
    pub rows: Vec<GenreShares>,
}

/// A page of search results for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Search categories the API understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SearchKind {
    Artist,
    Track,
    Playlist,
}

impl SearchKind {
    pub const ALL: [SearchKind; 3] = [SearchKind::Artist, SearchKind::Track, SearchKind::Playlist];

    /// Value of the `type` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Artist => "artist",
            SearchKind::Track => "track",
            SearchKind::Playlist => "playlist",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search results, partial by design.
///
/// `None` means the category wasn't fetched or its fetch failed; an empty
/// page means the API answered with no matches. The two render differently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    pub artists: Option<Page<Artist>>,
    pub tracks: Option<Page<Track>>,
    pub playlists: Option<Page<Playlist>>,
}

impl SearchResponse {
    /// True when no category is present at all.
    pub fn is_cleared(&self) -> bool {
        self.artists.is_none() && self.tracks.is_none() && self.playlists.is_none()
    }

    pub fn track_items(&self) -> &[Track] {
        self.tracks.as_ref().map(|p| p.items.as_slice()).unwrap_or(&[])
    }
}

/// Errors talking to the analytics API
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Endpoint not found: {0}")]
    NotFound(String),

    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("API contract violation in {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid market code: {0:?}")]
    InvalidMarket(String),
}

impl ApiError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_parse_normalizes_case() {
        assert_eq!(Market::parse(" in ").unwrap().as_str(), "IN");
        assert!(Market::parse("IND").is_err());
        assert!(Market::parse("1N").is_err());
        assert!(Market::parse("").is_err());
    }

    #[test]
    fn test_market_list_roundtrip() {
        let markets = Market::parse_list("in, us,GB,").unwrap();
        assert_eq!(Market::join(&markets), "IN,US,GB");
        assert!(Market::parse_list("IN,USA").is_err());
    }

    #[test]
    fn test_image_placeholder() {
        assert_eq!(image_url(&[]), PLACEHOLDER_IMAGE);
        let images = vec![Image {
            url: "https://img/1".to_string(),
            width: Some(640),
            height: Some(640),
        }];
        assert_eq!(image_url(&images), "https://img/1");
    }

    #[test]
    fn test_missing_market_share_is_zero() {
        let row = GenreShares {
            genre: "Pop".to_string(),
            shares: BTreeMap::from([(Market::parse("IN").unwrap(), 35.0)]),
        };
        assert_eq!(row.share(&Market::parse("IN").unwrap()), 35.0);
        assert_eq!(row.share(&Market::parse("US").unwrap()), 0.0);
    }

    #[test]
    fn test_absent_and_empty_are_distinct() {
        let cleared = SearchResponse::default();
        assert!(cleared.is_cleared());

        let empty_tracks = SearchResponse {
            tracks: Some(Page {
                items: vec![],
                total: 0,
            }),
            ..Default::default()
        };
        assert!(!empty_tracks.is_cleared());
        assert!(empty_tracks.artists.is_none());
        assert!(empty_tracks.track_items().is_empty());
    }
}
