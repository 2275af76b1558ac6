//! Analytics API Data Transfer Objects
//!
//! These types match what the API returns on the wire.
//! DO NOT use these types outside the api module - convert to domain types.
//!
//! Identifiers and names are required here, so a payload missing them fails
//! to deserialize. Counts are signed so the adapter can reject negatives
//! with a field name instead of a serde message.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageDto {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistRefDto {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlbumDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<ImageDto>,
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRefDto>,
    pub album: AlbumDto,
    pub preview_url: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub popularity: i64,
    pub rank: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FollowersDto {
    #[serde(default)]
    pub total: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<ImageDto>,
    #[serde(default)]
    pub followers: FollowersDto,
    #[serde(default)]
    pub popularity: i64,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OwnerDto {
    pub id: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlaylistTracksDto {
    #[serde(default)]
    pub total: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistDto {
    pub id: String,
    pub name: String,
    pub owner: Option<OwnerDto>,
    #[serde(default)]
    pub tracks: PlaylistTracksDto,
    #[serde(default)]
    pub images: Vec<ImageDto>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenreDto {
    pub name: String,
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub percentage: f64,
}

/// `/charts/top-today` and `/charts/top-year`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChartResponse {
    #[serde(default)]
    pub tracks: Vec<TrackDto>,
    #[serde(default)]
    pub snapshot_id: String,
    pub last_updated: Option<String>,
    #[serde(default)]
    pub total: i64,
}

/// `/artists/top`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TopArtistsResponse {
    #[serde(default)]
    pub artists: Vec<ArtistDto>,
}

/// `/artists/{id}/top-tracks`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TopTracksResponse {
    #[serde(default)]
    pub tracks: Vec<TrackDto>,
}

/// `/genres/top`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TopGenresResponse {
    #[serde(default)]
    pub genres: Vec<GenreDto>,
}

/// One category of `/search`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PagingDto<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: i64,
}

/// `/search`
///
/// Playlist items can be `null` in upstream search results, so they are
/// deserialized as options and dropped by the adapter.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponseDto {
    pub artists: Option<PagingDto<ArtistDto>>,
    pub tracks: Option<PagingDto<TrackDto>>,
    pub playlists: Option<PagingDto<Option<PlaylistDto>>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompareGenreDto {
    pub name: String,
    #[serde(default)]
    pub markets: HashMap<String, f64>,
}

/// `/compare/genres`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompareResponse {
    #[serde(default)]
    pub genres: Vec<CompareGenreDto>,
}

/// `/analytics/kpi`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiResponse {
    pub last_snapshot_date: Option<String>,
    #[serde(default)]
    pub total_tracks: i64,
    #[serde(default)]
    pub total_artists: i64,
    #[serde(default)]
    pub total_genres: i64,
}

/// Error body some endpoints send with non-2xx statuses
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn text(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_deserializes_with_optional_fields_missing() {
        let json = r#"{
            "id": "t1",
            "name": "Kesariya",
            "artists": [{"id": "a1", "name": "Arijit Singh"}],
            "album": {"id": "al1", "name": "Brahmastra"}
        }"#;
        let track: TrackDto = serde_json::from_str(json).unwrap();
        assert_eq!(track.popularity, 0);
        assert!(track.preview_url.is_none());
        assert!(track.album.images.is_empty());
        assert!(track.external_urls.spotify.is_none());
    }

    #[test]
    fn test_track_without_id_is_rejected() {
        let json = r#"{"name": "No id", "album": {"id": "al", "name": "x"}}"#;
        assert!(serde_json::from_str::<TrackDto>(json).is_err());
    }

    #[test]
    fn test_search_response_with_null_playlists() {
        let json = r#"{
            "playlists": {"items": [null, {"id": "p1", "name": "Hits"}], "total": 2}
        }"#;
        let resp: SearchResponseDto = serde_json::from_str(json).unwrap();
        assert!(resp.artists.is_none());
        let playlists = resp.playlists.unwrap();
        assert_eq!(playlists.items.len(), 2);
        assert!(playlists.items[0].is_none());
    }

    #[test]
    fn test_kpi_uses_camel_case() {
        let json = r#"{"lastSnapshotDate": "2025-01-02", "totalTracks": 10, "totalArtists": 3, "totalGenres": 2}"#;
        let kpi: KpiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(kpi.total_tracks, 10);
        assert_eq!(kpi.last_snapshot_date.as_deref(), Some("2025-01-02"));
    }
}
