//! Adapter layer: validate API DTOs and convert them to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! Anything the rest of the crate relies on (non-empty ids, popularity in
//! 0..=100, non-negative counts, well-formed market codes and timestamps)
//! is checked here, and a violation becomes [`ApiError::Validation`] naming
//! the offending field.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use super::domain::{
    Album, ApiError, Artist, ArtistRef, ChartSnapshot, Genre, GenreComparison, GenreShares, Image,
    KpiStats, Market, Page, Playlist, SearchResponse, Track,
};
use super::dto;

pub fn to_chart(response: dto::ChartResponse) -> Result<ChartSnapshot, ApiError> {
    let last_updated = response
        .last_updated
        .as_deref()
        .map(|s| parse_timestamp("last_updated", s))
        .transpose()?;

    Ok(ChartSnapshot {
        tracks: to_tracks(response.tracks)?,
        snapshot_id: response.snapshot_id,
        last_updated,
        total: count("total", response.total)?,
    })
}

pub fn to_tracks(tracks: Vec<dto::TrackDto>) -> Result<Vec<Track>, ApiError> {
    tracks.into_iter().map(to_track).collect()
}

pub fn to_track(track: dto::TrackDto) -> Result<Track, ApiError> {
    let id = required("track.id", track.id)?;
    let name = required("track.name", track.name)?;

    let artists = track
        .artists
        .into_iter()
        .map(|a| ArtistRef {
            id: a.id,
            name: a.name,
        })
        .collect();

    let rank = match track.rank {
        Some(r) if r < 1 => {
            return Err(ApiError::invalid(
                "track.rank",
                format!("rank must be positive, got {r}"),
            ));
        }
        Some(r) => Some(u32::try_from(r).map_err(|_| ApiError::invalid("track.rank", "too large"))?),
        None => None,
    };

    Ok(Track {
        id,
        name,
        artists,
        album: Album {
            id: track.album.id,
            name: track.album.name,
            images: to_images(track.album.images),
            release_date: track.album.release_date.filter(|d| !d.trim().is_empty()),
        },
        preview_url: track.preview_url.filter(|u| !u.trim().is_empty()),
        external_url: track.external_urls.spotify,
        popularity: popularity("track.popularity", track.popularity)?,
        rank,
    })
}

pub fn to_artists(artists: Vec<dto::ArtistDto>) -> Result<Vec<Artist>, ApiError> {
    artists.into_iter().map(to_artist).collect()
}

pub fn to_artist(artist: dto::ArtistDto) -> Result<Artist, ApiError> {
    Ok(Artist {
        id: required("artist.id", artist.id)?,
        name: required("artist.name", artist.name)?,
        images: to_images(artist.images),
        followers: count("artist.followers.total", artist.followers.total)?,
        popularity: popularity("artist.popularity", artist.popularity)?,
        external_url: artist.external_urls.spotify,
        genres: artist.genres,
    })
}

pub fn to_genres(genres: Vec<dto::GenreDto>) -> Result<Vec<Genre>, ApiError> {
    genres
        .into_iter()
        .map(|g| {
            if !(0.0..=100.0).contains(&g.percentage) {
                return Err(ApiError::invalid(
                    "genre.percentage",
                    format!("{} is outside 0..=100", g.percentage),
                ));
            }
            Ok(Genre {
                name: required("genre.name", g.name)?,
                count: count("genre.count", g.count)?,
                percentage: g.percentage,
            })
        })
        .collect()
}

pub fn to_search(response: dto::SearchResponseDto) -> Result<SearchResponse, ApiError> {
    let artists = response
        .artists
        .map(|p| -> Result<_, ApiError> {
            Ok(Page {
                total: count("artists.total", p.total)?,
                items: to_artists(p.items)?,
            })
        })
        .transpose()?;

    let tracks = response
        .tracks
        .map(|p| -> Result<_, ApiError> {
            Ok(Page {
                total: count("tracks.total", p.total)?,
                items: to_tracks(p.items)?,
            })
        })
        .transpose()?;

    let playlists = response
        .playlists
        .map(|p| -> Result<_, ApiError> {
            Ok(Page {
                total: count("playlists.total", p.total)?,
                items: p
                    .items
                    .into_iter()
                    .flatten()
                    .map(to_playlist)
                    .collect::<Result<_, _>>()?,
            })
        })
        .transpose()?;

    Ok(SearchResponse {
        artists,
        tracks,
        playlists,
    })
}

fn to_playlist(playlist: dto::PlaylistDto) -> Result<Playlist, ApiError> {
    Ok(Playlist {
        id: required("playlist.id", playlist.id)?,
        name: playlist.name,
        owner: playlist.owner.and_then(|o| o.display_name.or(o.id)),
        track_count: count("playlist.tracks.total", playlist.tracks.total)?,
        images: to_images(playlist.images),
        external_url: playlist.external_urls.spotify,
    })
}

/// Build the comparison matrix for the markets that were requested.
///
/// Market keys in the response that aren't valid codes are a contract
/// violation; requested markets the API left out simply read as zero.
pub fn to_comparison(
    response: dto::CompareResponse,
    markets: &[Market],
) -> Result<GenreComparison, ApiError> {
    let rows = response
        .genres
        .into_iter()
        .map(|g| {
            let mut shares = BTreeMap::new();
            for (code, share) in g.markets {
                let market = Market::parse(&code)
                    .map_err(|_| ApiError::invalid("genres.markets", format!("bad code {code:?}")))?;
                if share < 0.0 {
                    return Err(ApiError::invalid(
                        "genres.markets",
                        format!("negative share for {code}"),
                    ));
                }
                shares.insert(market, share);
            }
            Ok(GenreShares {
                genre: required("genres.name", g.name)?,
                shares,
            })
        })
        .collect::<Result<_, _>>()?;

    Ok(GenreComparison {
        markets: markets.to_vec(),
        rows,
    })
}

pub fn to_kpi(response: dto::KpiResponse) -> Result<KpiStats, ApiError> {
    let last_snapshot = response
        .last_snapshot_date
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_timestamp("lastSnapshotDate", s))
        .transpose()?;

    Ok(KpiStats {
        last_snapshot,
        total_tracks: count("totalTracks", response.total_tracks)?,
        total_artists: count("totalArtists", response.total_artists)?,
        total_genres: count("totalGenres", response.total_genres)?,
    })
}

fn to_images(images: Vec<dto::ImageDto>) -> Vec<Image> {
    images
        .into_iter()
        .filter(|i| !i.url.trim().is_empty())
        .map(|i| Image {
            url: i.url,
            width: i.width,
            height: i.height,
        })
        .collect()
}

fn required(field: &str, value: String) -> Result<String, ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::invalid(field, "must not be empty"))
    } else {
        Ok(value)
    }
}

fn popularity(field: &str, value: i64) -> Result<u8, ApiError> {
    if (0..=100).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ApiError::invalid(field, format!("{value} is outside 0..=100")))
    }
}

fn count(field: &str, value: i64) -> Result<u64, ApiError> {
    u64::try_from(value).map_err(|_| ApiError::invalid(field, format!("negative count {value}")))
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| ApiError::invalid(field, format!("unrecognized timestamp {value:?}")))
}
