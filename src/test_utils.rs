//! Test utilities and fixtures for music-insights tests.
//!
//! Factories for domain entities with sensible defaults. Use struct update
//! syntax to customize:
//!
//! ```ignore
//! let track = Track {
//!     popularity: 99,
//!     ..mock_track("t1", "Kesariya")
//! };
//! ```

use crate::api::{Album, Artist, ArtistRef, Genre, Track};

/// A track without a preview clip.
pub fn mock_track(id: &str, name: &str) -> Track {
    Track {
        id: id.to_string(),
        name: name.to_string(),
        artists: vec![ArtistRef {
            id: format!("artist-{id}"),
            name: "Test Artist".to_string(),
        }],
        album: Album {
            id: format!("album-{id}"),
            name: "Test Album".to_string(),
            images: Vec::new(),
            release_date: Some("2024-01-15".to_string()),
        },
        preview_url: None,
        external_url: None,
        popularity: 50,
        rank: None,
    }
}

/// A track whose preview clip lives at `https://previews.test/<id>.mp3`.
pub fn mock_track_with_preview(id: &str, name: &str) -> Track {
    Track {
        preview_url: Some(preview_url(id)),
        ..mock_track(id, name)
    }
}

pub fn preview_url(id: &str) -> String {
    format!("https://previews.test/{id}.mp3")
}

pub fn mock_artist(id: &str, name: &str, genres: &[&str], followers: u64, popularity: u8) -> Artist {
    Artist {
        id: id.to_string(),
        name: name.to_string(),
        images: Vec::new(),
        followers,
        popularity,
        external_url: None,
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

pub fn mock_genre(name: &str, count: u64, percentage: f64) -> Genre {
    Genre {
        name: name.to_string(),
        count,
        percentage,
    }
}
