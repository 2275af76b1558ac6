//! One artist with their top tracks.

use std::fmt;

use super::Load;
use super::artists::PopularityTier;
use super::format::{bar, release_year, thousands};
use crate::api::{Artist, InsightsApi, Market, Track};
use crate::notify::Notifier;

#[derive(Debug, Clone)]
pub struct ArtistDetailView {
    pub artist_id: String,
    pub market: Market,
    pub artist: Load<Artist>,
    pub tracks: Load<Vec<Track>>,
}

impl ArtistDetailView {
    pub fn new(artist_id: impl Into<String>, market: Market) -> Self {
        Self {
            artist_id: artist_id.into(),
            market,
            artist: Load::Idle,
            tracks: Load::Idle,
        }
    }

    /// Fetch the profile and top tracks concurrently.
    pub async fn load<A>(&mut self, api: &A, notifier: &Notifier)
    where
        A: InsightsApi + ?Sized,
    {
        self.artist = Load::Loading;
        self.tracks = Load::Loading;

        let (artist, tracks) = tokio::join!(
            api.artist(&self.artist_id),
            api.artist_top_tracks(&self.artist_id, &self.market)
        );

        self.artist = match artist {
            Ok(artist) => Load::Loaded(artist),
            Err(e) => {
                tracing::warn!(artist = %self.artist_id, "Failed to fetch artist: {}", e);
                notifier.error("Error loading artist", e.to_string());
                Load::Failed(e.to_string())
            }
        };
        self.tracks = match tracks {
            Ok(tracks) => Load::Loaded(tracks),
            Err(e) => {
                tracing::warn!(artist = %self.artist_id, "Failed to fetch top tracks: {}", e);
                Load::Fallback(Vec::new())
            }
        };
    }
}

impl fmt::Display for ArtistDetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.artist {
            Load::Loaded(artist) => {
                writeln!(f, "{}", artist.name)?;
                writeln!(
                    f,
                    "  {} · {}% · {} followers",
                    PopularityTier::for_score(artist.popularity).label(),
                    artist.popularity,
                    thousands(artist.followers)
                )?;
                if !artist.genres.is_empty() {
                    writeln!(f, "  {}", artist.genres.join(", "))?;
                }
                if let Some(url) = &artist.external_url {
                    writeln!(f, "  {url}")?;
                }
            }
            Load::Failed(err) => writeln!(f, "Artist {} unavailable: {}", self.artist_id, err)?,
            _ => writeln!(f, "Artist {}", self.artist_id)?,
        }

        writeln!(f)?;
        writeln!(f, "Top Tracks ({})", self.market)?;
        match self.tracks.data() {
            Some(tracks) if !tracks.is_empty() => {
                for (i, track) in tracks.iter().enumerate() {
                    writeln!(
                        f,
                        "{:>3}. {} ({}) {}",
                        i + 1,
                        track.name,
                        release_year(track.album.release_date.as_deref()),
                        bar(track.popularity)
                    )?;
                }
            }
            _ => writeln!(f, "  No tracks available")?,
        }
        Ok(())
    }
}
