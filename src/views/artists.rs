//! Top artists page with a local name / genre filter.

use std::fmt;

use super::Load;
use super::demo::demo_artists;
use super::format::{bar, thousands};
use crate::api::{Artist, InsightsApi, Market};
use crate::notify::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopularityTier {
    Superstar,
    Popular,
    Rising,
    Emerging,
}

impl PopularityTier {
    pub fn for_score(popularity: u8) -> Self {
        match popularity {
            90.. => PopularityTier::Superstar,
            80..=89 => PopularityTier::Popular,
            70..=79 => PopularityTier::Rising,
            _ => PopularityTier::Emerging,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PopularityTier::Superstar => "Superstar",
            PopularityTier::Popular => "Popular",
            PopularityTier::Rising => "Rising",
            PopularityTier::Emerging => "Emerging",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArtistsView {
    pub year: i32,
    pub market: Market,
    pub filter: String,
    pub demo_fallback: bool,
    pub artists: Load<Vec<Artist>>,
}

impl ArtistsView {
    pub fn new(year: i32, market: Market, demo_fallback: bool) -> Self {
        Self {
            year,
            market,
            filter: String::new(),
            demo_fallback,
            artists: Load::Idle,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub async fn load<A>(&mut self, api: &A, notifier: &Notifier)
    where
        A: InsightsApi + ?Sized,
    {
        self.artists = Load::Loading;

        self.artists = match api.top_artists(self.year, &self.market).await {
            Ok(artists) if artists.is_empty() && self.demo_fallback => {
                Load::Fallback(demo_artists())
            }
            Ok(artists) => Load::Loaded(artists),
            Err(e) => {
                tracing::warn!("Failed to fetch artists: {}", e);
                if self.demo_fallback {
                    notifier.error("Error loading artists", "Using demo data instead.");
                    Load::Fallback(demo_artists())
                } else {
                    notifier.error("Error loading artists", e.to_string());
                    Load::Failed(e.to_string())
                }
            }
        };
    }

    /// Artists whose name or any genre contains the filter, ignoring case.
    pub fn filtered(&self) -> Vec<&Artist> {
        let query = self.filter.trim().to_lowercase();
        self.artists
            .data()
            .into_iter()
            .flatten()
            .filter(|artist| {
                query.is_empty()
                    || artist.name.to_lowercase().contains(&query)
                    || artist
                        .genres
                        .iter()
                        .any(|g| g.to_lowercase().contains(&query))
            })
            .collect()
    }

    /// Followers summed over the filtered artists.
    pub fn total_followers(&self) -> u64 {
        self.filtered().iter().map(|a| a.followers).sum()
    }
}

impl fmt::Display for ArtistsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Top Artists {} ({})", self.year, self.market)?;
        if self.artists.is_fallback() {
            writeln!(f, "  (demo data)")?;
        }
        if let Some(err) = self.artists.error() {
            return writeln!(f, "  Unavailable: {err}");
        }

        let artists = self.filtered();
        if artists.is_empty() {
            return writeln!(f, "  No artists found");
        }

        for (i, artist) in artists.iter().enumerate() {
            writeln!(
                f,
                "{:>3}. {:<24} {:<10} {} {:>3}%  {} followers",
                i + 1,
                artist.name,
                PopularityTier::for_score(artist.popularity).label(),
                bar(artist.popularity),
                artist.popularity,
                thousands(artist.followers)
            )?;
            if !artist.genres.is_empty() {
                writeln!(f, "     {}", artist.genres.join(", "))?;
            }
        }
        writeln!(f)?;
        writeln!(f, "Artists: {}", artists.len())?;
        writeln!(f, "Total followers: {}", thousands(self.total_followers()))
    }
}
