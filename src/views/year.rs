//! Year explorer: top tracks, artists or genres for one year and market.

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;

use super::Load;
use super::format::{bar, thousands, truncate};
use crate::api::{Artist, Genre, InsightsApi, Market, Track};
use crate::notify::Notifier;

/// Earliest year the charts cover
pub const FIRST_YEAR: i32 = 2000;

/// Chart labels longer than this are shortened
const LABEL_LEN: usize = 20;

/// Bars shown in the chart summary
const CHART_ENTRIES: usize = 10;

/// Selectable years, newest first.
pub fn year_options() -> Vec<i32> {
    let current = chrono::Utc::now().year();
    (FIRST_YEAR..=current).rev().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearTab {
    #[default]
    Tracks,
    Artists,
    Genres,
}

impl FromStr for YearTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tracks" => Ok(YearTab::Tracks),
            "artists" => Ok(YearTab::Artists),
            "genres" => Ok(YearTab::Genres),
            other => Err(format!("unknown tab '{other}' (expected tracks, artists or genres)")),
        }
    }
}

/// One bar of the summary chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: String,
    pub value: f64,
    pub rank: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct YearView {
    pub year: i32,
    pub market: Market,
    pub tab: YearTab,
    pub tracks: Load<Vec<Track>>,
    pub artists: Load<Vec<Artist>>,
    pub genres: Load<Vec<Genre>>,
}

impl YearView {
    pub fn new(year: i32, market: Market, tab: YearTab) -> Self {
        Self {
            year,
            market,
            tab,
            tracks: Load::Idle,
            artists: Load::Idle,
            genres: Load::Idle,
        }
    }

    /// Fetch the active tab only. A failure leaves that tab with an empty list.
    pub async fn load<A>(&mut self, api: &A, notifier: &Notifier)
    where
        A: InsightsApi + ?Sized,
    {
        let (year, market) = (self.year, &self.market);
        let failed = match self.tab {
            YearTab::Tracks => {
                self.tracks = Load::Loading;
                let (state, failed) = settle(api.top_year(year, market).await.map(|c| c.tracks));
                self.tracks = state;
                failed
            }
            YearTab::Artists => {
                self.artists = Load::Loading;
                let (state, failed) = settle(api.top_artists(year, market).await);
                self.artists = state;
                failed
            }
            YearTab::Genres => {
                self.genres = Load::Loading;
                let (state, failed) = settle(api.top_genres(year, market).await);
                self.genres = state;
                failed
            }
        };

        if failed {
            notifier.error(
                "Error loading data",
                "Failed to load year data. Please try again.",
            );
        }
    }

    /// Summary chart for the active tab: top ten tracks or artists by
    /// popularity, or every genre by count.
    pub fn chart_data(&self) -> Vec<ChartBar> {
        match self.tab {
            YearTab::Tracks => self
                .tracks
                .data()
                .map(|tracks| {
                    tracks
                        .iter()
                        .take(CHART_ENTRIES)
                        .enumerate()
                        .map(|(i, t)| ChartBar {
                            label: truncate(&t.name, LABEL_LEN),
                            value: t.popularity as f64,
                            rank: Some(i + 1),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            YearTab::Artists => self
                .artists
                .data()
                .map(|artists| {
                    artists
                        .iter()
                        .take(CHART_ENTRIES)
                        .enumerate()
                        .map(|(i, a)| ChartBar {
                            label: truncate(&a.name, LABEL_LEN),
                            value: a.popularity as f64,
                            rank: Some(i + 1),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            YearTab::Genres => self
                .genres
                .data()
                .map(|genres| {
                    genres
                        .iter()
                        .map(|g| ChartBar {
                            label: g.name.clone(),
                            value: g.count as f64,
                            rank: None,
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

fn settle<T, E: fmt::Display>(result: Result<Vec<T>, E>) -> (Load<Vec<T>>, bool) {
    match result {
        Ok(items) => (Load::Loaded(items), false),
        Err(e) => {
            tracing::warn!("Failed to load year data: {}", e);
            (Load::Fallback(Vec::new()), true)
        }
    }
}

impl fmt::Display for YearView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tab {
            YearTab::Tracks => {
                writeln!(f, "Top Tracks of {} ({})", self.year, self.market)?;
                for (i, track) in self.tracks.data().into_iter().flatten().enumerate() {
                    writeln!(
                        f,
                        "{:>3}. {} - {} {}",
                        i + 1,
                        track.name,
                        track.artist_names(),
                        bar(track.popularity)
                    )?;
                }
            }
            YearTab::Artists => {
                writeln!(f, "Top Artists of {} ({})", self.year, self.market)?;
                for (i, artist) in self.artists.data().into_iter().flatten().enumerate() {
                    writeln!(
                        f,
                        "{:>3}. {} - {} followers {}",
                        i + 1,
                        artist.name,
                        thousands(artist.followers),
                        bar(artist.popularity)
                    )?;
                }
            }
            YearTab::Genres => {
                writeln!(f, "Top Genres of {} ({})", self.year, self.market)?;
                for genre in self.genres.data().into_iter().flatten() {
                    writeln!(
                        f,
                        "  {:<24} {:>6} {:>5.1}%",
                        genre.name,
                        thousands(genre.count),
                        genre.percentage
                    )?;
                }
            }
        }

        if self.chart_data().is_empty() {
            writeln!(f, "  No data for this selection")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ChartSnapshot;
    use crate::api::traits::mocks::MockInsightsApi;
    use crate::test_utils::{mock_artist, mock_genre, mock_track};

    #[test]
    fn test_year_options() {
        let years = year_options();
        assert_eq!(*years.last().unwrap(), FIRST_YEAR);
        assert!(years[0] >= 2025);
        assert!(years.windows(2).all(|w| w[0] == w[1] + 1));
    }

    #[test]
    fn test_tab_parse() {
        assert_eq!("Genres".parse::<YearTab>().unwrap(), YearTab::Genres);
        assert!("albums".parse::<YearTab>().is_err());
    }

    #[tokio::test]
    async fn test_only_active_tab_is_fetched() {
        let mut api = MockInsightsApi::new();
        api.genres = Some(vec![mock_genre("Bollywood", 40, 32.5)]);
        let notifier = Notifier::new();

        let mut view = YearView::new(2024, Market::default(), YearTab::Genres);
        view.load(&api, &notifier).await;

        assert_eq!(api.requests(), vec!["top_genres"]);
        assert_eq!(view.genres.data().unwrap().len(), 1);
        assert_eq!(view.tracks, Load::Idle);
    }

    #[tokio::test]
    async fn test_failure_yields_empty_list() {
        let api = MockInsightsApi::new();
        let notifier = Notifier::new();

        let mut view = YearView::new(2024, Market::default(), YearTab::Artists);
        view.load(&api, &notifier).await;

        assert_eq!(view.artists, Load::Fallback(Vec::new()));
        assert_eq!(notifier.len(), 1);
        assert!(view.to_string().contains("No data"));
    }

    #[tokio::test]
    async fn test_track_chart_top_ten_truncated() {
        let mut api = MockInsightsApi::new();
        let mut tracks: Vec<_> = (0..15)
            .map(|i| mock_track(&format!("t{i}"), &format!("Track {i}")))
            .collect();
        tracks[0].name = "A Very Long Track Name Indeed".into();
        api.chart = Some(ChartSnapshot {
            tracks,
            ..ChartSnapshot::empty()
        });
        let notifier = Notifier::new();

        let mut view = YearView::new(2023, Market::default(), YearTab::Tracks);
        view.load(&api, &notifier).await;

        let chart = view.chart_data();
        assert_eq!(chart.len(), 10);
        assert_eq!(chart[0].label, "A Very Long Track Na...");
        assert_eq!(chart[0].rank, Some(1));
        assert_eq!(chart[9].label, "Track 9");
    }

    #[tokio::test]
    async fn test_artist_chart_uses_popularity() {
        let mut api = MockInsightsApi::new();
        api.artists = Some(vec![mock_artist("a1", "Arijit Singh", &["Bollywood"], 15_000_000, 95)]);
        let notifier = Notifier::new();

        let mut view = YearView::new(2024, Market::default(), YearTab::Artists);
        view.load(&api, &notifier).await;

        assert_eq!(view.chart_data()[0].value, 95.0);
        assert!(view.to_string().contains("15,000,000"));
    }
}
