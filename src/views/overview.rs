//! Landing page: today's top chart and headline numbers.

use std::fmt;

use super::Load;
use super::format::{bar, release_year, snapshot_date, thousands};
use crate::api::{ChartSnapshot, InsightsApi, KpiStats, Market};
use crate::notify::Notifier;

#[derive(Debug, Clone)]
pub struct OverviewView {
    pub market: Market,
    pub track_limit: usize,
    pub chart: Load<ChartSnapshot>,
    pub kpi: Load<KpiStats>,
}

impl OverviewView {
    pub fn new(market: Market, track_limit: usize) -> Self {
        Self {
            market,
            track_limit,
            chart: Load::Idle,
            kpi: Load::Idle,
        }
    }

    /// Fetch chart and KPIs concurrently. Each side falls back on its own:
    /// an empty chart, or zeroed KPIs stamped with the current time.
    pub async fn load<A>(&mut self, api: &A, notifier: &Notifier)
    where
        A: InsightsApi + ?Sized,
    {
        self.chart = Load::Loading;
        self.kpi = Load::Loading;

        let (chart, kpi) = tokio::join!(api.top_today(&self.market), api.kpi_stats());

        let mut failed = false;
        self.chart = match chart {
            Ok(mut chart) => {
                chart.tracks.truncate(self.track_limit);
                Load::Loaded(chart)
            }
            Err(e) => {
                tracing::warn!("Failed to load today's chart: {}", e);
                failed = true;
                Load::Fallback(ChartSnapshot::empty())
            }
        };
        self.kpi = match kpi {
            Ok(kpi) => Load::Loaded(kpi),
            Err(e) => {
                tracing::warn!("Failed to load KPI stats: {}", e);
                failed = true;
                Load::Fallback(KpiStats::zeroed_now())
            }
        };

        if failed {
            notifier.error(
                "Error loading data",
                "Failed to load some overview data. Showing what is available.",
            );
        }
    }
}

impl fmt::Display for OverviewView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(kpi) = self.kpi.data() {
            writeln!(f, "Last snapshot   {}", snapshot_date(kpi.last_snapshot))?;
            writeln!(f, "Tracks          {}", thousands(kpi.total_tracks))?;
            writeln!(f, "Artists         {}", thousands(kpi.total_artists))?;
            writeln!(f, "Genres          {}", thousands(kpi.total_genres))?;
            writeln!(f)?;
        }

        writeln!(f, "Today's Top Tracks ({})", self.market)?;
        match self.chart.data() {
            Some(chart) if !chart.tracks.is_empty() => {
                for (i, track) in chart.tracks.iter().enumerate() {
                    let rank = track.rank.unwrap_or(i as u32 + 1);
                    writeln!(
                        f,
                        "{:>3}. {} - {} ({}) {}",
                        rank,
                        track.name,
                        track.artist_names(),
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
