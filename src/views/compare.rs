//! Genre shares across markets.

use std::fmt;

use super::Load;
use super::demo::demo_comparison;
use crate::api::{GenreComparison, InsightsApi, Market};
use crate::notify::Notifier;

#[derive(Debug, Clone)]
pub struct CompareView {
    pub year: i32,
    pub markets: Vec<Market>,
    pub demo_fallback: bool,
    pub data: Load<GenreComparison>,
}

impl CompareView {
    pub fn new(year: i32, markets: Vec<Market>, demo_fallback: bool) -> Self {
        Self {
            year,
            markets,
            demo_fallback,
            data: Load::Idle,
        }
    }

    /// Fetch the comparison. With no market selected nothing is requested.
    pub async fn load<A>(&mut self, api: &A, notifier: &Notifier)
    where
        A: InsightsApi + ?Sized,
    {
        if self.markets.is_empty() {
            tracing::debug!("No markets selected, skipping comparison");
            self.data = Load::Idle;
            return;
        }

        self.data = Load::Loading;
        self.data = match api.compare_genres(self.year, &self.markets).await {
            Ok(comparison) if comparison.rows.is_empty() && self.demo_fallback => {
                Load::Fallback(demo_comparison(&self.markets))
            }
            Ok(comparison) => Load::Loaded(comparison),
            Err(e) => {
                tracing::warn!("Failed to fetch genre comparison: {}", e);
                if self.demo_fallback {
                    notifier.error(
                        "Error loading comparison",
                        "Using demo data for comparison view.",
                    );
                    Load::Fallback(demo_comparison(&self.markets))
                } else {
                    notifier.error("Error loading comparison", e.to_string());
                    Load::Failed(e.to_string())
                }
            }
        };
    }

    /// One row per genre with a share for every selected market; markets
    /// the response omitted read as zero.
    pub fn matrix(&self) -> Vec<(String, Vec<f64>)> {
        self.data
            .data()
            .map(|data| {
                data.rows
                    .iter()
                    .map(|row| {
                        let shares = self.markets.iter().map(|m| row.share(m)).collect();
                        (row.genre.clone(), shares)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for CompareView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.markets.is_empty() {
            return writeln!(f, "Select at least one market to compare.");
        }

        writeln!(f, "Genre Share by Market, {}", self.year)?;
        if self.data.is_fallback() {
            writeln!(f, "  (demo data)")?;
        }
        if let Some(err) = self.data.error() {
            return writeln!(f, "  Unavailable: {err}");
        }

        write!(f, "{:<16}", "Genre")?;
        for market in &self.markets {
            write!(f, "{:>8}", market.as_str())?;
        }
        writeln!(f)?;

        let matrix = self.matrix();
        if matrix.is_empty() {
            return writeln!(f, "  No genre data");
        }
        for (genre, shares) in matrix {
            write!(f, "{:<16}", genre)?;
            for share in shares {
                write!(f, "{:>7.1}%", share)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::api::GenreShares;
    use crate::api::traits::mocks::MockInsightsApi;

    fn markets(codes: &str) -> Vec<Market> {
        Market::parse_list(codes).unwrap()
    }

    #[tokio::test]
    async fn test_no_markets_no_request() {
        let api = MockInsightsApi::new();
        let notifier = Notifier::new();

        let mut view = CompareView::new(2024, Vec::new(), true);
        view.load(&api, &notifier).await;

        assert!(api.requests().is_empty());
        assert_eq!(view.data, Load::Idle);
        assert!(view.to_string().contains("at least one market"));
    }

    #[tokio::test]
    async fn test_missing_market_reads_zero() {
        let selected = markets("IN,US,GB");
        let mut api = MockInsightsApi::new();
        api.comparison = Some(GenreComparison {
            markets: selected.clone(),
            rows: vec![GenreShares {
                genre: "Bollywood".into(),
                shares: BTreeMap::from([(selected[0].clone(), 45.0), (selected[2].clone(), 8.0)]),
            }],
        });
        let notifier = Notifier::new();

        let mut view = CompareView::new(2024, selected, false);
        view.load(&api, &notifier).await;

        assert_eq!(view.matrix(), vec![("Bollywood".to_string(), vec![45.0, 0.0, 8.0])]);
    }

    #[tokio::test]
    async fn test_failure_uses_demo_matrix_when_enabled() {
        let api = MockInsightsApi::new();
        let notifier = Notifier::new();

        let mut view = CompareView::new(2024, markets("IN,US"), true);
        view.load(&api, &notifier).await;

        assert!(view.data.is_fallback());
        let matrix = view.matrix();
        assert_eq!(matrix.len(), 6);
        assert_eq!(matrix[2], ("Bollywood".to_string(), vec![45.0, 5.0]));
        assert_eq!(
            notifier.drain()[0].description,
            "Using demo data for comparison view."
        );
    }

    #[tokio::test]
    async fn test_failure_without_demo() {
        let api = MockInsightsApi::new();
        let notifier = Notifier::new();

        let mut view = CompareView::new(2024, markets("GB"), false);
        view.load(&api, &notifier).await;

        assert!(view.data.error().is_some());
        assert!(view.matrix().is_empty());
    }
}
