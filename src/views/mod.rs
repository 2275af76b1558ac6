//! Page views for the dashboard.
//!
//! This module is organized by page:
//! - `overview`: today's chart and headline numbers
//! - `year`: year explorer with tracks / artists / genres tabs
//! - `artists`: top artists with local filtering
//! - `artist_detail`: one artist and their top tracks
//! - `compare`: genre shares across markets
//! - `search`: debounced search results with preview markers
//!
//! Every view owns its fetch state as a [`Load`]. A failed fetch is turned
//! into a notification and a fallback value inside the view; nothing
//! propagates to the caller.

mod artist_detail;
mod artists;
mod compare;
pub mod demo;
pub mod format;
mod overview;
mod search;
mod year;

pub use artist_detail::ArtistDetailView;
pub use artists::{ArtistsView, PopularityTier};
pub use compare::CompareView;
pub use overview::OverviewView;
pub use search::{SearchView, TrackRow};
pub use year::{ChartBar, FIRST_YEAR, YearTab, YearView, year_options};

/// Fetch state of one section of a page.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Load<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    /// Substitute data shown after a failed or empty fetch
    Fallback(T),
    Failed(String),
}

impl<T> Load<T> {
    /// The data to render, real or substitute.
    pub fn data(&self) -> Option<&T> {
        match self {
            Load::Loaded(data) | Load::Fallback(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Load::Fallback(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Load::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_covers_loaded_and_fallback() {
        assert_eq!(Load::Loaded(3).data(), Some(&3));
        assert_eq!(Load::Fallback(4).data(), Some(&4));
        assert_eq!(Load::<i32>::Loading.data(), None);
        assert_eq!(Load::<i32>::Failed("boom".into()).error(), Some("boom"));
        assert!(Load::<i32>::default() == Load::Idle);
    }
}
