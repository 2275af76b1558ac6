//! Search page rendering.
//!
//! The page itself is driven by [`SearchSession`](crate::search::SearchSession);
//! this view turns a published [`SearchState`] into text and numbers the
//! track rows so a preview can be toggled by position.

use std::fmt;

use super::format::thousands;
use crate::api::{SearchKind, Track};
use crate::search::SearchState;

/// A numbered track row.
#[derive(Debug, Clone, Copy)]
pub struct TrackRow<'a> {
    /// 1-based position shown to the user
    pub number: usize,
    pub track: &'a Track,
    pub playing: bool,
}

pub struct SearchView<'a> {
    state: &'a SearchState,
    playing: Option<&'a str>,
}

impl<'a> SearchView<'a> {
    pub fn new(state: &'a SearchState, playing: Option<&'a str>) -> Self {
        Self { state, playing }
    }

    pub fn track_rows(&self) -> Vec<TrackRow<'a>> {
        self.state
            .results
            .track_items()
            .iter()
            .enumerate()
            .map(|(i, track)| TrackRow {
                number: i + 1,
                track,
                playing: self.playing == Some(track.id.as_str()),
            })
            .collect()
    }

    /// Track at 1-based position `number`.
    pub fn track(&self, number: usize) -> Option<&'a Track> {
        number
            .checked_sub(1)
            .and_then(|i| self.state.results.track_items().get(i))
    }
}

impl fmt::Display for SearchView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state;
        if state.loading {
            return writeln!(f, "Searching for \"{}\"...", state.query);
        }
        if state.query.trim().is_empty() {
            return writeln!(f, "Type to search artists, tracks and playlists.");
        }

        if let Some(artists) = &state.results.artists {
            writeln!(f, "Artists ({})", artists.total)?;
            if artists.is_empty() {
                writeln!(f, "  No artists found")?;
            }
            for artist in &artists.items {
                writeln!(f, "  {} - {} followers", artist.name, thousands(artist.followers))?;
            }
        }

        if let Some(tracks) = &state.results.tracks {
            writeln!(f, "Tracks")?;
            if tracks.is_empty() {
                writeln!(f, "  No tracks found")?;
            }
            for row in self.track_rows() {
                let marker = match (row.playing, row.track.has_preview()) {
                    (true, _) => "▶",
                    (false, true) => "♪",
                    (false, false) => " ",
                };
                writeln!(
                    f,
                    "{:>3}. {} {} - {}",
                    row.number,
                    marker,
                    row.track.name,
                    row.track.artist_names()
                )?;
            }
        }

        if let Some(playlists) = &state.results.playlists {
            writeln!(f, "Playlists ({})", playlists.total)?;
            if playlists.is_empty() {
                writeln!(f, "  No playlists found")?;
            }
            for playlist in &playlists.items {
                match &playlist.owner {
                    Some(owner) => writeln!(
                        f,
                        "  {} by {} ({} tracks)",
                        playlist.name, owner, playlist.track_count
                    )?,
                    None => writeln!(f, "  {} ({} tracks)", playlist.name, playlist.track_count)?,
                }
            }
        }

        for kind in &state.failed {
            writeln!(f, "  ({} results unavailable)", kind_label(*kind))?;
        }
        Ok(())
    }
}

fn kind_label(kind: SearchKind) -> &'static str {
    match kind {
        SearchKind::Artist => "Artist",
        SearchKind::Track => "Track",
        SearchKind::Playlist => "Playlist",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::traits::mocks::page_for;
    use crate::api::{Page, SearchResponse};
    use crate::test_utils::{mock_track, mock_track_with_preview};

    fn state() -> SearchState {
        SearchState {
            query: "Arijit".into(),
            generation: 1,
            loading: false,
            results: page_for(
                SearchKind::Track,
                vec![
                    mock_track_with_preview("t1", "Kesariya"),
                    mock_track("t2", "Tum Hi Ho"),
                ],
            ),
            failed: vec![SearchKind::Artist],
        }
    }

    #[test]
    fn test_rows_mark_playing_track() {
        let state = state();
        let view = SearchView::new(&state, Some("t1"));

        let rows = view.track_rows();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].playing);
        assert!(!rows[1].playing);
        assert_eq!(view.track(2).unwrap().name, "Tum Hi Ho");
        assert!(view.track(0).is_none());
        assert!(view.track(3).is_none());
    }

    #[test]
    fn test_render_marks_and_failures() {
        let state = state();
        let text = SearchView::new(&state, Some("t1")).to_string();

        assert!(text.contains("1. ▶ Kesariya"));
        assert!(text.contains("2.   Tum Hi Ho"));
        assert!(text.contains("Artist results unavailable"));
    }

    #[test]
    fn test_empty_page_differs_from_missing_category() {
        let state = SearchState {
            query: "zzzz".into(),
            generation: 1,
            loading: false,
            results: SearchResponse {
                artists: Some(Page {
                    items: Vec::new(),
                    total: 0,
                }),
                tracks: Some(Page {
                    items: Vec::new(),
                    total: 0,
                }),
                playlists: None,
            },
            failed: Vec::new(),
        };
        let text = SearchView::new(&state, None).to_string();

        assert!(text.contains("Artists (0)\n  No artists found"));
        assert!(text.contains("Tracks\n  No tracks found"));
        assert!(!text.contains("Playlists"));
        assert!(!text.contains("No playlists found"));
    }

    #[test]
    fn test_render_empty_and_loading() {
        let idle = SearchState::default();
        assert!(SearchView::new(&idle, None).to_string().starts_with("Type to search"));

        let loading = SearchState {
            query: "Rahman".into(),
            loading: true,
            ..Default::default()
        };
        assert!(SearchView::new(&loading, None).to_string().contains("Searching for \"Rahman\""));
    }
}
