//! Search-as-you-type across artists, tracks and playlists.
//!
//! [`Debouncer`] coalesces keystrokes; [`SearchAggregator`] turns the
//! settled query into three concurrent category searches and publishes
//! the merged [`SearchState`].

mod aggregator;
mod debounce;

pub use aggregator::{
    SearchAggregator, SearchLimits, SearchOutcome, SearchSession, SearchState, search_all,
};
pub use debounce::Debouncer;
