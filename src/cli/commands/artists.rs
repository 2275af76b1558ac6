//! Artist commands.

use tokio::runtime::Runtime;

use super::{resolve_market, resolve_year};
use crate::context::AppContext;
use crate::views::{ArtistDetailView, ArtistsView};

/// Top artists for a year, optionally filtered
pub fn cmd_artists(
    rt: &Runtime,
    ctx: &AppContext,
    year: Option<i32>,
    market: Option<&str>,
    filter: Option<&str>,
) -> anyhow::Result<()> {
    let year = resolve_year(year)?;
    let market = resolve_market(ctx, market)?;
    let mut view = ArtistsView::new(year, market, ctx.config.ui.demo_fallback)
        .with_filter(filter.unwrap_or_default());

    rt.block_on(view.load(ctx.api.as_ref(), &ctx.notifier));
    print!("{view}");
    Ok(())
}

/// One artist's profile and top tracks
pub fn cmd_artist(
    rt: &Runtime,
    ctx: &AppContext,
    artist_id: &str,
    market: Option<&str>,
) -> anyhow::Result<()> {
    let market = resolve_market(ctx, market)?;
    let mut view = ArtistDetailView::new(artist_id, market);

    rt.block_on(view.load(ctx.api.as_ref(), &ctx.notifier));
    print!("{view}");

    if let Some(err) = view.artist.error() {
        anyhow::bail!("Artist {} could not be loaded: {}", artist_id, err);
    }
    Ok(())
}
