//! Genre comparison command.

use tokio::runtime::Runtime;

use super::resolve_year;
use crate::api::Market;
use crate::context::AppContext;
use crate::views::CompareView;

/// Genre shares across the given (or configured) markets
pub fn cmd_compare(
    rt: &Runtime,
    ctx: &AppContext,
    year: Option<i32>,
    markets: Option<&str>,
) -> anyhow::Result<()> {
    let year = resolve_year(year)?;
    let markets = match markets {
        Some(codes) => Market::parse_list(codes)?,
        None => ctx.compare_markets(),
    };

    let mut view = CompareView::new(year, markets, ctx.config.ui.demo_fallback);
    rt.block_on(view.load(ctx.api.as_ref(), &ctx.notifier));
    print!("{view}");
    Ok(())
}
