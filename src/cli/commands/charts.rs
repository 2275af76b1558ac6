//! Chart commands: today, year explorer, genres and KPIs.

use tokio::runtime::Runtime;

use super::{resolve_market, resolve_year};
use crate::context::AppContext;
use crate::views::format::{snapshot_date, thousands};
use crate::views::{ChartBar, OverviewView, YearTab, YearView};

/// Today's top chart with headline numbers
pub fn cmd_today(rt: &Runtime, ctx: &AppContext, market: Option<&str>) -> anyhow::Result<()> {
    let market = resolve_market(ctx, market)?;
    let mut view = OverviewView::new(market, ctx.config.ui.overview_track_limit);

    rt.block_on(view.load(ctx.api.as_ref(), &ctx.notifier));
    print!("{view}");
    Ok(())
}

/// One year's tracks, artists or genres
pub fn cmd_year(
    rt: &Runtime,
    ctx: &AppContext,
    year: Option<i32>,
    market: Option<&str>,
    tab: YearTab,
) -> anyhow::Result<()> {
    let year = resolve_year(year)?;
    let market = resolve_market(ctx, market)?;
    let mut view = YearView::new(year, market, tab);

    rt.block_on(view.load(ctx.api.as_ref(), &ctx.notifier));
    print!("{view}");

    let chart = view.chart_data();
    if !chart.is_empty() {
        println!();
        println!("Summary");
        print_chart(&chart);
    }
    Ok(())
}

/// Top genres for a year
pub fn cmd_genres(
    rt: &Runtime,
    ctx: &AppContext,
    year: Option<i32>,
    market: Option<&str>,
) -> anyhow::Result<()> {
    cmd_year(rt, ctx, year, market, YearTab::Genres)
}

/// Dataset totals
pub fn cmd_kpi(rt: &Runtime, ctx: &AppContext) -> anyhow::Result<()> {
    let kpi = rt.block_on(ctx.api.kpi_stats()).inspect_err(|e| {
        ctx.notifier.error("Error loading data", e.to_string());
    })?;

    println!("Last snapshot   {}", snapshot_date(kpi.last_snapshot));
    println!("Tracks          {}", thousands(kpi.total_tracks));
    println!("Artists         {}", thousands(kpi.total_artists));
    println!("Genres          {}", thousands(kpi.total_genres));
    Ok(())
}

fn print_chart(chart: &[ChartBar]) {
    let width = chart
        .iter()
        .map(|b| b.label.chars().count())
        .max()
        .unwrap_or(0);
    for entry in chart {
        let rank = entry.rank.map(|r| format!("#{r}")).unwrap_or_default();
        println!("  {:>4} {:<width$} {:>8}", rank, entry.label, entry.value);
    }
}
