//! Dashboard aggregate loading.

use super::list_view::ListView;
use crate::aggregates::DashboardStats;
use crate::api::ResourceApi;
use crate::model::experience::Experience;
use crate::model::portfolio::Portfolio;
use log::warn;

/// Reads both collections and derives dashboard counts.
///
/// Best effort: when either read fails the counts fall back to zero rather
/// than blocking the page.
pub fn load_dashboard_stats<P, E>(portfolios: &P, experiences: &E) -> DashboardStats
where
    P: ResourceApi<Record = Portfolio>,
    E: ResourceApi<Record = Experience>,
{
    let loaded = portfolios
        .list()
        .and_then(|portfolios| Ok((portfolios, experiences.list()?)));
    match loaded {
        Ok((portfolios, experiences)) => DashboardStats::compute(&portfolios, &experiences),
        Err(err) => {
            warn!(
                "event=dashboard_stats module=client status=fallback reason={}",
                err.message()
            );
            DashboardStats::default()
        }
    }
}

/// Recomputes counts from already-loaded views; `None` until both loaded.
pub fn stats_from_views(
    portfolios: &ListView<Portfolio>,
    experiences: &ListView<Experience>,
) -> Option<DashboardStats> {
    Some(DashboardStats::compute(
        portfolios.items()?,
        experiences.items()?,
    ))
}
