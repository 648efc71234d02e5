use tracing::debug;

use super::DamageTotals;
use crate::error::Result;
use crate::provider::query::direct_damage_filter;
use crate::provider::{LogProvider, Query};

/// Non-periodic, non-pet damage per actor over exactly `[start, end]`.
///
/// The provider pre-aggregates the table, so entries are taken as they come.
pub async fn direct_damage<P: LogProvider>(
    provider: &P,
    report: &str,
    start: i64,
    end: i64,
) -> Result<DamageTotals> {
    let query = Query::new(start, end).with_filter(direct_damage_filter());
    let table = provider.damage_table(report, &query).await?;

    let totals: DamageTotals = table.entries.iter().map(|e| (e.id, e.total)).collect();
    debug!(report, start, end, actors = totals.len(), "direct damage");
    Ok(totals)
}
