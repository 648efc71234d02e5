//! Tether analysis of one fight
//!
//! ```text
//! fights ──► resolve fight ──► tether events ──► intervals
//!                                                   │ (per interval, buffered)
//!                                   direct table ◄──┤
//!                                   tick events  ◄──┘
//!                                        │
//!                              combine_and_rank ──► TetherResult
//! ```
//!
//! Intervals are independent of each other. Up to
//! [`AnalysisConfig::concurrency`] of them are in flight at once, and results
//! are always returned in interval order.

use futures_util::{StreamExt, TryStreamExt, stream};
use serde::Serialize;
use tethercalc_types::formatting::format_timing;
use tethercalc_types::{EncounterInfo, Friends, TetherResult};
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::damage::{direct_damage, tick_damage};
use crate::error::{Result, TetherError};
use crate::fight::{FightMeta, FightSelector, get_last_fight_id, resolve_fight};
use crate::provider::LogProvider;
use crate::ranking::combine_and_rank;
use crate::tether::{TetherInterval, build_tethers};

/// Everything the presentation layer needs for one fight.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub results: Vec<TetherResult>,
    pub friends: Friends,
    pub encounter: EncounterInfo,
}

/// Analyze every tether of a fight.
///
/// `fight` is required; `None` fails with [`TetherError::MissingFightSelector`].
/// Any provider failure aborts the whole run without partial results.
pub async fn analyze<P: LogProvider>(
    provider: &P,
    report: &str,
    fight: Option<FightSelector>,
    config: &AnalysisConfig,
) -> Result<Analysis> {
    let selector = fight.ok_or(TetherError::MissingFightSelector)?;
    let resolved = resolve_fight(provider, report, selector).await?;
    let meta = &resolved.meta;
    info!(report, fight = meta.id, name = %meta.name, "analyzing fight");

    let tethers = build_tethers(provider, report, meta.start, meta.end).await?;

    let results: Vec<TetherResult> = stream::iter(tethers.iter())
        .map(|tether| analyze_tether(provider, report, meta, tether, &resolved.friends))
        .buffered(config.concurrency.max(1))
        .try_collect()
        .await?;

    info!(report, fight = meta.id, tethers = results.len(), "analysis complete");
    Ok(Analysis {
        results,
        encounter: EncounterInfo {
            name: meta.name.clone(),
            duration_text: format_timing(meta.duration_ms()),
            killed: meta.kill,
        },
        friends: resolved.friends,
    })
}

async fn analyze_tether<P: LogProvider>(
    provider: &P,
    report: &str,
    fight: &FightMeta,
    tether: &TetherInterval,
    friends: &Friends,
) -> Result<TetherResult> {
    let direct = direct_damage(provider, report, tether.start, tether.end).await?;
    let ticks = tick_damage(provider, report, fight.log_version, tether.start, tether.end).await?;
    let ranking = combine_and_rank(&direct, &ticks, tether, friends);

    debug!(
        source = tether.source,
        target = tether.target,
        start = tether.start,
        end = tether.end,
        correct = %ranking.correct,
        "tether attributed"
    );

    Ok(TetherResult {
        source: tether.source,
        target: tether.target,
        correct: ranking.correct,
        timing: format_timing(tether.start - fight.start),
        damages: ranking.damages,
    })
}

/// Id of the last fight in a report.
pub async fn resolve_last_fight<P: LogProvider>(provider: &P, report: &str) -> Result<u32> {
    let id = get_last_fight_id(provider, report).await?;
    info!(report, fight = id, "resolved last fight");
    Ok(id)
}
