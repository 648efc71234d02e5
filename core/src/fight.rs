//! Fight lookup within a report.

use std::fmt;
use std::str::FromStr;

use tethercalc_types::Friends;
use tracing::warn;

use crate::error::{Result, TetherError};
use crate::provider::{Fight, FightList, LogProvider};

/// Which fight of a report to analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FightSelector {
    Id(u32),
    /// The final fight in the report.
    Last,
}

impl FromStr for FightSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("last") {
            return Ok(Self::Last);
        }
        s.parse::<u32>()
            .map(Self::Id)
            .map_err(|_| format!("expected a fight id or \"last\", got {s:?}"))
    }
}

impl fmt::Display for FightSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Last => f.write_str("last"),
        }
    }
}

/// A resolved fight with the report-wide context the analysis needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FightMeta {
    pub id: u32,
    pub start: i64,
    pub end: i64,
    pub name: String,
    pub kill: bool,
    pub log_version: i64,
}

impl FightMeta {
    fn from_fight(fight: &Fight, log_version: i64) -> Self {
        Self {
            id: fight.id,
            start: fight.start_time,
            end: fight.end_time,
            name: fight.name.clone(),
            kill: fight.kill.unwrap_or(false),
            log_version,
        }
    }

    pub fn duration_ms(&self) -> i64 {
        self.end - self.start
    }
}

/// A fight together with the report's friendly roster.
#[derive(Debug, Clone)]
pub struct ResolvedFight {
    pub meta: FightMeta,
    pub friends: Friends,
}

/// Pick a fight out of an already-fetched fight list.
pub fn select_fight(report: &str, list: &FightList, selector: FightSelector) -> Result<FightMeta> {
    let fight = match selector {
        FightSelector::Last => list.fights.last(),
        FightSelector::Id(id) => list.fights.iter().find(|f| f.id == id),
    };

    let Some(fight) = fight else {
        let fight = match selector {
            FightSelector::Id(id) => id,
            FightSelector::Last => {
                warn!(report, "report has no fights");
                0
            }
        };
        return Err(TetherError::FightNotFound {
            report: report.to_string(),
            fight,
        });
    };

    Ok(FightMeta::from_fight(fight, list.log_version))
}

/// Fetch the fight list and resolve `selector` to a concrete fight.
pub async fn resolve_fight<P: LogProvider>(
    provider: &P,
    report: &str,
    selector: FightSelector,
) -> Result<ResolvedFight> {
    let list = provider.fights(report).await?;
    let meta = select_fight(report, &list, selector)?;
    let friends = list
        .friendlies
        .into_iter()
        .map(|actor| (actor.id, actor))
        .collect();
    Ok(ResolvedFight { meta, friends })
}

/// Id of the last fight in a report.
pub async fn get_last_fight_id<P: LogProvider>(provider: &P, report: &str) -> Result<u32> {
    let list = provider.fights(report).await?;
    select_fight(report, &list, FightSelector::Last).map(|meta| meta.id)
}
