//! Snapshot tick attribution
//!
//! Periodic damage is fixed when its debuff is applied, so a tick belongs to
//! the window its application fell in, not the window it lands in. The pass
//! replays debuff lifecycles over the window plus [`TICK_EXTENSION_MS`]:
//!
//! ```text
//!        window start          window end                 end + extension
//!             │                    │                             │
//!   apply ────┼──── tick ── tick ──┼── tick ── tick              │   counted
//!             │   apply ── tick ───┼── tick ── (re-apply) ── tick│   counted until re-apply
//!             │                    │  apply ── tick ── tick      │   not counted
//! ```
//!
//! Applications before the window end activate a `(source, ability)` key;
//! applications after it deactivate the key. Removals leave the key active
//! since some effects log their last tick after the removal.

use std::collections::HashSet;

use tethercalc_types::ActorId;
use tracing::{debug, warn};

use super::DamageTotals;
use super::persistent::{PersistentEffects, reconcile_persistent};
use crate::error::Result;
use crate::ids::{PERSISTENT_EFFECT, SHARED_DAMAGE_ABILITY, TICK_EXTENSION_MS, is_legacy_log};
use crate::provider::query::tick_filter;
use crate::provider::{Event, EventKind, LogProvider, Query, drain_events};

/// `(source, ability)` of a snapshot that still counts toward the window.
pub type ActiveDebuffKey = (ActorId, i64);

/// Single pass over an ordered tick event stream for one window.
#[derive(Debug)]
pub struct TickAttribution {
    window_end: i64,
    legacy: bool,
    active: HashSet<ActiveDebuffKey>,
    totals: DamageTotals,
    persistent: PersistentEffects,
}

impl TickAttribution {
    pub fn new(window_end: i64, log_version: i64) -> Self {
        Self {
            window_end,
            legacy: is_legacy_log(log_version),
            active: HashSet::new(),
            totals: DamageTotals::new(),
            persistent: PersistentEffects::default(),
        }
    }

    pub fn push(&mut self, event: &Event) {
        if self.legacy && event.ability_id == PERSISTENT_EFFECT {
            self.persistent.observe(event);
            return;
        }

        let key = (event.source_id, event.ability_id);
        match event.kind {
            kind if kind.is_application() => {
                if event.timestamp < self.window_end {
                    self.active.insert(key);
                } else if event.timestamp > self.window_end {
                    self.active.remove(&key);
                }
            }
            EventKind::Damage => self.credit_damage(event, key),
            _ => {}
        }
    }

    fn credit_damage(&mut self, event: &Event, key: ActiveDebuffKey) {
        let amount = event.amount.unwrap_or(0);

        if event.ability_id == SHARED_DAMAGE_ABILITY && event.timestamp < self.window_end {
            match event.support_id {
                Some(support) => self.totals.credit(support, amount),
                None => warn!(
                    source = event.source_id,
                    timestamp = event.timestamp,
                    "shared damage without a support actor"
                ),
            }
        } else if self.active.contains(&key) {
            self.totals.credit(event.source_id, amount);
        }
    }

    pub fn is_active(&self, key: ActiveDebuffKey) -> bool {
        self.active.contains(&key)
    }

    pub fn finish(self) -> (DamageTotals, PersistentEffects) {
        (self.totals, self.persistent)
    }
}

/// Run the main attribution pass over already-fetched events.
pub fn attribute_ticks(
    events: &[Event],
    window_end: i64,
    log_version: i64,
) -> (DamageTotals, PersistentEffects) {
    let mut pass = TickAttribution::new(window_end, log_version);
    for event in events {
        pass.push(event);
    }
    pass.finish()
}

/// Periodic damage snapshotted inside `[start, end]`, per source actor.
///
/// For legacy logs this also reconciles the persistent effect, which may cost
/// one extra damage-table query per caster whose effect straddles the window.
pub async fn tick_damage<P: LogProvider>(
    provider: &P,
    report: &str,
    log_version: i64,
    start: i64,
    end: i64,
) -> Result<DamageTotals> {
    let query = Query::new(start, end + TICK_EXTENSION_MS).with_filter(tick_filter());
    let events = drain_events(provider, report, &query).await?;

    let (mut totals, persistent) = attribute_ticks(&events, end, log_version);
    if !persistent.is_empty() {
        reconcile_persistent(provider, report, persistent.records(), start, end, &mut totals)
            .await?;
    }

    debug!(report, start, end, actors = totals.len(), "tick damage");
    Ok(totals)
}
