//! Tether interval reconstruction
//!
//! Rebuilds `(source, target, start, end)` intervals from the tether buff's
//! apply/remove events. The provider occasionally drops one side of a pair:
//!
//! - A remove with no open apply becomes an interval covering the preceding
//!   [`TETHER_LOOKBACK_MS`] (never earlier than the pull).
//! - An apply that is never removed runs until the end of the fight.

use std::collections::HashMap;

use tethercalc_types::ActorId;
use tracing::{debug, warn};

use crate::error::{Result, TetherError};
use crate::ids::{TETHER_BUFF, TETHER_LOOKBACK_MS};
use crate::provider::query::tether_filter;
use crate::provider::{Event, EventKind, LogProvider, Query, drain_events};

/// One tether from `source` onto `target`, on the report clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TetherInterval {
    pub source: ActorId,
    pub target: ActorId,
    pub start: i64,
    pub end: i64,
}

impl TetherInterval {
    pub fn duration_ms(&self) -> i64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    source: ActorId,
    target: ActorId,
    start: i64,
    end: Option<i64>,
}

/// Accumulates tether intervals from an ordered buff event stream.
///
/// Intervals keep the order in which they were opened. Open intervals are
/// indexed per caster so closing one never scans the whole list.
#[derive(Debug)]
pub struct TetherWindowBuilder {
    encounter_start: i64,
    encounter_end: i64,
    slots: Vec<Slot>,
    /// Caster -> indices of its still-open slots, oldest first.
    open: HashMap<ActorId, Vec<usize>>,
}

impl TetherWindowBuilder {
    pub fn new(encounter_start: i64, encounter_end: i64) -> Self {
        Self {
            encounter_start,
            encounter_end,
            slots: Vec::new(),
            open: HashMap::new(),
        }
    }

    pub fn push(&mut self, event: &Event) {
        if event.ability_id != TETHER_BUFF {
            return;
        }
        match event.kind {
            EventKind::ApplyBuff => self.open_slot(event),
            EventKind::RemoveBuff => self.close_slot(event),
            _ => {}
        }
    }

    fn open_slot(&mut self, event: &Event) {
        let idx = self.slots.len();
        self.slots.push(Slot {
            source: event.source_id,
            target: event.target_id,
            start: event.timestamp.max(self.encounter_start),
            end: None,
        });
        self.open.entry(event.source_id).or_default().push(idx);
    }

    fn close_slot(&mut self, event: &Event) {
        let open_idx = self
            .open
            .get_mut(&event.source_id)
            .and_then(|stack| stack.pop());

        match open_idx {
            Some(idx) => self.slots[idx].end = Some(event.timestamp),
            None => {
                let start = (event.timestamp - TETHER_LOOKBACK_MS).max(self.encounter_start);
                warn!(
                    source = event.source_id,
                    target = event.target_id,
                    timestamp = event.timestamp,
                    start,
                    "tether removed without an apply, assuming lookback window"
                );
                self.slots.push(Slot {
                    source: event.source_id,
                    target: event.target_id,
                    start,
                    end: Some(event.timestamp),
                });
            }
        }
    }

    /// Close any still-open intervals at the end of the fight.
    pub fn finish(self) -> Vec<TetherInterval> {
        let encounter_end = self.encounter_end;
        self.slots
            .into_iter()
            .map(|slot| {
                let end = slot.end.unwrap_or(encounter_end).min(encounter_end);
                TetherInterval {
                    source: slot.source,
                    target: slot.target,
                    start: slot.start.min(end),
                    end,
                }
            })
            .collect()
    }
}

/// Reconstruct intervals from an already-fetched event stream.
pub fn tethers_from_events(
    events: &[Event],
    encounter_start: i64,
    encounter_end: i64,
) -> Vec<TetherInterval> {
    let mut builder = TetherWindowBuilder::new(encounter_start, encounter_end);
    for event in events {
        builder.push(event);
    }
    builder.finish()
}

/// Fetch the tether buff events of a fight and rebuild its intervals.
///
/// A fight without any tether is reported as [`TetherError::NoTethersFound`].
pub async fn build_tethers<P: LogProvider>(
    provider: &P,
    report: &str,
    encounter_start: i64,
    encounter_end: i64,
) -> Result<Vec<TetherInterval>> {
    let query = Query::new(encounter_start, encounter_end).with_filter(tether_filter());
    let events = drain_events(provider, report, &query).await?;
    let tethers = tethers_from_events(&events, encounter_start, encounter_end);

    if tethers.is_empty() {
        return Err(TetherError::NoTethersFound);
    }
    debug!(report, count = tethers.len(), "rebuilt tether intervals");
    Ok(tethers)
}
