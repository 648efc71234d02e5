//! In-memory provider and event builders for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use tethercalc_types::{Actor, ActorId};

use crate::error::{Result, TetherError};
use crate::ids::TETHER_BUFF;
use crate::provider::query::tether_filter;
use crate::provider::{
    DamageEntry, DamageTable, Event, EventKind, EventPage, Fight, FightList, LogProvider, Query,
};

/// Enemy actor id used by the event builders.
pub const ENEMY: ActorId = 100;

#[derive(Debug, Default)]
pub struct FakeProvider {
    fights: FightList,
    /// Fixed pages served in order, regardless of query.
    pages: Option<Vec<EventPage>>,
    /// Events served by time window, split by tether vs everything else.
    events: Vec<Event>,
    tables: HashMap<Query, Vec<(ActorId, i64)>>,
    fail_tables: bool,
    page_cursor: Mutex<usize>,
    event_log: Mutex<Vec<Query>>,
    table_log: Mutex<Vec<Query>>,
}

impl FakeProvider {
    pub fn with_fights(mut self, fights: FightList) -> Self {
        self.fights = fights;
        self
    }

    /// Serve `events` as pages cut at the given indices.
    pub fn with_pages(mut self, events: Vec<Event>, split_at: &[usize]) -> Self {
        let mut bounds = vec![0];
        bounds.extend(split_at.iter().copied());
        bounds.push(events.len());

        let mut pages: Vec<EventPage> = bounds
            .windows(2)
            .map(|w| EventPage {
                events: events[w[0]..w[1]].to_vec(),
                next_page_timestamp: None,
            })
            .collect();

        let mut token = 0;
        for i in 1..pages.len() {
            if let Some(first) = pages[i].events.first() {
                token = first.timestamp;
            }
            pages[i - 1].next_page_timestamp = Some(token);
        }
        self.pages = Some(pages);
        self
    }

    pub fn with_events(mut self, events: Vec<Event>) -> Self {
        self.events = events;
        self
    }

    pub fn with_table(mut self, query: Query, entries: &[(ActorId, i64)]) -> Self {
        self.tables.insert(query, entries.to_vec());
        self
    }

    pub fn failing_tables(mut self) -> Self {
        self.fail_tables = true;
        self
    }

    pub fn event_requests(&self) -> usize {
        self.event_log.lock().unwrap().len()
    }

    pub fn event_queries(&self) -> Vec<Query> {
        self.event_log.lock().unwrap().clone()
    }

    pub fn table_queries(&self) -> Vec<Query> {
        self.table_log.lock().unwrap().clone()
    }
}

impl LogProvider for FakeProvider {
    async fn fights(&self, _report: &str) -> Result<FightList> {
        Ok(self.fights.clone())
    }

    async fn event_page(&self, _report: &str, query: &Query) -> Result<EventPage> {
        self.event_log.lock().unwrap().push(query.clone());

        if let Some(pages) = &self.pages {
            let mut cursor = self.page_cursor.lock().unwrap();
            let page = pages.get(*cursor).cloned().unwrap_or_default();
            *cursor += 1;
            return Ok(page);
        }

        let wants_tether = query.filter.as_deref() == Some(tether_filter().as_str());
        let events = self
            .events
            .iter()
            .filter(|e| (e.ability_id == TETHER_BUFF) == wants_tether)
            .filter(|e| e.timestamp >= query.start && e.timestamp <= query.end)
            .cloned()
            .collect();
        Ok(EventPage {
            events,
            next_page_timestamp: None,
        })
    }

    async fn damage_table(&self, _report: &str, query: &Query) -> Result<DamageTable> {
        self.table_log.lock().unwrap().push(query.clone());
        if self.fail_tables {
            return Err(TetherError::UnexpectedProvider { status: 500 });
        }
        let entries = self
            .tables
            .get(query)
            .map(|rows| {
                rows.iter()
                    .map(|&(id, total)| DamageEntry { id, total })
                    .collect()
            })
            .unwrap_or_default();
        Ok(DamageTable { entries })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Builders
// ─────────────────────────────────────────────────────────────────────────────

pub fn event(kind: EventKind, timestamp: i64, source: ActorId, ability: i64) -> Event {
    Event {
        kind,
        timestamp,
        source_id: source,
        target_id: ENEMY,
        ability_id: ability,
        amount: None,
        support_id: None,
    }
}

pub fn damage(timestamp: i64, source: ActorId, ability: i64, amount: i64) -> Event {
    Event {
        amount: Some(amount),
        ..event(EventKind::Damage, timestamp, source, ability)
    }
}

pub fn tether_apply(timestamp: i64, source: ActorId, target: ActorId) -> Event {
    Event {
        target_id: target,
        ..event(EventKind::ApplyBuff, timestamp, source, TETHER_BUFF)
    }
}

pub fn tether_remove(timestamp: i64, source: ActorId, target: ActorId) -> Event {
    Event {
        target_id: target,
        ..event(EventKind::RemoveBuff, timestamp, source, TETHER_BUFF)
    }
}

pub fn actor(id: ActorId, name: &str, kind: &str) -> Actor {
    Actor {
        id,
        name: name.to_string(),
        kind: kind.to_string(),
    }
}

pub fn fight(id: u32, start: i64, end: i64) -> Fight {
    Fight {
        id,
        start_time: start,
        end_time: end,
        name: format!("Fight {id}"),
        kill: Some(true),
    }
}
