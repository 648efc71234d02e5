//! Log provider access
//!
//! This module provides:
//! - **LogProvider**: the seam between the engine and the report API
//! - **LogClient**: the reqwest-backed implementation
//! - **drain_events**: continuation-token pagination over any provider
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐   fights / event_page / damage_table
//! │  fight, tether, damage   │ ─────────────────────────────────────┐
//! └──────────────────────────┘                                      ▼
//!                                                      ┌────────────────────────┐
//!                                                      │  impl LogProvider      │
//!                                                      │  (LogClient over HTTP) │
//!                                                      └────────────────────────┘
//! ```

mod client;
pub mod query;
pub mod wire;

use std::future::Future;

use tracing::debug;

pub use client::{CallKind, LogClient};
pub use query::Query;
pub use wire::{DamageEntry, DamageTable, Event, EventKind, EventPage, Fight, FightList};

use crate::error::Result;

/// Source of report data.
///
/// Implementations return single pages; pagination lives in [`drain_events`]
/// so every provider gets the same continuation behavior.
pub trait LogProvider: Sync {
    /// Fight list, friendly roster and log version of a report.
    fn fights(&self, report: &str) -> impl Future<Output = Result<FightList>> + Send;

    /// One page of the filtered event stream starting at `query.start`.
    fn event_page(
        &self,
        report: &str,
        query: &Query,
    ) -> impl Future<Output = Result<EventPage>> + Send;

    /// Provider-aggregated damage done per actor.
    fn damage_table(
        &self,
        report: &str,
        query: &Query,
    ) -> impl Future<Output = Result<DamageTable>> + Send;
}

/// Fetch every page of an event stream, following continuation tokens until
/// the provider stops returning one. Pages are concatenated in request order.
pub async fn drain_events<P: LogProvider>(
    provider: &P,
    report: &str,
    query: &Query,
) -> Result<Vec<Event>> {
    let EventPage {
        mut events,
        next_page_timestamp,
    } = provider.event_page(report, query).await?;

    let mut next = next_page_timestamp;
    let mut pages = 1usize;
    while let Some(start) = next {
        let page = provider.event_page(report, &query.resume_at(start)).await?;
        events.extend(page.events);
        next = page.next_page_timestamp;
        pages += 1;
    }

    debug!(
        report,
        start = query.start,
        end = query.end,
        pages,
        events = events.len(),
        "drained event stream"
    );
    Ok(events)
}
