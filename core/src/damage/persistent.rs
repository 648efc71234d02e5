//! Legacy persistent-effect reconciliation
//!
//! Older logs record the persistent effect as one apply, one remove and a
//! single damage burst, so it cannot be attributed tick by tick. Each caster's
//! record is instead placed against the measurement window afterwards:
//!
//! - fully inside: its recorded damage counts as-is
//! - started after the window: ignored
//! - anything else: the caster's damage on the effect's target is queried from
//!   the effect's start (the window start when unknown) to its end (capped at
//!   the window end), and a fixed fraction of it is credited

use std::collections::HashMap;

use tethercalc_types::ActorId;
use tracing::debug;

use super::DamageTotals;
use crate::error::Result;
use crate::ids::{PERSISTENT_EFFECT_END_OFFSET_MS, PERSISTENT_EFFECT_FRACTION};
use crate::provider::query::source_on_target_filter;
use crate::provider::{Event, EventKind, LogProvider, Query};
use crate::provider::wire::NO_ACTOR;

fn set_once<T>(slot: &mut Option<T>, value: T) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

/// Lifecycle of one caster's persistent effect. Each boundary is taken from
/// the first event that reports it and never overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistentEffectRecord {
    pub source: ActorId,
    pub start: Option<i64>,
    /// Effective end, already pulled in by the logging delay.
    pub end: Option<i64>,
    pub damage: Option<i64>,
    /// Enemy the effect was last seen on.
    pub target: ActorId,
}

/// Where a record sits relative to a measurement window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Inside { damage: i64 },
    After,
    /// Span `[start, end]` to query. A missing start becomes the window
    /// start; the end never runs past the window end.
    Partial { start: i64, end: i64 },
    /// No usable boundary inside the window.
    Outside,
}

impl PersistentEffectRecord {
    pub fn new(source: ActorId) -> Self {
        Self {
            source,
            start: None,
            end: None,
            damage: None,
            target: NO_ACTOR,
        }
    }

    pub fn observe(&mut self, event: &Event) {
        match event.kind {
            EventKind::ApplyDebuff => set_once(&mut self.start, event.timestamp),
            EventKind::RemoveDebuff => set_once(
                &mut self.end,
                event.timestamp - PERSISTENT_EFFECT_END_OFFSET_MS,
            ),
            EventKind::Damage => {
                if let Some(amount) = event.amount {
                    set_once(&mut self.damage, amount);
                }
            }
            _ => {}
        }
        self.target = event.target_id;
    }

    pub fn placement(&self, window_start: i64, window_end: i64) -> Placement {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start > window_start && end < window_end => {
                Placement::Inside {
                    damage: self.damage.unwrap_or(0),
                }
            }
            (Some(start), _) if start > window_end => Placement::After,
            (None, None) => Placement::Outside,
            (start, end) => {
                let start = start.unwrap_or(window_start);
                let end = end.unwrap_or(window_end).min(window_end);
                if start < end {
                    Placement::Partial { start, end }
                } else {
                    Placement::Outside
                }
            }
        }
    }
}

/// Per-caster records in first-seen order.
#[derive(Debug, Default)]
pub struct PersistentEffects {
    records: Vec<PersistentEffectRecord>,
    index: HashMap<ActorId, usize>,
}

impl PersistentEffects {
    pub fn observe(&mut self, event: &Event) {
        let idx = *self.index.entry(event.source_id).or_insert_with(|| {
            self.records.push(PersistentEffectRecord::new(event.source_id));
            self.records.len() - 1
        });
        self.records[idx].observe(event);
    }

    pub fn records(&self) -> &[PersistentEffectRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Credit each record's share of damage for `[window_start, window_end]`.
pub async fn reconcile_persistent<P: LogProvider>(
    provider: &P,
    report: &str,
    records: &[PersistentEffectRecord],
    window_start: i64,
    window_end: i64,
    totals: &mut DamageTotals,
) -> Result<()> {
    for record in records {
        match record.placement(window_start, window_end) {
            Placement::Inside { damage } => totals.credit(record.source, damage),
            Placement::After | Placement::Outside => {}
            Placement::Partial { start, end } => {
                let query = Query::new(start, end)
                    .with_filter(source_on_target_filter(record.source, record.target));
                let table = provider.damage_table(report, &query).await?;

                let Some(entry) = table.entries.first() else {
                    debug!(source = record.source, start, end, "no overlapping damage");
                    continue;
                };
                let share = (PERSISTENT_EFFECT_FRACTION * entry.total as f64) as i64;
                debug!(
                    source = record.source,
                    start,
                    end,
                    total = entry.total,
                    share,
                    "partial persistent effect"
                );
                totals.credit(record.source, share);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::PERSISTENT_EFFECT;
    use crate::testing::{FakeProvider, damage, event};

    fn record(
        start: Option<i64>,
        end: Option<i64>,
        damage: Option<i64>,
    ) -> PersistentEffectRecord {
        PersistentEffectRecord {
            source: 3,
            start,
            end,
            damage,
            target: 100,
        }
    }

    #[test]
    fn first_write_wins() {
        let mut effects = PersistentEffects::default();
        effects.observe(&event(EventKind::ApplyDebuff, 2_000, 3, PERSISTENT_EFFECT));
        effects.observe(&event(EventKind::ApplyDebuff, 2_500, 3, PERSISTENT_EFFECT));
        effects.observe(&damage(12_000, 3, PERSISTENT_EFFECT, 40_000));
        effects.observe(&damage(12_010, 3, PERSISTENT_EFFECT, 99));
        effects.observe(&event(EventKind::RemoveDebuff, 12_000, 3, PERSISTENT_EFFECT));
        effects.observe(&event(EventKind::RemoveDebuff, 13_000, 3, PERSISTENT_EFFECT));

        let rec = &effects.records()[0];
        assert_eq!(rec.start, Some(2_000));
        assert_eq!(rec.end, Some(11_250));
        assert_eq!(rec.damage, Some(40_000));
        assert_eq!(effects.records().len(), 1);
    }

    #[test]
    fn placements() {
        assert_eq!(
            record(Some(2_000), Some(8_000), Some(500)).placement(1_000, 10_000),
            Placement::Inside { damage: 500 }
        );
        assert_eq!(
            record(Some(2_000), Some(8_000), None).placement(1_000, 10_000),
            Placement::Inside { damage: 0 }
        );
        assert_eq!(
            record(Some(11_000), Some(20_000), Some(500)).placement(1_000, 10_000),
            Placement::After
        );
        assert_eq!(
            record(None, Some(4_000), None).placement(1_000, 10_000),
            Placement::Partial { start: 1_000, end: 4_000 }
        );
        assert_eq!(
            record(Some(6_000), Some(14_000), None).placement(1_000, 10_000),
            Placement::Partial { start: 6_000, end: 10_000 }
        );
        assert_eq!(
            record(Some(6_000), None, None).placement(1_000, 10_000),
            Placement::Partial { start: 6_000, end: 10_000 }
        );
        assert_eq!(
            record(None, None, Some(7)).placement(1_000, 10_000),
            Placement::Outside
        );
    }

    #[test]
    fn known_start_before_window_is_kept() {
        assert_eq!(
            record(Some(500), Some(4_000), None).placement(1_000, 10_000),
            Placement::Partial { start: 500, end: 4_000 }
        );
        assert_eq!(
            record(Some(100), Some(600), None).placement(1_000, 10_000),
            Placement::Partial { start: 100, end: 600 }
        );
        assert_eq!(
            record(Some(500), Some(14_000), None).placement(1_000, 10_000),
            Placement::Partial { start: 500, end: 10_000 }
        );
    }

    #[tokio::test]
    async fn early_start_is_queried_from_effect_start() {
        let query = Query::new(500, 4_000).with_filter(source_on_target_filter(3, 100));
        let provider = FakeProvider::default().with_table(query.clone(), &[(3, 8_000)]);
        let mut totals = DamageTotals::new();

        reconcile_persistent(
            &provider,
            "r",
            &[record(Some(500), Some(4_000), None)],
            1_000,
            10_000,
            &mut totals,
        )
        .await
        .unwrap();
        assert_eq!(provider.table_queries(), vec![query]);
        assert_eq!(totals.get(3), Some(2_000));
    }

    #[tokio::test]
    async fn partial_overlap_credits_fraction() {
        let query = Query::new(1_000, 4_000).with_filter(source_on_target_filter(3, 100));
        let provider = FakeProvider::default().with_table(query, &[(3, 10_001)]);
        let mut totals = DamageTotals::new();

        reconcile_persistent(
            &provider,
            "r",
            &[record(None, Some(4_000), None)],
            1_000,
            10_000,
            &mut totals,
        )
        .await
        .unwrap();
        assert_eq!(totals.get(3), Some(2_500));
    }

    #[tokio::test]
    async fn partial_overlap_without_entries_is_zero() {
        let provider = FakeProvider::default();
        let mut totals = DamageTotals::new();

        reconcile_persistent(
            &provider,
            "r",
            &[record(None, Some(4_000), None)],
            1_000,
            10_000,
            &mut totals,
        )
        .await
        .unwrap();
        assert!(totals.is_empty());
        assert_eq!(provider.table_queries().len(), 1);
    }

    #[tokio::test]
    async fn inside_and_after_need_no_query() {
        let provider = FakeProvider::default();
        let mut totals = DamageTotals::new();
        let records = [
            record(Some(2_000), Some(8_000), Some(500)),
            PersistentEffectRecord {
                source: 4,
                ..record(Some(12_000), Some(20_000), Some(900))
            },
        ];

        reconcile_persistent(&provider, "r", &records, 1_000, 10_000, &mut totals)
            .await
            .unwrap();
        assert_eq!(totals.iter().collect::<Vec<_>>(), vec![(3, 500)]);
        assert!(provider.table_queries().is_empty());
    }
}
