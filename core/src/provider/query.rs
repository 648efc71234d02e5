//! Time-bounded provider queries and the filter expressions they carry.

use tethercalc_types::ActorId;

use crate::ids::{GROUND_EFFECT_BUFFS, NOISE_DEBUFFS, SHARED_DAMAGE_ABILITY, TETHER_BUFF};

/// A `[start, end]` request on the report clock with an optional filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    pub start: i64,
    pub end: i64,
    pub filter: Option<String>,
}

impl Query {
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Same query, resumed from a continuation token.
    pub fn resume_at(&self, start: i64) -> Self {
        Self {
            start,
            ..self.clone()
        }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("start", self.start.to_string()),
            ("end", self.end.to_string()),
        ];
        if let Some(filter) = &self.filter {
            params.push(("filter", filter.clone()));
        }
        params
    }
}

fn id_list(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Apply/remove events of the tether buff.
pub fn tether_filter() -> String {
    format!("ability.id={TETHER_BUFF}")
}

/// Non-periodic damage by players and NPC allies, pets excluded.
pub fn direct_damage_filter() -> String {
    r#"isTick="false" and source.type!="pet""#.to_string()
}

/// Everything the tick attribution pass replays:
/// - debuff lifecycle events (minus debuffs that never deal damage)
/// - periodic damage ticks on enemies
/// - lifecycle events of ground effects that tick as buffs
/// - damage of the shared-damage ability
///
/// Only player sources matter since the tether does not affect pets or NPCs.
pub fn tick_filter() -> String {
    let ground_effects = GROUND_EFFECT_BUFFS
        .iter()
        .map(|id| format!("ability.id={id}"))
        .collect::<Vec<_>>()
        .join(" or ");

    format!(
        concat!(
            r#"source.type="player" and ability.id not in ({noise}) and ("#,
            r#"(type="applydebuff" or type="refreshdebuff" or type="removedebuff")"#,
            r#" or (isTick="true" and type="damage" and target.disposition="enemy""#,
            r#" and ability.name!="Combined DoTs")"#,
            r#" or ((type="applybuff" or type="refreshbuff" or type="removebuff")"#,
            r#" and ({ground_effects}))"#,
            r#" or (type="damage" and ability.id={shared}))"#,
        ),
        noise = id_list(NOISE_DEBUFFS),
        ground_effects = ground_effects,
        shared = SHARED_DAMAGE_ABILITY,
    )
}

/// Non-pet damage from one actor against one target.
pub fn source_on_target_filter(source: ActorId, target: ActorId) -> String {
    format!(r#"source.type!="pet" and source.id={source} and target.id={target}"#)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_include_filter_only_when_set() {
        let plain = Query::new(0, 1000).params();
        assert_eq!(plain.len(), 2);

        let filtered = Query::new(0, 1000).with_filter(tether_filter()).params();
        assert_eq!(filtered[2], ("filter", "ability.id=1001454".to_string()));
    }

    #[test]
    fn resume_keeps_end_and_filter() {
        let query = Query::new(100, 9000).with_filter("x");
        let resumed = query.resume_at(4500);
        assert_eq!(resumed.start, 4500);
        assert_eq!(resumed.end, 9000);
        assert_eq!(resumed.filter.as_deref(), Some("x"));
    }

    #[test]
    fn tick_filter_mentions_every_id() {
        let filter = tick_filter();
        assert!(filter.contains("ability.id not in (1000493, 1000819"));
        for id in GROUND_EFFECT_BUFFS {
            assert!(filter.contains(&format!("ability.id={id}")));
        }
        assert!(filter.contains("ability.id=799"));
        assert_eq!(filter.matches('(').count(), filter.matches(')').count());
    }

    #[test]
    fn source_on_target() {
        assert_eq!(
            source_on_target_filter(4, 17),
            r#"source.type!="pet" and source.id=4 and target.id=17"#
        );
    }
}
