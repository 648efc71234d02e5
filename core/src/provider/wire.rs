//! Response shapes of the log provider's report API.

use serde::{Deserialize, Serialize};
use tethercalc_types::{Actor, ActorId};

/// Actor id the provider uses when an event has no source or target.
pub const NO_ACTOR: ActorId = -1;

// ─────────────────────────────────────────────────────────────────────────────
// Fight list
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FightList {
    #[serde(default)]
    pub fights: Vec<Fight>,
    #[serde(default)]
    pub friendlies: Vec<Actor>,
    #[serde(rename = "logVersion", default)]
    pub log_version: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Fight {
    pub id: u32,
    pub start_time: i64,
    pub end_time: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kill: Option<bool>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    ApplyBuff,
    RefreshBuff,
    RemoveBuff,
    ApplyDebuff,
    RefreshDebuff,
    RemoveDebuff,
    Damage,
    #[serde(other)]
    Other,
}

impl EventKind {
    /// Apply or refresh of a buff or debuff, i.e. a new snapshot.
    pub fn is_application(self) -> bool {
        matches!(
            self,
            Self::ApplyBuff | Self::RefreshBuff | Self::ApplyDebuff | Self::RefreshDebuff
        )
    }
}

/// A normalized combat event.
///
/// Timestamps are milliseconds on the report's clock, the same clock fight
/// start and end times use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireEvent")]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub timestamp: i64,
    #[serde(rename = "sourceID")]
    pub source_id: ActorId,
    #[serde(rename = "targetID")]
    pub target_id: ActorId,
    #[serde(rename = "abilityID")]
    pub ability_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(rename = "supportID", skip_serializing_if = "Option::is_none")]
    pub support_id: Option<ActorId>,
}

#[derive(Debug, Deserialize)]
struct WireEvent {
    #[serde(rename = "type")]
    kind: EventKind,
    timestamp: i64,
    #[serde(rename = "sourceID")]
    source_id: Option<ActorId>,
    /// Sometimes sent in place of `sourceID`.
    source: Option<WireActorRef>,
    #[serde(rename = "targetID")]
    target_id: Option<ActorId>,
    ability: Option<WireAbility>,
    /// Present when re-reading our own serialized form.
    #[serde(rename = "abilityID")]
    ability_id: Option<i64>,
    amount: Option<i64>,
    #[serde(rename = "supportID")]
    support_id: Option<ActorId>,
}

#[derive(Debug, Deserialize)]
struct WireActorRef {
    id: ActorId,
}

#[derive(Debug, Deserialize)]
struct WireAbility {
    guid: i64,
}

impl From<WireEvent> for Event {
    fn from(wire: WireEvent) -> Self {
        let source_id = wire
            .source_id
            .or(wire.source.map(|s| s.id))
            .unwrap_or(NO_ACTOR);
        let ability_id = wire
            .ability
            .map(|a| a.guid)
            .or(wire.ability_id)
            .unwrap_or_default();
        Self {
            kind: wire.kind,
            timestamp: wire.timestamp,
            source_id,
            target_id: wire.target_id.unwrap_or(NO_ACTOR),
            ability_id,
            amount: wire.amount,
            support_id: wire.support_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPage {
    #[serde(default)]
    pub events: Vec<Event>,
    /// Continuation token: start of the next page, absent on the last page.
    #[serde(rename = "nextPageTimestamp", default)]
    pub next_page_timestamp: Option<i64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Damage table
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DamageTable {
    #[serde(default)]
    pub entries: Vec<DamageEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DamageEntry {
    pub id: ActorId,
    #[serde(default)]
    pub total: i64,
}
