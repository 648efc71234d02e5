//! Shared types for tethercalc.
//!
//! These are the serialized shapes handed to whatever presents or caches an
//! analysis: the ranked result per tether, the friendly roster and the
//! encounter summary. The engine itself lives in `tethercalc-core`.

pub mod formatting;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Provider-assigned actor id, unique within one report.
pub type ActorId = i64;

/// Actor type reported for the limit break pseudo-actor.
pub const LIMIT_BREAK_TYPE: &str = "LimitBreak";

/// A friendly actor from the report roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    /// Job name for players, `LimitBreak` for the limit break pseudo-actor.
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Actor {
    pub fn is_limit_break(&self) -> bool {
        self.kind == LIMIT_BREAK_TYPE
    }
}

/// Friendly roster keyed by actor id, iterated in id order.
pub type Friends = BTreeMap<ActorId, Actor>;

/// Summary of the analyzed fight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterInfo {
    pub name: String,
    /// Fight length, formatted with [`formatting::format_timing`].
    pub duration_text: String,
    pub killed: bool,
}

/// Who should have received a tether.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CorrectTarget {
    Actor { id: ActorId, name: String },
    /// Nobody besides the caster and limit breaks did damage in the window.
    Nobody,
}

impl CorrectTarget {
    pub fn actor_id(&self) -> Option<ActorId> {
        match self {
            CorrectTarget::Actor { id, .. } => Some(*id),
            CorrectTarget::Nobody => None,
        }
    }
}

impl fmt::Display for CorrectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrectTarget::Actor { name, .. } => f.write_str(name),
            CorrectTarget::Nobody => f.write_str("Nobody?"),
        }
    }
}

/// Ranked outcome of a single tether.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TetherResult {
    /// Caster of the tether.
    pub source: ActorId,
    /// Recipient the caster actually picked.
    pub target: ActorId,
    pub correct: CorrectTarget,
    /// Tether start relative to the pull.
    pub timing: String,
    /// `(actor, damage)` pairs, highest damage first.
    pub damages: Vec<(ActorId, i64)>,
}
